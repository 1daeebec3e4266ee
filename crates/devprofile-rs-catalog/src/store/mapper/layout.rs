// crates/devprofile-rs-catalog/src/store/mapper/layout.rs

//! Enumerations, constraints and record items.
//!
//! These hang off parameters, custom types, process data images and record
//! nodes alike, so their rows carry an `owner` key instead of a foreign key
//! per parent kind. Node-level rows use `"<owner>#<node index>"`.

use super::{parse_column, parse_optional, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{
    Constraint, DataTypeRef, EnumerationValue, RecordLayout, RecordNode, TextRef,
};
use rusqlite::{Connection, params};
use std::collections::HashMap;

fn node_owner(owner: &str, node: usize) -> String {
    format!("{}#{}", owner, node)
}

pub(super) fn insert_enumeration(
    conn: &Connection,
    id: &str,
    owner: &str,
    values: &[EnumerationValue],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO enumerations (profile_id, owner, ordinal, value, name) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (ordinal, v) in values.iter().enumerate() {
        stmt.execute(params![id, owner, ordinal, v.value, v.name.id()])?;
    }
    Ok(())
}

pub(super) fn insert_constraints(
    conn: &Connection,
    id: &str,
    owner: &str,
    constraints: &[Constraint],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO constraints (profile_id, owner, ordinal, lower_value, upper_value, name) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (ordinal, c) in constraints.iter().enumerate() {
        let Constraint::ValueRange { lower, upper, name } = c;
        stmt.execute(params![id, owner, ordinal, lower, upper, text_id(name)])?;
    }
    Ok(())
}

/// Writes the nodes of `layout` and the enumerations and constraints of
/// each node.
pub(super) fn insert_layout(
    conn: &Connection,
    id: &str,
    owner: &str,
    layout: &RecordLayout,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO record_items (profile_id, owner, ordinal, parent, bit_offset, bit_length, \
             data_type, subindex, name, description, access_restriction, reference) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )?;
    for (ordinal, node) in layout.nodes().iter().enumerate() {
        stmt.execute(params![
            id,
            owner,
            ordinal,
            node.parent,
            node.bit_offset,
            node.bit_length,
            node.data_type.to_string(),
            node.subindex,
            text_id(&node.name),
            text_id(&node.description),
            node.access_restriction.map(|a| a.as_str()),
            node.reference,
        ])?;
        let owner = node_owner(owner, ordinal);
        insert_enumeration(conn, id, &owner, &node.enumeration)?;
        insert_constraints(conn, id, &owner, &node.constraints)?;
    }
    Ok(())
}

/// Every enumeration, constraint and record row of one profile, grouped by
/// owner. Owners are taken out as their parents are rebuilt.
pub(super) struct Dependents {
    enumerations: HashMap<String, Vec<EnumerationValue>>,
    constraints: HashMap<String, Vec<Constraint>>,
    records: HashMap<String, Vec<RecordNode>>,
}

impl Dependents {
    pub(super) fn load(conn: &Connection, id: &str) -> Result<Self, StoreError> {
        let mut enumerations: HashMap<String, Vec<EnumerationValue>> = HashMap::new();
        let mut stmt = conn.prepare_cached(
            "SELECT owner, value, name FROM enumerations WHERE profile_id = ?1 \
             ORDER BY owner, ordinal",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                EnumerationValue {
                    value: row.get(1)?,
                    name: TextRef(row.get(2)?),
                },
            ))
        })?;
        for row in rows {
            let (owner, value) = row?;
            enumerations.entry(owner).or_default().push(value);
        }

        let mut constraints: HashMap<String, Vec<Constraint>> = HashMap::new();
        let mut stmt = conn.prepare_cached(
            "SELECT owner, lower_value, upper_value, name FROM constraints WHERE profile_id = ?1 \
             ORDER BY owner, ordinal",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Constraint::ValueRange {
                    lower: row.get(1)?,
                    upper: row.get(2)?,
                    name: text_ref(row.get(3)?),
                },
            ))
        })?;
        for row in rows {
            let (owner, constraint) = row?;
            constraints.entry(owner).or_default().push(constraint);
        }

        let mut records: HashMap<String, Vec<RecordNode>> = HashMap::new();
        let mut stmt = conn.prepare_cached(
            "SELECT owner, parent, bit_offset, bit_length, data_type, subindex, name, \
                 description, access_restriction, reference \
             FROM record_items WHERE profile_id = ?1 ORDER BY owner, ordinal",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<usize>>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<u8>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, Option<String>>(8)?,
                row.get::<_, Option<String>>(9)?,
            ))
        })?;
        for row in rows {
            let (owner, parent, bit_offset, bit_length, data_type, subindex, name, description, access, reference) =
                row?;
            let data_type: DataTypeRef = parse_column("record_items", "data_type", &data_type)?;
            records.entry(owner).or_default().push(RecordNode {
                parent,
                bit_offset,
                bit_length,
                data_type,
                subindex,
                name: text_ref(name),
                description: text_ref(description),
                access_restriction: parse_optional("record_items", "access_restriction", access)?,
                reference,
                enumeration: Vec::new(),
                constraints: Vec::new(),
            });
        }

        Ok(Self {
            enumerations,
            constraints,
            records,
        })
    }

    pub(super) fn take_enumeration(&mut self, owner: &str) -> Vec<EnumerationValue> {
        self.enumerations.remove(owner).unwrap_or_default()
    }

    pub(super) fn take_constraints(&mut self, owner: &str) -> Vec<Constraint> {
        self.constraints.remove(owner).unwrap_or_default()
    }

    /// Rebuilds the record layout of `owner`, node dependents included.
    pub(super) fn take_layout(&mut self, owner: &str) -> Result<RecordLayout, StoreError> {
        let mut layout = RecordLayout::new();
        for (index, mut node) in self.records.remove(owner).unwrap_or_default().into_iter().enumerate() {
            let node_owner = node_owner(owner, index);
            node.enumeration = self.take_enumeration(&node_owner);
            node.constraints = self.take_constraints(&node_owner);
            layout
                .push(node)
                .map_err(|e| StoreError::InvalidData(format!("record_items[{}]: {}", owner, e)))?;
        }
        Ok(layout)
    }
}
