// crates/devprofile-rs-catalog/src/store/mapper/custom_types.rs

use super::layout::{self, Dependents};
use super::parse_column;
use crate::error::StoreError;
use devprofile_rs::model::{CustomDataType, DataTypeRef};
use rusqlite::{Connection, params};
use std::collections::BTreeMap;

fn owner(type_id: &str) -> String {
    format!("custom_type:{}", type_id)
}

pub(super) fn insert(
    conn: &Connection,
    id: &str,
    types: &BTreeMap<String, CustomDataType>,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO custom_types (profile_id, ordinal, id, data_type) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (ordinal, (type_id, ty)) in types.iter().enumerate() {
        stmt.execute(params![id, ordinal, type_id, ty.data_type.to_string()])?;
        let owner = owner(type_id);
        layout::insert_enumeration(conn, id, &owner, &ty.enumeration)?;
        layout::insert_constraints(conn, id, &owner, &ty.constraints)?;
        layout::insert_layout(conn, id, &owner, &ty.items)?;
    }
    Ok(())
}

pub(super) fn load(
    conn: &Connection,
    id: &str,
    dependents: &mut Dependents,
) -> Result<BTreeMap<String, CustomDataType>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, data_type FROM custom_types WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let rows: Vec<(String, String)> = stmt
        .query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<_, _>>()?;

    let mut types = BTreeMap::new();
    for (type_id, data_type) in rows {
        let owner = owner(&type_id);
        let ty = CustomDataType {
            id: type_id.clone(),
            data_type: parse_column::<DataTypeRef>("custom_types", "data_type", &data_type)?,
            enumeration: dependents.take_enumeration(&owner),
            constraints: dependents.take_constraints(&owner),
            items: dependents.take_layout(&owner)?,
        };
        types.insert(type_id, ty);
    }
    Ok(types)
}
