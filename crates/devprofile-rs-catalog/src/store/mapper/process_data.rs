// crates/devprofile-rs-catalog/src/store/mapper/process_data.rs

use super::layout::{self, Dependents};
use super::{parse_column, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{
    Direction, ProcessData, ProcessDataCondition, ProcessDataItem, ProcessDataVariant,
};
use rusqlite::{Connection, OptionalExtension, params};

fn owner(variant: usize, direction: Direction) -> String {
    format!("process_data:{}:{}", variant, direction)
}

pub(super) fn insert(conn: &Connection, id: &str, data: &ProcessData) -> rusqlite::Result<()> {
    let mut variants = conn.prepare_cached(
        "INSERT INTO process_data_variants \
             (profile_id, variant, id, condition_variable, condition_subindex, condition_value) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    if let Some(condition) = &data.condition {
        variants.execute(params![
            id,
            0,
            None::<String>,
            condition.variable_id,
            condition.subindex,
            condition.value,
        ])?;
    }
    for (i, variant) in data.alternatives.iter().enumerate() {
        let condition = variant.condition.as_ref();
        variants.execute(params![
            id,
            i + 1,
            variant.id,
            condition.map(|c| &c.variable_id),
            condition.and_then(|c| c.subindex),
            condition.map(|c| &c.value),
        ])?;
    }

    insert_items(conn, id, 0, data.items())?;
    for (i, variant) in data.alternatives.iter().enumerate() {
        insert_items(conn, id, i + 1, variant.items())?;
    }
    Ok(())
}

fn insert_items<'a>(
    conn: &Connection,
    id: &str,
    variant: usize,
    items: impl Iterator<Item = (Direction, &'a ProcessDataItem)>,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO process_data \
             (profile_id, variant, direction, id, name, bit_length, data_type, path, flags) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for (direction, item) in items {
        stmt.execute(params![
            id,
            variant,
            direction.as_str(),
            item.id,
            text_id(&item.name),
            item.bit_length,
            item.data_type.to_string(),
            item.path,
            item.flags,
        ])?;
        layout::insert_layout(conn, id, &owner(variant, direction), &item.items)?;
    }
    Ok(())
}

/// Loads every variant into `data`, whose `collection_id` the root row has
/// already set.
pub(super) fn load(
    conn: &Connection,
    id: &str,
    data: &mut ProcessData,
    dependents: &mut Dependents,
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT variant, id, condition_variable, condition_subindex, condition_value \
         FROM process_data_variants WHERE profile_id = ?1 ORDER BY variant",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        let condition = row
            .get::<_, Option<String>>(2)?
            .map(|variable_id| -> rusqlite::Result<_> {
                Ok(ProcessDataCondition {
                    variable_id,
                    subindex: row.get(3)?,
                    value: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                })
            })
            .transpose()?;
        Ok((
            row.get::<_, usize>(0)?,
            row.get::<_, Option<String>>(1)?,
            condition,
        ))
    })?;

    for row in rows {
        let (variant, variant_id, condition) = row?;
        if variant == 0 {
            data.condition = condition;
            continue;
        }
        let variant_id = variant_id.ok_or_else(|| {
            StoreError::InvalidData(format!("process_data_variants.id: variant {} has no id", variant))
        })?;
        data.alternatives.push(ProcessDataVariant {
            id: variant_id,
            condition,
            input: load_item(conn, id, variant, Direction::Input, dependents)?,
            output: load_item(conn, id, variant, Direction::Output, dependents)?,
        });
    }
    data.input = load_item(conn, id, 0, Direction::Input, dependents)?;
    data.output = load_item(conn, id, 0, Direction::Output, dependents)?;
    Ok(())
}

/// The image stored for one variant and direction, if any.
fn load_item(
    conn: &Connection,
    id: &str,
    variant: usize,
    direction: Direction,
    dependents: &mut Dependents,
) -> Result<Option<ProcessDataItem>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, name, bit_length, data_type, path, flags FROM process_data \
             WHERE profile_id = ?1 AND variant = ?2 AND direction = ?3",
            params![id, variant, direction.as_str()],
            |row| {
                let item = ProcessDataItem {
                    id: row.get(0)?,
                    name: text_ref(row.get(1)?),
                    bit_length: row.get(2)?,
                    path: row.get(4)?,
                    flags: row.get(5)?,
                    ..ProcessDataItem::default()
                };
                Ok((item, row.get::<_, String>(3)?))
            },
        )
        .optional()?;

    let Some((mut item, data_type)) = row else {
        return Ok(None);
    };
    item.data_type = parse_column("process_data", "data_type", &data_type)?;
    item.items = dependents.take_layout(&owner(variant, direction))?;
    Ok(Some(item))
}
