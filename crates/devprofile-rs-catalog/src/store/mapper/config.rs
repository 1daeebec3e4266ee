// crates/devprofile-rs-catalog/src/store/mapper/config.rs

//! Wiring and device test configuration.

use crate::error::StoreError;
use devprofile_rs::model::{DeviceProfile, EventTrigger, TestEntry, Wire, WiringConfig};
use rusqlite::{Connection, OptionalExtension, params};

pub(super) fn insert(conn: &Connection, id: &str, profile: &DeviceProfile) -> rusqlite::Result<()> {
    if let Some(wiring) = &profile.wiring {
        conn.execute(
            "INSERT INTO wiring (profile_id, connection_type) VALUES (?1, ?2)",
            params![id, wiring.connection_type],
        )?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO wires (profile_id, ordinal, number, color, function) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (ordinal, wire) in wiring.wires.iter().enumerate() {
            stmt.execute(params![id, ordinal, wire.number, wire.color, wire.function])?;
        }
    }

    let mut entry_stmt = conn.prepare_cached(
        "INSERT INTO test_entries (profile_id, ordinal, slot, param_index, test_value) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let mut trigger_stmt = conn.prepare_cached(
        "INSERT INTO test_triggers (profile_id, entry_ordinal, ordinal, appear_value, disappear_value) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (entry_ordinal, entry) in profile.test.entries.iter().enumerate() {
        entry_stmt.execute(params![id, entry_ordinal, entry.slot, entry.index, entry.test_value])?;
        for (ordinal, t) in entry.triggers.iter().enumerate() {
            trigger_stmt.execute(params![
                id,
                entry_ordinal,
                ordinal,
                t.appear_value,
                t.disappear_value
            ])?;
        }
    }
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str, profile: &mut DeviceProfile) -> Result<(), StoreError> {
    let connection_type: Option<String> = conn
        .query_row(
            "SELECT connection_type FROM wiring WHERE profile_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    profile.wiring = match connection_type {
        Some(connection_type) => {
            let mut stmt = conn.prepare_cached(
                "SELECT number, color, function FROM wires WHERE profile_id = ?1 ORDER BY ordinal",
            )?;
            let wires = stmt
                .query_map(params![id], |row| {
                    Ok(Wire {
                        number: row.get(0)?,
                        color: row.get(1)?,
                        function: row.get(2)?,
                    })
                })?
                .collect::<Result<_, _>>()?;
            Some(WiringConfig {
                connection_type,
                wires,
            })
        }
        None => None,
    };

    let mut stmt = conn.prepare_cached(
        "SELECT slot, param_index, test_value FROM test_entries \
         WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.test.entries = stmt
        .query_map(params![id], |row| {
            Ok(TestEntry {
                slot: row.get(0)?,
                index: row.get(1)?,
                test_value: row.get(2)?,
                triggers: Vec::new(),
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT entry_ordinal, appear_value, disappear_value FROM test_triggers \
         WHERE profile_id = ?1 ORDER BY entry_ordinal, ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok((
            row.get::<_, usize>(0)?,
            EventTrigger {
                appear_value: row.get(1)?,
                disappear_value: row.get(2)?,
            },
        ))
    })?;
    for row in rows {
        let (entry_ordinal, trigger) = row?;
        let entry = profile.test.entries.get_mut(entry_ordinal).ok_or_else(|| {
            StoreError::InvalidData(format!("test_triggers: no test entry at ordinal {}", entry_ordinal))
        })?;
        entry.triggers.push(trigger);
    }
    Ok(())
}
