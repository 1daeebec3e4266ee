// crates/devprofile-rs-catalog/src/store/mapper/diagnostics.rs

use super::{parse_optional, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{DeviceProfile, ErrorType, Event};
use rusqlite::{Connection, params};

pub(super) fn insert(conn: &Connection, id: &str, profile: &DeviceProfile) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO error_types (profile_id, ordinal, code, additional_code, standard, name, description) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (ordinal, e) in profile.error_types.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal,
            e.code,
            e.additional_code,
            e.standard,
            text_id(&e.name),
            text_id(&e.description),
        ])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO events (profile_id, ordinal, code, standard, kind, name, description) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (ordinal, e) in profile.events.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal,
            e.code,
            e.standard,
            e.kind.map(|k| k.as_str()),
            text_id(&e.name),
            text_id(&e.description),
        ])?;
    }
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str, profile: &mut DeviceProfile) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT code, additional_code, standard, name, description FROM error_types \
         WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.error_types = stmt
        .query_map(params![id], |row| {
            Ok(ErrorType {
                code: row.get(0)?,
                additional_code: row.get(1)?,
                standard: row.get(2)?,
                name: text_ref(row.get(3)?),
                description: text_ref(row.get(4)?),
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT code, standard, kind, name, description FROM events \
         WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        let event = Event {
            code: row.get(0)?,
            standard: row.get(1)?,
            kind: None,
            name: text_ref(row.get(3)?),
            description: text_ref(row.get(4)?),
        };
        Ok((event, row.get::<_, Option<String>>(2)?))
    })?;
    for row in rows {
        let (mut event, kind) = row?;
        event.kind = parse_optional("events", "kind", kind)?;
        profile.events.push(event);
    }
    Ok(())
}
