// crates/devprofile-rs-catalog/src/store/mapper/opaque.rs

//! Content kept verbatim: opaque sections and extension keys.

use crate::error::StoreError;
use devprofile_rs::model::{DeviceProfile, Extension, OpaqueSection};
use rusqlite::{Connection, params};

pub(super) fn insert(conn: &Connection, id: &str, profile: &DeviceProfile) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO opaque_sections (profile_id, ordinal, name, body) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (ordinal, section) in profile.opaque_sections.iter().enumerate() {
        stmt.execute(params![id, ordinal, section.name, section.body])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO extensions (profile_id, ordinal, scope, key, value) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (ordinal, ext) in profile.extensions.iter().enumerate() {
        stmt.execute(params![id, ordinal, ext.scope, ext.key, ext.value])?;
    }
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str, profile: &mut DeviceProfile) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT name, body FROM opaque_sections WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.opaque_sections = stmt
        .query_map(params![id], |row| {
            Ok(OpaqueSection {
                name: row.get(0)?,
                body: row.get(1)?,
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT scope, key, value FROM extensions WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.extensions = stmt
        .query_map(params![id], |row| {
            Ok(Extension {
                scope: row.get(0)?,
                key: row.get(1)?,
                value: row.get(2)?,
            })
        })?
        .collect::<Result<_, _>>()?;
    Ok(())
}
