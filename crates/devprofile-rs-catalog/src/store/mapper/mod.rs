// crates/devprofile-rs-catalog/src/store/mapper/mod.rs

//! Decomposition of a `DeviceProfile` into rows, and recomposition back.
//!
//! One unit per entity kind. Every unit has an `insert` that writes its rows
//! on the connection it is given (the caller's transaction) and a `load`
//! that reads them back into a profile under construction. List order is
//! kept in an explicit `ordinal` column; loads always `ORDER BY` it.

mod config;
mod custom_types;
mod device;
mod diagnostics;
mod layout;
mod menus;
mod opaque;
mod parameters;
mod process_data;
mod root;
mod texts;

use crate::error::StoreError;
use core::str::FromStr;
use devprofile_rs::model::{DeviceProfile, TextRef};
use rusqlite::Connection;

pub(crate) use root::{SourceRecord, load_source};

/// Writes every row of `profile` under `id`.
pub(crate) fn decompose(
    conn: &Connection,
    id: &str,
    profile: &DeviceProfile,
    source: &SourceRecord<'_>,
) -> rusqlite::Result<()> {
    root::insert(conn, id, profile, source)?;
    texts::insert(conn, id, &profile.texts)?;
    parameters::insert(conn, id, profile)?;
    process_data::insert(conn, id, &profile.process_data)?;
    diagnostics::insert(conn, id, profile)?;
    device::insert(conn, id, profile)?;
    menus::insert(conn, id, &profile.user_interface)?;
    custom_types::insert(conn, id, &profile.custom_types)?;
    config::insert(conn, id, profile)?;
    opaque::insert(conn, id, profile)?;
    Ok(())
}

/// Rebuilds the profile stored under `id`.
pub(crate) fn recompose(conn: &Connection, id: &str) -> Result<DeviceProfile, StoreError> {
    let mut profile = root::load(conn, id)?;
    let mut dependents = layout::Dependents::load(conn, id)?;

    profile.texts = texts::load(conn, id)?;
    parameters::load(conn, id, &mut dependents, &mut profile)?;
    process_data::load(conn, id, &mut profile.process_data, &mut dependents)?;
    diagnostics::load(conn, id, &mut profile)?;
    device::load(conn, id, &mut profile)?;
    profile.user_interface = menus::load(conn, id)?;
    profile.custom_types = custom_types::load(conn, id, &mut dependents)?;
    config::load(conn, id, &mut profile)?;
    opaque::load(conn, id, &mut profile)?;
    Ok(profile)
}

// --- Column helpers ---

/// Parses a column stored in the textual encoding of `T`.
fn parse_column<T>(table: &str, column: &str, raw: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e| StoreError::InvalidData(format!("{}.{}: {}", table, column, e)))
}

fn parse_optional<T>(table: &str, column: &str, raw: Option<String>) -> Result<Option<T>, StoreError>
where
    T: FromStr<Err = String>,
{
    raw.map(|r| parse_column(table, column, &r)).transpose()
}

fn text_id(text: &Option<TextRef>) -> Option<&str> {
    text.as_ref().map(TextRef::id)
}

fn text_ref(raw: Option<String>) -> Option<TextRef> {
    raw.map(TextRef)
}
