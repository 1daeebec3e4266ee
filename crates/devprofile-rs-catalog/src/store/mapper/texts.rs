// crates/devprofile-rs-catalog/src/store/mapper/texts.rs

use crate::error::StoreError;
use devprofile_rs::model::{TextEntry, TextTable};
use rusqlite::{Connection, params};
use std::collections::BTreeMap;

pub(super) fn insert(conn: &Connection, id: &str, texts: &TextTable) -> rusqlite::Result<()> {
    let mut language = conn.prepare_cached(
        "INSERT INTO text_languages (profile_id, ordinal, language) VALUES (?1, ?2, ?3)",
    )?;
    for (ordinal, lang) in texts.languages.iter().enumerate() {
        language.execute(params![id, ordinal, lang])?;
    }

    let mut entry = conn.prepare_cached(
        "INSERT INTO text_entries (profile_id, ordinal, text_id) VALUES (?1, ?2, ?3)",
    )?;
    let mut translation = conn.prepare_cached(
        "INSERT INTO text_translations (profile_id, text_id, language, value) \
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (ordinal, text) in texts.entries().iter().enumerate() {
        entry.execute(params![id, ordinal, text.id])?;
        for (lang, value) in &text.translations {
            translation.execute(params![id, text.id, lang, value])?;
        }
    }
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str) -> Result<TextTable, StoreError> {
    let mut table = TextTable::default();

    let mut stmt = conn.prepare_cached(
        "SELECT language FROM text_languages WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    table.languages = stmt
        .query_map(params![id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut translations: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut stmt = conn.prepare_cached(
        "SELECT text_id, language, value FROM text_translations WHERE profile_id = ?1",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;
    for row in rows {
        let (text_id, lang, value) = row?;
        translations.entry(text_id).or_default().insert(lang, value);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT text_id FROM text_entries WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let ids = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
    for text_id in ids {
        let text_id = text_id?;
        let translations = translations.remove(&text_id).unwrap_or_default();
        if !table.push_entry(TextEntry {
            id: text_id.clone(),
            translations,
        }) {
            return Err(StoreError::InvalidData(format!(
                "text_entries: '{}' is stored twice",
                text_id
            )));
        }
    }

    if let Some(orphan) = translations.keys().next() {
        return Err(StoreError::InvalidData(format!(
            "text_translations: '{}' has no text entry",
            orphan
        )));
    }
    Ok(table)
}
