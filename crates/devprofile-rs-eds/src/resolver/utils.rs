// crates/devprofile-rs-eds/src/resolver/utils.rs

use crate::lexer::{Entry, Field, Section};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{Direction, Extension, TextRef, TextTable};
use std::collections::HashSet;

/// Collects the synthesized, single-language text table.
#[derive(Debug)]
pub(crate) struct TextSink {
    language: String,
    table: TextTable,
}

impl TextSink {
    pub(crate) fn new(language: &str) -> Self {
        let mut table = TextTable::default();
        table.languages.push(language.to_string());
        Self {
            language: language.to_string(),
            table,
        }
    }

    /// Records `value` under the synthesized `id` and returns a reference to it.
    pub(crate) fn add(&mut self, id: String, value: &str) -> TextRef {
        self.table.insert(&id, &self.language, value);
        TextRef(id)
    }

    /// The finished table, ordered by id so that section order does not
    /// leak into it.
    pub(crate) fn finish(mut self) -> TextTable {
        self.table.sort_by_id();
        self.table
    }
}

/// Returns the digits of a numbered key (`Param12` -> `"12"`).
/// The prefix is matched case-insensitively.
pub(crate) fn key_number<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    let digits = &key[prefix.len()..];
    if head.eq_ignore_ascii_case(prefix)
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
    {
        Some(digits)
    } else {
        None
    }
}

/// Direction of an assembly, taken from its name.
pub(crate) fn direction_of(name: &str) -> Option<Direction> {
    let lower = name.to_ascii_lowercase();
    match (lower.contains("input"), lower.contains("output")) {
        (true, false) => Some(Direction::Input),
        (false, true) => Some(Direction::Output),
        _ => None,
    }
}

/// The text of a single-valued entry.
pub(crate) fn single<'a>(entry: &'a Entry, path: &str) -> Result<&'a str, ParseError> {
    match entry.fields.as_slice() {
        [field] => Ok(field.text()),
        fields => Err(ParseError::structure(
            path,
            format!("expected a single value, found {} fields", fields.len()),
        )),
    }
}

/// The text of a field that must not be empty.
pub(crate) fn required<'a>(field: &'a Field, path: &str) -> Result<&'a str, ParseError> {
    if field.text().is_empty() {
        return Err(ParseError::structure(path, "mandatory field is empty"));
    }
    Ok(field.text())
}

pub(crate) fn optional(field: &Field) -> Option<String> {
    let text = field.text();
    (!text.is_empty()).then(|| text.to_string())
}

pub(crate) fn extension(scope: &str, entry: &Entry) -> Extension {
    Extension {
        scope: scope.to_string(),
        key: entry.key.clone(),
        value: entry.raw.clone(),
    }
}

/// Keys of a modeled section are unique (case-insensitively).
pub(crate) fn check_unique_keys(section: &Section) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for entry in &section.entries {
        if !seen.insert(entry.key.to_ascii_lowercase()) {
            return Err(ParseError::structure(
                format!("{}/{}", section.name, entry.key),
                format!("duplicate key at line {}", entry.line),
            ));
        }
    }
    Ok(())
}
