// crates/devprofile-rs/src/model/text.rs

//! Language-keyed text table and the references into it.

use core::fmt;
use std::collections::{BTreeMap, HashMap};

/// Reference to an entry of the profile's `TextTable`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextRef(pub String);

impl TextRef {
    pub fn new(id: impl Into<String>) -> Self {
        TextRef(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TextRef {
    fn from(id: &str) -> Self {
        TextRef(id.to_string())
    }
}

impl fmt::Display for TextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One text id with its translations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEntry {
    pub id: String,
    /// language tag -> text
    pub translations: BTreeMap<String, String>,
}

/// All texts of a profile.
///
/// `languages` lists the declared languages, primary language first.
/// Entries keep the order in which ids were first declared and are indexed
/// by id.
#[derive(Clone, Default)]
pub struct TextTable {
    pub languages: Vec<String>,
    entries: Vec<TextEntry>,
    /// id -> position in `entries`
    index: HashMap<String, usize>,
}

impl TextTable {
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&TextEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Text for `id` in exactly `lang`.
    pub fn lookup(&self, id: &str, lang: &str) -> Option<&str> {
        self.entry(id)
            .and_then(|e| e.translations.get(lang))
            .map(String::as_str)
    }

    /// Adds a translation. Returns `false` (and leaves the table unchanged)
    /// if `id` already has a text in `lang`.
    pub fn insert(&mut self, id: &str, lang: &str, value: impl Into<String>) -> bool {
        if !self.languages.iter().any(|l| l == lang) {
            self.languages.push(lang.to_string());
        }
        let pos = match self.index.get(id) {
            Some(&pos) => pos,
            None => {
                self.index.insert(id.to_string(), self.entries.len());
                self.entries.push(TextEntry {
                    id: id.to_string(),
                    translations: BTreeMap::new(),
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[pos];
        if entry.translations.contains_key(lang) {
            return false;
        }
        entry.translations.insert(lang.to_string(), value.into());
        true
    }

    /// Appends a complete entry. Returns `false` (and leaves the table
    /// unchanged) if its id is already present.
    ///
    /// Languages are not registered; the caller sets `languages`.
    pub fn push_entry(&mut self, entry: TextEntry) -> bool {
        if self.index.contains_key(&entry.id) {
            return false;
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Reorders the entries by id.
    pub fn sort_by_id(&mut self) {
        self.entries.sort_by(|a, b| a.id.cmp(&b.id));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.id.clone(), pos))
            .collect();
    }

    /// Resolves a reference to display text.
    ///
    /// Tries each language of `fallback_order`, then the primary language,
    /// then any translation at all, and finally returns the raw id.
    pub fn resolve<'a>(&'a self, text: &'a TextRef, fallback_order: &[String]) -> &'a str {
        let Some(entry) = self.entry(text.id()) else {
            return text.id();
        };
        fallback_order
            .iter()
            .map(String::as_str)
            .chain(self.primary_language())
            .find_map(|lang| entry.translations.get(lang))
            .or_else(|| entry.translations.values().next())
            .map(String::as_str)
            .unwrap_or(text.id())
    }
}

// The index is derived from `entries`.
impl PartialEq for TextTable {
    fn eq(&self, other: &Self) -> bool {
        self.languages == other.languages && self.entries == other.entries
    }
}

impl Eq for TextTable {}

impl fmt::Debug for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextTable")
            .field("languages", &self.languages)
            .field("entries", &self.entries)
            .finish()
    }
}
