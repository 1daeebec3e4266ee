// crates/devprofile-rs-iodd/src/resolver/texts.rs

use crate::model::texts::{ExternalTextCollection, Language};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::TextTable;

/// Builds the text table. The primary language comes first so that it
/// becomes the table's primary language.
pub(super) fn resolve_texts(collection: &ExternalTextCollection) -> Result<TextTable, ParseError> {
    let mut table = TextTable::default();
    let languages =
        std::iter::once(&collection.primary_language).chain(collection.language.iter());
    for language in languages {
        add_language(&mut table, language)?;
    }
    Ok(table)
}

fn add_language(table: &mut TextTable, language: &Language) -> Result<(), ParseError> {
    if language.lang.trim().is_empty() {
        return Err(ParseError::structure(
            "ExternalTextCollection/Language/@xml:lang",
            "language code is empty",
        ));
    }
    if table.languages.iter().any(|l| l == &language.lang) {
        return Err(ParseError::structure(
            format!("ExternalTextCollection/Language[{}]", language.lang),
            "language is declared twice",
        ));
    }
    table.languages.push(language.lang.clone());
    for text in &language.text {
        if !table.insert(&text.id, &language.lang, &text.value) {
            return Err(ParseError::structure(
                format!(
                    "ExternalTextCollection/Language[{}]/Text[{}]",
                    language.lang, text.id
                ),
                "duplicate text id",
            ));
        }
    }
    Ok(())
}
