// crates/devprofile-rs-iodd/src/builder/texts.rs

use crate::model::texts::{ExternalTextCollection, Language, Text};
use devprofile_rs::model::TextTable;

/// Builds `<ExternalTextCollection>`. The first table language becomes
/// `<PrimaryLanguage>`; `default_language` is used when the table is empty.
pub(super) fn build_texts(table: &TextTable, default_language: &str) -> ExternalTextCollection {
    let language = |lang: &str| Language {
        lang: lang.to_string(),
        text: table
            .entries()
            .iter()
            .filter_map(|e| {
                e.translations.get(lang).map(|value| Text {
                    id: e.id.clone(),
                    value: value.clone(),
                })
            })
            .collect(),
    };

    let primary = table.primary_language().unwrap_or(default_language);
    ExternalTextCollection {
        primary_language: language(primary),
        language: table
            .languages
            .iter()
            .skip(1)
            .map(|l| language(l))
            .collect(),
    }
}
