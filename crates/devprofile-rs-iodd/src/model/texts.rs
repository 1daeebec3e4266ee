// crates/devprofile-rs-iodd/src/model/texts.rs

use serde::{Deserialize, Serialize};

/// Represents `<ExternalTextCollection>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ExternalTextCollection {
    #[serde(rename = "PrimaryLanguage")]
    pub primary_language: Language,

    #[serde(rename = "Language", default, skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<Language>,
}

/// Represents `<PrimaryLanguage xml:lang="...">` and `<Language xml:lang="...">`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Language {
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,

    #[serde(rename = "Text", default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<Text>,
}

/// Represents `<Text id="..." value="..."/>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Text {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@value")]
    pub value: String,
}
