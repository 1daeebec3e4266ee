// crates/devprofile-rs-iodd/src/model/common.rs

//! Small shared elements.

use serde::{Deserialize, Serialize};

/// Any element whose only content is a `textId` attribute
/// (`<Name textId="..."/>`, `<Description textId="..."/>`, ...).
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct TextIdRef {
    #[serde(rename = "@textId")]
    pub text_id: String,
}

impl TextIdRef {
    pub fn new(text_id: impl Into<String>) -> Self {
        Self {
            text_id: text_id.into(),
        }
    }
}

/// `<DatatypeRef datatypeId="..."/>`
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct DatatypeRefElem {
    #[serde(rename = "@datatypeId")]
    pub datatype_id: String,
}
