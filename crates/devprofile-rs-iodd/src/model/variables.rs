// crates/devprofile-rs-iodd/src/model/variables.rs

//! Contains model structs related to `<VariableCollection>`.

use super::common::{DatatypeRefElem, TextIdRef};
use super::datatypes::Datatype;
use serde::{Deserialize, Serialize};

/// Represents `<VariableCollection>`, which interleaves standard variable
/// references and device-specific variables.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct VariableCollection {
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<VariableEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum VariableEntry {
    StdVariableRef(StdVariableRef),
    Variable(Variable),
}

/// Represents `<StdVariableRef id="V_VendorName" defaultValue="..."/>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StdVariableRef {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(
        rename = "@fixedLengthRestriction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_length_restriction: Option<String>,

    #[serde(
        rename = "@excludedFromDataStorage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_from_data_storage: Option<String>,
}

/// Represents a device-specific `<Variable>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Variable {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@index")]
    pub index: String,

    #[serde(rename = "@subindex", default, skip_serializing_if = "Option::is_none")]
    pub subindex: Option<String>,

    #[serde(rename = "@accessRights")]
    pub access_rights: String,

    #[serde(rename = "@defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(rename = "@dynamic", default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<String>,

    #[serde(
        rename = "@excludedFromDataStorage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_from_data_storage: Option<String>,

    #[serde(
        rename = "@modifiesOtherVariables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub modifies_other_variables: Option<String>,

    #[serde(rename = "Datatype", default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,

    #[serde(rename = "DatatypeRef", default, skip_serializing_if = "Option::is_none")]
    pub datatype_ref: Option<DatatypeRefElem>,

    #[serde(rename = "RecordItemInfo", default, skip_serializing_if = "Vec::is_empty")]
    pub record_item_info: Vec<RecordItemInfo>,

    #[serde(rename = "Name")]
    pub name: TextIdRef,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}

/// Represents `<RecordItemInfo subindex="..." defaultValue="..."/>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RecordItemInfo {
    #[serde(rename = "@subindex")]
    pub subindex: String,

    #[serde(rename = "@defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(
        rename = "@modifiesOtherVariables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub modifies_other_variables: Option<String>,

    #[serde(
        rename = "@excludedFromDataStorage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_from_data_storage: Option<String>,
}
