// crates/devprofile-rs-iodd/src/model/process_data.rs

use super::common::{DatatypeRefElem, TextIdRef};
use super::datatypes::Datatype;
use serde::{Deserialize, Serialize};

/// Represents `<ProcessDataCollection>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProcessDataCollection {
    #[serde(rename = "ProcessData", default, skip_serializing_if = "Vec::is_empty")]
    pub process_data: Vec<ProcessData>,
}

/// Represents `<ProcessData id="...">`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProcessData {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    #[serde(rename = "ProcessDataIn", default, skip_serializing_if = "Option::is_none")]
    pub process_data_in: Option<ProcessDataItem>,

    #[serde(rename = "ProcessDataOut", default, skip_serializing_if = "Option::is_none")]
    pub process_data_out: Option<ProcessDataItem>,
}

/// Represents `<Condition variableId="..." subindex="..." value="..."/>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Condition {
    #[serde(rename = "@variableId")]
    pub variable_id: String,

    #[serde(rename = "@subindex", default, skip_serializing_if = "Option::is_none")]
    pub subindex: Option<String>,

    #[serde(rename = "@value")]
    pub value: String,
}

/// Represents `<ProcessDataIn>` and `<ProcessDataOut>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProcessDataItem {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@bitLength")]
    pub bit_length: String,

    #[serde(rename = "Datatype", default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,

    #[serde(rename = "DatatypeRef", default, skip_serializing_if = "Option::is_none")]
    pub datatype_ref: Option<DatatypeRefElem>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextIdRef>,
}
