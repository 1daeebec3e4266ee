// crates/devprofile-rs-iodd/src/model/datatypes.rs

//! Contains model structs for `<Datatype>`, `<SimpleDatatype>` and their contents.
//!
//! A single struct covers every `xsi:type` (simple types, `RecordT`,
//! `ArrayT`); the attributes that do not apply to a given type stay `None`.

use super::common::{DatatypeRefElem, TextIdRef};
use serde::{Deserialize, Serialize};

/// Represents `<DatatypeCollection>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DatatypeCollection {
    #[serde(rename = "Datatype", default, skip_serializing_if = "Vec::is_empty")]
    pub datatype: Vec<Datatype>,
}

/// Represents `<Datatype>` and `<SimpleDatatype>`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Datatype {
    /// Only present on entries of the `<DatatypeCollection>`.
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@xsi:type", alias = "@type")]
    pub xsi_type: String,

    #[serde(rename = "@bitLength", default, skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<String>,

    #[serde(rename = "@fixedLength", default, skip_serializing_if = "Option::is_none")]
    pub fixed_length: Option<String>,

    #[serde(rename = "@encoding", default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    #[serde(rename = "@count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,

    #[serde(
        rename = "@subindexAccessSupported",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subindex_access_supported: Option<String>,

    // Captures the ordered children of every datatype flavor.
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DatatypeChild>,
}

/// The children a `<Datatype>` may contain.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum DatatypeChild {
    SingleValue(SingleValue),
    ValueRange(ValueRange),
    RecordItem(RecordItem),
    /// Element type of an `ArrayT`.
    SimpleDatatype(Datatype),
    /// Element type of an `ArrayT`, by reference.
    DatatypeRef(DatatypeRefElem),
}

/// Represents `<SingleValue value="..."><Name textId="..."/></SingleValue>`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct SingleValue {
    #[serde(rename = "@value")]
    pub value: String,

    #[serde(rename = "Name")]
    pub name: TextIdRef,
}

/// Represents `<ValueRange lowerValue="..." upperValue="...">`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct ValueRange {
    #[serde(rename = "@lowerValue")]
    pub lower_value: String,

    #[serde(rename = "@upperValue")]
    pub upper_value: String,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextIdRef>,
}

/// Represents a `<RecordItem>` of a `RecordT`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RecordItem {
    #[serde(rename = "@subindex")]
    pub subindex: String,

    #[serde(rename = "@bitOffset")]
    pub bit_offset: String,

    #[serde(
        rename = "@accessRightRestriction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_right_restriction: Option<String>,

    #[serde(rename = "SimpleDatatype", default, skip_serializing_if = "Option::is_none")]
    pub simple_datatype: Option<Datatype>,

    #[serde(rename = "DatatypeRef", default, skip_serializing_if = "Option::is_none")]
    pub datatype_ref: Option<DatatypeRefElem>,

    #[serde(rename = "Name")]
    pub name: TextIdRef,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}
