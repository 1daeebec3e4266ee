// crates/devprofile-rs-iodd/src/model/diagnostics.rs

//! Contains model structs for `<ErrorTypeCollection>` and `<EventCollection>`.

use super::common::TextIdRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ErrorTypeCollection {
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ErrorTypeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ErrorTypeEntry {
    StdErrorTypeRef(ErrorTypeElem),
    ErrorType(ErrorTypeElem),
}

/// Represents `<StdErrorTypeRef>` and `<ErrorType>`; only the latter has texts.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ErrorTypeElem {
    #[serde(rename = "@code")]
    pub code: String,

    #[serde(rename = "@additionalCode")]
    pub additional_code: String,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextIdRef>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct EventCollection {
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<EventEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum EventEntry {
    StdEventRef(EventElem),
    Event(EventElem),
}

/// Represents `<StdEventRef>` and `<Event>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct EventElem {
    #[serde(rename = "@code")]
    pub code: String,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextIdRef>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}
