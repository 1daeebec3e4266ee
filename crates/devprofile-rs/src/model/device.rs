// crates/devprofile-rs/src/model/device.rs

//! Identity, document metadata and the smaller device-level blocks.

use super::datatype::DataTypeRef;
use super::parameter::{Constraint, EnumerationValue};
use super::record::RecordLayout;
use super::text::TextRef;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VendorInfo {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    pub vendor_id: u32,
    pub device_id: u32,
    pub product_name: TextRef,
    pub revision: Option<String>,
    pub vendor_text: Option<TextRef>,
    pub vendor_url: Option<TextRef>,
    pub device_family: Option<TextRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    /// Schema (markup) or file format (section text) revision.
    pub schema_version: String,
    pub release_date: Option<String>,
    pub version: Option<String>,
    pub copyright: Option<String>,
}

/// Physical/transport layer description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommunicationProfile {
    pub protocol_revision: Option<String>,
    pub bitrate: Option<String>,
    /// Minimum cycle time in microseconds.
    pub min_cycle_time: Option<u32>,
    pub sio_supported: Option<bool>,
    pub m_sequence_capability: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessLocks {
    pub parameter: bool,
    pub data_storage: bool,
    pub local_parameterization: bool,
    pub local_user_interface: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceFeatures {
    pub block_parameter: bool,
    pub data_storage: bool,
    pub profile_characteristic: Option<String>,
    pub access_locks: Option<AccessLocks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variant {
    pub product_id: String,
    pub name: TextRef,
    pub description: Option<TextRef>,
    pub symbol: Option<String>,
    pub icon: Option<String>,
}

/// A datatype declared once on the profile and referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomDataType {
    pub id: String,
    pub data_type: DataTypeRef,
    pub enumeration: Vec<EnumerationValue>,
    pub constraints: Vec<Constraint>,
    pub items: RecordLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wire {
    pub number: u8,
    pub color: Option<String>,
    pub function: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WiringConfig {
    pub connection_type: String,
    pub wires: Vec<Wire>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventTrigger {
    pub appear_value: u16,
    pub disappear_value: u16,
}

/// One `ConfigN` entry of the device test configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestEntry {
    pub slot: u8,
    pub index: u16,
    pub test_value: String,
    pub triggers: Vec<EventTrigger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestConfig {
    pub entries: Vec<TestEntry>,
}

/// A section the section-text parser does not model, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpaqueSection {
    pub name: String,
    pub body: String,
}

/// An unmodeled key inside a modeled section, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extension {
    /// Name of the enclosing section.
    pub scope: String,
    pub key: String,
    pub value: String,
}
