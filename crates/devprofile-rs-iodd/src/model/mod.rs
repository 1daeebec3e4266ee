// crates/devprofile-rs-iodd/src/model/mod.rs

//! Internal `serde` data structures that map directly to the IODD XML schema.
//!
//! These structs are annotated with `serde` attributes to facilitate parsing
//! via `quick-xml` and are not intended for direct public use. All numeric
//! attributes are kept as strings here; the resolver parses them with field
//! paths attached.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use serde::{Deserialize, Serialize};

pub mod comm;
pub mod common;
pub mod datatypes;
pub mod diagnostics;
pub mod identity;
pub mod process_data;
pub mod texts;
pub mod ui;
pub mod variables;

pub use comm::CommNetworkProfile;
pub use datatypes::DatatypeCollection;
pub use diagnostics::{ErrorTypeCollection, EventCollection};
pub use identity::DeviceIdentity;
pub use process_data::ProcessDataCollection;
pub use texts::ExternalTextCollection;
pub use ui::UserInterface;
pub use variables::VariableCollection;

pub(crate) const IODD_NAMESPACE: &str = "http://www.io-link.com/IODD/2010/10";
pub(crate) const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The root element of an IODD file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "IODevice")]
pub struct IoDevice {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,

    #[serde(rename = "@xmlns:xsi", default)]
    pub xmlns_xsi: String,

    #[serde(rename = "@xsi:schemaLocation", alias = "@schemaLocation", default)]
    pub xsi_schema_location: String,

    #[serde(rename = "DocumentInfo")]
    pub document_info: DocumentInfo,

    #[serde(rename = "ProfileHeader", default, skip_serializing_if = "Option::is_none")]
    pub profile_header: Option<ProfileHeader>,

    #[serde(rename = "ProfileBody")]
    pub profile_body: ProfileBody,

    #[serde(
        rename = "CommNetworkProfile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub comm_network_profile: Option<CommNetworkProfile>,

    #[serde(rename = "ExternalTextCollection")]
    pub external_text_collection: ExternalTextCollection,
}

impl Default for IoDevice {
    fn default() -> Self {
        Self {
            xmlns: IODD_NAMESPACE.into(),
            xmlns_xsi: XSI_NAMESPACE.into(),
            xsi_schema_location: format!("{} IODD1.1.xsd", IODD_NAMESPACE),
            document_info: DocumentInfo::default(),
            profile_header: None,
            profile_body: ProfileBody::default(),
            comm_network_profile: None,
            external_text_collection: ExternalTextCollection::default(),
        }
    }
}

/// Represents `<DocumentInfo version="..." releaseDate="..." copyright="..."/>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DocumentInfo {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "@releaseDate", default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(rename = "@copyright", default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// Represents the ISO 15745 `<ProfileHeader>`. Its content is fixed for
/// IO device descriptions; it is read for completeness and always written
/// with the standard values.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileHeader {
    #[serde(rename = "ProfileIdentification")]
    pub profile_identification: String,
    #[serde(rename = "ProfileRevision")]
    pub profile_revision: String,
    #[serde(rename = "ProfileName")]
    pub profile_name: String,
    #[serde(rename = "ProfileSource")]
    pub profile_source: String,
    #[serde(rename = "ProfileClassID")]
    pub profile_class_id: String,
    #[serde(rename = "ISO15745Reference")]
    pub iso15745_reference: Iso15745Reference,
}

impl Default for ProfileHeader {
    fn default() -> Self {
        Self {
            profile_identification: "IO Device Profile".into(),
            profile_revision: "1.1".into(),
            profile_name: "Device Profile for IO Devices".into(),
            profile_source: "IO-Link Consortium".into(),
            profile_class_id: "Device".into(),
            iso15745_reference: Iso15745Reference::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Iso15745Reference {
    #[serde(rename = "ISO15745Part")]
    pub part: String,
    #[serde(rename = "ISO15745Edition")]
    pub edition: String,
    #[serde(rename = "ProfileTechnology")]
    pub technology: String,
}

impl Default for Iso15745Reference {
    fn default() -> Self {
        Self {
            part: "1".into(),
            edition: "1".into(),
            technology: "IODD".into(),
        }
    }
}

/// Represents `<ProfileBody>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileBody {
    #[serde(rename = "DeviceIdentity")]
    pub device_identity: DeviceIdentity,

    #[serde(rename = "DeviceFunction", default)]
    pub device_function: DeviceFunction,
}

/// Represents `<DeviceFunction>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceFunction {
    #[serde(rename = "Features", default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,

    #[serde(
        rename = "DatatypeCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub datatype_collection: Option<DatatypeCollection>,

    #[serde(
        rename = "VariableCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub variable_collection: Option<VariableCollection>,

    #[serde(
        rename = "ProcessDataCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub process_data_collection: Option<ProcessDataCollection>,

    #[serde(
        rename = "ErrorTypeCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_type_collection: Option<ErrorTypeCollection>,

    #[serde(
        rename = "EventCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_collection: Option<EventCollection>,

    #[serde(rename = "UserInterface", default, skip_serializing_if = "Option::is_none")]
    pub user_interface: Option<UserInterface>,
}

/// Represents `<Features blockParameter="..." dataStorage="...">`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Features {
    #[serde(rename = "@blockParameter")]
    pub block_parameter: String,

    #[serde(rename = "@dataStorage")]
    pub data_storage: String,

    #[serde(
        rename = "@profileCharacteristic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_characteristic: Option<String>,

    #[serde(
        rename = "SupportedAccessLocks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_access_locks: Option<SupportedAccessLocks>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SupportedAccessLocks {
    #[serde(rename = "@parameter")]
    pub parameter: String,
    #[serde(rename = "@dataStorage")]
    pub data_storage: String,
    #[serde(rename = "@localParameterization")]
    pub local_parameterization: String,
    #[serde(rename = "@localUserInterface")]
    pub local_user_interface: String,
}
