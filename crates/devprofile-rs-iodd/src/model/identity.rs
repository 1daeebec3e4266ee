// crates/devprofile-rs-iodd/src/model/identity.rs

//! Contains model structs related to `<DeviceIdentity>`.

use super::common::TextIdRef;
use serde::{Deserialize, Serialize};

/// Represents the `<DeviceIdentity>` block of the `<ProfileBody>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceIdentity {
    #[serde(rename = "@vendorId")]
    pub vendor_id: String,

    #[serde(rename = "@vendorName")]
    pub vendor_name: String,

    #[serde(rename = "@deviceId")]
    pub device_id: String,

    #[serde(rename = "@revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(rename = "VendorText", default, skip_serializing_if = "Option::is_none")]
    pub vendor_text: Option<TextIdRef>,

    #[serde(rename = "VendorUrl", default, skip_serializing_if = "Option::is_none")]
    pub vendor_url: Option<TextIdRef>,

    #[serde(rename = "DeviceName", default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<TextIdRef>,

    #[serde(rename = "DeviceFamily", default, skip_serializing_if = "Option::is_none")]
    pub device_family: Option<TextIdRef>,

    #[serde(
        rename = "DeviceVariantCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device_variant_collection: Option<DeviceVariantCollection>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceVariantCollection {
    #[serde(rename = "DeviceVariant", default, skip_serializing_if = "Vec::is_empty")]
    pub device_variant: Vec<DeviceVariant>,
}

/// Represents `<DeviceVariant productId="..." deviceSymbol="..." deviceIcon="...">`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceVariant {
    #[serde(rename = "@productId")]
    pub product_id: String,

    #[serde(rename = "@deviceSymbol", default, skip_serializing_if = "Option::is_none")]
    pub device_symbol: Option<String>,

    #[serde(rename = "@deviceIcon", default, skip_serializing_if = "Option::is_none")]
    pub device_icon: Option<String>,

    #[serde(rename = "Name")]
    pub name: TextIdRef,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}
