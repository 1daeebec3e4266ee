// crates/devprofile-rs-iodd/src/resolver/identity.rs

use super::utils::{opt_text_ref, req_bool, text_ref};
use crate::model;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    AccessLocks, DeviceFeatures, DeviceIdentity, DocumentInfo, Variant, VendorInfo,
};
use devprofile_rs::numeric::parse_u32;

pub(super) fn resolve_document_info(
    model: &model::DocumentInfo,
    schema_version: String,
) -> DocumentInfo {
    DocumentInfo {
        schema_version,
        release_date: model.release_date.clone(),
        version: model.version.clone(),
        copyright: model.copyright.clone(),
    }
}

/// Parses a `model::DeviceIdentity` into the vendor record and the canonical identity.
pub(super) fn resolve_identity(
    model: &model::DeviceIdentity,
) -> Result<(VendorInfo, DeviceIdentity), ParseError> {
    let vendor_id = parse_u32(&model.vendor_id, "DeviceIdentity/@vendorId")?;
    let device_id = parse_u32(&model.device_id, "DeviceIdentity/@deviceId")?;
    let product_name = model
        .device_name
        .as_ref()
        .map(text_ref)
        .ok_or_else(|| ParseError::structure("DeviceIdentity/DeviceName", "element is missing"))?;

    let vendor = VendorInfo {
        id: vendor_id,
        name: model.vendor_name.clone(),
    };
    let identity = DeviceIdentity {
        vendor_id,
        device_id,
        product_name,
        revision: model.revision.clone(),
        vendor_text: opt_text_ref(model.vendor_text.as_ref()),
        vendor_url: opt_text_ref(model.vendor_url.as_ref()),
        device_family: opt_text_ref(model.device_family.as_ref()),
    };
    Ok((vendor, identity))
}

pub(super) fn resolve_variants(model: &model::DeviceIdentity) -> Vec<Variant> {
    model
        .device_variant_collection
        .iter()
        .flat_map(|c| c.device_variant.iter())
        .map(|v| Variant {
            product_id: v.product_id.clone(),
            name: text_ref(&v.name),
            description: opt_text_ref(v.description.as_ref()),
            symbol: v.device_symbol.clone(),
            icon: v.device_icon.clone(),
        })
        .collect()
}

pub(super) fn resolve_features(model: &model::Features) -> Result<DeviceFeatures, ParseError> {
    let access_locks = model
        .supported_access_locks
        .as_ref()
        .map(|l| -> Result<AccessLocks, ParseError> {
            let path = "Features/SupportedAccessLocks";
            Ok(AccessLocks {
                parameter: req_bool(&l.parameter, &format!("{}/@parameter", path))?,
                data_storage: req_bool(&l.data_storage, &format!("{}/@dataStorage", path))?,
                local_parameterization: req_bool(
                    &l.local_parameterization,
                    &format!("{}/@localParameterization", path),
                )?,
                local_user_interface: req_bool(
                    &l.local_user_interface,
                    &format!("{}/@localUserInterface", path),
                )?,
            })
        })
        .transpose()?;

    Ok(DeviceFeatures {
        block_parameter: req_bool(&model.block_parameter, "Features/@blockParameter")?,
        data_storage: req_bool(&model.data_storage, "Features/@dataStorage")?,
        profile_characteristic: model.profile_characteristic.clone(),
        access_locks,
    })
}
