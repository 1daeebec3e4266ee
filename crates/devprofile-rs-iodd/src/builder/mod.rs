// crates/devprofile-rs-iodd/src/builder/mod.rs

//! Serializes a `DeviceProfile` back into an IODD XML string.
//!
//! The canonical model is converted back to the internal `model` structs,
//! which `quick-xml` then serializes. Profiles parsed from the section-text
//! grammar are exported best-effort: attributes the markup grammar cannot
//! carry are dropped with a warning.

mod comm;
mod datatypes;
mod diagnostics;
mod texts;
mod ui;
mod variables;

use crate::error::from_se_error;
use crate::model::common::TextIdRef;
use crate::model::identity::{DeviceIdentity, DeviceVariant, DeviceVariantCollection};
use crate::model::{
    DeviceFunction, DocumentInfo, Features, IoDevice, ProfileBody, ProfileHeader,
    SupportedAccessLocks, IODD_NAMESPACE,
};
use devprofile_rs::config::Config;
use devprofile_rs::error::ReconstructError;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::{DeviceFeatures, DeviceProfile, TextRef};
use log::{debug, warn};
use serde::Serialize;

/// Schema version written for profiles that did not come from this grammar.
const DEFAULT_SCHEMA_VERSION: &str = "1.1";

/// Serializes a `DeviceProfile` into an IODD XML document.
///
/// The output is deterministic: the same profile always yields the same
/// string.
///
/// # Errors
/// `ReconstructError::Unsupported` if a mandatory identity field does not
/// fit the markup grammar or a datatype cannot be written,
/// `ReconstructError::Serialize` if serialization fails.
pub fn save_iodd_to_string(
    profile: &DeviceProfile,
    config: &Config,
) -> Result<String, ReconstructError> {
    let cross_format = profile.grammar != Grammar::Markup;
    if cross_format {
        check_identity_ranges(profile)?;
        if !profile.opaque_sections.is_empty() || !profile.extensions.is_empty() {
            warn!(
                "{} opaque sections and {} extensions have no markup equivalent, skipping",
                profile.opaque_sections.len(),
                profile.extensions.len()
            );
        }
    }

    let schema_version = if cross_format || profile.document.schema_version.is_empty() {
        DEFAULT_SCHEMA_VERSION
    } else {
        profile.document.schema_version.as_str()
    };

    let device = IoDevice {
        xsi_schema_location: format!("{} IODD{}.xsd", IODD_NAMESPACE, schema_version),
        document_info: DocumentInfo {
            version: profile.document.version.clone(),
            release_date: profile.document.release_date.clone(),
            copyright: profile.document.copyright.clone(),
        },
        profile_header: Some(ProfileHeader::default()),
        profile_body: ProfileBody {
            device_identity: build_identity(profile),
            device_function: DeviceFunction {
                features: profile.features.as_ref().map(build_features),
                datatype_collection: datatypes::build_datatype_collection(
                    &profile.custom_types,
                )?,
                variable_collection: variables::build_variable_collection(
                    &profile.parameters,
                    &profile.standard_variables,
                )?,
                process_data_collection: variables::build_process_data_collection(
                    &profile.process_data,
                )?,
                error_type_collection: diagnostics::build_error_types(&profile.error_types),
                event_collection: diagnostics::build_events(&profile.events),
                user_interface: ui::build_user_interface(&profile.user_interface),
            },
        },
        comm_network_profile: comm::build_comm_network_profile(
            profile.communication.as_ref(),
            profile.wiring.as_ref(),
            &profile.test,
        ),
        external_text_collection: texts::build_texts(&profile.texts, config.primary_language()),
        ..Default::default()
    };

    let mut buffer = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    device.serialize(serializer).map_err(from_se_error)?;

    debug!(
        "Wrote IODD for vendor {} device {} ({} bytes)",
        profile.vendor.id,
        profile.identity.device_id,
        buffer.len()
    );
    Ok(buffer)
}

/// IODD vendor ids are 16 bit and device ids 24 bit wide.
fn check_identity_ranges(profile: &DeviceProfile) -> Result<(), ReconstructError> {
    if profile.identity.vendor_id > u32::from(u16::MAX) {
        return Err(ReconstructError::Unsupported {
            field: "DeviceIdentity/@vendorId".into(),
            reason: format!("{} does not fit 16 bits", profile.identity.vendor_id),
        });
    }
    if profile.identity.device_id > 0x00FF_FFFF {
        return Err(ReconstructError::Unsupported {
            field: "DeviceIdentity/@deviceId".into(),
            reason: format!("{} does not fit 24 bits", profile.identity.device_id),
        });
    }
    Ok(())
}

fn text(t: &TextRef) -> TextIdRef {
    TextIdRef::new(t.id())
}

fn build_identity(profile: &DeviceProfile) -> DeviceIdentity {
    let identity = &profile.identity;
    let device_variant_collection = (!profile.variants.is_empty()).then(|| {
        DeviceVariantCollection {
            device_variant: profile
                .variants
                .iter()
                .map(|v| DeviceVariant {
                    product_id: v.product_id.clone(),
                    device_symbol: v.symbol.clone(),
                    device_icon: v.icon.clone(),
                    name: text(&v.name),
                    description: v.description.as_ref().map(text),
                })
                .collect(),
        }
    });

    DeviceIdentity {
        vendor_id: identity.vendor_id.to_string(),
        vendor_name: profile.vendor.name.clone(),
        device_id: identity.device_id.to_string(),
        revision: identity.revision.clone(),
        vendor_text: identity.vendor_text.as_ref().map(text),
        vendor_url: identity.vendor_url.as_ref().map(text),
        device_name: Some(text(&identity.product_name)),
        device_family: identity.device_family.as_ref().map(text),
        device_variant_collection,
    }
}

fn build_features(features: &DeviceFeatures) -> Features {
    Features {
        block_parameter: features.block_parameter.to_string(),
        data_storage: features.data_storage.to_string(),
        profile_characteristic: features.profile_characteristic.clone(),
        supported_access_locks: features.access_locks.as_ref().map(|l| SupportedAccessLocks {
            parameter: l.parameter.to_string(),
            data_storage: l.data_storage.to_string(),
            local_parameterization: l.local_parameterization.to_string(),
            local_user_interface: l.local_user_interface.to_string(),
        }),
    }
}
