// crates/devprofile-rs-iodd/src/resolver/mod.rs

//! Maps the deserialized, schema-shaped `model` onto the canonical
//! `DeviceProfile`.
//!
//! Each sub-module handles one part of `<DeviceFunction>` (or of the
//! surrounding document). Values are parsed and range-checked here; cross
//! references are left to `devprofile_rs::validate_profile`.

use crate::model::IoDevice;
use devprofile_rs::error::ParseError;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::DeviceProfile;

// --- Sub-modules ---

mod comm;
mod datatypes;
mod diagnostics;
mod identity;
mod process_data;
mod texts;
mod ui;
mod utils;
mod variables;

/// Resolves the canonical profile from the deserialized document.
pub(crate) fn resolve_profile(
    device: IoDevice,
    schema_version: String,
) -> Result<DeviceProfile, ParseError> {
    let mut profile = DeviceProfile::new(Grammar::Markup);
    profile.document = identity::resolve_document_info(&device.document_info, schema_version);

    let body = &device.profile_body;
    let (vendor, device_identity) = identity::resolve_identity(&body.device_identity)?;
    profile.vendor = vendor;
    profile.identity = device_identity;
    profile.variants = identity::resolve_variants(&body.device_identity);

    // --- Device function ---
    let function = &body.device_function;
    if let Some(features) = &function.features {
        profile.features = Some(identity::resolve_features(features)?);
    }
    if let Some(collection) = &function.datatype_collection {
        profile.custom_types = datatypes::resolve_custom_types(collection)?;
    }
    if let Some(collection) = &function.variable_collection {
        let (parameters, standard) = variables::resolve_variables(collection)?;
        profile.parameters = parameters;
        profile.standard_variables = standard;
    }
    if let Some(collection) = &function.process_data_collection {
        profile.process_data = process_data::resolve_process_data(collection)?;
    }
    if let Some(collection) = &function.error_type_collection {
        profile.error_types = diagnostics::resolve_error_types(collection)?;
    }
    if let Some(collection) = &function.event_collection {
        profile.events = diagnostics::resolve_events(collection)?;
    }
    if let Some(ui) = &function.user_interface {
        profile.user_interface = ui::resolve_user_interface(ui)?;
    }

    // --- Communication ---
    if let Some(comm) = &device.comm_network_profile {
        profile.communication = Some(comm::resolve_communication(comm)?);
        profile.wiring = comm::resolve_wiring(comm);
        if let Some(test) = &comm.test {
            profile.test = comm::resolve_test(test)?;
        }
    }

    profile.texts = texts::resolve_texts(&device.external_text_collection)?;

    fill_custom_lengths(&mut profile);
    Ok(profile)
}

/// Record members that point at a `<DatatypeRef>` only learn their bit
/// length once the whole `<DatatypeCollection>` is known.
fn fill_custom_lengths(profile: &mut DeviceProfile) {
    let types = profile.custom_types.clone();
    for parameter in &mut profile.parameters {
        datatypes::fill_custom_lengths(&mut parameter.record_items, &types);
    }
    for item in profile.process_data.all_items_mut() {
        datatypes::fill_custom_lengths(&mut item.items, &types);
    }
    for custom in profile.custom_types.values_mut() {
        datatypes::fill_custom_lengths(&mut custom.items, &types);
    }
}
