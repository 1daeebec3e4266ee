// crates/devprofile-rs-iodd/src/parser.rs

use crate::error::from_de_error;
use crate::guard::{declared_encoding, prescan, schema_version};
use crate::model::IoDevice;
use crate::resolver;
use devprofile_rs::config::Config;
use devprofile_rs::encoding;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::DeviceProfile;
use devprofile_rs::validate_profile;
use log::debug;

/// Parses an IODD document into a `DeviceProfile`.
///
/// The pipeline is:
/// 1. size check against `config.limits.max_input_bytes`,
/// 2. decoding (byte-order mark, then the XML declaration, then UTF-8),
/// 3. a streaming pre-scan bounding depth, element count and DOCTYPE content,
/// 4. schema version check,
/// 5. deserialization into the schema-shaped model,
/// 6. resolution into the canonical model,
/// 7. invariant validation.
///
/// # Errors
/// Returns a `ParseError` describing the first problem found.
pub fn load_iodd(bytes: &[u8], config: &Config) -> Result<DeviceProfile, ParseError> {
    let limits = &config.limits;
    if bytes.len() as u64 > limits.max_input_bytes {
        return Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            max: limits.max_input_bytes,
            found: bytes.len() as u64,
        });
    }

    let declared = declared_encoding(bytes);
    let decoded = encoding::decode(bytes, declared.as_deref())?;
    let text = decoded.text.as_ref();

    let summary = prescan(text, limits)?;
    let version = schema_version(summary.schema_location.as_deref())?;

    let device: IoDevice = quick_xml::de::from_str(text).map_err(from_de_error)?;
    let profile = resolver::resolve_profile(device, version)?;
    validate_profile(&profile)?;

    debug!(
        "Loaded IODD for '{}' (vendor {}, device {}): {} variables, {} texts in {} languages",
        profile.text(&profile.identity.product_name, &config.languages.fallback_order),
        profile.vendor.id,
        profile.identity.device_id,
        profile.parameters.len(),
        profile.texts.len(),
        profile.texts.languages.len()
    );
    Ok(profile)
}
