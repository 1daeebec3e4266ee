// crates/devprofile-rs-eds/src/parser.rs

use crate::lexer;
use crate::resolver;
use devprofile_rs::config::Config;
use devprofile_rs::encoding;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::DeviceProfile;
use devprofile_rs::validate_profile;
use log::{debug, trace};
use std::borrow::Cow;

/// Parses an EDS-style section-text document into a `DeviceProfile`.
///
/// The pipeline is:
/// 1. size check against `config.limits.max_input_bytes`,
/// 2. decoding (byte-order mark, then UTF-8, then
///    `config.languages.section_text_encoding`),
/// 3. tokenizing, bounded by `config.limits.max_elements`,
/// 4. resolution into the canonical model,
/// 5. invariant validation.
///
/// # Errors
/// Returns a `ParseError` describing the first problem found.
pub fn load_eds(bytes: &[u8], config: &Config) -> Result<DeviceProfile, ParseError> {
    let limits = &config.limits;
    if bytes.len() as u64 > limits.max_input_bytes {
        return Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            max: limits.max_input_bytes,
            found: bytes.len() as u64,
        });
    }

    let text = decode(bytes, config)?;
    let document = lexer::tokenize(&text, limits.max_elements)?;
    trace!("Tokenized {} sections", document.sections.len());

    let profile = resolver::resolve_profile(document, config.primary_language())?;
    validate_profile(&profile)?;

    debug!(
        "Loaded EDS for '{}' (vendor {}, product {}): {} parameters, {} opaque sections",
        profile.text(&profile.identity.product_name, &config.languages.fallback_order),
        profile.vendor.id,
        profile.identity.device_id,
        profile.parameters.len(),
        profile.opaque_sections.len()
    );
    Ok(profile)
}

/// Section-text documents carry no encoding declaration: a byte-order mark
/// or valid UTF-8 wins, the configured label is the last resort.
fn decode<'a>(bytes: &'a [u8], config: &Config) -> Result<Cow<'a, str>, ParseError> {
    match encoding::decode(bytes, None) {
        Ok(decoded) => Ok(decoded.text),
        Err(err @ ParseError::Encoding { .. }) => {
            match config.languages.section_text_encoding.as_deref() {
                Some(label) => encoding::decode(bytes, Some(label)).map(|d| d.text),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
