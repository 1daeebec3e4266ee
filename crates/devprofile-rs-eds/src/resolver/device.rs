// crates/devprofile-rs-eds/src/resolver/device.rs

//! `[File]` and `[Device]` sections.

use super::utils::{TextSink, extension, single};
use crate::lexer::Section;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::DeviceProfile;
use devprofile_rs::numeric::{parse_u8, parse_u16};
use log::trace;

pub(super) fn resolve_file(section: &Section, profile: &mut DeviceProfile) -> Result<(), ParseError> {
    for entry in &section.entries {
        let path = format!("File/{}", entry.key);
        match entry.key.to_ascii_lowercase().as_str() {
            "revision" => profile.document.schema_version = single(entry, &path)?.to_string(),
            "createdate" => profile.document.release_date = Some(single(entry, &path)?.to_string()),
            _ => profile.extensions.push(extension("File", entry)),
        }
    }
    trace!("Resolved [File]: revision '{}'", profile.document.schema_version);
    Ok(())
}

pub(super) fn resolve_device(
    section: &Section,
    texts: &mut TextSink,
    profile: &mut DeviceProfile,
) -> Result<(), ParseError> {
    let mut vendor = None;
    let mut product = None;
    let mut name = None;
    let mut major = None;
    let mut minor = None;

    for entry in &section.entries {
        let path = format!("Device/{}", entry.key);
        match entry.key.to_ascii_lowercase().as_str() {
            "vendcode" => vendor = Some(parse_u16(single(entry, &path)?, &path)?),
            "vendname" => profile.vendor.name = single(entry, &path)?.to_string(),
            "prodcode" => product = Some(parse_u16(single(entry, &path)?, &path)?),
            "prodname" => name = Some(texts.add("Device.ProdName".into(), single(entry, &path)?)),
            "majrev" => major = Some(parse_u8(single(entry, &path)?, &path)?),
            "minrev" => minor = Some(parse_u8(single(entry, &path)?, &path)?),
            _ => profile.extensions.push(extension("Device", entry)),
        }
    }

    let missing = |key: &str| ParseError::structure(format!("Device/{}", key), "missing mandatory key");
    let vendor = vendor.ok_or_else(|| missing("VendCode"))?;
    let product = product.ok_or_else(|| missing("ProdCode"))?;
    let name = name.ok_or_else(|| missing("ProdName"))?;

    profile.vendor.id = u32::from(vendor);
    profile.identity.vendor_id = u32::from(vendor);
    profile.identity.device_id = u32::from(product);
    profile.identity.product_name = name;
    profile.identity.revision = match (major, minor) {
        (Some(major), Some(minor)) => Some(format!("{}.{}", major, minor)),
        (Some(major), None) => Some(major.to_string()),
        (None, Some(_)) => {
            return Err(ParseError::structure("Device/MinRev", "MinRev without MajRev"));
        }
        (None, None) => None,
    };

    trace!("Resolved [Device]: vendor {} product {}", vendor, product);
    Ok(())
}
