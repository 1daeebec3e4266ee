// crates/devprofile-rs-catalog/src/container.rs

//! ZIP containers of device descriptions.
//!
//! Vendors ship descriptions bundled with icons and manuals, sometimes with
//! one archive inside another. Members are sniffed by content; anything that
//! is neither grammar is skipped.

use crate::error::ContainerError;
use devprofile_rs::config::Limits;
use devprofile_rs::error::ParseError;
use devprofile_rs::grammar::Grammar;
use log::{debug, trace};
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const EMPTY_ZIP_MAGIC: &[u8] = b"PK\x05\x06";

/// A device description found inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Entry path; members of nested archives are prefixed with the
    /// archive's own path and `!/`.
    pub name: String,
    pub bytes: Vec<u8>,
    pub grammar: Grammar,
}

/// True if `bytes` start like a ZIP archive.
pub fn is_container(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(EMPTY_ZIP_MAGIC)
}

/// Extracts every device description from the archive in `bytes`.
///
/// Archives nested more than `limits.max_container_depth` levels below the
/// outer one are rejected, as are archives with more than
/// `limits.max_container_entries` entries in total and entries larger than
/// `limits.max_input_bytes`. The uncompressed bytes of all entries, nested
/// archives counted as well as their members, may not exceed
/// `limits.max_container_total_bytes`.
pub fn extract(bytes: &[u8], limits: &Limits) -> Result<Vec<Member>, ContainerError> {
    if !is_container(bytes) {
        return Err(ContainerError::NotZipContainer(
            "missing local file header signature".into(),
        ));
    }

    let mut members = Vec::new();
    let mut entries_seen: u64 = 0;
    let mut bytes_read: u64 = 0;
    // (path prefix, archive bytes, nesting level)
    let mut pending: Vec<(String, Vec<u8>, u32)> = vec![(String::new(), bytes.to_vec(), 0)];

    while let Some((prefix, data, level)) = pending.pop() {
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| match e {
            ZipError::Io(io) => ContainerError::Io(io),
            other => ContainerError::NotZipContainer(other.to_string()),
        })?;

        entries_seen += archive.len() as u64;
        let max_entries = u64::from(limits.max_container_entries);
        if entries_seen > max_entries {
            return Err(ParseError::ResourceLimitExceeded {
                limit: "max_container_entries",
                max: max_entries,
                found: entries_seen,
            }
            .into());
        }

        for index in 0..archive.len() {
            let remaining = limits.max_container_total_bytes.saturating_sub(bytes_read);
            let (name, body) = read_entry(&mut archive, index, &prefix, limits, remaining)?;
            let Some(body) = body else {
                continue;
            };
            bytes_read += body.len() as u64;
            if bytes_read > limits.max_container_total_bytes {
                return Err(ParseError::ResourceLimitExceeded {
                    limit: "max_container_total_bytes",
                    max: limits.max_container_total_bytes,
                    found: bytes_read,
                }
                .into());
            }

            if is_container(&body) {
                let nested_level = level + 1;
                if nested_level > limits.max_container_depth {
                    return Err(ParseError::ResourceLimitExceeded {
                        limit: "max_container_depth",
                        max: u64::from(limits.max_container_depth),
                        found: u64::from(nested_level),
                    }
                    .into());
                }
                trace!("Descending into nested archive '{}'", name);
                pending.push((format!("{}!/", name), body, nested_level));
                continue;
            }

            match Grammar::sniff(&body) {
                Some(grammar) => members.push(Member {
                    name,
                    bytes: body,
                    grammar,
                }),
                None => debug!("Skipping container member '{}': not a device description", name),
            }
        }
    }

    // Nested archives are visited last; order by path instead.
    members.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(members)
}

/// Reads entry `index`, returning its full path and, for files, its bytes.
///
/// At most one byte more than `remaining` is read, enough for the caller to
/// see that the container total is exceeded.
fn read_entry(
    archive: &mut ZipArchive<Cursor<Vec<u8>>>,
    index: usize,
    prefix: &str,
    limits: &Limits,
    remaining: u64,
) -> Result<(String, Option<Vec<u8>>), ContainerError> {
    let file = archive.by_index(index).map_err(|e| ContainerError::ZipRead {
        path: format!("{}#{}", prefix, index),
        reason: e.to_string(),
    })?;
    let name = format!("{}{}", prefix, file.name());
    if file.is_dir() {
        return Ok((name, None));
    }

    if file.size() > limits.max_input_bytes {
        return Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            max: limits.max_input_bytes,
            found: file.size(),
        }
        .into());
    }

    // The declared size may lie; never read past the limit.
    let mut body = Vec::new();
    file.take(limits.max_input_bytes.min(remaining).saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| ContainerError::ZipRead {
            path: name.clone(),
            reason: e.to_string(),
        })?;
    if body.len() as u64 > limits.max_input_bytes {
        return Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            max: limits.max_input_bytes,
            found: body.len() as u64,
        }
        .into());
    }
    Ok((name, Some(body)))
}
