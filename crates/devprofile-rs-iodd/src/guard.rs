// crates/devprofile-rs-iodd/src/guard.rs

//! Streaming pre-scan run before any deserialization.
//!
//! The scan walks the document once with `quick_xml::Reader` and fails
//! closed on anything that could make the later serde pass expensive or
//! unsafe: excessive nesting, too many elements, or a DOCTYPE that declares
//! entities or pulls in external content. Entities are never expanded.

use crate::error::from_xml_error;
use devprofile_rs::config::Limits;
use devprofile_rs::error::ParseError;
use log::trace;
use quick_xml::events::Event;
use quick_xml::Reader;

/// What the pre-scan learned about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub elements: u64,
    pub max_depth: u32,
    /// Raw `xsi:schemaLocation` of the root element, if present.
    pub schema_location: Option<String>,
}

/// Checks `text` against `limits` and returns a summary of its shape.
pub fn prescan(text: &str, limits: &Limits) -> Result<ScanSummary, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut depth: u32 = 0;
    let mut summary = ScanSummary {
        elements: 0,
        max_depth: 0,
        schema_location: None,
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|e| from_xml_error(e, reader.buffer_position() as u64))?;
        match event {
            Event::DocType(doctype) => {
                let body = String::from_utf8_lossy(&doctype);
                let entities = body.matches("<!ENTITY").count() as u64;
                if entities > 0 {
                    return Err(ParseError::ResourceLimitExceeded {
                        limit: "entity_declarations",
                        max: 0,
                        found: entities,
                    });
                }
                if body.contains("SYSTEM") || body.contains("PUBLIC") {
                    return Err(ParseError::ResourceLimitExceeded {
                        limit: "external_references",
                        max: 0,
                        found: 1,
                    });
                }
            }
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(_));
                depth += 1;
                summary.elements += 1;
                summary.max_depth = summary.max_depth.max(depth);

                if depth > limits.max_depth {
                    return Err(ParseError::ResourceLimitExceeded {
                        limit: "max_depth",
                        max: u64::from(limits.max_depth),
                        found: u64::from(depth),
                    });
                }
                if summary.elements > limits.max_elements {
                    return Err(ParseError::ResourceLimitExceeded {
                        limit: "max_elements",
                        max: limits.max_elements,
                        found: summary.elements,
                    });
                }

                if summary.elements == 1 {
                    check_root(start, &mut summary)?;
                }
                if is_empty {
                    depth -= 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if summary.elements == 0 {
        return Err(ParseError::structure("/", "document has no root element"));
    }
    trace!(
        "Pre-scan passed: {} elements, depth {}",
        summary.elements, summary.max_depth
    );
    Ok(summary)
}

fn check_root(
    start: &quick_xml::events::BytesStart<'_>,
    summary: &mut ScanSummary,
) -> Result<(), ParseError> {
    if start.name().as_ref() != b"IODevice" {
        return Err(ParseError::structure(
            "/",
            format!(
                "root element is <{}>, expected <IODevice>",
                String::from_utf8_lossy(start.name().as_ref())
            ),
        ));
    }
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::syntax("IODevice", e.to_string()))?;
        if attr.key.as_ref() == b"xsi:schemaLocation" {
            summary.schema_location = Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    Ok(())
}

/// Extracts the schema version from an `xsi:schemaLocation` value
/// (`"<namespace> IODD1.1.xsd"`) and checks that its major is supported.
pub fn schema_version(location: Option<&str>) -> Result<String, ParseError> {
    let location = location
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| ParseError::structure("IODevice/@xsi:schemaLocation", "attribute is missing"))?;

    let version = location
        .split_whitespace()
        .filter_map(|token| {
            let file = token.rsplit('/').next().unwrap_or(token);
            let stem = file.strip_suffix(".xsd")?;
            let version = stem.get(4..).filter(|_| stem[..4].eq_ignore_ascii_case("IODD"))?;
            Some(version.to_string())
        })
        .next()
        .ok_or_else(|| {
            ParseError::structure(
                "IODevice/@xsi:schemaLocation",
                format!("'{}' does not name an IODD schema", location),
            )
        })?;

    let major = version.split('.').next().and_then(|m| m.parse::<u32>().ok());
    match major {
        Some(1) => Ok(version),
        _ => Err(ParseError::UnsupportedSchemaVersion { found: version }),
    }
}

/// Reads the `encoding` pseudo-attribute of an XML declaration, if any.
pub(crate) fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(1024)];
    let head = std::str::from_utf8(head)
        .ok()
        .or_else(|| std::str::from_utf8(&head[..head.iter().position(|b| !b.is_ascii())?]).ok())?;
    let decl = head.trim_start().strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}
