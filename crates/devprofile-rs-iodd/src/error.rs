// crates/devprofile-rs-iodd/src/error.rs

//! Mapping of `quick-xml` failures onto the crate-independent error taxonomy.

use devprofile_rs::error::{ParseError, ReconstructError};
use quick_xml::errors::serialize::{DeError, SeError};

/// Converts a deserializer failure.
///
/// Missing mandatory elements and attributes are structural problems; anything
/// else the deserializer reports is malformed syntax.
pub(crate) fn from_de_error(e: DeError) -> ParseError {
    let message = e.to_string();
    if message.contains("missing field") {
        ParseError::structure("IODevice", message)
    } else {
        ParseError::syntax("IODevice", message)
    }
}

pub(crate) fn from_xml_error(e: quick_xml::Error, position: u64) -> ParseError {
    ParseError::syntax(format!("byte {}", position), e.to_string())
}

pub(crate) fn from_se_error(e: SeError) -> ReconstructError {
    ReconstructError::Serialize(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_structural() {
        let e = DeError::Custom("missing field `DocumentInfo`".into());
        assert!(matches!(from_de_error(e), ParseError::InvalidStructure { .. }));
        let e = DeError::Custom("invalid type".into());
        assert!(matches!(from_de_error(e), ParseError::Syntax { .. }));
    }
}
