// crates/devprofile-rs-catalog/src/dispatch.rs

//! Routes documents to the parser and writer of their grammar.
//!
//! The grammar is chosen once, from content, when a document enters the
//! catalog; everything downstream works on the canonical model.

use devprofile_rs::config::Config;
use devprofile_rs::error::{ParseError, ReconstructError};
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::DeviceProfile;
use devprofile_rs_eds::{load_eds, save_eds_to_string};
use devprofile_rs_iodd::{load_iodd, save_iodd_to_string};

/// Detects the grammar of `bytes`.
pub fn detect(bytes: &[u8]) -> Result<Grammar, ParseError> {
    Grammar::sniff(bytes).ok_or_else(|| {
        ParseError::syntax(
            "document",
            "content is neither a markup nor a section-text device description",
        )
    })
}

/// Parses `bytes` with the parser of `grammar`.
pub fn parse(bytes: &[u8], grammar: Grammar, config: &Config) -> Result<DeviceProfile, ParseError> {
    match grammar {
        Grammar::Markup => load_iodd(bytes, config),
        Grammar::SectionText => load_eds(bytes, config),
    }
}

/// Serializes `profile` in `grammar`. Output is always UTF-8.
pub fn reconstruct(
    profile: &DeviceProfile,
    grammar: Grammar,
    config: &Config,
) -> Result<Vec<u8>, ReconstructError> {
    let text = match grammar {
        Grammar::Markup => save_iodd_to_string(profile, config)?,
        Grammar::SectionText => save_eds_to_string(profile, config)?,
    };
    Ok(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(detect(b"  <?xml version=\"1.0\"?><IODevice/>").unwrap(), Grammar::Markup);
        assert_eq!(detect(b"$ comment\n[File]\n").unwrap(), Grammar::SectionText);
        assert!(matches!(detect(b"%PDF-1.7"), Err(ParseError::Syntax { .. })));
    }
}
