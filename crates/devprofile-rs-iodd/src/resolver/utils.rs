// crates/devprofile-rs-iodd/src/resolver/utils.rs

//! Utility functions for the resolver.

use crate::model::common::TextIdRef;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{AccessRights, TextRef};
use devprofile_rs::numeric::parse_bool;

pub(super) fn text_ref(t: &TextIdRef) -> TextRef {
    TextRef::new(t.text_id.clone())
}

pub(super) fn opt_text_ref(t: Option<&TextIdRef>) -> Option<TextRef> {
    t.map(text_ref)
}

/// Parses a mandatory `xsd:boolean` attribute.
pub(super) fn req_bool(value: &str, path: &str) -> Result<bool, ParseError> {
    parse_bool(value).ok_or_else(|| ParseError::syntax(path, format!("'{}' is not a boolean", value)))
}

/// Parses an optional `xsd:boolean` attribute.
pub(super) fn opt_bool(value: Option<&String>, path: &str) -> Result<Option<bool>, ParseError> {
    value.map(|v| req_bool(v, path)).transpose()
}

/// Parses an `accessRights` / `accessRightRestriction` attribute.
pub(super) fn access_rights(value: &str, path: &str) -> Result<AccessRights, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::out_of_range(path, value, "ro | wo | rw"))
}

pub(super) fn opt_access_rights(
    value: Option<&String>,
    path: &str,
) -> Result<Option<AccessRights>, ParseError> {
    value.map(|v| access_rights(v, path)).transpose()
}
