// crates/devprofile-rs-iodd/src/resolver/diagnostics.rs

use super::utils::opt_text_ref;
use crate::model::diagnostics::{
    ErrorTypeCollection, ErrorTypeElem, ErrorTypeEntry, EventCollection, EventElem, EventEntry,
};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{ErrorType, Event, EventKind};
use devprofile_rs::numeric::{parse_u16, parse_u8};

pub(super) fn resolve_error_types(
    collection: &ErrorTypeCollection,
) -> Result<Vec<ErrorType>, ParseError> {
    collection
        .items
        .iter()
        .map(|entry| match entry {
            ErrorTypeEntry::StdErrorTypeRef(e) => error_type(e, true),
            ErrorTypeEntry::ErrorType(e) => error_type(e, false),
        })
        .collect()
}

fn error_type(e: &ErrorTypeElem, standard: bool) -> Result<ErrorType, ParseError> {
    let path = format!("ErrorTypeCollection/ErrorType[{}:{}]", e.code, e.additional_code);
    Ok(ErrorType {
        code: parse_u8(&e.code, &format!("{}/@code", path))?,
        additional_code: parse_u8(&e.additional_code, &format!("{}/@additionalCode", path))?,
        standard,
        name: opt_text_ref(e.name.as_ref()),
        description: opt_text_ref(e.description.as_ref()),
    })
}

pub(super) fn resolve_events(collection: &EventCollection) -> Result<Vec<Event>, ParseError> {
    collection
        .items
        .iter()
        .map(|entry| match entry {
            EventEntry::StdEventRef(e) => event(e, true),
            EventEntry::Event(e) => event(e, false),
        })
        .collect()
}

fn event(e: &EventElem, standard: bool) -> Result<Event, ParseError> {
    let path = format!("EventCollection/Event[{}]", e.code);
    let kind = e
        .event_type
        .as_deref()
        .map(|t| {
            t.parse::<EventKind>().map_err(|_| {
                ParseError::out_of_range(
                    format!("{}/@type", path),
                    t,
                    "Notification | Warning | Error",
                )
            })
        })
        .transpose()?;
    if !standard && e.name.is_none() {
        return Err(ParseError::structure(format!("{}/Name", path), "element is missing"));
    }
    Ok(Event {
        code: parse_u16(&e.code, &format!("{}/@code", path))?,
        standard,
        kind,
        name: opt_text_ref(e.name.as_ref()),
        description: opt_text_ref(e.description.as_ref()),
    })
}
