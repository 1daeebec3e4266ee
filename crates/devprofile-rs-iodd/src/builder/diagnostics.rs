// crates/devprofile-rs-iodd/src/builder/diagnostics.rs

use crate::model::common::TextIdRef;
use crate::model::diagnostics::{
    ErrorTypeCollection, ErrorTypeElem, ErrorTypeEntry, EventCollection, EventElem, EventEntry,
};
use devprofile_rs::model::{ErrorType, Event, TextRef};

fn text(t: &Option<TextRef>) -> Option<TextIdRef> {
    t.as_ref().map(|t| TextIdRef::new(t.id()))
}

pub(super) fn build_error_types(errors: &[ErrorType]) -> Option<ErrorTypeCollection> {
    if errors.is_empty() {
        return None;
    }
    let items = errors
        .iter()
        .map(|e| {
            let elem = ErrorTypeElem {
                code: e.code.to_string(),
                additional_code: e.additional_code.to_string(),
                name: text(&e.name),
                description: text(&e.description),
            };
            if e.standard {
                ErrorTypeEntry::StdErrorTypeRef(elem)
            } else {
                ErrorTypeEntry::ErrorType(elem)
            }
        })
        .collect();
    Some(ErrorTypeCollection { items })
}

pub(super) fn build_events(events: &[Event]) -> Option<EventCollection> {
    if events.is_empty() {
        return None;
    }
    let items = events
        .iter()
        .map(|e| {
            let elem = EventElem {
                code: e.code.to_string(),
                event_type: e.kind.map(|k| k.as_str().to_string()),
                name: text(&e.name),
                description: text(&e.description),
            };
            if e.standard {
                EventEntry::StdEventRef(elem)
            } else {
                EventEntry::Event(elem)
            }
        })
        .collect();
    Some(EventCollection { items })
}
