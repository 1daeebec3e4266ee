// crates/devprofile-rs/src/model/diagnostics.rs

use super::text::TextRef;
use core::fmt;
use core::str::FromStr;

/// A device error type. Standard error types carry no texts of their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorType {
    pub code: u8,
    pub additional_code: u8,
    pub standard: bool,
    pub name: Option<TextRef>,
    pub description: Option<TextRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Notification,
    Warning,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Notification => "Notification",
            EventKind::Warning => "Warning",
            EventKind::Error => "Error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Notification" => Ok(EventKind::Notification),
            "Warning" => Ok(EventKind::Warning),
            "Error" => Ok(EventKind::Error),
            other => Err(format!("unknown event type '{}'", other)),
        }
    }
}

/// A device event. Standard events carry no texts of their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    pub code: u16,
    pub standard: bool,
    pub kind: Option<EventKind>,
    pub name: Option<TextRef>,
    pub description: Option<TextRef>,
}
