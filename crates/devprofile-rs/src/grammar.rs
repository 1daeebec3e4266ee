// crates/devprofile-rs/src/grammar.rs

//! The two source grammars and content-based grammar detection.

use core::fmt;
use core::str::FromStr;
use encoding_rs::{UTF_16BE, UTF_16LE};
use serde::{Deserialize, Serialize};

/// Which grammar a document was (or should be) written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grammar {
    /// Hierarchical XML dialect (IODD style).
    Markup,
    /// Flat section/key dialect (EDS style).
    SectionText,
}

impl Grammar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grammar::Markup => "markup",
            Grammar::SectionText => "section-text",
        }
    }

    /// Detects the grammar of a document from its content, never from a file name.
    ///
    /// Byte-order marks are skipped, then leading whitespace. A document whose
    /// first significant character is `<` is markup; `[` or `$` (section header
    /// or comment) is section text. Anything else returns `None`.
    pub fn sniff(bytes: &[u8]) -> Option<Grammar> {
        let first = if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
            first_significant_ascii(rest)
        } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
            first_significant_wide(rest, true)
        } else if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
            first_significant_wide(rest, false)
        } else {
            first_significant_ascii(bytes)
        }?;

        match first {
            '<' => Some(Grammar::Markup),
            '[' | '$' => Some(Grammar::SectionText),
            _ => None,
        }
    }
}

fn first_significant_ascii(bytes: &[u8]) -> Option<char> {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b as char)
}

fn first_significant_wide(bytes: &[u8], little_endian: bool) -> Option<char> {
    // Only the head of the document matters.
    let head = &bytes[..bytes.len().min(256) & !1];
    let encoding = if little_endian { UTF_16LE } else { UTF_16BE };
    let (text, _) = encoding.decode_without_bom_handling(head);
    text.chars().find(|c| !c.is_whitespace())
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grammar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" | "iodd" | "xml" => Ok(Grammar::Markup),
            "section-text" | "sectiontext" | "eds" | "ini" => Ok(Grammar::SectionText),
            other => Err(format!("unknown grammar '{}'", other)),
        }
    }
}
