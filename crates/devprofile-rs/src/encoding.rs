// crates/devprofile-rs/src/encoding.rs

//! Text decoding for incoming documents.
//!
//! Encodings are sniffed (byte-order mark) or declared (XML declaration,
//! configuration), never guessed. Malformed input yields
//! `ParseError::Encoding` instead of being decoded with replacement
//! characters.

use crate::error::ParseError;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

/// A decoded document together with the encoding that was applied.
#[derive(Debug)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}

/// Decodes `bytes` into text.
///
/// Order of precedence:
/// 1. a byte-order mark (UTF-8, UTF-16LE, UTF-16BE),
/// 2. the `declared` label (e.g. from an XML declaration or configuration),
/// 3. strict UTF-8.
pub fn decode<'a>(bytes: &'a [u8], declared: Option<&str>) -> Result<Decoded<'a>, ParseError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let body = &bytes[bom_len..];
        return decode_strict(body, encoding);
    }

    if let Some(label) = declared {
        let encoding =
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ParseError::Encoding {
                encoding: label.to_string(),
                message: "unknown encoding label".into(),
            })?;
        return decode_strict(bytes, encoding);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Decoded {
            text: Cow::Borrowed(text),
            encoding: UTF_8,
        }),
        Err(e) => Err(ParseError::Encoding {
            encoding: UTF_8.name().to_string(),
            message: format!("invalid UTF-8 sequence at byte offset {}", e.valid_up_to()),
        }),
    }
}

fn decode_strict<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Result<Decoded<'a>, ParseError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| Decoded { text, encoding })
        .ok_or_else(|| ParseError::Encoding {
            encoding: encoding.name().to_string(),
            message: "malformed byte sequence".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8_is_borrowed() {
        let decoded = decode(b"[File]\n", None).unwrap();
        assert!(matches!(decoded.text, Cow::Borrowed(_)));
        assert_eq!(decoded.encoding, UTF_8);
    }

    #[test]
    fn test_bom_wins_over_declaration() {
        let mut bytes = vec![0xFF, 0xFE];
        for c in "[File]".encode_utf16() {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        let decoded = decode(&bytes, Some("windows-1252")).unwrap();
        assert_eq!(decoded.text, "[File]");
    }

    #[test]
    fn test_declared_latin1() {
        let decoded = decode(b"Stra\xDFe", Some("ISO-8859-1")).unwrap();
        assert_eq!(decoded.text, "Stra\u{DF}e");
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let err = decode(b"ab\xFFcd", None).unwrap_err();
        match err {
            ParseError::Encoding { message, .. } => assert!(message.contains("offset 2")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unknown_label() {
        let err = decode(b"abc", Some("klingon-8")).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }));
    }
}
