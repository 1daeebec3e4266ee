// crates/devprofile-rs/src/numeric.rs

//! Helpers for numeric and boolean attribute values.
//!
//! Device descriptions mix decimal (`"10"`) and hexadecimal (`"0x0A"`)
//! spellings freely; both are accepted everywhere a number is expected.

use crate::error::ParseError;

/// Why a text did not yield an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntegerError {
    NotANumber,
    /// Well-formed, but wider than 128 bits.
    Overflow,
}

/// Parses a signed decimal or `0x`-prefixed hexadecimal integer.
///
/// The sign, if any, precedes the prefix: `-0x10` is a number, `0x-10` is
/// not. Returns `None` if the text is not a number at all or does not fit
/// in an `i128`.
pub fn parse_integer(s: &str) -> Option<i128> {
    integer(s).ok()
}

fn integer(s: &str) -> Result<i128, IntegerError> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(IntegerError::NotANumber);
    }
    let magnitude = i128::from_str_radix(digits, radix).map_err(|_| IntegerError::Overflow)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses an integer and checks it against `min..=max`.
///
/// Non-numeric text is a syntax error; a number outside the range, however
/// large, is `ValueOutOfRange`. Both carry `path`.
pub fn parse_in_range(s: &str, min: i128, max: i128, path: &str) -> Result<i128, ParseError> {
    let out_of_range = || ParseError::out_of_range(path, s.trim(), format!("{}..={}", min, max));
    let value = match integer(s) {
        Ok(value) => value,
        Err(IntegerError::Overflow) => return Err(out_of_range()),
        Err(IntegerError::NotANumber) => {
            return Err(ParseError::syntax(path, format!("'{}' is not a number", s)));
        }
    };
    if value < min || value > max {
        return Err(out_of_range());
    }
    Ok(value)
}

pub fn parse_u8(s: &str, path: &str) -> Result<u8, ParseError> {
    parse_in_range(s, 0, u8::MAX as i128, path).map(|v| v as u8)
}

pub fn parse_u16(s: &str, path: &str) -> Result<u16, ParseError> {
    parse_in_range(s, 0, u16::MAX as i128, path).map(|v| v as u16)
}

pub fn parse_u32(s: &str, path: &str) -> Result<u32, ParseError> {
    parse_in_range(s, 0, u32::MAX as i128, path).map(|v| v as u32)
}

/// Parses the boolean spellings found in device descriptions.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a floating point value, also accepting integer spellings (hex included).
pub fn parse_float(s: &str) -> Option<f64> {
    let t = s.trim();
    if let Some(i) = parse_integer(t) {
        return Some(i as f64);
    }
    t.parse::<f64>().ok().filter(|f| !f.is_nan())
}
