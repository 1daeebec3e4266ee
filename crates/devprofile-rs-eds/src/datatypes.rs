// crates/devprofile-rs-eds/src/datatypes.rs

//! Elementary data type codes of the section-text grammar.

use devprofile_rs::error::ParseError;
use devprofile_rs::model::{PrimitiveType, StringEncoding};

const BOOL: u8 = 0xC1;
const SINT: u8 = 0xC2;
const INT: u8 = 0xC3;
const DINT: u8 = 0xC4;
const LINT: u8 = 0xC5;
const USINT: u8 = 0xC6;
const UINT: u8 = 0xC7;
const UDINT: u8 = 0xC8;
const ULINT: u8 = 0xC9;
const REAL: u8 = 0xCA;
const LREAL: u8 = 0xCB;
const DATE_AND_TIME: u8 = 0xCF;
const STRING: u8 = 0xD0;
const BYTE: u8 = 0xD1;
const WORD: u8 = 0xD2;
const DWORD: u8 = 0xD3;
const LWORD: u8 = 0xD4;
const TIME: u8 = 0xDB;

/// Maps a type code and its declared data size (bytes) to a primitive type.
///
/// Fixed-size types must declare their natural size; `STRING` takes its
/// length from the data size.
pub(crate) fn from_code(code: u8, size: u16, path: &str) -> Result<PrimitiveType, ParseError> {
    let primitive = match code {
        BOOL => PrimitiveType::Boolean,
        SINT => PrimitiveType::Integer { bits: 8 },
        INT => PrimitiveType::Integer { bits: 16 },
        DINT => PrimitiveType::Integer { bits: 32 },
        LINT => PrimitiveType::Integer { bits: 64 },
        USINT => PrimitiveType::UInteger { bits: 8 },
        UINT => PrimitiveType::UInteger { bits: 16 },
        UDINT => PrimitiveType::UInteger { bits: 32 },
        ULINT => PrimitiveType::UInteger { bits: 64 },
        REAL => PrimitiveType::Float32,
        LREAL => PrimitiveType::Float64,
        DATE_AND_TIME => PrimitiveType::Time,
        TIME => PrimitiveType::TimeSpan,
        BYTE => PrimitiveType::BitString { bits: 8 },
        WORD => PrimitiveType::BitString { bits: 16 },
        DWORD => PrimitiveType::BitString { bits: 32 },
        LWORD => PrimitiveType::BitString { bits: 64 },
        STRING => {
            return Ok(PrimitiveType::String {
                length: size,
                encoding: StringEncoding::Utf8,
            });
        }
        other => {
            return Err(ParseError::out_of_range(
                format!("{}/DataType", path),
                format!("0x{:02X}", other),
                "a supported elementary data type code",
            ));
        }
    };

    let expected = natural_size(&primitive);
    if size != expected {
        return Err(ParseError::out_of_range(
            format!("{}/DataSize", path),
            size.to_string(),
            format!("{} for type code 0x{:02X}", expected, code),
        ));
    }
    Ok(primitive)
}

/// Type code and data size for `primitive`, if the grammar has one.
pub(crate) fn to_code(primitive: &PrimitiveType) -> Option<(u8, u16)> {
    let code = match *primitive {
        PrimitiveType::Boolean => BOOL,
        PrimitiveType::Integer { bits: 8 } => SINT,
        PrimitiveType::Integer { bits: 16 } => INT,
        PrimitiveType::Integer { bits: 32 } => DINT,
        PrimitiveType::Integer { bits: 64 } => LINT,
        PrimitiveType::UInteger { bits: 8 } => USINT,
        PrimitiveType::UInteger { bits: 16 } => UINT,
        PrimitiveType::UInteger { bits: 32 } => UDINT,
        PrimitiveType::UInteger { bits: 64 } => ULINT,
        PrimitiveType::Float32 => REAL,
        PrimitiveType::Float64 => LREAL,
        PrimitiveType::Time => DATE_AND_TIME,
        PrimitiveType::TimeSpan => TIME,
        PrimitiveType::BitString { bits: 8 } => BYTE,
        PrimitiveType::BitString { bits: 16 } => WORD,
        PrimitiveType::BitString { bits: 32 } => DWORD,
        PrimitiveType::BitString { bits: 64 } => LWORD,
        PrimitiveType::String { length, .. } => return Some((STRING, length)),
        _ => return None,
    };
    Some((code, natural_size(primitive)))
}

fn natural_size(primitive: &PrimitiveType) -> u16 {
    match primitive {
        PrimitiveType::Boolean => 1,
        other => u16::try_from(other.bit_length() / 8).unwrap_or(u16::MAX),
    }
}
