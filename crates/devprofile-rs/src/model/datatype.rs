// crates/devprofile-rs/src/model/datatype.rs

//! Built-in primitive types and references to declared custom types.

use crate::numeric::{parse_bool, parse_float, parse_integer};
use core::fmt;
use core::str::FromStr;

/// Character encoding of a string primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    Utf8,
    Ascii,
}

impl StringEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringEncoding::Utf8 => "utf8",
            StringEncoding::Ascii => "ascii",
        }
    }
}

impl FromStr for StringEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(StringEncoding::Utf8),
            "ascii" | "us-ascii" => Ok(StringEncoding::Ascii),
            other => Err(format!("unknown string encoding '{}'", other)),
        }
    }
}

/// A built-in scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    UInteger { bits: u8 },
    Integer { bits: u8 },
    Float32,
    Float64,
    BitString { bits: u8 },
    /// `length` is the maximum length in bytes.
    String { length: u16, encoding: StringEncoding },
    OctetString { length: u16 },
    Time,
    TimeSpan,
}

impl PrimitiveType {
    /// Size of a value of this type inside a record, in bits.
    pub fn bit_length(&self) -> u32 {
        match *self {
            PrimitiveType::Boolean => 1,
            PrimitiveType::UInteger { bits }
            | PrimitiveType::Integer { bits }
            | PrimitiveType::BitString { bits } => u32::from(bits),
            PrimitiveType::Float32 => 32,
            PrimitiveType::Float64 => 64,
            PrimitiveType::String { length, .. } | PrimitiveType::OctetString { length } => {
                u32::from(length) * 8
            }
            PrimitiveType::Time | PrimitiveType::TimeSpan => 64,
        }
    }

    /// Checks that `raw` is a legal value of this type.
    ///
    /// On failure the returned string describes the expected range.
    pub fn check_value(&self, raw: &str) -> Result<(), String> {
        match *self {
            PrimitiveType::Boolean => parse_bool(raw)
                .map(|_| ())
                .ok_or_else(|| "a boolean".to_string()),
            PrimitiveType::UInteger { bits } | PrimitiveType::BitString { bits } => {
                let max = unsigned_max(bits);
                match parse_integer(raw) {
                    Some(v) if (0..=max).contains(&v) => Ok(()),
                    _ => Err(format!("0..={}", max)),
                }
            }
            PrimitiveType::Integer { bits } => {
                let (min, max) = signed_bounds(bits);
                match parse_integer(raw) {
                    Some(v) if (min..=max).contains(&v) => Ok(()),
                    _ => Err(format!("{}..={}", min, max)),
                }
            }
            PrimitiveType::Float32 => match parse_float(raw) {
                Some(v) if v.is_infinite() || v.abs() <= f64::from(f32::MAX) => Ok(()),
                _ => Err("a 32-bit float".to_string()),
            },
            PrimitiveType::Float64 => parse_float(raw)
                .map(|_| ())
                .ok_or_else(|| "a 64-bit float".to_string()),
            PrimitiveType::String { length, encoding } => {
                if encoding == StringEncoding::Ascii && !raw.is_ascii() {
                    return Err("an ASCII string".to_string());
                }
                if length > 0 && raw.len() > usize::from(length) {
                    return Err(format!("at most {} bytes", length));
                }
                Ok(())
            }
            PrimitiveType::OctetString { length } => {
                let octets = raw
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .count();
                if length > 0 && octets > usize::from(length) {
                    return Err(format!("at most {} octets", length));
                }
                Ok(())
            }
            PrimitiveType::Time | PrimitiveType::TimeSpan => Ok(()),
        }
    }
}

fn unsigned_max(bits: u8) -> i128 {
    if bits == 0 {
        0
    } else {
        (1i128 << bits.min(64)) - 1
    }
}

fn signed_bounds(bits: u8) -> (i128, i128) {
    if bits == 0 {
        return (0, 0);
    }
    let half = 1i128 << (bits.min(64) - 1);
    (-half, half - 1)
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Boolean => f.write_str("Boolean"),
            PrimitiveType::UInteger { bits } => write!(f, "UInteger/{}", bits),
            PrimitiveType::Integer { bits } => write!(f, "Integer/{}", bits),
            PrimitiveType::Float32 => f.write_str("Float32"),
            PrimitiveType::Float64 => f.write_str("Float64"),
            PrimitiveType::BitString { bits } => write!(f, "BitString/{}", bits),
            PrimitiveType::String { length, encoding } => {
                write!(f, "String/{}/{}", length, encoding.as_str())
            }
            PrimitiveType::OctetString { length } => write!(f, "OctetString/{}", length),
            PrimitiveType::Time => f.write_str("Time"),
            PrimitiveType::TimeSpan => f.write_str("TimeSpan"),
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let head = parts.next().unwrap_or_default();
        let mut number = |what: &str| -> Result<u16, String> {
            parts
                .next()
                .ok_or_else(|| format!("'{}' lacks {}", s, what))?
                .parse::<u16>()
                .map_err(|e| format!("'{}': invalid {}: {}", s, what, e))
        };
        let bits = |n: u16| u8::try_from(n).map_err(|_| format!("'{}': bit count too large", s));

        let ty = match head {
            "Boolean" => PrimitiveType::Boolean,
            "UInteger" => PrimitiveType::UInteger { bits: bits(number("bits")?)? },
            "Integer" => PrimitiveType::Integer { bits: bits(number("bits")?)? },
            "Float32" => PrimitiveType::Float32,
            "Float64" => PrimitiveType::Float64,
            "BitString" => PrimitiveType::BitString { bits: bits(number("bits")?)? },
            "String" => {
                let length = number("length")?;
                let encoding = parts
                    .next()
                    .ok_or_else(|| format!("'{}' lacks an encoding", s))?
                    .parse()?;
                PrimitiveType::String { length, encoding }
            }
            "OctetString" => PrimitiveType::OctetString { length: number("length")? },
            "Time" => PrimitiveType::Time,
            "TimeSpan" => PrimitiveType::TimeSpan,
            other => return Err(format!("unknown primitive type '{}'", other)),
        };
        if parts.next().is_some() {
            return Err(format!("'{}' has trailing components", s));
        }
        Ok(ty)
    }
}

/// Element type of an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayElement {
    Primitive(PrimitiveType),
    /// Reference to a `CustomDataType` declared on the profile.
    Custom(String),
}

impl ArrayElement {
    /// Bit length when it can be derived without a custom-type lookup.
    pub fn bit_length(&self) -> Option<u32> {
        match self {
            ArrayElement::Primitive(p) => Some(p.bit_length()),
            ArrayElement::Custom(_) => None,
        }
    }
}

impl fmt::Display for ArrayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayElement::Primitive(p) => write!(f, "{}", p),
            ArrayElement::Custom(id) => write!(f, "custom:{}", id),
        }
    }
}

impl FromStr for ArrayElement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("custom:") {
            Some("") => Err("empty custom type id".into()),
            Some(id) => Ok(ArrayElement::Custom(id.to_string())),
            None => s.parse().map(ArrayElement::Primitive),
        }
    }
}

/// The type of a parameter, record node or process data item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataTypeRef {
    Primitive(PrimitiveType),
    /// Reference to a `CustomDataType` declared on the profile.
    Custom(String),
    /// An inline record; its members live in the owner's `RecordLayout`.
    Record { bit_length: u32, subindex_access: bool },
    /// An inline array of primitives or of a declared custom type.
    Array {
        count: u16,
        element: ArrayElement,
        subindex_access: bool,
    },
}

impl Default for DataTypeRef {
    fn default() -> Self {
        DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 })
    }
}

impl DataTypeRef {
    pub fn as_primitive(&self) -> Option<&PrimitiveType> {
        match self {
            DataTypeRef::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Bit length when it can be derived without a custom-type lookup.
    pub fn bit_length(&self) -> Option<u32> {
        match self {
            DataTypeRef::Primitive(p) => Some(p.bit_length()),
            DataTypeRef::Custom(_) => None,
            DataTypeRef::Record { bit_length, .. } => Some(*bit_length),
            DataTypeRef::Array { count, element, .. } => {
                element.bit_length().map(|bits| u32::from(*count) * bits)
            }
        }
    }
}

impl fmt::Display for DataTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataTypeRef::Primitive(p) => write!(f, "{}", p),
            DataTypeRef::Custom(id) => write!(f, "custom:{}", id),
            DataTypeRef::Record {
                bit_length,
                subindex_access,
            } => write!(f, "record:{}:{}", bit_length, u8::from(*subindex_access)),
            DataTypeRef::Array {
                count,
                element,
                subindex_access,
            } => write!(
                f,
                "array:{}:{}:{}",
                count,
                u8::from(*subindex_access),
                element
            ),
        }
    }
}

impl FromStr for DataTypeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flag = |v: &str| match v {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(format!("'{}': invalid flag '{}'", s, other)),
        };

        if let Some(id) = s.strip_prefix("custom:") {
            if id.is_empty() {
                return Err("empty custom type id".into());
            }
            return Ok(DataTypeRef::Custom(id.to_string()));
        }
        if let Some(rest) = s.strip_prefix("record:") {
            let (bits, access) = rest
                .split_once(':')
                .ok_or_else(|| format!("'{}' is not a record encoding", s))?;
            return Ok(DataTypeRef::Record {
                bit_length: bits.parse().map_err(|e| format!("'{}': {}", s, e))?,
                subindex_access: flag(access)?,
            });
        }
        if let Some(rest) = s.strip_prefix("array:") {
            let mut parts = rest.splitn(3, ':');
            let count = parts.next().unwrap_or_default();
            let access = parts
                .next()
                .ok_or_else(|| format!("'{}' is not an array encoding", s))?;
            let element = parts
                .next()
                .ok_or_else(|| format!("'{}' lacks an element type", s))?;
            return Ok(DataTypeRef::Array {
                count: count.parse().map_err(|e| format!("'{}': {}", s, e))?,
                element: element.parse()?,
                subindex_access: flag(access)?,
            });
        }
        s.parse().map(DataTypeRef::Primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_lengths() {
        assert_eq!(PrimitiveType::Boolean.bit_length(), 1);
        assert_eq!(PrimitiveType::Integer { bits: 16 }.bit_length(), 16);
        assert_eq!(
            PrimitiveType::String {
                length: 4,
                encoding: StringEncoding::Ascii
            }
            .bit_length(),
            32
        );
        let array = DataTypeRef::Array {
            count: 3,
            element: ArrayElement::Primitive(PrimitiveType::UInteger { bits: 8 }),
            subindex_access: true,
        };
        assert_eq!(array.bit_length(), Some(24));
        let of_custom = DataTypeRef::Array {
            count: 3,
            element: ArrayElement::Custom("DT_Point".into()),
            subindex_access: true,
        };
        assert_eq!(of_custom.bit_length(), None);
        assert_eq!(DataTypeRef::Custom("T".into()).bit_length(), None);
    }

    #[test]
    fn test_unsigned_range() {
        let u8t = PrimitiveType::UInteger { bits: 8 };
        assert!(u8t.check_value("255").is_ok());
        assert!(u8t.check_value("0xFF").is_ok());
        assert_eq!(u8t.check_value("256"), Err("0..=255".to_string()));
        assert!(u8t.check_value("-1").is_err());
        assert!(PrimitiveType::UInteger { bits: 64 }
            .check_value("18446744073709551615")
            .is_ok());
    }

    #[test]
    fn test_signed_range() {
        let i8t = PrimitiveType::Integer { bits: 8 };
        assert!(i8t.check_value("-128").is_ok());
        assert_eq!(i8t.check_value("128"), Err("-128..=127".to_string()));
    }

    #[test]
    fn test_string_length() {
        let s = PrimitiveType::String {
            length: 3,
            encoding: StringEncoding::Ascii,
        };
        assert!(s.check_value("abc").is_ok());
        assert!(s.check_value("abcd").is_err());
        assert!(s.check_value("\u{e9}").is_err());
    }

    #[test]
    fn test_textual_encoding_is_lossless() {
        let cases = [
            DataTypeRef::Primitive(PrimitiveType::Boolean),
            DataTypeRef::Primitive(PrimitiveType::String {
                length: 32,
                encoding: StringEncoding::Utf8,
            }),
            DataTypeRef::Custom("DT_Status".into()),
            DataTypeRef::Record {
                bit_length: 48,
                subindex_access: true,
            },
            DataTypeRef::Array {
                count: 4,
                element: ArrayElement::Primitive(PrimitiveType::Integer { bits: 16 }),
                subindex_access: false,
            },
            DataTypeRef::Array {
                count: 2,
                element: ArrayElement::Custom("DT_Point".into()),
                subindex_access: true,
            },
        ];
        for case in cases {
            let text = case.to_string();
            assert_eq!(text.parse::<DataTypeRef>(), Ok(case), "{}", text);
        }
        assert_eq!(
            DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 16 }).to_string(),
            "UInteger/16"
        );
    }

    #[test]
    fn test_rejects_malformed_encodings() {
        assert!("UInteger".parse::<DataTypeRef>().is_err());
        assert!("UInteger/16/extra".parse::<DataTypeRef>().is_err());
        assert!("record:8:2".parse::<DataTypeRef>().is_err());
        assert!("custom:".parse::<DataTypeRef>().is_err());
        assert!("array:2:1:custom:".parse::<DataTypeRef>().is_err());
        assert!("Quaternion".parse::<DataTypeRef>().is_err());
    }
}
