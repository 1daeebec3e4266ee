// crates/devprofile-rs/src/model/parameter.rs

use super::datatype::DataTypeRef;
use super::record::RecordLayout;
use super::text::TextRef;
use core::fmt;
use core::str::FromStr;

/// Access rights of a parameter or record item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessRights {
    ReadOnly,
    WriteOnly,
    #[default]
    ReadWrite,
}

impl AccessRights {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRights::ReadOnly => "ro",
            AccessRights::WriteOnly => "wo",
            AccessRights::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessRights {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ro" => Ok(AccessRights::ReadOnly),
            "wo" => Ok(AccessRights::WriteOnly),
            "rw" => Ok(AccessRights::ReadWrite),
            other => Err(format!("unknown access rights '{}'", other)),
        }
    }
}

bitflags::bitflags! {
    /// Grammar-specific boolean properties of a parameter.
    ///
    /// The low twelve bits mirror the section-text descriptor word (bit 4,
    /// read-only, is carried by `AccessRights` instead). Unknown descriptor
    /// bits are retained so that the descriptor can be written back as read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParameterFlags: u16 {
        const SETTABLE_PATH = 1 << 0;
        const ENUMERATED = 1 << 1;
        const SCALING = 1 << 2;
        const SCALING_LINKS = 1 << 3;
        const MONITOR = 1 << 5;
        const EXTENDED_PRECISION = 1 << 6;

        const DYNAMIC = 1 << 12;
        const EXCLUDED_FROM_DATA_STORAGE = 1 << 13;
        const MODIFIES_OTHER_VARIABLES = 1 << 14;
    }
}

impl ParameterFlags {
    /// Bits that belong to the section-text descriptor word.
    pub const DESCRIPTOR_MASK: u16 = 0x0FFF;
}

impl Default for ParameterFlags {
    fn default() -> Self {
        ParameterFlags::empty()
    }
}

/// A named value of an enumerated parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationValue {
    /// Raw value as written in the source.
    pub value: String,
    pub name: TextRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    ValueRange {
        lower: String,
        upper: String,
        name: Option<TextRef>,
    },
}

/// Overrides for one member of a record-typed parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordItemInfo {
    pub subindex: u8,
    pub default: Option<String>,
    pub modifies_other_variables: Option<bool>,
    pub excluded_from_data_storage: Option<bool>,
}

/// A device parameter (markup: `Variable`, section text: `ParamN`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    pub id: String,
    pub index: u16,
    pub subindex: Option<u8>,
    pub name: TextRef,
    pub description: Option<TextRef>,
    pub data_type: DataTypeRef,
    pub access: AccessRights,
    pub default: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub unit: Option<String>,
    pub flags: ParameterFlags,
    pub decimal_places: Option<u8>,
    /// Scaling multiplier, divisor, base, offset and the four scaling links,
    /// kept as the comma-joined source fields.
    pub scaling: Option<String>,
    /// Link size and link path, kept as the comma-joined source fields.
    pub link_path: Option<String>,
    pub enumeration: Vec<EnumerationValue>,
    pub constraints: Vec<Constraint>,
    /// Members of a record-typed parameter.
    pub record_items: RecordLayout,
    /// Member overrides, in source order.
    pub record_item_info: Vec<RecordItemInfo>,
}

/// Reference to a variable predefined by the communication standard
/// (vendor name, serial number, ...). Only overrides are stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandardVariableRef {
    pub id: String,
    pub default_value: Option<String>,
    pub fixed_length_restriction: Option<u16>,
    pub excluded_from_data_storage: Option<bool>,
}
