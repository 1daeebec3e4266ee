// crates/devprofile-rs/src/error.rs

use core::fmt;

/// Errors raised while turning a source document into a `DeviceProfile`.
///
/// Every variant that concerns a specific value carries the field path of
/// that value (e.g. `VariableCollection/Variable[V_Speed]/@defaultValue`)
/// so that an operator can locate the defect in the original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed syntax: broken XML, an unterminated entry, a non-numeric
    /// numeric field.
    Syntax { location: String, message: String },

    /// The document is well-formed but structured in a way the grammar
    /// forbids (missing mandatory element, duplicate index, overlapping
    /// record items, invalid nesting).
    InvalidStructure { path: String, message: String },

    /// The document declares a schema version whose major is not supported.
    UnsupportedSchemaVersion { found: String },

    /// A text id, datatype id, parameter or menu id does not resolve.
    UnresolvedReference { path: String, id: String },

    /// A numeric or length-constrained value lies outside its permitted range.
    ValueOutOfRange {
        path: String,
        value: String,
        expected: String,
    },

    /// The input bytes could not be decoded with the sniffed or declared encoding.
    Encoding { encoding: String, message: String },

    /// Adversarial or pathological input rejected before significant work.
    ResourceLimitExceeded {
        limit: &'static str,
        max: u64,
        found: u64,
    },
}

impl ParseError {
    pub fn syntax(location: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn structure(path: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::InvalidStructure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unresolved(path: impl Into<String>, id: impl Into<String>) -> Self {
        ParseError::UnresolvedReference {
            path: path.into(),
            id: id.into(),
        }
    }

    pub fn out_of_range(
        path: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ParseError::ValueOutOfRange {
            path: path.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Short, stable identifier of the error kind (used in logs and by the CLI).
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Syntax { .. } => "ParseError",
            ParseError::InvalidStructure { .. } => "ParseError",
            ParseError::UnsupportedSchemaVersion { .. } => "ParseError",
            ParseError::UnresolvedReference { .. } => "UnresolvedReference",
            ParseError::ValueOutOfRange { .. } => "ValueOutOfRange",
            ParseError::Encoding { .. } => "EncodingError",
            ParseError::ResourceLimitExceeded { .. } => "ResourceLimitExceeded",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { location, message } => {
                write!(f, "Syntax error at {}: {}", location, message)
            }
            ParseError::InvalidStructure { path, message } => {
                write!(f, "Invalid structure at {}: {}", path, message)
            }
            ParseError::UnsupportedSchemaVersion { found } => {
                write!(f, "Unsupported schema version: {}", found)
            }
            ParseError::UnresolvedReference { path, id } => {
                write!(f, "Unresolved reference '{}' at {}", id, path)
            }
            ParseError::ValueOutOfRange {
                path,
                value,
                expected,
            } => write!(
                f,
                "Value '{}' at {} is out of range (expected {})",
                value, path, expected
            ),
            ParseError::Encoding { encoding, message } => {
                write!(f, "Encoding error ({}): {}", encoding, message)
            }
            ParseError::ResourceLimitExceeded { limit, max, found } => write!(
                f,
                "Resource limit '{}' exceeded: {} > {}",
                limit, found, max
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while serializing a `DeviceProfile` back into a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    /// The underlying writer or serializer failed.
    Serialize(String),

    /// A mandatory field cannot be expressed in the target grammar
    /// (only reachable for cross-format export).
    Unsupported { field: String, reason: String },
}

impl fmt::Display for ReconstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ReconstructError::Unsupported { field, reason } => {
                write!(f, "Cannot express {} in target grammar: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ReconstructError {}

impl From<fmt::Error> for ReconstructError {
    fn from(e: fmt::Error) -> Self {
        ReconstructError::Serialize(e.to_string())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config I/O error: {}", e),
            ConfigError::Toml(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}
