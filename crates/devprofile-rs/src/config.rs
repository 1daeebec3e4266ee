// crates/devprofile-rs/src/config.rs

//! Runtime configuration shared by the parsers, the catalog and the
//! fidelity engine.
//!
//! Every section uses `#[serde(default)]`, so a TOML file only needs to name
//! the values it overrides:
//!
//! ```toml
//! [limits]
//! max_depth = 16
//!
//! [languages]
//! fallback_order = ["de", "en"]
//!
//! [weights.categories]
//! parameter = 4.0
//! ```

use crate::error::ConfigError;
use crate::grammar::Grammar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub languages: LanguageConfig,
    pub weights: WeightTable,
    pub export: ExportConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Rejects values that would make parsing or scoring meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_input_bytes == 0 {
            return Err(ConfigError::Invalid("limits.max_input_bytes must be > 0".into()));
        }
        if self.limits.max_depth == 0 {
            return Err(ConfigError::Invalid("limits.max_depth must be > 0".into()));
        }
        if self.limits.max_container_total_bytes == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_container_total_bytes must be > 0".into(),
            ));
        }
        if self.languages.fallback_order.is_empty() {
            return Err(ConfigError::Invalid(
                "languages.fallback_order must name at least one language".into(),
            ));
        }
        let kinds = [
            ("missing", self.weights.missing),
            ("extra", self.weights.extra),
            ("value_changed", self.weights.value_changed),
            ("format_only", self.weights.format_only),
        ];
        for (name, weight) in kinds
            .iter()
            .map(|(n, w)| (n.to_string(), *w))
            .chain(self.weights.categories.iter().map(|(n, w)| (n.clone(), *w)))
        {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight '{}' must be a finite, non-negative number",
                    name
                )));
            }
        }
        if self.storage.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "storage.retry.max_attempts must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// The language used when a text table has to be synthesized.
    pub fn primary_language(&self) -> &str {
        self.languages
            .fallback_order
            .first()
            .map(String::as_str)
            .unwrap_or("en")
    }
}

// --- Limits ---

/// Bounds applied before and during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum size of a single document, in bytes.
    pub max_input_bytes: u64,
    /// Maximum element nesting depth of a markup document.
    pub max_depth: u32,
    /// Maximum number of elements in a markup document.
    pub max_elements: u64,
    /// Maximum number of members in a container archive.
    pub max_container_entries: u32,
    /// How many levels of archives inside archives are followed.
    pub max_container_depth: u32,
    /// Maximum number of uncompressed bytes read from one container,
    /// nested archives included.
    pub max_container_total_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 16 * 1024 * 1024,
            max_depth: 32,
            max_elements: 500_000,
            max_container_entries: 256,
            max_container_depth: 1,
            max_container_total_bytes: 64 * 1024 * 1024,
        }
    }
}

// --- Languages ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Preferred languages for text resolution, most preferred first.
    pub fallback_order: Vec<String>,
    /// Encoding label applied to section-text documents that carry no
    /// byte-order mark and are not valid UTF-8 (e.g. `"windows-1252"`).
    pub section_text_encoding: Option<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            fallback_order: vec!["en".to_string()],
            section_text_encoding: None,
        }
    }
}

// --- Fidelity Weights ---

/// Severity weights used by the fidelity score.
///
/// The weight of a single difference is `category weight × kind weight`.
/// Categories not listed in `categories` weigh `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub missing: f64,
    pub extra: f64,
    pub value_changed: f64,
    pub format_only: f64,
    pub categories: BTreeMap<String, f64>,
}

impl WeightTable {
    pub fn category(&self, name: &str) -> f64 {
        self.categories.get(name).copied().unwrap_or(1.0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        let categories = [
            ("identity", 3.0),
            ("document", 1.0),
            ("parameter", 2.0),
            ("enumeration", 1.0),
            ("constraint", 1.0),
            ("record_item", 3.0),
            ("process_data", 3.0),
            ("error_type", 1.0),
            ("event", 1.0),
            ("communication", 2.0),
            ("features", 1.0),
            ("variant", 1.0),
            ("menu", 1.0),
            ("text", 1.0),
            ("custom_type", 2.0),
            ("wiring", 1.0),
            ("test", 1.0),
            ("opaque_section", 1.0),
            ("extension", 0.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            missing: 1.0,
            extra: 1.0,
            value_changed: 1.0,
            format_only: 0.1,
            categories,
        }
    }
}

// --- Export ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Grammar used by `export` when the caller does not name one.
    /// `None` exports in the grammar the profile was parsed from.
    pub target_grammar: Option<Grammar>,
}

// --- Storage ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite busy handler timeout.
    pub busy_timeout_ms: u64,
    pub retry: RetryPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            retry: RetryPolicy::default(),
        }
    }
}

/// Backoff applied to transient storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = u64::from(self.multiplier.max(1)).saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff_ms.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 25,
            multiplier: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limits.max_input_bytes, 16 * 1024 * 1024);
        assert_eq!(config.limits.max_depth, 32);
        assert_eq!(config.limits.max_container_total_bytes, 64 * 1024 * 1024);
        assert_eq!(config.languages.fallback_order, vec!["en".to_string()]);
        assert_eq!(config.weights.format_only, 0.1);
        assert_eq!(config.weights.category("identity"), 3.0);
        assert_eq!(config.weights.category("unknown"), 1.0);
        assert_eq!(config.export.target_grammar, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = Config::from_toml_str(
            r#"
            [limits]
            max_depth = 8

            [languages]
            fallback_order = ["de", "en"]
            section_text_encoding = "windows-1252"

            [weights.categories]
            parameter = 5.0

            [export]
            target_grammar = "section-text"
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_depth, 8);
        assert_eq!(config.limits.max_elements, 500_000);
        assert_eq!(config.primary_language(), "de");
        assert_eq!(
            config.languages.section_text_encoding.as_deref(),
            Some("windows-1252")
        );
        assert_eq!(config.weights.category("parameter"), 5.0);
        // Overriding the map replaces it wholesale.
        assert_eq!(config.weights.category("identity"), 1.0);
        assert_eq!(config.export.target_grammar, Some(Grammar::SectionText));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = Config::from_toml_str("[weights]\nmissing = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_container_total_limit_from_toml() {
        let config = Config::from_toml_str("[limits]\nmax_container_total_bytes = 4096\n").unwrap();
        assert_eq!(config.limits.max_container_total_bytes, 4096);
        assert_eq!(config.limits.max_container_entries, 256);

        let err = Config::from_toml_str("[limits]\nmax_container_total_bytes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_language_list() {
        let err = Config::from_toml_str("[languages]\nfallback_order = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_retry_backoff_grows() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_ms(1), 25);
        assert_eq!(policy.backoff_ms(2), 50);
        assert_eq!(policy.backoff_ms(3), 100);
    }
}
