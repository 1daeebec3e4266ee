// crates/devprofile-rs-catalog/src/pqa/mod.rs

//! Fidelity engine: parses an original document and its reconstruction,
//! diffs the two canonical models and grades the result.
//!
//! Both models are first flattened into keyed nodes (`flatten`), then the
//! node sets are matched by path and compared field by field (`diff`).

mod diff;
mod flatten;

use crate::dispatch;
use crate::error::{FidelityEngineError, Side};
use core::fmt;
use core::str::FromStr;
use devprofile_rs::config::Config;
use devprofile_rs::grammar::Grammar;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use diff::diff_profiles;
pub use flatten::{Node, flatten};

/// Kind of a single difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffKind {
    /// Present in the original, absent from the reconstruction.
    Missing,
    /// Absent from the original, present in the reconstruction.
    Extra,
    ValueChanged,
    /// Different spelling of an equal value (`0x0A` vs `10`, `TRUE` vs `true`).
    FormatOnly,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Missing => "Missing",
            DiffKind::Extra => "Extra",
            DiffKind::ValueChanged => "ValueChanged",
            DiffKind::FormatOnly => "FormatOnly",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Missing" => Ok(DiffKind::Missing),
            "Extra" => Ok(DiffKind::Extra),
            "ValueChanged" => Ok(DiffKind::ValueChanged),
            "FormatOnly" => Ok(DiffKind::FormatOnly),
            other => Err(format!("unknown diff kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    /// Weight category of the node (`parameter`, `text`, ...).
    pub category: String,
    /// Field path, e.g. `Parameter[10]/@defaultValue`.
    pub path: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub weight: f64,
}

/// Outcome of one fidelity run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Set once the report belongs to a stored profile.
    pub profile_id: Option<String>,
    /// RFC 3339 timestamp, set when the report is persisted.
    pub run_at: Option<String>,
    pub grammar: Grammar,
    /// 0 to 100; 100 means no differences.
    pub score: f64,
    pub weighted_field_count: f64,
    pub weighted_mismatch: f64,
    pub records: Vec<DiffRecord>,
}

impl QualityReport {
    /// Builds a report, computing the score from the two weighted totals.
    pub fn new(
        grammar: Grammar,
        weighted_field_count: f64,
        weighted_mismatch: f64,
        records: Vec<DiffRecord>,
    ) -> Self {
        let score = if weighted_field_count <= 0.0 {
            100.0
        } else {
            (100.0 * (1.0 - weighted_mismatch / weighted_field_count)).clamp(0.0, 100.0)
        };
        Self {
            profile_id: None,
            run_at: None,
            grammar,
            score,
            weighted_field_count,
            weighted_mismatch,
            records,
        }
    }

    pub fn count(&self, kind: DiffKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

/// Cooperative cancellation flag shared between a caller and a running
/// comparison.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parses both documents with the parser of `grammar` and grades the
/// reconstruction against the original.
pub fn score(
    original: &[u8],
    reconstructed: &[u8],
    grammar: Grammar,
    config: &Config,
    cancel: &CancelToken,
) -> Result<QualityReport, FidelityEngineError> {
    let expected = dispatch::parse(original, grammar, config).map_err(|source| {
        FidelityEngineError::Unparsable {
            side: Side::Original,
            source,
        }
    })?;
    let actual = dispatch::parse(reconstructed, grammar, config).map_err(|source| {
        FidelityEngineError::Unparsable {
            side: Side::Reconstructed,
            source,
        }
    })?;

    let report = diff_profiles(&expected, &actual, grammar, &config.weights, cancel)?;
    debug!(
        "Fidelity {:.2} ({} records, {:.1}/{:.1} weighted)",
        report.score,
        report.records.len(),
        report.weighted_mismatch,
        report.weighted_field_count
    );
    Ok(report)
}
