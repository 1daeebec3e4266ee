// crates/devprofile-rs-catalog/src/pqa/diff.rs

//! Node-by-node comparison of two flattened profiles.

use super::flatten::{Node, flatten};
use super::{CancelToken, DiffKind, DiffRecord, QualityReport};
use crate::error::FidelityEngineError;
use devprofile_rs::config::WeightTable;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::DeviceProfile;
use devprofile_rs::numeric::{parse_bool, parse_float, parse_integer};
use std::collections::HashMap;

/// Diffs `actual` against `expected` and scores the result.
///
/// Nodes are matched by path. A node present on one side only yields one
/// `Missing` or `Extra` record weighing its leaf count; a matched node
/// yields one record per differing field.
pub fn diff_profiles(
    expected: &DeviceProfile,
    actual: &DeviceProfile,
    grammar: Grammar,
    weights: &WeightTable,
    cancel: &CancelToken,
) -> Result<QualityReport, FidelityEngineError> {
    let expected = flatten(expected);
    let actual = flatten(actual);
    let mut unmatched: HashMap<&str, &Node> =
        actual.iter().map(|n| (n.path.as_str(), n)).collect();

    let mut tally = Tally::new(weights);
    for node in &expected {
        if cancel.is_cancelled() {
            return Err(FidelityEngineError::Cancelled);
        }
        match unmatched.remove(node.path.as_str()) {
            Some(other) => tally.compare(node, other),
            None => tally.whole_node(node, DiffKind::Missing),
        }
    }

    // Extra nodes in reconstruction order, for stable reports.
    for node in &actual {
        if cancel.is_cancelled() {
            return Err(FidelityEngineError::Cancelled);
        }
        if unmatched.remove(node.path.as_str()).is_some() {
            tally.whole_node(node, DiffKind::Extra);
        }
    }

    Ok(QualityReport::new(
        grammar,
        tally.field_count,
        tally.mismatch,
        tally.records,
    ))
}

struct Tally<'w> {
    weights: &'w WeightTable,
    field_count: f64,
    mismatch: f64,
    records: Vec<DiffRecord>,
}

impl<'w> Tally<'w> {
    fn new(weights: &'w WeightTable) -> Self {
        Self {
            weights,
            field_count: 0.0,
            mismatch: 0.0,
            records: Vec::new(),
        }
    }

    fn kind_weight(&self, kind: DiffKind) -> f64 {
        match kind {
            DiffKind::Missing => self.weights.missing,
            DiffKind::Extra => self.weights.extra,
            DiffKind::ValueChanged => self.weights.value_changed,
            DiffKind::FormatOnly => self.weights.format_only,
        }
    }

    fn record(
        &mut self,
        node: &Node,
        kind: DiffKind,
        path: String,
        expected: Option<&str>,
        actual: Option<&str>,
        leaves: usize,
    ) {
        let weight = self.weights.category(node.category) * self.kind_weight(kind) * leaves as f64;
        self.mismatch += weight;
        self.records.push(DiffRecord {
            kind,
            category: node.category.to_string(),
            path,
            expected: expected.map(str::to_string),
            actual: actual.map(str::to_string),
            weight,
        });
    }

    fn whole_node(&mut self, node: &Node, kind: DiffKind) {
        let leaves = node.leaf_count();
        self.field_count += self.weights.category(node.category) * leaves as f64;
        let summary = summarize(node);
        let (expected, actual) = match kind {
            DiffKind::Missing => (Some(summary.as_str()), None),
            _ => (None, Some(summary.as_str())),
        };
        self.record(node, kind, node.path.clone(), expected, actual, leaves);
    }

    fn compare(&mut self, expected: &Node, actual: &Node) {
        let category_weight = self.weights.category(expected.category);
        // A node without fields still counts as one matched leaf.
        if expected.fields.is_empty() && actual.fields.is_empty() {
            self.field_count += category_weight;
            return;
        }

        for (name, value) in &expected.fields {
            self.field_count += category_weight;
            let path = format!("{}/@{}", expected.path, name);
            match actual.field(name) {
                Some(other) if other == value.as_str() => {}
                Some(other) => {
                    let kind = if equivalent(value, other) {
                        DiffKind::FormatOnly
                    } else {
                        DiffKind::ValueChanged
                    };
                    self.record(expected, kind, path, Some(value.as_str()), Some(other), 1);
                }
                None => self.record(expected, DiffKind::Missing, path, Some(value.as_str()), None, 1),
            }
        }
        for (name, value) in &actual.fields {
            if expected.field(name).is_none() {
                self.field_count += category_weight;
                let path = format!("{}/@{}", expected.path, name);
                self.record(expected, DiffKind::Extra, path, None, Some(value.as_str()), 1);
            }
        }
    }
}

fn summarize(node: &Node) -> String {
    node.fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// True if two differently spelled values mean the same thing.
fn equivalent(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if let (Some(x), Some(y)) = (parse_integer(a), parse_integer(b)) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (parse_float(a), parse_float(b)) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (parse_bool(a), parse_bool(b)) {
        return x == y;
    }
    collapse_whitespace(a).eq_ignore_ascii_case(&collapse_whitespace(b))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
