//! Data-quality reporting for loaded record sets.
//!
//! The normalizer never fails on bad data alone. Instead it coerces the value
//! and records what it did in a [`NormalizationReport`] so the operator can be
//! warned.

use serde::{Deserialize, Serialize};

/// How much attention a warning deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; a default was applied.
    Low,
    /// A value was replaced (e.g. coerced to zero).
    Medium,
    /// A whole column was missing and synthesized.
    High,
}

/// A warning generated while loading or normalizing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataWarning {
    /// A code identifying the type of warning (e.g. "MALFORMED_AMOUNT").
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl DataWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Tally of the data-quality issues found while normalizing a table.
///
/// Counters are always kept. The `warnings` list is only filled when warning
/// emission is enabled in the configuration.
///
/// # Example
///
/// ```
/// use cost_dashboard::models::NormalizationReport;
///
/// let report = NormalizationReport::default();
/// assert!(report.is_clean());
/// assert_eq!(report.issue_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Monetary cells that failed to parse and were coerced to zero.
    pub coerced_cells: usize,
    /// Logical columns that were missing and synthesized with defaults.
    pub synthesized_columns: Vec<String>,
    /// Rows dropped because they had no name.
    pub skipped_rows: usize,
    /// Skipped rows that still held data in some cell. Rewriting the file
    /// would lose them, so commits are refused while this is non-zero.
    #[serde(default)]
    pub discarded_rows: usize,
    /// Contract type labels that were not recognized and defaulted.
    pub defaulted_contracts: usize,
    /// Individual warnings, in the order they were raised.
    pub warnings: Vec<DataWarning>,
}

impl NormalizationReport {
    /// Returns the total number of issues recorded.
    pub fn issue_count(&self) -> usize {
        self.coerced_cells
            + self.synthesized_columns.len()
            + self.skipped_rows
            + self.defaulted_contracts
    }

    /// Returns true if no issue was recorded.
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    /// Returns true if rewriting the source file from the normalized records
    /// would drop content: rows skipped with data still in them, or a
    /// synthesized name column.
    pub fn is_lossy(&self) -> bool {
        self.discarded_rows > 0 || self.synthesized_columns.iter().any(|c| c == "name")
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: NormalizationReport) {
        self.coerced_cells += other.coerced_cells;
        self.synthesized_columns.extend(other.synthesized_columns);
        self.skipped_rows += other.skipped_rows;
        self.discarded_rows += other.discarded_rows;
        self.defaulted_contracts += other.defaulted_contracts;
        self.warnings.extend(other.warnings);
    }
}
