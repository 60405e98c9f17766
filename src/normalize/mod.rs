//! Record normalization for the cost dashboard.
//!
//! This module turns a [`RawTable`] of text cells into typed record sets:
//! monetary columns are parsed with the monetary parser, missing derived
//! fields are filled from the contract rules, and every data-quality problem
//! is recorded in a [`NormalizationReport`] instead of aborting the load.

mod columns;
mod derive;
mod employees;
mod licenses;

use std::collections::HashMap;

use tracing::warn;

use crate::config::{
    ContractMultipliers, DashboardConfig, EmployeeColumns, LicenseColumns, MissingColumnPolicy,
};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{DataWarning, NormalizationReport, RawTable, Severity};
use crate::money::{Money, is_blank_amount, parse_amount};

pub use columns::MonetaryColumnMatcher;
pub use derive::{
    MONTHS_PER_HALF_YEAR, MONTHS_PER_YEAR, NewEmployee, annual_from_monthly, build_new_employee,
    employer_cost, six_month_from_monthly,
};
pub use employees::normalize_employees;
pub use licenses::normalize_licenses;

/// Everything the normalizer needs to know, extracted from the configuration.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Decides which columns are parsed as money.
    pub matcher: MonetaryColumnMatcher,
    /// What to do when a required column is absent.
    pub missing_columns: MissingColumnPolicy,
    /// Whether individual warnings are emitted.
    pub emit_warnings: bool,
    /// Position used when none is given.
    pub placeholder_position: String,
    /// Employer cost multipliers per contract type.
    pub multipliers: ContractMultipliers,
    /// Periods filled when an employee is added.
    pub forecast_periods: Vec<String>,
    /// Employee header aliases.
    pub employee_columns: EmployeeColumns,
    /// License header aliases.
    pub license_columns: LicenseColumns,
}

impl NormalizeOptions {
    /// Returns a copy with a different missing-column policy.
    pub fn with_missing_columns(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_columns = policy;
        self
    }
}

impl From<&DashboardConfig> for NormalizeOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            matcher: MonetaryColumnMatcher::new(
                config.monetary_markers.clone(),
                config.periods.clone(),
            ),
            missing_columns: config.missing_columns,
            emit_warnings: config.emit_warnings,
            placeholder_position: config.placeholder_position.clone(),
            multipliers: config.contracts.clone(),
            forecast_periods: config.forecast_periods.clone(),
            employee_columns: config.columns.employee.clone(),
            license_columns: config.columns.license.clone(),
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

/// Accumulates the report while a table is normalized.
struct ReportBuilder {
    record_kind: &'static str,
    emit: bool,
    report: NormalizationReport,
}

impl ReportBuilder {
    fn new(record_kind: &'static str, emit: bool) -> Self {
        Self {
            record_kind,
            emit,
            report: NormalizationReport::default(),
        }
    }

    fn push(&mut self, code: &str, message: String, severity: Severity) {
        if self.emit {
            warn!(record_kind = self.record_kind, code, "{}", message);
            self.report
                .warnings
                .push(DataWarning::new(code, message, severity));
        }
    }

    fn coerced(&mut self, row: usize, header: &str, raw: &str) {
        self.report.coerced_cells += 1;
        self.push(
            "MALFORMED_AMOUNT",
            format!(
                "Row {}, column '{}': '{}' is not an amount; using 0",
                row + 1,
                header,
                raw
            ),
            Severity::Medium,
        );
    }

    /// Records a derived amount that left the decimal range and was zeroed.
    fn overflowed(&mut self, row: usize, field: &str) {
        self.report.coerced_cells += 1;
        self.push(
            "AMOUNT_OVERFLOW",
            format!("Row {}: derived {} is too large; using 0", row + 1, field),
            Severity::Medium,
        );
    }

    fn skipped(&mut self, row: usize, reason: &str) {
        self.report.skipped_rows += 1;
        self.push(
            "SKIPPED_ROW",
            format!("Row {} skipped: {}", row + 1, reason),
            Severity::Low,
        );
    }

    /// Records a skipped row that still held data.
    fn discarded(&mut self, row: usize, reason: &str) {
        self.report.skipped_rows += 1;
        self.report.discarded_rows += 1;
        self.push(
            "DISCARDED_ROW",
            format!("Row {} has data but was skipped: {}", row + 1, reason),
            Severity::High,
        );
    }

    fn defaulted_contract(&mut self, row: usize, raw: &str) {
        self.report.defaulted_contracts += 1;
        self.push(
            "UNKNOWN_CONTRACT_TYPE",
            format!(
                "Row {}: contract type '{}' is not CLT or PJ; using CLT",
                row + 1,
                raw.trim()
            ),
            Severity::Low,
        );
    }

    /// Applies the missing-column policy to an absent required column.
    fn missing_required(
        &mut self,
        column: &str,
        policy: MissingColumnPolicy,
    ) -> DashboardResult<()> {
        match policy {
            MissingColumnPolicy::Fatal => Err(DashboardError::MissingRequiredColumn {
                record_kind: self.record_kind.to_string(),
                column: column.to_string(),
            }),
            MissingColumnPolicy::Synthesize => {
                self.report.synthesized_columns.push(column.to_string());
                self.push(
                    "MISSING_REQUIRED_COLUMN",
                    format!(
                        "Required {} column '{}' is missing; filled with defaults",
                        self.record_kind, column
                    ),
                    Severity::High,
                );
                Ok(())
            }
        }
    }

    fn finish(self) -> NormalizationReport {
        self.report
    }
}

/// Parsed monetary columns of a table. `None` marks a blank cell.
struct ParsedAmounts {
    columns: HashMap<usize, Vec<Option<Money>>>,
}

impl ParsedAmounts {
    /// Parses every cell of the given columns, coercing malformed cells to
    /// zero and recording each coercion.
    fn parse(table: &RawTable, monetary: &[usize], report: &mut ReportBuilder) -> Self {
        let mut columns = HashMap::new();
        for &col in monetary {
            let header = table.headers.get(col).map(String::as_str).unwrap_or("");
            let cells = (0..table.rows.len())
                .map(|row| {
                    let raw = table.cell(row, col);
                    if is_blank_amount(raw) {
                        return None;
                    }
                    match parse_amount(raw) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            report.coerced(row, header, raw);
                            Some(Money::ZERO)
                        }
                    }
                })
                .collect();
            columns.insert(col, cells);
        }
        Self { columns }
    }

    /// Returns the amount at `row` of `column`; `None` when the column is
    /// absent or the cell is blank.
    fn get(&self, column: Option<usize>, row: usize) -> Option<Money> {
        column
            .and_then(|c| self.columns.get(&c))
            .and_then(|cells| cells.get(row).copied().flatten())
    }
}

/// Columns classified as monetary, excluding those mapped to text fields.
fn monetary_columns(
    table: &RawTable,
    matcher: &MonetaryColumnMatcher,
    money_fields: &[Option<usize>],
    text_fields: &[Option<usize>],
) -> Vec<usize> {
    (0..table.headers.len())
        .filter(|idx| !text_fields.contains(&Some(*idx)))
        .filter(|idx| {
            money_fields.contains(&Some(*idx)) || matcher.is_monetary(&table.headers[*idx])
        })
        .collect()
}

fn blank_to_none(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
