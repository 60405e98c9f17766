//! Normalization of the license cost sheet.

use tracing::debug;

use crate::error::DashboardResult;
use crate::models::{LicenseRecord, NormalizationReport, RawTable, RecordSet};
use crate::money::Money;

use super::{NormalizeOptions, ParsedAmounts, ReportBuilder, monetary_columns};

/// Normalizes a license sheet into a record set.
///
/// Only the monthly-cost column is required. Name, description and category
/// default to blank text when their columns are absent. Rows whose cells are
/// all blank are skipped.
///
/// # Errors
///
/// Returns `MissingRequiredColumn` only under the `fatal` policy.
pub fn normalize_licenses(
    table: &RawTable,
    options: &NormalizeOptions,
) -> DashboardResult<(RecordSet<LicenseRecord>, NormalizationReport)> {
    let mut report = ReportBuilder::new("license", options.emit_warnings);
    let columns = &options.license_columns;

    let name = table.find_column(&columns.name);
    let description = table.find_column(&columns.description);
    let category = table.find_column(&columns.category);
    let monthly_cost = table.find_column(&columns.monthly_cost);

    if monthly_cost.is_none() {
        report.missing_required("monthly_cost", options.missing_columns)?;
    }

    let text_fields = [name, description, category];
    let monetary = monetary_columns(table, &options.matcher, &[monthly_cost], &text_fields);
    let amounts = ParsedAmounts::parse(table, &monetary, &mut report);

    let text = |col: Option<usize>, row: usize| {
        col.map(|c| table.cell(row, c).trim().to_string())
            .unwrap_or_default()
    };

    let mut records = RecordSet::new();
    for row in 0..table.rows.len() {
        if table.is_blank_row(row) {
            report.skipped(row, "blank line");
            continue;
        }

        records.push(LicenseRecord {
            name: text(name, row),
            description: text(description, row),
            category: text(category, row),
            monthly_cost: amounts.get(monthly_cost, row).unwrap_or(Money::ZERO),
        });
    }

    let report = report.finish();
    debug!(
        records = records.len(),
        coerced_cells = report.coerced_cells,
        "Normalized license sheet"
    );
    Ok((records, report))
}
