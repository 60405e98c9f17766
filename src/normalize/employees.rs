//! Normalization of the employee cost sheet.

use tracing::debug;

use crate::error::DashboardResult;
use crate::models::{
    ContractType, EmployeeRecord, NormalizationReport, PeriodCost, RawTable, RecordSet,
};
use crate::money::Money;

use super::derive::{annual_from_monthly, employer_cost, six_month_from_monthly};
use super::{NormalizeOptions, ParsedAmounts, ReportBuilder, blank_to_none, monetary_columns};

/// Column positions of each employee field in a particular table.
struct EmployeeLayout {
    name: Option<usize>,
    position: Option<usize>,
    contract_type: Option<usize>,
    monthly_salary: Option<usize>,
    monthly_total: Option<usize>,
    six_month_total: Option<usize>,
    annual_total: Option<usize>,
    periods: Vec<(String, usize)>,
}

impl EmployeeLayout {
    fn resolve(table: &RawTable, options: &NormalizeOptions) -> Self {
        let columns = &options.employee_columns;
        Self {
            name: table.find_column(&columns.name),
            position: table.find_column(&columns.position),
            contract_type: table.find_column(&columns.contract_type),
            monthly_salary: table.find_column(&columns.monthly_salary),
            monthly_total: table.find_column(&columns.monthly_total),
            six_month_total: table.find_column(&columns.six_month_total),
            annual_total: table.find_column(&columns.annual_total),
            periods: options.matcher.period_columns(table),
        }
    }
}

/// Normalizes an employee sheet into a record set.
///
/// The name and monthly-total columns are required; when either is absent
/// the configured [`MissingColumnPolicy`](crate::config::MissingColumnPolicy)
/// decides between failing and synthesizing it (blank names, zero totals).
/// Rows without a name are skipped; a skipped row with data in any other
/// cell is also counted in `discarded_rows`.
///
/// Field rules, applied per row:
/// - position: placeholder when absent or blank
/// - contract type: CLT when absent or blank; unrecognized labels also
///   default to CLT with a warning
/// - monthly total: the cell; when the cell is blank and a salary is
///   present, salary times the contract multiplier
/// - six-month and annual totals: the cell, or 6 and 12 monthly totals
/// - a derived amount too large for a decimal is zero and counted as a
///   coerced cell
/// - period costs: one entry per period column, blank cells as zero
///
/// # Errors
///
/// Returns `MissingRequiredColumn` only under the `fatal` policy.
///
/// # Examples
///
/// ```
/// use cost_dashboard::models::RawTable;
/// use cost_dashboard::money::Money;
/// use cost_dashboard::normalize::{normalize_employees, NormalizeOptions};
///
/// let table = RawTable::new(
///     vec!["Name".into(), "Position".into(), "Total Cost (month)".into()],
///     vec![vec!["Ana".into(), "".into(), "R$ 2.800,00".into()]],
/// );
/// let (records, report) = normalize_employees(&table, &NormalizeOptions::default()).unwrap();
/// let ana = records.get(0).unwrap();
/// assert_eq!(ana.position, "Not informed");
/// assert_eq!(ana.annual_total, Money::from(33600));
/// assert!(report.is_clean());
/// ```
pub fn normalize_employees(
    table: &RawTable,
    options: &NormalizeOptions,
) -> DashboardResult<(RecordSet<EmployeeRecord>, NormalizationReport)> {
    let mut report = ReportBuilder::new("employee", options.emit_warnings);
    let layout = EmployeeLayout::resolve(table, options);

    if layout.name.is_none() {
        report.missing_required("name", options.missing_columns)?;
    }
    if layout.monthly_total.is_none() {
        report.missing_required("monthly_total", options.missing_columns)?;
    }

    let mut money_fields = vec![
        layout.monthly_salary,
        layout.monthly_total,
        layout.six_month_total,
        layout.annual_total,
    ];
    money_fields.extend(layout.periods.iter().map(|(_, idx)| Some(*idx)));
    let text_fields = [layout.name, layout.position, layout.contract_type];
    let monetary = monetary_columns(table, &options.matcher, &money_fields, &text_fields);
    let amounts = ParsedAmounts::parse(table, &monetary, &mut report);

    let mut records = RecordSet::new();
    for row in 0..table.rows.len() {
        let Some(name) = layout.name.and_then(|c| blank_to_none(table.cell(row, c))) else {
            if table.is_blank_row(row) {
                report.skipped(row, "blank line");
            } else {
                report.discarded(row, "no name");
            }
            continue;
        };

        let position = layout
            .position
            .and_then(|c| blank_to_none(table.cell(row, c)))
            .map(str::to_string)
            .unwrap_or_else(|| options.placeholder_position.clone());

        let contract_type = match layout.contract_type.and_then(|c| blank_to_none(table.cell(row, c))) {
            None => ContractType::default(),
            Some(label) => ContractType::from_label(label).unwrap_or_else(|| {
                report.defaulted_contract(row, label);
                ContractType::default()
            }),
        };

        let monthly_salary = amounts.get(layout.monthly_salary, row);
        let monthly_total = match amounts.get(layout.monthly_total, row) {
            Some(value) => value,
            None => match layout.monthly_total.and(monthly_salary) {
                Some(salary) => employer_cost(salary, contract_type, &options.multipliers)
                    .unwrap_or_else(|| {
                        report.overflowed(row, "monthly_total");
                        Money::ZERO
                    }),
                None => Money::ZERO,
            },
        };

        let six_month_total = amounts.get(layout.six_month_total, row).unwrap_or_else(|| {
            six_month_from_monthly(monthly_total).unwrap_or_else(|| {
                report.overflowed(row, "six_month_total");
                Money::ZERO
            })
        });
        let annual_total = amounts.get(layout.annual_total, row).unwrap_or_else(|| {
            annual_from_monthly(monthly_total).unwrap_or_else(|| {
                report.overflowed(row, "annual_total");
                Money::ZERO
            })
        });

        let period_costs = layout
            .periods
            .iter()
            .map(|(label, col)| PeriodCost {
                period: label.clone(),
                cost: amounts.get(Some(*col), row).unwrap_or(Money::ZERO),
            })
            .collect();

        records.push(EmployeeRecord {
            name: name.to_string(),
            position,
            contract_type,
            monthly_salary,
            monthly_total,
            six_month_total,
            annual_total,
            period_costs,
        });
    }

    let report = report.finish();
    debug!(
        records = records.len(),
        coerced_cells = report.coerced_cells,
        skipped_rows = report.skipped_rows,
        "Normalized employee sheet"
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingColumnPolicy;
    use crate::error::DashboardError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn full_sheet() -> RawTable {
        table(
            &[
                "Name",
                "Position",
                "Hiring",
                "Salary (month)",
                "Total Cost (month)",
                "Total Cost CLT (12 months)",
                "Jul",
                "Aug",
                "Total Cost CLT (6 months)",
            ],
            &[
                &[
                    "Ana Souza",
                    "Engineer",
                    "CLT",
                    "R$ 1.000,00",
                    "R$ 2.800,00",
                    "R$ 33.600,00",
                    "R$ 2.800,00",
                    "R$ 2.800,00",
                    "R$ 16.800,00",
                ],
                &[
                    "Bruno Lima",
                    "Designer",
                    "PJ",
                    "R$ 9.000,00",
                    "R$ 9.000,00",
                    "R$ 108.000,00",
                    "-",
                    "R$ 9.000,00",
                    "R$ 54.000,00",
                ],
            ],
        )
    }

    /// RN-001: complete sheet parses exactly
    #[test]
    fn test_full_sheet_parses_every_field() {
        let (records, report) =
            normalize_employees(&full_sheet(), &NormalizeOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert!(report.is_clean(), "unexpected issues: {:?}", report);

        let ana = records.get(0).unwrap();
        assert_eq!(ana.name, "Ana Souza");
        assert_eq!(ana.contract_type, ContractType::Clt);
        assert_eq!(ana.monthly_salary, Some(money("1000")));
        assert_eq!(ana.monthly_total, money("2800"));
        assert_eq!(ana.six_month_total, money("16800"));
        assert_eq!(ana.annual_total, money("33600"));
        assert_eq!(ana.period_cost("Jul"), Some(money("2800")));

        let bruno = records.get(1).unwrap();
        assert_eq!(bruno.contract_type, ContractType::Pj);
        assert_eq!(bruno.period_cost("Jul"), Some(Money::ZERO));
        assert_eq!(bruno.period_cost("Aug"), Some(money("9000")));
    }

    /// RN-002: absent derived columns are computed from the monthly total
    #[test]
    fn test_absent_totals_are_derived() {
        let sheet = table(&["Nome", "Total Cost (month)"], &[&["Ana", "2.800,00"]]);
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();

        let ana = records.get(0).unwrap();
        assert_eq!(ana.six_month_total, money("16800"));
        assert_eq!(ana.annual_total, money("33600"));
        assert_eq!(ana.contract_type, ContractType::Clt);
        assert_eq!(ana.position, "Not informed");
        assert!(ana.period_costs.is_empty());
        assert!(report.is_clean());
    }

    /// RN-003: explicit totals are never overwritten
    #[test]
    fn test_explicit_annual_total_is_not_overwritten() {
        let sheet = table(
            &["Name", "Total Cost (month)", "Total Cost CLT (12 months)"],
            &[&["Ana", "R$ 2.800,00", "R$ 30.000,00"]],
        );
        let (records, _) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert_eq!(records.get(0).unwrap().annual_total, money("30000"));
    }

    /// RN-004: blank monthly cell with salary is derived from the contract
    #[test]
    fn test_blank_monthly_total_derived_from_salary() {
        let sheet = table(
            &["Name", "Hiring", "Salary (month)", "Total Cost (month)"],
            &[&["Ana", "CLT", "R$ 1.000,00", ""], &["Bia", "PJ", "R$ 5.000,00", "-"]],
        );
        let (records, _) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert_eq!(records.get(0).unwrap().monthly_total, money("2800"));
        assert_eq!(records.get(1).unwrap().monthly_total, money("5000"));
        assert_eq!(records.get(0).unwrap().annual_total, money("33600"));
    }

    /// RN-005: malformed cells are coerced and counted
    #[test]
    fn test_malformed_cells_are_coerced_and_counted() {
        let sheet = table(
            &["Name", "Total Cost (month)", "Jul"],
            &[&["Ana", "R$ 2.8O0,00", "abc"], &["Bia", "R$ 1.000,00", "R$ 1.000,00"]],
        );
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records.get(0).unwrap().monthly_total, Money::ZERO);
        assert_eq!(records.get(0).unwrap().period_cost("Jul"), Some(Money::ZERO));
        assert_eq!(report.coerced_cells, 2);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(|w| w.code == "MALFORMED_AMOUNT"));
        assert!(report.warnings[0].message.contains("Total Cost (month)"));
    }

    /// RN-006: missing monthly column is synthesized under the recoverable policy
    #[test]
    fn test_missing_monthly_column_synthesized() {
        let sheet = table(&["Name", "Position"], &[&["Ana", "Engineer"], &["Bia", "QA"]]);
        let options = NormalizeOptions::default().with_missing_columns(MissingColumnPolicy::Synthesize);
        let (records, report) = normalize_employees(&sheet, &options).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.monthly_total == Money::ZERO));
        assert!(records.iter().all(|r| r.annual_total == Money::ZERO));
        assert_eq!(report.synthesized_columns, vec!["monthly_total".to_string()]);
        assert!(report.issue_count() >= 1);
        assert!(report.warnings.iter().any(|w| w.code == "MISSING_REQUIRED_COLUMN"));
    }

    /// RN-007: missing monthly column fails under the fatal policy
    #[test]
    fn test_missing_monthly_column_fatal() {
        let sheet = table(&["Name", "Position"], &[&["Ana", "Engineer"]]);
        let options = NormalizeOptions::default().with_missing_columns(MissingColumnPolicy::Fatal);

        match normalize_employees(&sheet, &options) {
            Err(DashboardError::MissingRequiredColumn { record_kind, column }) => {
                assert_eq!(record_kind, "employee");
                assert_eq!(column, "monthly_total");
            }
            other => panic!("Expected MissingRequiredColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_monthly_total_zeroes_derived_totals() {
        let sheet = table(
            &["Name", "Total Cost (month)"],
            &[&["Ana", "10000000000000000000000000000"], &["Bia", "R$ 100,00"]],
        );
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();

        let ana = records.get(0).unwrap();
        assert_eq!(ana.monthly_total, money("10000000000000000000000000000"));
        assert_eq!(ana.six_month_total, money("60000000000000000000000000000"));
        assert_eq!(ana.annual_total, Money::ZERO);
        assert_eq!(records.get(1).unwrap().annual_total, money("1200"));
        assert_eq!(report.coerced_cells, 1);
        assert_eq!(report.warnings[0].code, "AMOUNT_OVERFLOW");
        assert!(report.warnings[0].message.contains("annual_total"));
    }

    #[test]
    fn test_oversized_salary_zeroes_monthly_total() {
        let sheet = table(
            &["Name", "Hiring", "Salary (month)", "Total Cost (month)"],
            &[&["Ana", "CLT", "30000000000000000000000000000", ""]],
        );
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();

        let ana = records.get(0).unwrap();
        assert_eq!(ana.monthly_total, Money::ZERO);
        assert_eq!(ana.annual_total, Money::ZERO);
        assert_eq!(report.coerced_cells, 1);
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let sheet = table(
            &["Name", "Total Cost (month)"],
            &[&["Ana", "R$ 100,00"], &["", "R$ 100,00"], &["  ", ""]],
        );
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.skipped_rows, 2);
        assert_eq!(report.discarded_rows, 1);
        assert!(report.is_lossy());
    }

    #[test]
    fn test_missing_name_column_discards_every_row() {
        let sheet = table(
            &["Full Name", "Total Cost (month)"],
            &[&["Ana", "R$ 100,00"], &["Bia", "R$ 200,00"]],
        );
        let options = NormalizeOptions::default().with_missing_columns(MissingColumnPolicy::Synthesize);
        let (records, report) = normalize_employees(&sheet, &options).unwrap();
        assert!(records.is_empty());
        assert_eq!(report.discarded_rows, 2);
        assert!(report.is_lossy());
    }

    #[test]
    fn test_unknown_contract_defaults_to_clt_with_warning() {
        let sheet = table(
            &["Name", "Hiring", "Total Cost (month)"],
            &[&["Ana", "Estágio", "R$ 100,00"], &["Bia", "", "R$ 100,00"]],
        );
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert!(records.iter().all(|r| r.contract_type == ContractType::Clt));
        assert_eq!(report.defaulted_contracts, 1);
        assert_eq!(report.warnings[0].code, "UNKNOWN_CONTRACT_TYPE");
    }

    #[test]
    fn test_silenced_warnings_keep_counts() {
        let sheet = table(&["Name", "Total Cost (month)"], &[&["Ana", "n/a"]]);
        let mut options = NormalizeOptions::default();
        options.emit_warnings = false;
        let (_, report) = normalize_employees(&sheet, &options).unwrap();
        assert_eq!(report.coerced_cells, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_extra_monetary_columns_are_checked() {
        let sheet = table(
            &["Name", "Total Cost (month)", "Bonus cost"],
            &[&["Ana", "R$ 100,00", "???"]],
        );
        let (_, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert_eq!(report.coerced_cells, 1);
    }

    #[test]
    fn test_text_columns_are_never_parsed_as_money() {
        let mut options = NormalizeOptions::default();
        options.employee_columns.position = vec!["Cost center".to_string()];
        let sheet = table(
            &["Name", "Cost center", "Total Cost (month)"],
            &[&["Ana", "R&D", "R$ 100,00"]],
        );
        let (records, report) = normalize_employees(&sheet, &options).unwrap();
        assert_eq!(records.get(0).unwrap().position, "R&D");
        assert!(report.is_clean());
    }

    #[test]
    fn test_header_spacing_and_case_are_ignored() {
        let sheet = table(&["  name ", " TOTAL COST (MONTH) "], &[&["Ana", "R$ 10,00"]]);
        let (records, report) = normalize_employees(&sheet, &NormalizeOptions::default()).unwrap();
        assert_eq!(records.get(0).unwrap().monthly_total, money("10"));
        assert!(report.is_clean());
    }
}
