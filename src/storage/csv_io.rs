//! Delimited-file reading and writing.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::config::{EmployeeColumns, LicenseColumns};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{EmployeeRecord, LicenseRecord, RawTable, RecordSet};
use crate::money::{AmountStyle, Money, format_amount};

/// Field delimiter of a delimited file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// `,`
    #[default]
    Comma,
    /// `;` (spreadsheets in comma-decimal locales)
    Semicolon,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }

    /// Picks the delimiter a header line most likely uses.
    fn sniff(text: &str) -> Self {
        let header = text.lines().next().unwrap_or("");
        if header.matches(';').count() > header.matches(',').count() {
            Delimiter::Semicolon
        } else {
            Delimiter::Comma
        }
    }
}

/// How a record set is rendered as a delimited file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Field delimiter.
    #[serde(default)]
    pub delimiter: Delimiter,
    /// Amount rendering.
    #[serde(default)]
    pub amounts: AmountStyle,
}

impl ExportOptions {
    /// The format data files are persisted in: comma-delimited with currency
    /// amounts, the same shape as the source sheets.
    pub fn persisted() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            amounts: AmountStyle::Currency,
        }
    }
}

/// Reads delimited text into a raw table. The delimiter (`,` or `;`) is
/// taken from the header line; rows may be shorter or longer than the header.
///
/// # Errors
///
/// Returns `Csv` if the text is not well-formed delimited data.
pub fn read_table(text: &str, path: &str) -> DashboardResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(Delimiter::sniff(text).as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let csv_error = |e: csv::Error| DashboardError::Csv {
        path: path.to_string(),
        message: e.to_string(),
    };

    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn write_rows(rows: Vec<Vec<String>>, options: ExportOptions, label: &str) -> DashboardResult<String> {
    let csv_error = |message: String| DashboardError::Csv {
        path: label.to_string(),
        message,
    };

    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter.as_byte())
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(&row).map_err(|e| csv_error(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| csv_error(e.to_string()))
}

/// Period labels used by any record, in order of first appearance.
fn period_labels(records: &RecordSet<EmployeeRecord>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for record in records {
        for cost in &record.period_costs {
            if !labels.iter().any(|l| l.eq_ignore_ascii_case(&cost.period)) {
                labels.push(cost.period.clone());
            }
        }
    }
    labels
}

fn header(aliases: &[String]) -> String {
    aliases.first().cloned().unwrap_or_default()
}

/// Renders employees as a delimited file. Headers are the first alias of
/// each configured column, followed by one column per period in use.
///
/// # Examples
///
/// ```
/// use cost_dashboard::config::EmployeeColumns;
/// use cost_dashboard::models::RecordSet;
/// use cost_dashboard::storage::{write_employees, ExportOptions};
///
/// let text = write_employees(&RecordSet::new(), &EmployeeColumns::default(), ExportOptions::persisted()).unwrap();
/// assert!(text.starts_with("Name,Position,Hiring,"));
/// ```
pub fn write_employees(
    records: &RecordSet<EmployeeRecord>,
    columns: &EmployeeColumns,
    options: ExportOptions,
) -> DashboardResult<String> {
    let periods = period_labels(records);
    let amount = |value: Money| format_amount(value, options.amounts);

    let mut head = vec![
        header(&columns.name),
        header(&columns.position),
        header(&columns.contract_type),
        header(&columns.monthly_salary),
        header(&columns.monthly_total),
        header(&columns.six_month_total),
        header(&columns.annual_total),
    ];
    head.extend(periods.iter().cloned());

    let mut rows = vec![head];
    for record in records {
        let mut row = vec![
            record.name.clone(),
            record.position.clone(),
            record.contract_type.label().to_string(),
            record.monthly_salary.map(amount).unwrap_or_default(),
            amount(record.monthly_total),
            amount(record.six_month_total),
            amount(record.annual_total),
        ];
        row.extend(
            periods
                .iter()
                .map(|p| record.period_cost(p).map(amount).unwrap_or_default()),
        );
        rows.push(row);
    }

    write_rows(rows, options, "employees")
}

/// Renders licenses as a delimited file.
pub fn write_licenses(
    records: &RecordSet<LicenseRecord>,
    columns: &LicenseColumns,
    options: ExportOptions,
) -> DashboardResult<String> {
    let mut rows = vec![vec![
        header(&columns.name),
        header(&columns.description),
        header(&columns.category),
        header(&columns.monthly_cost),
    ]];
    for record in records {
        rows.push(vec![
            record.name.clone(),
            record.description.clone(),
            record.category.clone(),
            format_amount(record.monthly_cost, options.amounts),
        ]);
    }

    write_rows(rows, options, "licenses")
}
