//! The dashboard service.
//!
//! [`DataStore`] owns the two data file paths and their parse caches. Every
//! operator interaction is one complete unit of work: load the current file,
//! run a pure command on the record set, write the result back atomically.
//! [`DashboardView`] is what the presentation layer renders.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::commands::{EmployeeCommand, LicenseCommand, apply_employee_command, apply_license_command};
use crate::config::DashboardConfig;
use crate::engine::{
    CostPoint, DashboardTotals, FilterCriteria, apply, cost_per_employee, cost_per_period,
    license_cost_per_category, summarize,
};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    DataWarning, EmployeeRecord, LicenseRecord, NormalizationReport, RawTable, RecordSet,
};
use crate::normalize::{NormalizeOptions, normalize_employees, normalize_licenses};
use crate::storage::{
    ExportOptions, ParseCache, SourceEncoding, decode, read_source, read_table, write_atomically,
    write_employees, write_licenses,
};

/// A record set as loaded from its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loaded<T> {
    /// The normalized records.
    pub records: RecordSet<T>,
    /// Data-quality issues found while normalizing.
    pub report: NormalizationReport,
    /// The encoding the file was decoded with.
    pub encoding: SourceEncoding,
}

/// Everything the dashboard shows for one set of filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Employees passing the filters.
    pub employees: RecordSet<EmployeeRecord>,
    /// Every license; the filters select employees only.
    pub licenses: RecordSet<LicenseRecord>,
    /// Totals over the filtered employees and all licenses.
    pub totals: DashboardTotals,
    /// Monthly cost per filtered employee.
    pub cost_per_employee: Vec<CostPoint>,
    /// Team cost per selected period.
    pub cost_per_period: Vec<CostPoint>,
    /// License cost per category.
    pub license_cost_per_category: Vec<CostPoint>,
    /// Warnings from loading both files.
    pub warnings: Vec<DataWarning>,
}

/// The flat-file data store behind the dashboard.
///
/// Holds no records between calls; each operation reads the file, and the
/// parse cache makes unchanged files cheap to re-read.
pub struct DataStore {
    config: DashboardConfig,
    options: NormalizeOptions,
    employee_cache: ParseCache<Loaded<EmployeeRecord>>,
    license_cache: ParseCache<Loaded<LicenseRecord>>,
}

impl DataStore {
    /// Creates a store for the files named in the configuration.
    pub fn new(config: DashboardConfig) -> Self {
        let options = NormalizeOptions::from(&config);
        Self {
            config,
            options,
            employee_cache: ParseCache::new(),
            license_cache: ParseCache::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Returns the normalizer options derived from the configuration.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    fn employees_path(&self) -> PathBuf {
        self.config.data.employees.clone()
    }

    fn licenses_path(&self) -> PathBuf {
        self.config.data.licenses.clone()
    }

    /// Loads and normalizes the employee file.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the file does not exist
    /// - `DecodeError`, `Csv` or `MissingRequiredColumn` (under the fatal
    ///   policy) if it cannot be read
    pub fn load_employees(&mut self) -> DashboardResult<Loaded<EmployeeRecord>> {
        let path = self.employees_path();
        let bytes = read_source(&path)?;
        let options = &self.options;
        self.employee_cache.get_or_parse(&path, &bytes, || {
            let (table, encoding) = parse_table(&path, &bytes)?;
            let (records, report) = normalize_employees(&table, options)?;
            log_load("employee", &path, records.len(), &report);
            Ok(Loaded {
                records,
                report,
                encoding,
            })
        })
    }

    /// Loads and normalizes the license file. A missing file is created with
    /// only a header row and yields an empty set.
    ///
    /// # Errors
    ///
    /// Same as [`DataStore::load_employees`], except for `FileNotFound`.
    pub fn load_licenses(&mut self) -> DashboardResult<Loaded<LicenseRecord>> {
        let path = self.licenses_path();
        let bytes = match read_source(&path) {
            Ok(bytes) => bytes,
            Err(DashboardError::FileNotFound { .. }) => {
                warn!(path = %path.display(), "License file not found; creating an empty one");
                self.commit_licenses(&RecordSet::new())?;
                return Ok(Loaded {
                    records: RecordSet::new(),
                    report: NormalizationReport::default(),
                    encoding: SourceEncoding::Utf8,
                });
            }
            Err(e) => return Err(e),
        };
        let options = &self.options;
        self.license_cache.get_or_parse(&path, &bytes, || {
            let (table, encoding) = parse_table(&path, &bytes)?;
            let (records, report) = normalize_licenses(&table, options)?;
            log_load("license", &path, records.len(), &report);
            Ok(Loaded {
                records,
                report,
                encoding,
            })
        })
    }

    /// Replaces the employee file with the given set.
    pub fn commit_employees(&mut self, records: &RecordSet<EmployeeRecord>) -> DashboardResult<()> {
        let path = self.employees_path();
        let text = write_employees(records, &self.config.columns.employee, ExportOptions::persisted())?;
        write_atomically(&path, text.as_bytes())?;
        self.employee_cache.invalidate(&path);
        info!(path = %path.display(), records = records.len(), "Employees committed");
        Ok(())
    }

    /// Replaces the license file with the given set.
    pub fn commit_licenses(&mut self, records: &RecordSet<LicenseRecord>) -> DashboardResult<()> {
        let path = self.licenses_path();
        let text = write_licenses(records, &self.config.columns.license, ExportOptions::persisted())?;
        write_atomically(&path, text.as_bytes())?;
        self.license_cache.invalidate(&path);
        info!(path = %path.display(), records = records.len(), "Licenses committed");
        Ok(())
    }

    /// Loads the employees, applies a command and persists the result.
    /// Nothing is written when the command fails.
    ///
    /// # Errors
    ///
    /// Returns `LossyCommit` without running the command when the loaded
    /// file holds rows the normalizer had to drop.
    pub fn run_employee_command(
        &mut self,
        command: EmployeeCommand,
    ) -> DashboardResult<RecordSet<EmployeeRecord>> {
        let loaded = self.load_employees()?;
        guard_commit("employee", &loaded.report)?;
        let records = apply_employee_command(loaded.records, command, &self.options)?;
        self.commit_employees(&records)?;
        Ok(records)
    }

    /// Loads the licenses, applies a command and persists the result.
    /// Nothing is written when the command fails.
    pub fn run_license_command(
        &mut self,
        command: LicenseCommand,
    ) -> DashboardResult<RecordSet<LicenseRecord>> {
        let loaded = self.load_licenses()?;
        guard_commit("license", &loaded.report)?;
        let records = apply_license_command(loaded.records, command)?;
        self.commit_licenses(&records)?;
        Ok(records)
    }

    /// Builds the dashboard for the given filters.
    ///
    /// The criteria select employees; licenses are always shown in full, so
    /// the grand total keeps the whole license cost. The period series
    /// follows the configured period order, restricted to the selected
    /// periods when a period filter is set.
    ///
    /// # Errors
    ///
    /// Load errors, or `AmountOverflow` when a total leaves the decimal range.
    pub fn view(&mut self, criteria: &FilterCriteria) -> DashboardResult<DashboardView> {
        let employees = self.load_employees()?;
        let licenses = self.load_licenses()?;

        let filtered_employees = apply(&employees.records, criteria);

        let periods: Vec<String> = self
            .config
            .periods
            .iter()
            .filter(|p| {
                criteria
                    .periods
                    .as_ref()
                    .is_none_or(|selected| selected.iter().any(|s| s.eq_ignore_ascii_case(p)))
            })
            .cloned()
            .collect();

        let mut warnings = employees.report.warnings;
        warnings.extend(licenses.report.warnings);

        Ok(DashboardView {
            totals: summarize(&filtered_employees, &licenses.records)?,
            cost_per_employee: cost_per_employee(&filtered_employees),
            cost_per_period: cost_per_period(&filtered_employees, &periods)?,
            license_cost_per_category: license_cost_per_category(&licenses.records)?,
            employees: filtered_employees,
            licenses: licenses.records,
            warnings,
        })
    }

    /// Renders the full employee set for download.
    pub fn export_employees(&mut self, options: ExportOptions) -> DashboardResult<String> {
        let loaded = self.load_employees()?;
        write_employees(&loaded.records, &self.config.columns.employee, options)
    }

    /// Renders the full license set for download.
    pub fn export_licenses(&mut self, options: ExportOptions) -> DashboardResult<String> {
        let loaded = self.load_licenses()?;
        write_licenses(&loaded.records, &self.config.columns.license, options)
    }
}

fn parse_table(path: &Path, bytes: &[u8]) -> DashboardResult<(RawTable, SourceEncoding)> {
    let label = path.display().to_string();
    let (text, encoding) = decode(bytes, &label)?;
    Ok((read_table(&text, &label)?, encoding))
}

/// Refuses to rewrite a file whose load dropped data; warns when the rewrite
/// will persist coerced zeros.
fn guard_commit(record_kind: &str, report: &NormalizationReport) -> DashboardResult<()> {
    if report.is_lossy() {
        let reason = if report.discarded_rows > 0 {
            format!("{} rows with data but no name would be dropped", report.discarded_rows)
        } else {
            "the name column is missing".to_string()
        };
        warn!(record_kind, %reason, "Commit refused");
        return Err(DashboardError::LossyCommit {
            record_kind: record_kind.to_string(),
            reason,
        });
    }
    if report.coerced_cells > 0 {
        warn!(
            record_kind,
            coerced_cells = report.coerced_cells,
            "Committing coerced cells as zero"
        );
    }
    Ok(())
}

fn log_load(record_kind: &str, path: &Path, records: usize, report: &NormalizationReport) {
    info!(
        record_kind,
        path = %path.display(),
        records,
        coerced_cells = report.coerced_cells,
        skipped_rows = report.skipped_rows,
        discarded_rows = report.discarded_rows,
        "File loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    use crate::config::DataFiles;
    use crate::models::ContractType;
    use crate::money::Money;
    use crate::normalize::NewEmployee;

    const EMPLOYEES: &str = "Name,Position,Hiring,Salary (month),Total Cost (month),Total Cost CLT (6 months),Total Cost CLT (12 months),Jul,Aug\n\
Ana Souza,Engineer,CLT,\"R$ 1.000,00\",\"R$ 2.800,00\",\"R$ 16.800,00\",\"R$ 33.600,00\",\"R$ 2.800,00\",\"R$ 2.800,00\"\n\
Bruno Lima,Designer,PJ,\"R$ 5.000,00\",\"R$ 5.000,00\",,,\"R$ 5.000,00\",-\n";

    fn store(dir: &Path) -> DataStore {
        fs::write(dir.join("employees.csv"), EMPLOYEES).unwrap();
        let config = DashboardConfig {
            data: DataFiles {
                employees: dir.join("employees.csv"),
                licenses: dir.join("licenses.csv"),
            },
            ..Default::default()
        };
        DataStore::new(config)
    }

    #[test]
    fn test_load_employees() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let loaded = store.load_employees().unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.encoding, SourceEncoding::Utf8);
        let bruno = loaded.records.get(1).unwrap();
        assert_eq!(bruno.contract_type, ContractType::Pj);
        assert_eq!(bruno.annual_total, Money::from(60000));
    }

    #[test]
    fn test_missing_employee_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        fs::remove_file(dir.path().join("employees.csv")).unwrap();
        assert!(matches!(
            store.load_employees(),
            Err(DashboardError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_license_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let loaded = store.load_licenses().unwrap();
        assert!(loaded.records.is_empty());
        let written = fs::read_to_string(dir.path().join("licenses.csv")).unwrap();
        assert_eq!(written, "Name,Description,Category,Monthly Cost\r\n");
    }

    #[test]
    fn test_command_is_persisted_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        store
            .run_employee_command(EmployeeCommand::Add(NewEmployee {
                name: "Carla Dias".to_string(),
                position: None,
                contract_type: Some(ContractType::Clt),
                monthly_salary: Money::from(1000),
                annual_total: None,
            }))
            .unwrap();

        let reloaded = store.load_employees().unwrap();
        assert_eq!(reloaded.records.len(), 3);
        let carla = reloaded.records.get(2).unwrap();
        assert_eq!(carla.monthly_total, Money::from(2800));
        assert_eq!(carla.position, "Not informed");
        assert_eq!(carla.period_cost("Dec"), Some(Money::from(2800)));
    }

    #[test]
    fn test_failed_command_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let result = store.run_employee_command(EmployeeCommand::Remove { index: 5 });
        assert!(matches!(result, Err(DashboardError::RecordNotFound { .. })));
        assert_eq!(
            fs::read_to_string(dir.path().join("employees.csv")).unwrap(),
            EMPLOYEES
        );
    }

    #[test]
    fn test_view_restricts_period_series() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let criteria = FilterCriteria {
            periods: Some(BTreeSet::from(["aug".to_string()])),
            ..Default::default()
        };
        let view = store.view(&criteria).unwrap();

        // Bruno books nothing in August.
        assert_eq!(view.employees.len(), 1);
        assert_eq!(view.totals.employee_monthly, Money::from(2800));
        assert_eq!(view.cost_per_period.len(), 1);
        assert_eq!(view.cost_per_period[0].label, "Aug");
    }

    #[test]
    fn test_commit_refused_when_load_dropped_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let sheet = "Full Name,Total Cost (month)\nAna,\"R$ 2.800,00\"\nBia,\"R$ 1.000,00\"\n";
        fs::write(dir.path().join("employees.csv"), sheet).unwrap();

        let result = store.run_employee_command(EmployeeCommand::Add(NewEmployee {
            name: "Eva".to_string(),
            position: None,
            contract_type: None,
            monthly_salary: Money::from(1000),
            annual_total: None,
        }));

        match result {
            Err(DashboardError::LossyCommit { record_kind, reason }) => {
                assert_eq!(record_kind, "employee");
                assert!(reason.contains("2 rows"));
            }
            other => panic!("Expected LossyCommit, got {:?}", other),
        }
        assert_eq!(
            fs::read_to_string(dir.path().join("employees.csv")).unwrap(),
            sheet
        );
    }

    #[test]
    fn test_commit_allowed_over_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        fs::write(
            dir.path().join("employees.csv"),
            format!("{},,,,,,,,\n", EMPLOYEES),
        )
        .unwrap();
        let records = store
            .run_employee_command(EmployeeCommand::Remove { index: 1 })
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_name_filter_keeps_every_license() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        fs::write(
            dir.path().join("licenses.csv"),
            "Name,Description,Category,Monthly Cost\nFigma,,Design,\"R$ 450,00\"\n",
        )
        .unwrap();
        let criteria = FilterCriteria {
            names: Some(BTreeSet::from(["Ana Souza".to_string()])),
            ..Default::default()
        };
        let view = store.view(&criteria).unwrap();

        assert_eq!(view.employees.len(), 1);
        assert_eq!(view.licenses.len(), 1);
        assert_eq!(view.totals.license_monthly, Money::from(450));
        assert_eq!(view.totals.grand_total_monthly, Money::from(3250));
        assert_eq!(view.license_cost_per_category[0].cost, Money::from(450));
    }

    #[test]
    fn test_view_unfiltered_grand_total() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let view = store.view(&FilterCriteria::default()).unwrap();
        assert_eq!(view.totals.grand_total_monthly, Money::from(7800));
        assert_eq!(view.cost_per_period.len(), 12);
    }

    #[test]
    fn test_export_uses_requested_style() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let text = store
            .export_employees(ExportOptions {
                delimiter: crate::storage::Delimiter::Semicolon,
                amounts: crate::money::AmountStyle::Plain,
            })
            .unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("Ana Souza;Engineer;CLT;1000.00;2800.00"));
    }
}
