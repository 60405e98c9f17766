//! Configuration types for the cost dashboard.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has a
//! default, so a partial file only overrides what it names.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{ContractType, POSITION_NOT_INFORMED};

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Locations of the two data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// Path to the employee cost sheet.
    pub employees: PathBuf,
    /// Path to the license cost sheet. Created if missing.
    pub licenses: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            employees: PathBuf::from("data/employees.csv"),
            licenses: PathBuf::from("data/licenses.csv"),
        }
    }
}

/// Header aliases for each employee field. The first alias of each list is
/// the header written when the sheet is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmployeeColumns {
    /// Employee name (required).
    pub name: Vec<String>,
    /// Position / role.
    pub position: Vec<String>,
    /// Contract type (CLT or PJ).
    pub contract_type: Vec<String>,
    /// Gross monthly salary.
    pub monthly_salary: Vec<String>,
    /// Total monthly cost (required).
    pub monthly_total: Vec<String>,
    /// Total cost over six months.
    pub six_month_total: Vec<String>,
    /// Total cost over twelve months.
    pub annual_total: Vec<String>,
}

impl Default for EmployeeColumns {
    fn default() -> Self {
        Self {
            name: aliases(&["Name", "Nome"]),
            position: aliases(&["Position", "Cargo"]),
            contract_type: aliases(&["Hiring", "Contract", "Tipo de contratação"]),
            monthly_salary: aliases(&["Salary (month)", "Salário mensal"]),
            monthly_total: aliases(&["Total Cost (month)", "Custo total mensal"]),
            six_month_total: aliases(&["Total Cost CLT (6 months)", "Custo total 6 meses"]),
            annual_total: aliases(&["Total Cost CLT (12 months)", "Custo total anual"]),
        }
    }
}

/// Header aliases for each license field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LicenseColumns {
    /// Tool name.
    pub name: Vec<String>,
    /// Description.
    pub description: Vec<String>,
    /// Category.
    pub category: Vec<String>,
    /// Monthly cost (required).
    pub monthly_cost: Vec<String>,
}

impl Default for LicenseColumns {
    fn default() -> Self {
        Self {
            name: aliases(&["Name", "Nome", "Tool", "Ferramenta"]),
            description: aliases(&["Description", "Descrição"]),
            category: aliases(&["Category", "Categoria"]),
            monthly_cost: aliases(&["Monthly Cost", "Custo mensal"]),
        }
    }
}

/// Column aliases for both record kinds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Employee sheet columns.
    pub employee: EmployeeColumns,
    /// License sheet columns.
    pub license: LicenseColumns,
}

/// What to do when a required column is absent from a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumnPolicy {
    /// Stop loading and surface `MissingRequiredColumn`.
    Fatal,
    /// Fill the column with a default (blank text, zero amount) and warn.
    #[default]
    Synthesize,
}

/// Employer cost multipliers applied to gross salary per contract type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContractMultipliers {
    /// Multiplier for CLT employees.
    pub clt: Decimal,
    /// Multiplier for PJ contractors.
    pub pj: Decimal,
}

impl ContractMultipliers {
    /// Returns the multiplier for a contract type.
    pub fn for_contract(&self, contract_type: ContractType) -> Decimal {
        match contract_type {
            ContractType::Clt => self.clt,
            ContractType::Pj => self.pj,
        }
    }
}

impl Default for ContractMultipliers {
    fn default() -> Self {
        Self {
            clt: Decimal::new(28, 1),
            pj: Decimal::ONE,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// The complete dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data file locations.
    pub data: DataFiles,
    /// Column aliases.
    pub columns: ColumnConfig,
    /// Substrings marking a column as monetary (matched case-insensitively).
    pub monetary_markers: Vec<String>,
    /// Period labels; a column whose whole name is one of these holds a
    /// per-period cost.
    pub periods: Vec<String>,
    /// Periods filled with the monthly total when an employee is added.
    pub forecast_periods: Vec<String>,
    /// Policy for absent required columns.
    pub missing_columns: MissingColumnPolicy,
    /// Whether individual data warnings are emitted.
    pub emit_warnings: bool,
    /// Employer cost multipliers.
    pub contracts: ContractMultipliers,
    /// Position used when none is given.
    pub placeholder_position: String,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataFiles::default(),
            columns: ColumnConfig::default(),
            monetary_markers: aliases(&["cost", "salary", "custo", "salário"]),
            periods: aliases(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ]),
            forecast_periods: aliases(&["Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]),
            missing_columns: MissingColumnPolicy::default(),
            emit_warnings: true,
            contracts: ContractMultipliers::default(),
            placeholder_position: POSITION_NOT_INFORMED.to_string(),
            server: ServerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_multipliers() {
        let multipliers = ContractMultipliers::default();
        assert_eq!(multipliers.for_contract(ContractType::Clt), Decimal::new(28, 1));
        assert_eq!(multipliers.for_contract(ContractType::Pj), Decimal::ONE);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: DashboardConfig = serde_yaml::from_str("missing_columns: fatal\n").unwrap();
        assert_eq!(config.missing_columns, MissingColumnPolicy::Fatal);
        assert!(config.emit_warnings);
        assert_eq!(config.periods.len(), 12);
        assert_eq!(config.columns.employee.name[0], "Name");
    }

    #[test]
    fn test_default_forecast_periods_are_second_half() {
        let config = DashboardConfig::default();
        assert_eq!(config.forecast_periods.first().map(String::as_str), Some("Jul"));
        assert_eq!(config.forecast_periods.len(), 6);
    }
}
