//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the dashboard
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{DashboardError, DashboardResult};

use super::types::DashboardConfig;

/// Loads and validates the dashboard configuration.
///
/// # Example
///
/// ```no_run
/// use cost_dashboard::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/dashboard.yaml").unwrap();
/// println!("Employees sheet: {}", loader.config().data.employees.display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: DashboardConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or invalid values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| DashboardError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Builds configuration from YAML text.
    ///
    /// # Example
    ///
    /// ```
    /// use cost_dashboard::config::{ConfigLoader, MissingColumnPolicy};
    ///
    /// let loader = ConfigLoader::from_yaml_str("missing_columns: fatal").unwrap();
    /// assert_eq!(loader.config().missing_columns, MissingColumnPolicy::Fatal);
    /// ```
    pub fn from_yaml_str(content: &str) -> DashboardResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Wraps an already built configuration after validating it.
    pub fn from_config(config: DashboardConfig) -> DashboardResult<Self> {
        Self::validate(&config, "<memory>")?;
        Ok(Self { config })
    }

    fn parse(content: &str, path: &str) -> DashboardResult<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(content).map_err(|e| DashboardError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&config, path)?;
        Ok(Self { config })
    }

    fn validate(config: &DashboardConfig, path: &str) -> DashboardResult<()> {
        let invalid = |message: String| DashboardError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        let multipliers = &config.contracts;
        if multipliers.clt.is_sign_negative() || multipliers.pj.is_sign_negative() {
            return Err(invalid(format!(
                "contract multipliers must not be negative (clt = {}, pj = {})",
                multipliers.clt, multipliers.pj
            )));
        }

        let employee = &config.columns.employee;
        let license = &config.columns.license;
        let alias_lists = [
            ("columns.employee.name", &employee.name),
            ("columns.employee.position", &employee.position),
            ("columns.employee.contract_type", &employee.contract_type),
            ("columns.employee.monthly_salary", &employee.monthly_salary),
            ("columns.employee.monthly_total", &employee.monthly_total),
            ("columns.employee.six_month_total", &employee.six_month_total),
            ("columns.employee.annual_total", &employee.annual_total),
            ("columns.license.name", &license.name),
            ("columns.license.description", &license.description),
            ("columns.license.category", &license.category),
            ("columns.license.monthly_cost", &license.monthly_cost),
        ];
        for (key, list) in alias_lists {
            if list.iter().all(|alias| alias.trim().is_empty()) {
                return Err(invalid(format!("{} needs at least one column name", key)));
            }
        }

        if let Some(unknown) = config
            .forecast_periods
            .iter()
            .find(|p| !config.periods.iter().any(|q| q.eq_ignore_ascii_case(p)))
        {
            return Err(invalid(format!(
                "forecast period '{}' is not one of the configured periods",
                unknown
            )));
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> DashboardConfig {
        self.config
    }
}
