//! Configuration loading and management for the cost dashboard.
//!
//! This module loads the dashboard configuration from a YAML file: data file
//! locations, column aliases, monetary column markers, period labels, the
//! missing-column policy and the contract cost multipliers.
//!
//! # Example
//!
//! ```no_run
//! use cost_dashboard::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/dashboard.yaml").unwrap();
//! println!("CLT multiplier: {}", config.config().contracts.clt);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ColumnConfig, ContractMultipliers, DashboardConfig, DataFiles, EmployeeColumns,
    LicenseColumns, MissingColumnPolicy, ServerConfig,
};
