//! Core data models for the cost dashboard.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod license;
mod record_set;
mod report;
mod table;

pub use employee::{ContractType, EmployeeRecord, POSITION_NOT_INFORMED, PeriodCost};
pub use license::LicenseRecord;
pub use record_set::RecordSet;
pub use report::{DataWarning, NormalizationReport, Severity};
pub use table::RawTable;
