//! Filter and aggregate engine for the cost dashboard.
//!
//! This module contains the pure functions applied to normalized record
//! sets: predicate filtering, exact-decimal aggregation, total cost of
//! ownership, and the series behind the dashboard charts.

mod aggregate;
mod filter;
mod summary;

pub use aggregate::{
    CostSource, EmployeeCostField, LicenseCostField, aggregate, total_cost_of_ownership,
};
pub use filter::{CostRange, FilterCriteria, Filterable, apply};
pub use summary::{
    CostPoint, DashboardTotals, UNCATEGORIZED, cost_per_employee, cost_per_period,
    license_cost_per_category, summarize,
};
