//! Dashboard totals and chart series.
//!
//! The presentation layer draws bar and line charts; this module only
//! produces the numbers behind them.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{EmployeeRecord, LicenseRecord, RecordSet};
use crate::money::Money;

use super::aggregate::{
    EmployeeCostField, LicenseCostField, aggregate, total_cost_of_ownership,
};

/// Label used for licenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The headline figures of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Sum of employee monthly totals.
    pub employee_monthly: Money,
    /// Sum of employee six-month totals.
    pub employee_six_month: Money,
    /// Sum of employee annual totals.
    pub employee_annual: Money,
    /// Sum of license monthly costs.
    pub license_monthly: Money,
    /// Employee plus license monthly cost.
    pub grand_total_monthly: Money,
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostPoint {
    /// The category axis label (employee name, period, license category).
    pub label: String,
    /// The value.
    pub cost: Money,
}

/// Computes the headline totals over (already filtered) record sets.
///
/// # Errors
///
/// Returns `AmountOverflow` when any total leaves the decimal range.
///
/// # Examples
///
/// ```
/// use cost_dashboard::engine::summarize;
/// use cost_dashboard::models::{EmployeeRecord, LicenseRecord, RecordSet};
/// use cost_dashboard::money::Money;
///
/// let totals = summarize(&RecordSet::<EmployeeRecord>::new(), &RecordSet::<LicenseRecord>::new()).unwrap();
/// assert_eq!(totals.grand_total_monthly, Money::ZERO);
/// ```
pub fn summarize(
    employees: &RecordSet<EmployeeRecord>,
    licenses: &RecordSet<LicenseRecord>,
) -> DashboardResult<DashboardTotals> {
    let employee_monthly = aggregate(employees, &EmployeeCostField::MonthlyTotal)?;
    let license_monthly = aggregate(licenses, &LicenseCostField::MonthlyCost)?;

    Ok(DashboardTotals {
        employee_monthly,
        employee_six_month: aggregate(employees, &EmployeeCostField::SixMonthTotal)?,
        employee_annual: aggregate(employees, &EmployeeCostField::AnnualTotal)?,
        license_monthly,
        grand_total_monthly: total_cost_of_ownership(employee_monthly, license_monthly)?,
    })
}

/// Monthly cost per employee, in record order (bar chart).
pub fn cost_per_employee(employees: &RecordSet<EmployeeRecord>) -> Vec<CostPoint> {
    employees
        .iter()
        .map(|r| CostPoint {
            label: r.name.clone(),
            cost: r.monthly_total,
        })
        .collect()
}

/// Team cost per period, in the given period order (line chart).
pub fn cost_per_period(
    employees: &RecordSet<EmployeeRecord>,
    periods: &[String],
) -> DashboardResult<Vec<CostPoint>> {
    periods
        .iter()
        .map(|period| {
            Ok(CostPoint {
                label: period.clone(),
                cost: aggregate(employees, &EmployeeCostField::Period(period.clone()))?,
            })
        })
        .collect()
}

/// License cost per category, in order of first appearance.
pub fn license_cost_per_category(
    licenses: &RecordSet<LicenseRecord>,
) -> DashboardResult<Vec<CostPoint>> {
    let mut points: Vec<CostPoint> = Vec::new();
    for license in licenses {
        let label = match license.category.trim() {
            "" => UNCATEGORIZED,
            category => category,
        };
        match points.iter_mut().find(|p| p.label == label) {
            Some(point) => {
                point.cost = point.cost.checked_add(license.monthly_cost).ok_or_else(|| {
                    DashboardError::AmountOverflow {
                        operation: format!("license cost for category '{}'", label),
                    }
                })?;
            }
            None => points.push(CostPoint {
                label: label.to_string(),
                cost: license.monthly_cost,
            }),
        }
    }
    Ok(points)
}
