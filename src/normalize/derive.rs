//! Derived-field rules for employee costs.
//!
//! These rules only fill values that are absent; an explicit figure from the
//! sheet or from the operator always wins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ContractMultipliers;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{ContractType, EmployeeRecord, PeriodCost};
use crate::money::Money;

use super::NormalizeOptions;

/// Months in the rolling half-year total.
pub const MONTHS_PER_HALF_YEAR: u32 = 6;

/// Months in the annual total.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Returns the monthly cost to the company of a gross salary, or `None` when
/// the product overflows.
///
/// # Examples
///
/// ```
/// use cost_dashboard::config::ContractMultipliers;
/// use cost_dashboard::models::ContractType;
/// use cost_dashboard::money::Money;
/// use cost_dashboard::normalize::employer_cost;
///
/// let multipliers = ContractMultipliers::default();
/// assert_eq!(employer_cost(Money::from(1000), ContractType::Clt, &multipliers), Some(Money::from(2800)));
/// assert_eq!(employer_cost(Money::from(1000), ContractType::Pj, &multipliers), Some(Money::from(1000)));
/// ```
pub fn employer_cost(
    salary: Money,
    contract_type: ContractType,
    multipliers: &ContractMultipliers,
) -> Option<Money> {
    salary.checked_times(multipliers.for_contract(contract_type))
}

/// Returns the six-month total implied by a monthly total.
pub fn six_month_from_monthly(monthly: Money) -> Option<Money> {
    monthly.checked_times(Decimal::from(MONTHS_PER_HALF_YEAR))
}

/// Returns the annual total implied by a monthly total.
pub fn annual_from_monthly(monthly: Money) -> Option<Money> {
    monthly.checked_times(Decimal::from(MONTHS_PER_YEAR))
}

/// What the operator supplies when adding an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// The employee's name.
    pub name: String,
    /// The position; the placeholder is used when absent or blank.
    #[serde(default)]
    pub position: Option<String>,
    /// The hiring arrangement; CLT when absent.
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// Gross monthly salary.
    pub monthly_salary: Money,
    /// Explicit annual total; a zero amount counts as not supplied.
    #[serde(default)]
    pub annual_total: Option<Money>,
}

/// Builds the record for a newly added employee.
///
/// The monthly total is the salary times the contract multiplier. The annual
/// total is the explicit figure when one above zero was supplied, otherwise
/// twelve monthly totals; the six-month total is six monthly totals. Each
/// forecast period is booked at the monthly total.
///
/// # Errors
///
/// Returns `InvalidRecord` when the name is blank, or when the salary is so
/// large that a derived total leaves the decimal range.
///
/// # Examples
///
/// ```
/// use cost_dashboard::money::Money;
/// use cost_dashboard::normalize::{build_new_employee, NewEmployee, NormalizeOptions};
///
/// let input = NewEmployee {
///     name: "Carla".to_string(),
///     position: None,
///     contract_type: None,
///     monthly_salary: Money::from(1000),
///     annual_total: None,
/// };
/// let record = build_new_employee(input, &NormalizeOptions::default()).unwrap();
/// assert_eq!(record.monthly_total, Money::from(2800));
/// assert_eq!(record.six_month_total, Money::from(16800));
/// assert_eq!(record.annual_total, Money::from(33600));
/// assert_eq!(record.position, "Not informed");
/// ```
pub fn build_new_employee(
    input: NewEmployee,
    options: &NormalizeOptions,
) -> DashboardResult<EmployeeRecord> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(DashboardError::InvalidRecord {
            record_kind: "employee".to_string(),
            field: "name".to_string(),
            message: "must not be blank".to_string(),
        });
    }

    let position = input
        .position
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| options.placeholder_position.clone());
    let contract_type = input.contract_type.unwrap_or_default();

    let too_large = || DashboardError::InvalidRecord {
        record_kind: "employee".to_string(),
        field: "monthly_salary".to_string(),
        message: "amount too large".to_string(),
    };
    let monthly_total = employer_cost(input.monthly_salary, contract_type, &options.multipliers)
        .ok_or_else(too_large)?;
    let six_month_total = six_month_from_monthly(monthly_total).ok_or_else(too_large)?;
    let annual_total = match input.annual_total.filter(|a| !a.is_zero()) {
        Some(explicit) => explicit,
        None => annual_from_monthly(monthly_total).ok_or_else(too_large)?,
    };

    let period_costs = options
        .forecast_periods
        .iter()
        .map(|period| PeriodCost {
            period: period.clone(),
            cost: monthly_total,
        })
        .collect();

    Ok(EmployeeRecord {
        name,
        position,
        contract_type,
        monthly_salary: Some(input.monthly_salary),
        monthly_total,
        six_month_total,
        annual_total,
        period_costs,
    })
}
