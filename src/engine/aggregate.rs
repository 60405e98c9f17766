//! Exact-decimal cost aggregation.
//!
//! All sums are checked [`Money`] additions over `rust_decimal`, so a total
//! does not depend on record order, never drifts the way binary floats do,
//! and reports overflow as an error instead of panicking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{EmployeeRecord, LicenseRecord, RecordSet};
use crate::money::Money;

/// An employee cost column that can be summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "period")]
pub enum EmployeeCostField {
    /// Gross monthly salary (missing salaries count as zero).
    MonthlySalary,
    /// Total monthly cost.
    MonthlyTotal,
    /// Total cost over six months.
    SixMonthTotal,
    /// Total cost over twelve months.
    AnnualTotal,
    /// Cost booked in one period (missing periods count as zero).
    Period(String),
}

/// A license cost column that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseCostField {
    /// Monthly subscription cost.
    MonthlyCost,
}

/// A record that exposes summable cost fields.
pub trait CostSource {
    /// The fields this record kind can be aggregated by.
    type Field: fmt::Debug;

    /// Returns the record's cost in the given field.
    fn cost(&self, field: &Self::Field) -> Money;
}

impl CostSource for EmployeeRecord {
    type Field = EmployeeCostField;

    fn cost(&self, field: &EmployeeCostField) -> Money {
        match field {
            EmployeeCostField::MonthlySalary => self.monthly_salary.unwrap_or(Money::ZERO),
            EmployeeCostField::MonthlyTotal => self.monthly_total,
            EmployeeCostField::SixMonthTotal => self.six_month_total,
            EmployeeCostField::AnnualTotal => self.annual_total,
            EmployeeCostField::Period(period) => self.period_cost(period).unwrap_or(Money::ZERO),
        }
    }
}

impl CostSource for LicenseRecord {
    type Field = LicenseCostField;

    fn cost(&self, field: &LicenseCostField) -> Money {
        match field {
            LicenseCostField::MonthlyCost => self.monthly_cost,
        }
    }
}

/// Sums one cost field over a record set. An empty set sums to zero.
///
/// # Errors
///
/// Returns `AmountOverflow` when the sum leaves the decimal range.
///
/// # Examples
///
/// ```
/// use cost_dashboard::engine::{aggregate, LicenseCostField};
/// use cost_dashboard::models::{LicenseRecord, RecordSet};
/// use cost_dashboard::money::Money;
///
/// let empty: RecordSet<LicenseRecord> = RecordSet::new();
/// assert_eq!(aggregate(&empty, &LicenseCostField::MonthlyCost).unwrap(), Money::ZERO);
/// ```
pub fn aggregate<T: CostSource>(records: &RecordSet<T>, field: &T::Field) -> DashboardResult<Money> {
    Money::checked_sum(records.iter().map(|r| r.cost(field))).ok_or_else(|| {
        DashboardError::AmountOverflow {
            operation: format!("{:?} sum", field),
        }
    })
}

/// Combines the employee and license totals.
///
/// Either side may be zero (an empty record set); the other side's total is
/// then the result.
///
/// # Errors
///
/// Returns `AmountOverflow` when the combined total leaves the decimal range.
pub fn total_cost_of_ownership(employee_total: Money, license_total: Money) -> DashboardResult<Money> {
    employee_total
        .checked_add(license_total)
        .ok_or_else(|| DashboardError::AmountOverflow {
            operation: "total cost of ownership".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractType, PeriodCost};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn employee(monthly: &str, salary: Option<&str>, jul: Option<&str>) -> EmployeeRecord {
        let monthly = money(monthly);
        EmployeeRecord {
            name: "x".to_string(),
            position: "Engineer".to_string(),
            contract_type: ContractType::Clt,
            monthly_salary: salary.map(money),
            monthly_total: monthly,
            six_month_total: monthly.checked_times(Decimal::from(6)).unwrap(),
            annual_total: monthly.checked_times(Decimal::from(12)).unwrap(),
            period_costs: jul
                .map(|c| {
                    vec![PeriodCost {
                        period: "Jul".to_string(),
                        cost: money(c),
                    }]
                })
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_empty_set_aggregates_to_zero() {
        let empty: RecordSet<EmployeeRecord> = RecordSet::new();
        assert_eq!(aggregate(&empty, &EmployeeCostField::MonthlyTotal).unwrap(), Money::ZERO);
        assert_eq!(
            aggregate(&empty, &EmployeeCostField::Period("Jul".to_string())).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn test_monthly_total_sum_is_exact() {
        let set: RecordSet<EmployeeRecord> = vec![
            employee("0.10", None, None),
            employee("0.20", None, None),
            employee("2800.70", None, None),
        ]
        .into();
        assert_eq!(aggregate(&set, &EmployeeCostField::MonthlyTotal).unwrap(), money("2801.00"));
        assert_eq!(aggregate(&set, &EmployeeCostField::AnnualTotal).unwrap(), money("33612.00"));
        assert_eq!(aggregate(&set, &EmployeeCostField::SixMonthTotal).unwrap(), money("16806.00"));
    }

    #[test]
    fn test_missing_salary_and_period_count_as_zero() {
        let set: RecordSet<EmployeeRecord> = vec![
            employee("100", Some("50"), Some("100")),
            employee("100", None, None),
        ]
        .into();
        assert_eq!(aggregate(&set, &EmployeeCostField::MonthlySalary).unwrap(), money("50"));
        assert_eq!(
            aggregate(&set, &EmployeeCostField::Period("jul".to_string())).unwrap(),
            money("100")
        );
    }

    #[test]
    fn test_license_aggregate() {
        let set: RecordSet<LicenseRecord> = vec![
            LicenseRecord {
                name: "Figma".to_string(),
                description: String::new(),
                category: "Design".to_string(),
                monthly_cost: money("450.00"),
            },
            LicenseRecord {
                name: "Slack".to_string(),
                description: String::new(),
                category: "Chat".to_string(),
                monthly_cost: money("80.50"),
            },
        ]
        .into();
        assert_eq!(aggregate(&set, &LicenseCostField::MonthlyCost).unwrap(), money("530.50"));
    }

    #[test]
    fn test_aggregate_overflow_is_an_error() {
        let huge = EmployeeRecord {
            monthly_total: money("50000000000000000000000000000"),
            ..employee("0", None, None)
        };
        let set: RecordSet<EmployeeRecord> = vec![huge.clone(), huge].into();
        match aggregate(&set, &EmployeeCostField::MonthlyTotal) {
            Err(DashboardError::AmountOverflow { operation }) => {
                assert_eq!(operation, "MonthlyTotal sum");
            }
            other => panic!("Expected AmountOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_tco_with_empty_side_keeps_other_total() {
        assert_eq!(total_cost_of_ownership(money("1000"), Money::ZERO).unwrap(), money("1000"));
        assert_eq!(total_cost_of_ownership(Money::ZERO, money("530.50")).unwrap(), money("530.50"));
        assert_eq!(
            total_cost_of_ownership(money("1000"), money("530.50")).unwrap(),
            money("1530.50")
        );
    }

    #[test]
    fn test_tco_overflow_is_an_error() {
        let huge = Money::new(Decimal::MAX).unwrap();
        assert!(matches!(
            total_cost_of_ownership(huge, money("1")),
            Err(DashboardError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_field_serialization() {
        let json = serde_json::to_string(&EmployeeCostField::Period("Jul".to_string())).unwrap();
        assert_eq!(json, r#"{"field":"period","period":"Jul"}"#);
    }
}
