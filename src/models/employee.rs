//! Employee compensation model and related types.
//!
//! This module defines the [`EmployeeRecord`] struct and [`ContractType`] enum
//! for representing one compensation line of the team cost sheet.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Placeholder used when a record has no position.
pub const POSITION_NOT_INFORMED: &str = "Not informed";

/// Represents the type of hiring arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Formal employment; carries the employer burden multiplier.
    #[default]
    #[serde(rename = "CLT")]
    Clt,
    /// Independent contractor; no added employer burden.
    #[serde(rename = "PJ")]
    Pj,
}

impl ContractType {
    /// Reads a contract type label, ignoring case and surrounding spaces.
    ///
    /// Returns `None` for anything other than `CLT` or `PJ`; blank text is
    /// handled by the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_dashboard::models::ContractType;
    ///
    /// assert_eq!(ContractType::from_label(" pj "), Some(ContractType::Pj));
    /// assert_eq!(ContractType::from_label("intern"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "CLT" => Some(ContractType::Clt),
            "PJ" => Some(ContractType::Pj),
            _ => None,
        }
    }

    /// Returns the label written to data files.
    pub fn label(&self) -> &'static str {
        match self {
            ContractType::Clt => "CLT",
            ContractType::Pj => "PJ",
        }
    }
}

/// The cost of one employee in a named period (e.g. "Jul").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCost {
    /// The period label as it appears in the source sheet.
    pub period: String,
    /// The cost booked in that period.
    pub cost: Money,
}

/// Represents one compensation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// The employee's name. Never blank.
    pub name: String,
    /// The employee's position, or [`POSITION_NOT_INFORMED`].
    pub position: String,
    /// The hiring arrangement.
    #[serde(default)]
    pub contract_type: ContractType,
    /// Gross monthly salary, when known.
    #[serde(default)]
    pub monthly_salary: Option<Money>,
    /// Total monthly cost to the company.
    pub monthly_total: Money,
    /// Total cost over six months.
    pub six_month_total: Money,
    /// Total cost over twelve months.
    pub annual_total: Money,
    /// Costs per period, in sheet column order.
    #[serde(default)]
    pub period_costs: Vec<PeriodCost>,
}

impl EmployeeRecord {
    /// Returns the cost booked for a period, matching the label
    /// case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_dashboard::models::{ContractType, EmployeeRecord, PeriodCost};
    /// use cost_dashboard::money::Money;
    ///
    /// let record = EmployeeRecord {
    ///     name: "Ana".to_string(),
    ///     position: "Engineer".to_string(),
    ///     contract_type: ContractType::Clt,
    ///     monthly_salary: None,
    ///     monthly_total: Money::from(2800),
    ///     six_month_total: Money::from(16800),
    ///     annual_total: Money::from(33600),
    ///     period_costs: vec![PeriodCost { period: "Jul".to_string(), cost: Money::from(2800) }],
    /// };
    /// assert_eq!(record.period_cost("jul"), Some(Money::from(2800)));
    /// assert_eq!(record.period_cost("Aug"), None);
    /// ```
    pub fn period_cost(&self, period: &str) -> Option<Money> {
        self.period_costs
            .iter()
            .find(|p| p.period.eq_ignore_ascii_case(period.trim()))
            .map(|p| p.cost)
    }

    /// Returns true if the record has any per-period data.
    pub fn has_period_data(&self) -> bool {
        !self.period_costs.is_empty()
    }

    /// Returns true if the employee is hired under CLT.
    pub fn is_clt(&self) -> bool {
        self.contract_type == ContractType::Clt
    }
}
