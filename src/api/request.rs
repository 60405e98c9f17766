//! Request types for the cost dashboard API.
//!
//! Amounts in request bodies may be JSON numbers (`2800.5`) or pt-BR
//! currency text (`"R$ 2.800,50"`); both go through the monetary parser.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commands::{EmployeePatch, LicensePatch, NewLicense};
use crate::engine::{CostRange, FilterCriteria};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{ContractType, PeriodCost};
use crate::money::{Money, is_blank_amount, parse_amount};
use crate::normalize::NewEmployee;

/// An amount as sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A plain JSON number.
    Number(serde_json::Number),
    /// Currency text in the source sheet's format.
    Text(String),
}

impl AmountInput {
    /// Converts to `Money`, failing with `MalformedAmount` on text the
    /// parser rejects or on negative numbers.
    pub fn to_money(&self) -> DashboardResult<Money> {
        match self {
            AmountInput::Number(number) => {
                let raw = number.to_string();
                let value = Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .map_err(|_| DashboardError::MalformedAmount { raw })?;
                parse_amount(value)
            }
            AmountInput::Text(text) => parse_amount(text),
        }
    }
}

fn optional_money(input: &Option<AmountInput>) -> DashboardResult<Option<Money>> {
    input.as_ref().map(AmountInput::to_money).transpose()
}

/// Query string of `GET /dashboard`.
///
/// List parameters repeat their key, one value each
/// (`?names=Ana&names=Souza,%20Bia`), so a value may itself contain commas.
/// A list key that is present only with empty values selects nothing; an
/// absent one selects everything. Cost bounds use the currency text format
/// (`2800` or `R$ 2.800,00`); when repeated, the last one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// Allowed employee names.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    /// Allowed positions.
    #[serde(default)]
    pub positions: Option<Vec<String>>,
    /// Allowed period labels.
    #[serde(default)]
    pub periods: Option<Vec<String>>,
    /// Lowest monthly cost.
    #[serde(default)]
    pub min_monthly: Option<String>,
    /// Highest monthly cost.
    #[serde(default)]
    pub max_monthly: Option<String>,
}

fn push_value(list: &mut Option<Vec<String>>, value: String) {
    let items = list.get_or_insert_with(Vec::new);
    let value = value.trim();
    if !value.is_empty() {
        items.push(value.to_string());
    }
}

fn to_set(list: Option<Vec<String>>) -> Option<BTreeSet<String>> {
    list.map(|items| items.into_iter().collect())
}

fn bound(raw: &Option<String>) -> DashboardResult<Option<Money>> {
    match raw.as_deref() {
        Some(text) if !is_blank_amount(text) => parse_amount(text).map(Some),
        _ => Ok(None),
    }
}

impl DashboardQuery {
    /// Collects decoded query pairs. Unknown keys are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_dashboard::api::DashboardQuery;
    ///
    /// let query = DashboardQuery::from_pairs(vec![
    ///     ("names".to_string(), "Souza, Ana".to_string()),
    ///     ("names".to_string(), "Bia".to_string()),
    /// ]);
    /// assert_eq!(query.names.unwrap(), vec!["Souza, Ana", "Bia"]);
    /// ```
    pub fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "names" => push_value(&mut query.names, value),
                "positions" => push_value(&mut query.positions, value),
                "periods" => push_value(&mut query.periods, value),
                "min_monthly" => query.min_monthly = Some(value),
                "max_monthly" => query.max_monthly = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Builds the filter criteria.
    ///
    /// # Errors
    ///
    /// Returns `MalformedAmount` when a cost bound is not an amount.
    pub fn into_criteria(self) -> DashboardResult<FilterCriteria> {
        Ok(FilterCriteria {
            names: to_set(self.names),
            positions: to_set(self.positions),
            periods: to_set(self.periods),
            monthly_cost: CostRange {
                min: bound(&self.min_monthly)?,
                max: bound(&self.max_monthly)?,
            },
        })
    }
}

/// Body of `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// The employee's name.
    pub name: String,
    /// The position.
    #[serde(default)]
    pub position: Option<String>,
    /// `CLT` or `PJ`.
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// Gross monthly salary.
    pub monthly_salary: AmountInput,
    /// Explicit annual total.
    #[serde(default)]
    pub annual_total: Option<AmountInput>,
}

impl TryFrom<EmployeeRequest> for NewEmployee {
    type Error = DashboardError;

    fn try_from(request: EmployeeRequest) -> Result<Self, Self::Error> {
        Ok(NewEmployee {
            monthly_salary: request.monthly_salary.to_money()?,
            annual_total: optional_money(&request.annual_total)?,
            name: request.name,
            position: request.position,
            contract_type: request.contract_type,
        })
    }
}

/// One period cost in an edit request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodCostRequest {
    /// Period label.
    pub period: String,
    /// Cost in that period.
    pub cost: AmountInput,
}

/// Body of `PUT /employees/:index`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeePatchRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New position.
    #[serde(default)]
    pub position: Option<String>,
    /// New contract type.
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// New monthly salary.
    #[serde(default)]
    pub monthly_salary: Option<AmountInput>,
    /// New monthly total.
    #[serde(default)]
    pub monthly_total: Option<AmountInput>,
    /// New six-month total.
    #[serde(default)]
    pub six_month_total: Option<AmountInput>,
    /// New annual total.
    #[serde(default)]
    pub annual_total: Option<AmountInput>,
    /// Period costs to set.
    #[serde(default)]
    pub period_costs: Vec<PeriodCostRequest>,
}

impl TryFrom<EmployeePatchRequest> for EmployeePatch {
    type Error = DashboardError;

    fn try_from(request: EmployeePatchRequest) -> Result<Self, Self::Error> {
        let period_costs = request
            .period_costs
            .iter()
            .map(|p| {
                Ok(PeriodCost {
                    period: p.period.clone(),
                    cost: p.cost.to_money()?,
                })
            })
            .collect::<DashboardResult<Vec<_>>>()?;

        Ok(EmployeePatch {
            monthly_salary: optional_money(&request.monthly_salary)?,
            monthly_total: optional_money(&request.monthly_total)?,
            six_month_total: optional_money(&request.six_month_total)?,
            annual_total: optional_money(&request.annual_total)?,
            name: request.name,
            position: request.position,
            contract_type: request.contract_type,
            period_costs,
        })
    }
}

/// Body of `POST /licenses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRequest {
    /// Tool name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Monthly cost.
    pub monthly_cost: AmountInput,
}

impl TryFrom<LicenseRequest> for NewLicense {
    type Error = DashboardError;

    fn try_from(request: LicenseRequest) -> Result<Self, Self::Error> {
        Ok(NewLicense {
            monthly_cost: request.monthly_cost.to_money()?,
            name: request.name,
            description: request.description,
            category: request.category,
        })
    }
}

/// Body of `PUT /licenses/:index`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicensePatchRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// New monthly cost.
    #[serde(default)]
    pub monthly_cost: Option<AmountInput>,
}

impl TryFrom<LicensePatchRequest> for LicensePatch {
    type Error = DashboardError;

    fn try_from(request: LicensePatchRequest) -> Result<Self, Self::Error> {
        Ok(LicensePatch {
            monthly_cost: optional_money(&request.monthly_cost)?,
            name: request.name,
            description: request.description,
            category: request.category,
        })
    }
}
