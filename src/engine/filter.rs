//! Record filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{EmployeeRecord, PeriodCost, RecordSet};
use crate::money::Money;

/// Inclusive bounds on a record's monthly cost. An absent bound is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    /// Lowest accepted monthly cost.
    #[serde(default)]
    pub min: Option<Money>,
    /// Highest accepted monthly cost.
    #[serde(default)]
    pub max: Option<Money>,
}

impl CostRange {
    /// Returns true if the value lies within the bounds.
    pub fn contains(&self, value: Money) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A conjunction of independent predicates over employee records.
///
/// License records are never filtered: the dashboard always shows every
/// license and its full cost.
///
/// `None` means "no constraint" for a membership predicate. `Some` of an
/// empty set admits nothing. Widening any predicate (adding members, relaxing
/// a bound, or dropping it) never removes a record from the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Allowed names.
    #[serde(default)]
    pub names: Option<BTreeSet<String>>,
    /// Allowed positions.
    #[serde(default)]
    pub positions: Option<BTreeSet<String>>,
    /// Allowed period labels.
    #[serde(default)]
    pub periods: Option<BTreeSet<String>>,
    /// Monthly cost bounds.
    #[serde(default)]
    pub monthly_cost: CostRange,
}

/// Fields a record exposes to [`FilterCriteria`].
pub trait Filterable {
    /// The record's name.
    fn name(&self) -> &str;
    /// The record's monthly cost.
    fn monthly_cost(&self) -> Money;
    /// The record's position.
    fn position(&self) -> &str;
    /// The record's per-period costs.
    fn period_costs(&self) -> &[PeriodCost];
}

impl Filterable for EmployeeRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn monthly_cost(&self) -> Money {
        self.monthly_total
    }

    fn position(&self) -> &str {
        &self.position
    }

    fn period_costs(&self) -> &[PeriodCost] {
        &self.period_costs
    }
}

impl FilterCriteria {
    /// Returns true if the record passes every predicate.
    ///
    /// The period predicate passes when the record books a non-zero cost in
    /// at least one allowed period. A record with no period data at all
    /// passes it.
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        let name_ok = self
            .names
            .as_ref()
            .is_none_or(|names| names.contains(record.name()));

        let position_ok = self
            .positions
            .as_ref()
            .is_none_or(|positions| positions.contains(record.position()));

        let costs = record.period_costs();
        let period_ok = match &self.periods {
            Some(periods) if !costs.is_empty() => costs.iter().any(|c| {
                !c.cost.is_zero() && periods.iter().any(|p| p.eq_ignore_ascii_case(&c.period))
            }),
            _ => true,
        };

        name_ok && position_ok && period_ok && self.monthly_cost.contains(record.monthly_cost())
    }
}

/// Returns the records passing the criteria, in their original order.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use cost_dashboard::engine::{apply, FilterCriteria};
/// use cost_dashboard::models::{ContractType, EmployeeRecord, RecordSet};
/// use cost_dashboard::money::Money;
///
/// let employee = |name: &str| EmployeeRecord {
///     name: name.into(),
///     position: "Engineer".into(),
///     contract_type: ContractType::Pj,
///     monthly_salary: None,
///     monthly_total: Money::from(1000),
///     six_month_total: Money::from(6000),
///     annual_total: Money::from(12000),
///     period_costs: vec![],
/// };
/// let team: RecordSet<EmployeeRecord> = vec![employee("Ana"), employee("Bia")].into();
///
/// let criteria = FilterCriteria {
///     names: Some(BTreeSet::from(["Bia".to_string()])),
///     ..Default::default()
/// };
/// let filtered = apply(&team, &criteria);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered.get(0).unwrap().name, "Bia");
/// ```
pub fn apply<T: Filterable + Clone>(records: &RecordSet<T>, criteria: &FilterCriteria) -> RecordSet<T> {
    records
        .iter()
        .filter(|r| criteria.matches(*r))
        .cloned()
        .collect()
}
