//! Operator commands on record sets.
//!
//! Each command takes a record set by value and returns the resulting set;
//! nothing here touches files or shared state. Persisting the result is the
//! caller's job (see [`crate::dashboard::DataStore`]).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DashboardError, DashboardResult};
use crate::models::{ContractType, EmployeeRecord, LicenseRecord, PeriodCost, RecordSet};
use crate::money::Money;
use crate::normalize::{NewEmployee, NormalizeOptions, build_new_employee};

/// Changes to an existing employee. Absent fields keep their value; no
/// derived total is recomputed from an edited one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    /// New name; must not be blank.
    #[serde(default)]
    pub name: Option<String>,
    /// New position; blank restores the placeholder.
    #[serde(default)]
    pub position: Option<String>,
    /// New contract type.
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// New monthly salary.
    #[serde(default)]
    pub monthly_salary: Option<Money>,
    /// New monthly total.
    #[serde(default)]
    pub monthly_total: Option<Money>,
    /// New six-month total.
    #[serde(default)]
    pub six_month_total: Option<Money>,
    /// New annual total.
    #[serde(default)]
    pub annual_total: Option<Money>,
    /// Period costs to set; other periods are kept.
    #[serde(default)]
    pub period_costs: Vec<PeriodCost>,
}

/// What the operator supplies when adding a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLicense {
    /// Tool name; must not be blank.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Monthly cost.
    pub monthly_cost: Money,
}

/// Changes to an existing license. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePatch {
    /// New name; must not be blank.
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
    pub monthly_cost: Option<Money>,
}

/// An operator action on the employee set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeCommand {
    /// Append a new employee, deriving its totals.
    Add(NewEmployee),
    /// Change the employee at `index`.
    Edit {
        /// Position of the record in the set.
        index: usize,
        /// The changes to apply.
        patch: EmployeePatch,
    },
    /// Remove the employee at `index`.
    Remove {
        /// Position of the record in the set.
        index: usize,
    },
}

/// An operator action on the license set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseCommand {
    /// Append a new license.
    Add(NewLicense),
    /// Change the license at `index`.
    Edit {
        /// Position of the record in the set.
        index: usize,
        /// The changes to apply.
        patch: LicensePatch,
    },
    /// Remove the license at `index`.
    Remove {
        /// Position of the record in the set.
        index: usize,
    },
}

fn not_found(record_kind: &str, index: usize, len: usize) -> DashboardError {
    DashboardError::RecordNotFound {
        record_kind: record_kind.to_string(),
        index,
        len,
    }
}

fn required_name(record_kind: &str, name: &str) -> DashboardResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DashboardError::InvalidRecord {
            record_kind: record_kind.to_string(),
            field: "name".to_string(),
            message: "must not be blank".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Applies a command to the employee set, returning the new set.
///
/// # Errors
///
/// - `RecordNotFound` when an edit or removal index is out of range
/// - `InvalidRecord` when a name would become blank
///
/// # Examples
///
/// ```
/// use cost_dashboard::commands::{apply_employee_command, EmployeeCommand};
/// use cost_dashboard::models::RecordSet;
/// use cost_dashboard::money::Money;
/// use cost_dashboard::normalize::{NewEmployee, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// let added = apply_employee_command(
///     RecordSet::new(),
///     EmployeeCommand::Add(NewEmployee {
///         name: "Eva".to_string(),
///         position: Some("QA".to_string()),
///         contract_type: None,
///         monthly_salary: Money::from(1000),
///         annual_total: None,
///     }),
///     &options,
/// ).unwrap();
/// assert_eq!(added.get(0).unwrap().monthly_total, Money::from(2800));
///
/// let removed = apply_employee_command(added, EmployeeCommand::Remove { index: 0 }, &options).unwrap();
/// assert!(removed.is_empty());
/// ```
pub fn apply_employee_command(
    mut records: RecordSet<EmployeeRecord>,
    command: EmployeeCommand,
    options: &NormalizeOptions,
) -> DashboardResult<RecordSet<EmployeeRecord>> {
    match command {
        EmployeeCommand::Add(input) => {
            let record = build_new_employee(input, options)?;
            info!(name = %record.name, monthly_total = %record.monthly_total, "Employee added");
            records.push(record);
        }
        EmployeeCommand::Edit { index, patch } => {
            let len = records.len();
            let record = records
                .get_mut(index)
                .ok_or_else(|| not_found("employee", index, len))?;
            apply_employee_patch(record, patch, options)?;
            info!(index, name = %record.name, "Employee edited");
        }
        EmployeeCommand::Remove { index } => {
            let len = records.len();
            let removed = records
                .remove(index)
                .ok_or_else(|| not_found("employee", index, len))?;
            info!(index, name = %removed.name, "Employee removed");
        }
    }
    Ok(records)
}

fn apply_employee_patch(
    record: &mut EmployeeRecord,
    patch: EmployeePatch,
    options: &NormalizeOptions,
) -> DashboardResult<()> {
    // Validate before mutating so a rejected edit leaves the record intact.
    let name = patch
        .name
        .as_deref()
        .map(|n| required_name("employee", n))
        .transpose()?;

    if let Some(name) = name {
        record.name = name;
    }
    if let Some(position) = patch.position {
        let position = position.trim();
        record.position = if position.is_empty() {
            options.placeholder_position.clone()
        } else {
            position.to_string()
        };
    }
    if let Some(contract_type) = patch.contract_type {
        record.contract_type = contract_type;
    }
    if let Some(salary) = patch.monthly_salary {
        record.monthly_salary = Some(salary);
    }
    if let Some(monthly) = patch.monthly_total {
        record.monthly_total = monthly;
    }
    if let Some(six_month) = patch.six_month_total {
        record.six_month_total = six_month;
    }
    if let Some(annual) = patch.annual_total {
        record.annual_total = annual;
    }
    for update in patch.period_costs {
        match record
            .period_costs
            .iter_mut()
            .find(|p| p.period.eq_ignore_ascii_case(update.period.trim()))
        {
            Some(existing) => existing.cost = update.cost,
            None => record.period_costs.push(PeriodCost {
                period: update.period.trim().to_string(),
                cost: update.cost,
            }),
        }
    }
    Ok(())
}

/// Applies a command to the license set, returning the new set.
///
/// # Errors
///
/// - `RecordNotFound` when an edit or removal index is out of range
/// - `InvalidRecord` when a name would become blank
pub fn apply_license_command(
    mut records: RecordSet<LicenseRecord>,
    command: LicenseCommand,
) -> DashboardResult<RecordSet<LicenseRecord>> {
    match command {
        LicenseCommand::Add(input) => {
            let record = LicenseRecord {
                name: required_name("license", &input.name)?,
                description: input.description.trim().to_string(),
                category: input.category.trim().to_string(),
                monthly_cost: input.monthly_cost,
            };
            info!(name = %record.name, monthly_cost = %record.monthly_cost, "License added");
            records.push(record);
        }
        LicenseCommand::Edit { index, patch } => {
            let len = records.len();
            let name = patch
                .name
                .as_deref()
                .map(|n| required_name("license", n))
                .transpose()?;
            let record = records
                .get_mut(index)
                .ok_or_else(|| not_found("license", index, len))?;
            if let Some(name) = name {
                record.name = name;
            }
            if let Some(description) = patch.description {
                record.description = description.trim().to_string();
            }
            if let Some(category) = patch.category {
                record.category = category.trim().to_string();
            }
            if let Some(cost) = patch.monthly_cost {
                record.monthly_cost = cost;
            }
            info!(index, name = %record.name, "License edited");
        }
        LicenseCommand::Remove { index } => {
            let len = records.len();
            let removed = records
                .remove(index)
                .ok_or_else(|| not_found("license", index, len))?;
            info!(index, name = %removed.name, "License removed");
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> NormalizeOptions {
        NormalizeOptions::default()
    }

    fn new_employee(name: &str, salary: u32) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            position: Some("Engineer".to_string()),
            contract_type: Some(ContractType::Clt),
            monthly_salary: Money::from(salary),
            annual_total: None,
        }
    }

    fn team() -> RecordSet<EmployeeRecord> {
        let set = apply_employee_command(
            RecordSet::new(),
            EmployeeCommand::Add(new_employee("Ana", 1000)),
            &options(),
        )
        .unwrap();
        apply_employee_command(set, EmployeeCommand::Add(new_employee("Bia", 2000)), &options())
            .unwrap()
    }

    fn figma() -> NewLicense {
        NewLicense {
            name: "Figma".to_string(),
            description: "Design tool".to_string(),
            category: "Design".to_string(),
            monthly_cost: Money::from(450),
        }
    }

    #[test]
    fn test_add_appends_in_order() {
        let set = team();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().name, "Bia");
        assert_eq!(set.get(1).unwrap().monthly_total, Money::from(5600));
    }

    #[test]
    fn test_add_duplicate_name_is_allowed() {
        let set = apply_employee_command(team(), EmployeeCommand::Add(new_employee("Ana", 1)), &options())
            .unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_edit_changes_only_given_fields() {
        let patch = EmployeePatch {
            position: Some("Tech Lead".to_string()),
            monthly_total: Some(Money::from(3000)),
            ..Default::default()
        };
        let set = apply_employee_command(team(), EmployeeCommand::Edit { index: 0, patch }, &options())
            .unwrap();
        let ana = set.get(0).unwrap();
        assert_eq!(ana.position, "Tech Lead");
        assert_eq!(ana.monthly_total, Money::from(3000));
        assert_eq!(ana.annual_total, Money::from(33600));
        assert_eq!(ana.name, "Ana");
    }

    #[test]
    fn test_edit_period_costs_updates_and_appends() {
        let patch = EmployeePatch {
            period_costs: vec![
                PeriodCost {
                    period: "jul".to_string(),
                    cost: Money::ZERO,
                },
                PeriodCost {
                    period: "Jan".to_string(),
                    cost: Money::from(100),
                },
            ],
            ..Default::default()
        };
        let set = apply_employee_command(team(), EmployeeCommand::Edit { index: 0, patch }, &options())
            .unwrap();
        let ana = set.get(0).unwrap();
        assert_eq!(ana.period_cost("Jul"), Some(Money::ZERO));
        assert_eq!(ana.period_cost("Jan"), Some(Money::from(100)));
        assert_eq!(ana.period_costs.len(), 7);
    }

    #[test]
    fn test_edit_blank_name_is_rejected() {
        let patch = EmployeePatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        let result = apply_employee_command(team(), EmployeeCommand::Edit { index: 0, patch }, &options());
        assert!(matches!(result, Err(DashboardError::InvalidRecord { .. })));
    }

    #[test]
    fn test_edit_blank_position_restores_placeholder() {
        let patch = EmployeePatch {
            position: Some(String::new()),
            ..Default::default()
        };
        let set = apply_employee_command(team(), EmployeeCommand::Edit { index: 1, patch }, &options())
            .unwrap();
        assert_eq!(set.get(1).unwrap().position, "Not informed");
    }

    #[test]
    fn test_edit_out_of_range_is_record_not_found() {
        let result = apply_employee_command(
            team(),
            EmployeeCommand::Edit {
                index: 9,
                patch: EmployeePatch::default(),
            },
            &options(),
        );
        match result {
            Err(DashboardError::RecordNotFound { index, len, .. }) => {
                assert_eq!(index, 9);
                assert_eq!(len, 2);
            }
            other => panic!("Expected RecordNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let set = apply_employee_command(team(), EmployeeCommand::Remove { index: 0 }, &options()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().name, "Bia");
    }

    #[test]
    fn test_remove_out_of_range() {
        let result = apply_employee_command(RecordSet::new(), EmployeeCommand::Remove { index: 0 }, &options());
        assert!(matches!(result, Err(DashboardError::RecordNotFound { .. })));
    }

    #[test]
    fn test_license_add_edit_remove() {
        let set = apply_license_command(RecordSet::new(), LicenseCommand::Add(figma())).unwrap();
        assert_eq!(set.get(0).unwrap().monthly_cost, Money::from(450));

        let patch = LicensePatch {
            monthly_cost: Some(Money::from(500)),
            category: Some(" UX ".to_string()),
            ..Default::default()
        };
        let set = apply_license_command(set, LicenseCommand::Edit { index: 0, patch }).unwrap();
        let figma = set.get(0).unwrap();
        assert_eq!(figma.monthly_cost, Money::from(500));
        assert_eq!(figma.category, "UX");
        assert_eq!(figma.description, "Design tool");

        let set = apply_license_command(set, LicenseCommand::Remove { index: 0 }).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_license_blank_name_is_rejected() {
        let mut input = figma();
        input.name = String::new();
        let result = apply_license_command(RecordSet::new(), LicenseCommand::Add(input));
        assert!(matches!(result, Err(DashboardError::InvalidRecord { .. })));
    }

    #[test]
    fn test_license_edit_out_of_range() {
        let result = apply_license_command(
            RecordSet::new(),
            LicenseCommand::Edit {
                index: 0,
                patch: LicensePatch::default(),
            },
        );
        assert!(matches!(result, Err(DashboardError::RecordNotFound { .. })));
    }
}
