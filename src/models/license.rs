//! Software license model.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Represents one software or tool subscription line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// The tool's name.
    pub name: String,
    /// What the license is used for.
    #[serde(default)]
    pub description: String,
    /// Free-text grouping (e.g. "Design", "Infra").
    #[serde(default)]
    pub category: String,
    /// The monthly subscription cost.
    pub monthly_cost: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_license_with_defaults() {
        let json = r#"{ "name": "Figma", "monthly_cost": "450.00" }"#;
        let license: LicenseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(license.name, "Figma");
        assert!(license.description.is_empty());
        assert!(license.category.is_empty());
        assert_eq!(license.monthly_cost, Money::from(450));
    }
}
