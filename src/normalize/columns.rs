//! Column classification for raw tables.

use crate::models::RawTable;

/// Decides which columns of a raw table hold monetary values.
///
/// A column is monetary when its lowercased name contains one of the marker
/// substrings, or when its whole name (trimmed, case-insensitive) is one of
/// the period labels. Period labels are matched whole because short labels
/// such as "Dec" or "Mar" also occur inside ordinary words.
///
/// # Example
///
/// ```
/// use cost_dashboard::normalize::MonetaryColumnMatcher;
///
/// let matcher = MonetaryColumnMatcher::new(
///     vec!["cost".to_string(), "salary".to_string()],
///     vec!["Jul".to_string(), "Dec".to_string()],
/// );
/// assert!(matcher.is_monetary("Total Cost (month)"));
/// assert!(matcher.is_monetary("jul"));
/// assert!(!matcher.is_monetary("Description"));
/// assert_eq!(matcher.period_label("DEC"), Some("Dec"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonetaryColumnMatcher {
    markers: Vec<String>,
    periods: Vec<String>,
}

impl MonetaryColumnMatcher {
    /// Creates a matcher from marker substrings and period labels.
    pub fn new(markers: Vec<String>, periods: Vec<String>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            periods: periods
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns true if the column holds monetary values.
    pub fn is_monetary(&self, header: &str) -> bool {
        let lowered = header.trim().to_lowercase();
        self.markers.iter().any(|m| lowered.contains(m.as_str()))
            || self.period_label(header).is_some()
    }

    /// Returns the configured period label a header names, if any.
    pub fn period_label(&self, header: &str) -> Option<&str> {
        let header = header.trim();
        self.periods
            .iter()
            .find(|p| p.to_lowercase() == header.to_lowercase())
            .map(String::as_str)
    }

    /// Returns the configured period labels in order.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Returns `(label, column index)` for every period column in the table,
    /// in table column order.
    pub fn period_columns(&self, table: &RawTable) -> Vec<(String, usize)> {
        table
            .headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| self.period_label(header).map(|l| (l.to_string(), idx)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> MonetaryColumnMatcher {
        MonetaryColumnMatcher::new(
            vec!["cost".to_string(), "salary".to_string(), "custo".to_string()],
            vec!["Jul".to_string(), "Aug".to_string(), "Dec".to_string(), "Mar".to_string()],
        )
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let m = matcher();
        assert!(m.is_monetary("SALARY (month)"));
        assert!(m.is_monetary("Custo mensal"));
        assert!(m.is_monetary("Total Cost CLT (12 months)"));
    }

    #[test]
    fn test_text_columns_are_not_monetary() {
        let m = matcher();
        assert!(!m.is_monetary("Name"));
        assert!(!m.is_monetary("Position"));
        assert!(!m.is_monetary("Hiring"));
    }

    #[test]
    fn test_period_labels_do_not_match_inside_words() {
        let m = matcher();
        assert!(!m.is_monetary("Marketing"));
        assert!(!m.is_monetary("Decision"));
        assert!(m.is_monetary(" mar "));
    }

    #[test]
    fn test_period_columns_in_table_order() {
        let table = RawTable::new(
            vec![
                "Name".to_string(),
                "Aug".to_string(),
                "Jul".to_string(),
                "Total".to_string(),
            ],
            vec![],
        );
        assert_eq!(
            matcher().period_columns(&table),
            vec![("Aug".to_string(), 1), ("Jul".to_string(), 2)]
        );
    }

    #[test]
    fn test_blank_markers_are_dropped() {
        let m = MonetaryColumnMatcher::new(vec!["  ".to_string()], vec![]);
        assert!(!m.is_monetary("Name"));
    }
}
