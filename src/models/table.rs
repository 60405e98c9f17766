//! Untyped tabular input.

/// A table of text cells as read from a delimited file.
///
/// Header names are kept as read (surrounding spaces trimmed). Rows shorter
/// than the header are treated as having blank trailing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a table, trimming the header names.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// Returns the cell at `row`, `column`, or `""` when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns true if every cell of the row is blank or whitespace.
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(|c| c.trim().is_empty()))
    }

    /// Returns the index of the first header matching any alias, compared
    /// trimmed and case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_dashboard::models::RawTable;
    ///
    /// let table = RawTable::new(vec![" Nome ".to_string(), "Cargo".to_string()], vec![]);
    /// assert_eq!(table.find_column(&["Name".to_string(), "nome".to_string()]), Some(0));
    /// assert_eq!(table.find_column(&["Salary".to_string()]), None);
    /// ```
    pub fn find_column(&self, aliases: &[String]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let alias = alias.trim().to_lowercase();
            self.headers
                .iter()
                .position(|h| h.to_lowercase() == alias)
        })
    }
}
