//! Ordered record collections.

use serde::{Deserialize, Serialize};

/// An ordered collection of records of one type.
///
/// Insertion order is preserved for display. No field is unique: two
/// employees with the same name are two records. Records are addressed by
/// their zero-based position.
///
/// # Example
///
/// ```
/// use cost_dashboard::models::RecordSet;
///
/// let set: RecordSet<&str> = vec!["a", "b", "a"].into();
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.get(2), Some(&"a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet<T> {
    records: Vec<T>,
}

impl<T> RecordSet<T> {
    /// Creates an empty record set.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Consumes the set, returning the records.
    pub fn into_vec(self) -> Vec<T> {
        self.records
    }

    pub(crate) fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for RecordSet<T> {
    fn from(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<T> FromIterator<T> for RecordSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for RecordSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RecordSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
