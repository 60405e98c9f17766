//! Flat-file storage for the cost dashboard.
//!
//! This module reads and writes the delimited data files: decoding with an
//! encoding fallback, parsing into raw tables, rendering record sets,
//! replacing files atomically, and memoizing parse results by content.

mod atomic;
mod cache;
mod csv_io;
mod encoding;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{DashboardError, DashboardResult};

pub use atomic::write_atomically;
pub use cache::{ParseCache, content_digest};
pub use csv_io::{Delimiter, ExportOptions, read_table, write_employees, write_licenses};
pub use encoding::{SourceEncoding, decode};

/// Reads a data file's raw bytes.
///
/// # Errors
///
/// Returns `FileNotFound` when the file does not exist and `Io` for any
/// other failure.
pub fn read_source(path: &Path) -> DashboardResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        let path = path.display().to_string();
        match e.kind() {
            ErrorKind::NotFound => DashboardError::FileNotFound { path },
            _ => DashboardError::Io {
                path,
                message: e.to_string(),
            },
        }
    })
}
