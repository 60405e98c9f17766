//! Replace-on-write file persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};

fn io_error(path: &Path, error: std::io::Error) -> DashboardError {
    DashboardError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Writes `contents` to `path` so that readers see either the old file or
/// the complete new one, never a partial write.
///
/// The data goes to a temporary file in the destination directory, is
/// flushed to disk, and is then renamed over the target. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns `Io` if any step fails; the original file is left untouched.
pub fn write_atomically(path: &Path, contents: &[u8]) -> DashboardResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    staged.write_all(contents).map_err(|e| io_error(path, e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| io_error(path, e))?;
    staged.persist(path).map_err(|e| io_error(path, e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "File replaced");
    Ok(())
}
