//! Content-keyed memoization of parsed files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::DashboardResult;

/// Returns the hexadecimal SHA-256 digest of file contents.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

struct CacheEntry<T> {
    digest: String,
    value: T,
}

/// Caches the parse result of each file, keyed on a digest of its bytes.
///
/// A lookup only hits when the file's current contents hash to the digest
/// stored with the entry, so an edited file is always re-parsed. Writers
/// also call [`ParseCache::invalidate`] after replacing a file.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use cost_dashboard::storage::ParseCache;
///
/// let mut cache: ParseCache<usize> = ParseCache::new();
/// let path = Path::new("employees.csv");
/// let first = cache.get_or_parse(path, b"a,b", || Ok(1)).unwrap();
/// let second = cache.get_or_parse(path, b"a,b", || Ok(2)).unwrap();
/// assert_eq!((first, second), (1, 1));
/// ```
pub struct ParseCache<T> {
    entries: HashMap<PathBuf, CacheEntry<T>>,
}

impl<T: Clone> ParseCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for these exact contents, or runs `parse`
    /// and caches its result. Errors are not cached.
    pub fn get_or_parse<F>(&mut self, path: &Path, bytes: &[u8], parse: F) -> DashboardResult<T>
    where
        F: FnOnce() -> DashboardResult<T>,
    {
        let digest = content_digest(bytes);
        if let Some(entry) = self.entries.get(path) {
            if entry.digest == digest {
                debug!(path = %path.display(), "Parse cache hit");
                return Ok(entry.value.clone());
            }
        }

        let value = parse()?;
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                digest,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Drops the entry for a path.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for ParseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
