//! Process-lifetime series cache.
//!
//! Each CSV path is parsed once; later lookups hand out the same
//! `Arc<PriceSeries>`. Callers filter by date range on top of the shared
//! series, never mutating it.

use super::{load_csv, CsvOptions, DataError};
use crate::domain::PriceSeries;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

pub struct SeriesCache {
    options: CsvOptions,
    entries: Mutex<HashMap<PathBuf, Arc<PriceSeries>>>,
}

impl SeriesCache {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            options,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Shared cache with default CSV options, alive for the whole process.
    pub fn global() -> &'static SeriesCache {
        static GLOBAL: OnceLock<SeriesCache> = OnceLock::new();
        GLOBAL.get_or_init(|| SeriesCache::new(CsvOptions::default()))
    }

    /// Return the cached series for `path`, loading it on first use.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<PriceSeries>, DataError> {
        let key = cache_key(path.as_ref());
        let mut entries = self.lock();

        if let Some(series) = entries.get(&key) {
            debug!(path = %key.display(), "series cache hit");
            return Ok(Arc::clone(series));
        }

        let series = Arc::new(load_csv(&key, &self.options)?);
        entries.insert(key, Arc::clone(&series));
        Ok(series)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().contains_key(&cache_key(path.as_ref()))
    }

    /// Drop one entry so the next lookup reloads from disk.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.lock().remove(&cache_key(path.as_ref())).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<PriceSeries>>> {
        // Entries are only ever inserted whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(CsvOptions::default())
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
