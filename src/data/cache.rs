use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};

use super::load_and_process;
use super::model::TourismTable;
use crate::config::PipelineConfig;

// ---------------------------------------------------------------------------
// Memoized load result
// ---------------------------------------------------------------------------

/// Identity of a source file at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    /// Stat the file. The path is canonicalised so aliases share one entry.
    pub fn stat(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("resolving {}", path.display()))?;
        let meta = std::fs::metadata(&path).context("reading file metadata")?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            path,
        })
    }
}

struct CacheEntry {
    key: SourceKey,
    table: Arc<TourismTable>,
}

/// Holds the last computed table and hands it out again while the source
/// file is unchanged. Any change in path, modification time or length
/// triggers a full reload; [`DatasetCache::invalidate`] forces one.
pub struct DatasetCache {
    config: PipelineConfig,
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl DatasetCache {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached table for `path`, recomputing it if the file changed.
    /// A failed load leaves the previous entry untouched.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<TourismTable>> {
        let key = SourceKey::stat(path)?;

        if let Some(entry) = &self.entry {
            if entry.key == key {
                self.hits += 1;
                log::debug!("cache hit for {}", key.path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        self.misses += 1;
        log::info!("loading {}", key.path.display());
        let table = Arc::new(load_and_process(&key.path, &self.config)?);
        self.entry = Some(CacheEntry {
            key,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drop the cached table; the next call reloads from disk.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("cache invalidated");
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
