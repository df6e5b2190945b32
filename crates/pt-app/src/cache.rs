//! Memoized graph loading keyed by file identity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use parking_lot::RwLock;
use pt_graph::Graph;

use crate::error::{AppError, AppResult};

/// Canonical path plus modification marker of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    /// `None` on platforms without modification times.
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn of(path: &Path) -> AppResult<Self> {
        let access = |source| AppError::FileAccess {
            path: path.to_path_buf(),
            source,
        };
        let canonical = std::fs::canonicalize(path).map_err(access)?;
        let metadata = std::fs::metadata(&canonical).map_err(access)?;
        Ok(Self {
            path: canonical,
            modified: metadata.modified().ok(),
        })
    }
}

/// Store of built graphs. Entries leave only through [`GraphCache::invalidate`].
pub trait GraphCache: Send + Sync {
    fn get(&self, identity: &FileIdentity) -> Option<Arc<Graph>>;

    fn insert(&self, identity: FileIdentity, graph: Arc<Graph>);

    /// Drop every entry for `path` (canonical), whatever its modification marker.
    /// Returns the number of entries removed.
    fn invalidate(&self, path: &Path) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Read-mostly in-memory cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<FileIdentity, Arc<Graph>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}

impl GraphCache for MemoryCache {
    fn get(&self, identity: &FileIdentity) -> Option<Arc<Graph>> {
        let found = self.entries.read().get(identity).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn insert(&self, identity: FileIdentity, graph: Arc<Graph>) {
        self.entries.write().insert(identity, graph);
    }

    fn invalidate(&self, path: &Path) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|identity, _| identity.path != path);
        before - entries.len()
    }
}

/// Cache that never stores anything: every load re-reads the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl GraphCache for NoCache {
    fn get(&self, _identity: &FileIdentity) -> Option<Arc<Graph>> {
        None
    }

    fn insert(&self, _identity: FileIdentity, _graph: Arc<Graph>) {}

    fn invalidate(&self, _path: &Path) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_registry::Registry;
    use pt_schema::ArchitectureDoc;

    fn empty_graph() -> Arc<Graph> {
        Arc::new(pt_graph::build(&ArchitectureDoc::new("empty"), &Registry::standard()).unwrap())
    }

    fn identity(path: &str, secs: u64) -> FileIdentity {
        FileIdentity {
            path: PathBuf::from(path),
            modified: Some(SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs)),
        }
    }

    #[test]
    fn hit_after_insert() {
        let cache = MemoryCache::new();
        assert!(cache.get(&identity("/a.yaml", 1)).is_none());
        cache.insert(identity("/a.yaml", 1), empty_graph());
        assert!(cache.get(&identity("/a.yaml", 1)).is_some());
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn newer_marker_misses_but_keeps_old_entry() {
        let cache = MemoryCache::new();
        cache.insert(identity("/a.yaml", 1), empty_graph());
        assert!(cache.get(&identity("/a.yaml", 2)).is_none());
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn invalidate_drops_every_marker_of_a_path() {
        let cache = MemoryCache::new();
        cache.insert(identity("/a.yaml", 1), empty_graph());
        cache.insert(identity("/a.yaml", 2), empty_graph());
        cache.insert(identity("/b.yaml", 1), empty_graph());
        assert_eq!(cache.invalidate(Path::new("/a.yaml")), 2);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn no_cache_stores_nothing() {
        let cache = NoCache;
        cache.insert(identity("/a.yaml", 1), empty_graph());
        assert!(cache.get(&identity("/a.yaml", 1)).is_none());
    }

    #[test]
    fn caches_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryCache>();
        assert_send_sync::<Graph>();
        assert_send_sync::<Registry>();
    }
}
