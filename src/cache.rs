// src/cache.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, error, info};

use crate::{
    fetch::ResourceProvider,
    table::{parse_csv, ParsedTable},
};

/// Memoizes parsed CSV resources by path for the lifetime of the cache.
///
/// Entries are never invalidated. The lookup and the store are separate
/// critical sections, so two concurrent misses on one path both fetch; the
/// second store overwrites the first with an identical table.
pub struct DataCache {
    provider: Box<dyn ResourceProvider>,
    tables: Arc<Mutex<HashMap<String, Arc<ParsedTable>>>>,
}

impl DataCache {
    pub fn new(provider: Box<dyn ResourceProvider>) -> Self {
        Self {
            provider,
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the table for `path`, fetching and parsing it on first use.
    ///
    /// A failed fetch logs the error and yields an empty table; nothing is
    /// cached in that case so a later call retries.
    pub async fn load(&self, path: &str) -> Arc<ParsedTable> {
        if let Some(hit) = self.cached(path) {
            debug!(path, "cache hit");
            return hit;
        }

        match self.provider.fetch_text(path).await {
            Ok(text) => {
                let parsed = Arc::new(parse_csv(&text));
                info!(path, rows = parsed.rows.len(), "loaded csv");
                self.lock().insert(path.to_string(), Arc::clone(&parsed));
                parsed
            }
            Err(e) => {
                error!(path, error = %format!("{:#}", e), "Error loading CSV");
                Arc::new(ParsedTable::empty())
            }
        }
    }

    pub fn cached(&self, path: &str) -> Option<Arc<ParsedTable>> {
        self.lock().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<ParsedTable>>> {
        // a poisoned map still holds complete entries
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory provider that counts every fetch.
    #[derive(Default)]
    pub(crate) struct StubProvider {
        pub files: HashMap<String, String>,
        pub fetches: Arc<AtomicUsize>,
    }

    impl StubProvider {
        pub(crate) fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ResourceProvider for StubProvider {
        async fn fetch_text(&self, path: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow!("404 for {}", path))
        }
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let stub = StubProvider::with(&[("data/dscr_data.csv", "Year,DSCR\n2024,1.3\n")]);
        let fetches = Arc::clone(&stub.fetches);
        let cache = DataCache::new(Box::new(stub));

        let first = cache.load("data/dscr_data.csv").await;
        let second = cache.load("data/dscr_data.csv").await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.rows.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_table() {
        let stub = StubProvider::default();
        let fetches = Arc::clone(&stub.fetches);
        let cache = DataCache::new(Box::new(stub));

        let table = cache.load("data/missing.csv").await;
        assert_eq!(*table, ParsedTable::empty());
        assert!(cache.is_empty());

        // failures are not memoized
        cache.load("data/missing.csv").await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_cache_per_instance() {
        let files = [("a.csv", "H\n1\n")];
        let one = DataCache::new(Box::new(StubProvider::with(&files)));
        let two = DataCache::new(Box::new(StubProvider::with(&files)));
        one.load("a.csv").await;
        assert!(one.cached("a.csv").is_some());
        assert!(two.cached("a.csv").is_none());
    }
}
