//! Fan-out resolution of references against the entity cache
//!
//! Given ids referenced by another collection (e.g., product ids on order
//! line items), the resolver serves what it can from the cache and fetches
//! the rest concurrently. Every lookup settles on its own: a failed or empty
//! lookup leaves that id unresolved without affecting the others.

use crate::cache::EntityCache;
use crate::core::{Entity, EntityFetcher};
use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Default number of trailing id characters used in fallback labels
pub const DEFAULT_FALLBACK_SUFFIX_LEN: usize = 6;

/// Outcome of a batch resolution
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// Every id that resolved, by cache hit or fresh fetch
    pub resolved: IndexMap<String, T>,

    /// Ids that could not be resolved (fetch failed or record absent)
    pub unresolved: Vec<String>,

    /// Number of remote lookups issued
    pub fetched: usize,
}

impl<T> Resolution<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.resolved.get(id)
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn into_map(self) -> IndexMap<String, T> {
        self.resolved
    }
}

/// Cache-first batch resolver
pub struct Resolver<T: Entity> {
    cache: Arc<EntityCache<T>>,
    fetcher: Arc<dyn EntityFetcher<T>>,
    fallback_suffix_len: usize,
}

impl<T: Entity> Resolver<T> {
    pub fn new(cache: Arc<EntityCache<T>>, fetcher: Arc<dyn EntityFetcher<T>>) -> Self {
        Self {
            cache,
            fetcher,
            fallback_suffix_len: DEFAULT_FALLBACK_SUFFIX_LEN,
        }
    }

    /// Set how many trailing id characters fallback labels show
    pub fn with_fallback_suffix_len(mut self, len: usize) -> Self {
        self.fallback_suffix_len = len.max(1);
        self
    }

    pub fn cache(&self) -> &Arc<EntityCache<T>> {
        &self.cache
    }

    /// Resolve a batch of ids
    ///
    /// Ids already cached are never fetched again. Missing ids are fetched
    /// concurrently, and the batch waits for every lookup to settle before
    /// merging the successes into the cache in one write.
    pub async fn resolve<I, S>(&self, ids: I) -> Resolution<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: IndexSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        let mut resolved = IndexMap::with_capacity(requested.len());
        let mut missing = Vec::new();
        for id in requested {
            match self.cache.get(&id) {
                Some(entity) => {
                    resolved.insert(id, entity);
                }
                None => missing.push(id),
            }
        }

        tracing::debug!(
            resource = T::resource_label(),
            hits = resolved.len(),
            misses = missing.len(),
            "Resolving references"
        );

        let outcomes = join_all(missing.iter().map(|id| self.fetcher.fetch(id))).await;

        let mut fresh = Vec::new();
        let mut unresolved = Vec::new();
        for (id, outcome) in missing.iter().zip(outcomes) {
            match outcome {
                Ok(Some(entity)) => fresh.push((id.clone(), entity)),
                Ok(None) => {
                    tracing::debug!(id = %id, "Record not found, leaving unresolved");
                    unresolved.push(id.clone());
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Lookup failed, leaving unresolved");
                    unresolved.push(id.clone());
                }
            }
        }

        if !fresh.is_empty() {
            self.cache.merge(fresh.iter().cloned()).await;
        }
        resolved.extend(fresh);

        Resolution {
            resolved,
            unresolved,
            fetched: missing.len(),
        }
    }

    /// Display name for a reference, falling back to a placeholder label
    pub fn label_for(&self, id: &str) -> String {
        match self.cache.get(id) {
            Some(entity) => entity.display_name().to_string(),
            None => fallback_label::<T>(id, self.fallback_suffix_len),
        }
    }
}

/// Placeholder label for an unresolved reference
///
/// `"{Label} {last N chars of id}"`, or `"Unknown {Label}"` for an empty id.
pub fn fallback_label<T: Entity>(id: &str, suffix_len: usize) -> String {
    if id.is_empty() {
        return format!("Unknown {}", T::resource_label());
    }

    let count = id.chars().count();
    let suffix: String = id.chars().skip(count.saturating_sub(suffix_len)).collect();
    format!("{} {}", T::resource_label(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Product;
    use crate::storage::InMemoryStore;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fetcher backed by a fixed catalogue that records every call
    struct CatalogueFetcher {
        catalogue: Vec<Product>,
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl CatalogueFetcher {
        fn new(catalogue: Vec<Product>) -> Self {
            Self {
                catalogue,
                failing: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, ids: &[&'static str]) -> Self {
            self.failing.extend_from_slice(ids);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntityFetcher<Product> for CatalogueFetcher {
        async fn fetch(&self, id: &str) -> Result<Option<Product>> {
            self.calls.lock().unwrap().push(id.to_string());
            if self.failing.iter().any(|failing| *failing == id) {
                return Err(anyhow!("connection reset"));
            }
            Ok(self.catalogue.iter().find(|p| p.id == id).cloned())
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product::new(id, name, "Men", 10.0)
    }

    async fn setup(
        cached: Vec<Product>,
        fetcher: CatalogueFetcher,
    ) -> (Resolver<Product>, Arc<CatalogueFetcher>) {
        let cache = Arc::new(EntityCache::open(Arc::new(InMemoryStore::new())).await);
        cache
            .merge(cached.into_iter().map(|p| (p.id.clone(), p)))
            .await;
        let fetcher = Arc::new(fetcher);
        (Resolver::new(cache, fetcher.clone()), fetcher)
    }

    #[tokio::test]
    async fn test_never_refetches_cached_ids() {
        let (resolver, fetcher) = setup(
            vec![product("p1", "Shirt")],
            CatalogueFetcher::new(vec![product("p2", "Hat")]),
        )
        .await;

        let resolution = resolver.resolve(["p1", "p2"]).await;

        assert_eq!(fetcher.calls(), vec!["p2".to_string()]);
        assert_eq!(resolution.fetched, 1);
        assert_eq!(resolution.get("p1").unwrap().name, "Shirt");
        assert_eq!(resolution.get("p2").unwrap().name, "Hat");
        assert!(resolution.is_complete());
    }

    #[tokio::test]
    async fn test_fresh_results_are_cached() {
        let (resolver, fetcher) =
            setup(vec![], CatalogueFetcher::new(vec![product("p2", "Hat")])).await;

        resolver.resolve(["p2"]).await;
        resolver.resolve(["p2"]).await;

        assert_eq!(fetcher.calls().len(), 1);
        assert!(resolver.cache().contains("p2"));
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let (resolver, _) = setup(
            vec![],
            CatalogueFetcher::new(vec![product("p1", "Shirt"), product("p3", "Sock")])
                .failing(&["p2"]),
        )
        .await;

        let resolution = resolver.resolve(["p1", "p2", "p3", "p4"]).await;

        assert_eq!(resolution.resolved.len(), 2);
        assert!(resolution.get("p1").is_some());
        assert!(resolution.get("p3").is_some());
        assert_eq!(resolution.unresolved, vec!["p2".to_string(), "p4".to_string()]);
        assert!(!resolver.cache().contains("p2"));
    }

    #[tokio::test]
    async fn test_duplicates_and_empty_ids() {
        let (resolver, fetcher) =
            setup(vec![], CatalogueFetcher::new(vec![product("p1", "Shirt")])).await;

        let resolution = resolver.resolve(["p1", "", "p1"]).await;

        assert_eq!(fetcher.calls(), vec!["p1".to_string()]);
        assert_eq!(resolution.resolved.len(), 1);
    }

    #[tokio::test]
    async fn test_label_for() {
        let (resolver, _) =
            setup(vec![product("p1", "Shirt")], CatalogueFetcher::new(vec![])).await;

        assert_eq!(resolver.label_for("p1"), "Shirt");
        assert_eq!(
            resolver.label_for("64f1c0a2e4b0a1b2c3d4e5f6"),
            "Product d4e5f6"
        );
        assert_eq!(resolver.label_for(""), "Unknown Product");
    }

    #[test]
    fn test_fallback_label_short_id() {
        assert_eq!(fallback_label::<Product>("ab", 6), "Product ab");
        assert_eq!(fallback_label::<Product>("abcdefgh", 3), "Product fgh");
    }
}
