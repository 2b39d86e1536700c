//! Entity cache persisted to a durable store
//!
//! The cache maps record ids to the last full copy seen from the backend.
//! It only ever accumulates: merges replace the supplied ids wholesale and
//! leave every other entry alone, and nothing expires. Entries go away only
//! through [`EntityCache::remove`] or [`EntityCache::clear`].
//!
//! Persistence is best-effort. A failed write is logged and swallowed, and
//! unreadable contents at startup yield an empty cache. Every write is a
//! read-modify-write union with what the store already holds, so several
//! caches may share one store without dropping each other's entries.
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let cache = EntityCache::<Product>::open(Arc::new(FileStore::new("cache.json"))).await;
//! cache.merge([(product.id.clone(), product)]).await;
//! cache.get("64f1c0a2");
//! cache.close().await;
//! ```

use crate::core::{DurableStore, Entity, StoreError};
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;

/// Cache of full records keyed by id
pub struct EntityCache<T: Entity> {
    entries: RwLock<IndexMap<String, T>>,
    store: Arc<dyn DurableStore>,
    // Serializes snapshot+write so the store always ends with the latest state
    persist_lock: Mutex<()>,
}

impl<T: Entity> EntityCache<T> {
    /// Open a cache on top of a durable store, loading whatever it holds
    pub async fn open(store: Arc<dyn DurableStore>) -> Self {
        let cache = Self {
            entries: RwLock::new(IndexMap::new()),
            store,
            persist_lock: Mutex::new(()),
        };

        let loaded = cache.load_all().await;
        tracing::debug!(
            resource = T::resource_label(),
            count = loaded.len(),
            "Entity cache opened"
        );

        cache
    }

    /// Reconstruct the cache from the durable store
    ///
    /// Stored entries are unioned with what is already in memory, in-memory
    /// entries winning. Unreadable or corrupt contents count as empty;
    /// individual entries that no longer deserialize are skipped.
    pub async fn load_all(&self) -> IndexMap<String, T> {
        let stored = match self.store.read().await {
            Ok(Some(raw)) => Self::parse(&raw),
            Ok(None) => IndexMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read entity cache, starting empty");
                IndexMap::new()
            }
        };

        let mut entries = self.write_entries();
        let mut merged = stored;
        for (id, entity) in entries.drain(..) {
            merged.insert(id, entity);
        }
        *entries = merged;

        entries.clone()
    }

    fn parse(raw: &str) -> IndexMap<String, T> {
        let values: IndexMap<String, serde_json::Value> = match serde_json::from_str(raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "Entity cache contents are corrupt, starting empty");
                return IndexMap::new();
            }
        };

        values
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value::<T>(value) {
                Ok(entity) => Some((id, entity)),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Skipping unreadable cache entry");
                    None
                }
            })
            .collect()
    }

    /// Get the cached copy of a record
    pub fn get(&self, id: &str) -> Option<T> {
        self.read_entries().get(id).cloned()
    }

    /// Check whether an id is cached
    pub fn contains(&self, id: &str) -> bool {
        self.read_entries().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Copy of all cached entries
    pub fn snapshot(&self) -> IndexMap<String, T> {
        self.read_entries().clone()
    }

    /// Union the given entries into the cache and persist
    ///
    /// Each supplied id replaces its previous entry wholesale; other ids are
    /// untouched. Persistence failures are logged, never returned.
    pub async fn merge<I>(&self, partial: I)
    where
        I: IntoIterator<Item = (String, T)>,
    {
        let inserted = {
            let mut entries = self.write_entries();
            let before = entries.len();
            let mut touched = 0usize;
            for (id, entity) in partial {
                entries.insert(id, entity);
                touched += 1;
            }
            tracing::debug!(
                touched,
                added = entries.len() - before,
                "Merged entries into cache"
            );
            touched
        };

        if inserted > 0 {
            self.persist_logged("merge", &[]).await;
        }
    }

    /// Remove entries, e.g. after the records were deleted on the backend
    ///
    /// The ids are dropped from the durable store as well, even when this
    /// cache never held them.
    pub async fn remove<'a, I>(&self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids: Vec<String> = ids.into_iter().map(str::to_string).collect();
        if ids.is_empty() {
            return;
        }

        let removed = {
            let mut entries = self.write_entries();
            ids.iter()
                .filter(|id| entries.shift_remove(id.as_str()).is_some())
                .count()
        };
        tracing::debug!(requested = ids.len(), removed, "Removed entries from cache");

        self.persist_logged("remove", &ids).await;
    }

    /// Drop every entry, in memory and in the durable store
    pub async fn clear(&self) {
        self.write_entries().clear();

        let _guard = self.persist_lock.lock().await;
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear entity cache store");
        }
    }

    /// Union the current entries into the durable store
    ///
    /// Entries already stored under other ids (written by another cache on
    /// the same store) are kept; ids held in memory overwrite theirs.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.persist(&[]).await
    }

    /// Flush and release the cache
    pub async fn close(self) {
        if let Err(e) = self.flush().await {
            tracing::warn!(error = %e, "Failed to flush entity cache on close");
        }
    }

    // Read, drop `removed`, overlay memory, write; all under `persist_lock`
    async fn persist(&self, removed: &[String]) -> Result<(), StoreError> {
        let _guard = self.persist_lock.lock().await;

        let mut stored: IndexMap<String, serde_json::Value> = match self.store.read().await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Overwriting corrupt entity cache contents");
                IndexMap::new()
            }),
            None => IndexMap::new(),
        };

        for id in removed {
            stored.shift_remove(id);
        }

        {
            let entries = self.read_entries();
            for (id, entity) in entries.iter() {
                stored.insert(id.clone(), serde_json::to_value(entity)?);
            }
        }

        let data = serde_json::to_string(&stored)?;
        self.store.write(&data).await
    }

    async fn persist_logged(&self, operation: &str, removed: &[String]) {
        if let Err(e) = self.persist(removed).await {
            tracing::warn!(operation, error = %e, "Failed to persist entity cache");
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, IndexMap<String, T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, IndexMap<String, T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
