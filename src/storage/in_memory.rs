//! In-memory implementation of DurableStore for testing and development

use crate::core::{DurableStore, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory durable store
///
/// Clones share the same slot, so a "restarted" cache can be opened on a
/// clone to simulate a process restart. An optional byte quota makes
/// oversized writes fail the way browser local storage does.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    slot: Arc<RwLock<Option<String>>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with raw contents
    pub fn with_contents(data: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(data.into()))),
            quota: None,
        }
    }

    /// Reject writes larger than `bytes`
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Raw contents, for inspection in tests
    pub fn contents(&self) -> Option<String> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn read(&self) -> Result<Option<String>, StoreError> {
        let slot = self.slot.read().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(slot.clone())
    }

    async fn write(&self, data: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota.filter(|quota| data.len() > *quota) {
            return Err(StoreError::QuotaExceeded {
                size: data.len(),
                quota,
            });
        }

        let mut slot = self.slot.write().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        *slot = Some(data.to_string());

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.write().map_err(|e| StoreError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        *slot = None;

        Ok(())
    }
}
