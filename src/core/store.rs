//! Durable key-value store trait backing the entity cache

use crate::core::error::StoreError;
use async_trait::async_trait;

/// A durable slot holding one serialized blob
///
/// The cache persists its whole mapping as a single string, the same way a
/// browser keeps it under one local-storage key. Implementations decide
/// where the blob lives; the cache only reads it at startup and rewrites
/// it after each change.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the stored blob
    ///
    /// # Returns
    /// `Ok(None)` when nothing has been written yet
    async fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob
    async fn write(&self, data: &str) -> Result<(), StoreError>;

    /// Remove the stored blob
    async fn clear(&self) -> Result<(), StoreError>;
}
