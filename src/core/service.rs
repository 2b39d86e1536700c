//! Collaborator traits for the remote backend
//!
//! The dashboard core never talks to the network itself. It is handed these
//! collaborators and only coordinates them; transport, authentication and
//! timeouts are the implementation's business.

use crate::entities::{OrderStatus, ProductChanges};
use anyhow::Result;
use async_trait::async_trait;

/// Fetches a single full record by id
#[async_trait]
pub trait EntityFetcher<T>: Send + Sync {
    /// Fetch a record by id
    ///
    /// # Returns
    /// `Ok(None)` if the backend has no such record, an error if the lookup failed
    async fn fetch(&self, id: &str) -> Result<Option<T>>;
}

/// Applies a remote mutation (e.g., delete) to a single record
#[async_trait]
pub trait EntityMutator: Send + Sync {
    /// Apply the mutation to the record with the given id
    ///
    /// # Returns
    /// `Ok(true)` when the backend reports success, `Ok(false)` when it refused
    async fn mutate(&self, id: &str) -> Result<bool>;
}

/// Updates the lifecycle status of an order on the backend
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    /// Set the status of an order
    ///
    /// # Returns
    /// `Ok(true)` when the backend accepted the new status
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<bool>;
}

/// Saves edits to a product listing on the backend
#[async_trait]
pub trait ProductUpdater: Send + Sync {
    /// Apply `changes` to the product with the given id
    ///
    /// # Returns
    /// `Ok(true)` when the backend saved the edit
    async fn update_product(&self, id: &str, changes: &ProductChanges) -> Result<bool>;
}
