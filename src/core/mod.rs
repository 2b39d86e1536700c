//! Core module containing fundamental traits and types for the dashboard

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod service;
pub mod store;

pub use entity::Entity;
pub use error::{AdminError, AdminResult, ConfigError, StoreError, ValidationError};
pub use field::FieldValue;
pub use query::{PaginationMeta, SortDirection, SortSpec, ViewPage, ViewState};
pub use service::{EntityFetcher, EntityMutator, ProductUpdater, StatusUpdater};
pub use store::DurableStore;
