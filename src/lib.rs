//! # Storefront Admin
//!
//! Client-side core of a storefront administration dashboard. The backend
//! owns persistence, pricing and authorization; this crate owns what the
//! dashboard derives from the backend's data.
//!
//! ## Features
//!
//! - **Entity Cache**: last-known full records by id, persisted to an injected durable store
//! - **Fan-out Resolver**: cache-first, concurrent resolution of references with per-id failure isolation
//! - **Derived Views**: search → category filter → stable sort → paginate, as a pure function
//! - **Bulk Mutations**: concurrent per-id mutations with success/failure tally and reconciliation
//! - **Order Status**: closed set of lifecycle statuses, remote update + local mirror
//! - **Product Edits**: validated edits saved remotely, then mirrored in the list and cache
//! - **CSV Export**: export of the filtered product list
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront_admin::prelude::*;
//!
//! let cache = Arc::new(EntityCache::<Product>::open(Arc::new(InMemoryStore::new())).await);
//! let resolver = Resolver::new(cache, Arc::new(BackendClient::new(url, token)));
//!
//! // Resolve every product referenced by the orders
//! let ids: Vec<&str> = orders.iter().flat_map(|o| o.product_ids()).collect();
//! resolver.resolve(ids).await;
//!
//! // Render the first page of orders, searchable by product name
//! let spec = ViewSpec::new(["_id", "customer", "city"], Some("status"))
//!     .with_computed_search(move |order: &Order| {
//!         order.product_ids().map(|id| resolver.label_for(id)).collect()
//!     });
//! let page = render(&orders, &ViewState::default(), &spec);
//!
//! // Delete the selected products
//! let outcome = bulk_mutate(selection.ids().collect::<Vec<_>>(), &client).await;
//! outcome.reconcile(&mut products, &mut selection);
//! println!("{}", outcome.message("delete", "products"));
//! ```

pub mod bulk;
pub mod cache;
pub mod config;
pub mod core;
pub mod entities;
pub mod export;
#[cfg(feature = "http")]
pub mod http;
pub mod orders;
pub mod pipeline;
pub mod products;
pub mod resolve;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        DurableStore, Entity, EntityFetcher, EntityMutator, FieldValue, ProductUpdater,
        StatusUpdater,
        error::{AdminError, AdminResult, ConfigError, StoreError, ValidationError},
        query::{PaginationMeta, SortDirection, SortSpec, ViewPage, ViewState},
    };

    // === Components ===
    pub use crate::bulk::{BulkOutcome, OutcomeKind, Selection, bulk_mutate};
    pub use crate::cache::EntityCache;
    pub use crate::pipeline::{ViewController, ViewSpec, distinct_values, render};
    pub use crate::resolve::{Resolution, Resolver, fallback_label};

    // === Domain ===
    pub use crate::entities::{Address, LineItem, Order, OrderStatus, Product, ProductChanges};
    pub use crate::export::{export_filename, products_csv};
    pub use crate::orders::{change_status, status_counts};
    pub use crate::products::update_product;

    // === Storage ===
    pub use crate::storage::{FileStore, InMemoryStore};

    // === Config ===
    pub use crate::config::{CacheConfig, DashboardConfig, ViewConfig};

    // === HTTP ===
    #[cfg(feature = "http")]
    pub use crate::http::BackendClient;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use indexmap::IndexMap;
    pub use std::sync::Arc;
}
