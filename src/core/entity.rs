//! Entity trait defining the core abstraction for backend-owned records

use crate::core::field::FieldValue;
use serde::{Serialize, de::DeserializeOwned};

/// Base trait for all records handled by the dashboard.
///
/// Records are owned by the backend and identified by a stable string id
/// (the backend hands out opaque object ids). Attributes are opaque to the
/// cache and resolver; the view pipeline only reads them through
/// [`Entity::field_value`].
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable label of the resource (e.g., "Product", "Order")
    ///
    /// Used to build fallback labels for references that could not be resolved.
    fn resource_label() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> &str;

    /// Name shown in place of a reference to this record
    fn display_name(&self) -> &str;

    /// Get the value of a specific field by name
    ///
    /// Unknown fields return `None`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
