//! Storefront records managed by the dashboard
//!
//! These mirror the JSON the backend returns. Only the fields used by the
//! list views are exposed through [`Entity::field_value`](crate::core::Entity::field_value).

pub mod order;
pub mod product;

pub use order::{Address, LineItem, Order, OrderStatus};
pub use product::{Product, ProductChanges};

use chrono::{DateTime, Utc};

/// Convert a backend millisecond timestamp into a UTC datetime
///
/// `0` is what a record without a date deserializes to and yields `None`.
pub(crate) fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Some(millis)
        .filter(|millis| *millis > 0)
        .and_then(DateTime::from_timestamp_millis)
}
