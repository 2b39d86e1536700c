//! Shared fixtures for dashboard integration tests
//!
//! Provides a scripted `FakeBackend` implementing every collaborator trait
//! and helpers for building products and orders.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use storefront_admin::core::{EntityFetcher, EntityMutator, ProductUpdater, StatusUpdater};
use storefront_admin::entities::{Address, LineItem, Order, OrderStatus, Product, ProductChanges};

// ---------------------------------------------------------------------------
// FakeBackend: scripted stand-in for the storefront API
// ---------------------------------------------------------------------------

/// In-process backend holding a product catalogue.
///
/// - ids in `unreachable` fail with a transport error on every call
/// - ids in `protected` are refused by delete and update (`Ok(false)`)
/// - every call is recorded in `fetch_calls` / `delete_calls` / `update_calls`
#[derive(Default)]
pub struct FakeBackend {
    pub catalogue: Mutex<Vec<Product>>,
    pub unreachable: HashSet<String>,
    pub protected: HashSet<String>,
    pub fetch_calls: Mutex<Vec<String>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub status_calls: Mutex<Vec<(String, OrderStatus)>>,
    pub update_calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_catalogue(catalogue: Vec<Product>) -> Self {
        Self {
            catalogue: Mutex::new(catalogue),
            ..Default::default()
        }
    }

    pub fn unreachable(mut self, ids: &[&str]) -> Self {
        self.unreachable.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn protected(mut self, ids: &[&str]) -> Self {
        self.protected.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn catalogue_product(&self, id: &str) -> Option<Product> {
        self.catalogue
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn catalogue_ids(&self) -> Vec<String> {
        self.catalogue
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }
}

#[async_trait]
impl EntityFetcher<Product> for FakeBackend {
    async fn fetch(&self, id: &str) -> Result<Option<Product>> {
        self.fetch_calls.lock().unwrap().push(id.to_string());
        tokio::task::yield_now().await;

        if self.unreachable.contains(id) {
            return Err(anyhow!("connection reset while fetching {}", id));
        }
        Ok(self
            .catalogue
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

#[async_trait]
impl EntityMutator for FakeBackend {
    async fn mutate(&self, id: &str) -> Result<bool> {
        self.delete_calls.lock().unwrap().push(id.to_string());
        tokio::task::yield_now().await;

        if self.unreachable.contains(id) {
            return Err(anyhow!("502 Bad Gateway"));
        }
        if self.protected.contains(id) {
            return Ok(false);
        }

        let mut catalogue = self.catalogue.lock().unwrap();
        let before = catalogue.len();
        catalogue.retain(|p| p.id != id);
        Ok(catalogue.len() < before)
    }
}

#[async_trait]
impl StatusUpdater for FakeBackend {
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<bool> {
        self.status_calls
            .lock()
            .unwrap()
            .push((order_id.to_string(), status));
        Ok(!self.unreachable.contains(order_id))
    }
}

#[async_trait]
impl ProductUpdater for FakeBackend {
    async fn update_product(&self, id: &str, changes: &ProductChanges) -> Result<bool> {
        self.update_calls.lock().unwrap().push(id.to_string());
        tokio::task::yield_now().await;

        if self.unreachable.contains(id) {
            return Err(anyhow!("502 Bad Gateway"));
        }
        if self.protected.contains(id) {
            return Ok(false);
        }

        let mut catalogue = self.catalogue.lock().unwrap();
        match catalogue.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                changes.apply_to(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn product(id: &str, name: &str, category: &str, price: f64) -> Product {
    Product::new(id, name, category, price)
}

/// Twelve products across three categories
pub fn catalogue() -> Vec<Product> {
    let categories = ["Men", "Women", "Kids"];
    (1..=12)
        .map(|i| {
            product(
                &format!("p{:02}", i),
                &format!("Item {:02}", i),
                categories[(i - 1) % 3],
                f64::from(i as u32) * 5.0,
            )
        })
        .collect()
}

pub fn order(id: &str, customer: (&str, &str), city: &str, items: &[(&str, u32, f64)]) -> Order {
    let products: Vec<LineItem> = items
        .iter()
        .map(|(product_id, quantity, price)| LineItem {
            product_id: product_id.to_string(),
            size: "M".to_string(),
            color: None,
            quantity: *quantity,
            price: *price,
        })
        .collect();
    let amount = products.iter().map(LineItem::total).sum();

    Order {
        id: id.to_string(),
        user_id: format!("user-{}", id),
        products,
        amount,
        address: Address {
            first_name: customer.0.to_string(),
            last_name: customer.1.to_string(),
            city: city.to_string(),
            ..Default::default()
        },
        status: OrderStatus::OrderPlaced,
        payment_method: "Stripe".to_string(),
        payment: true,
        shipping_method: None,
        date: 1_716_200_000_000,
    }
}

pub fn ids<T: storefront_admin::core::Entity>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}
