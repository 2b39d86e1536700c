//! Product listing edits

use crate::cache::EntityCache;
use crate::core::error::{AdminError, AdminResult};
use crate::core::ProductUpdater;
use crate::entities::{Product, ProductChanges};

/// Save an edit on the backend, then mirror it in the list and the cache
///
/// Edits missing a name, category or price are rejected before any request
/// is made. The list and the cache are only touched once the backend
/// confirms the edit.
pub async fn update_product(
    products: &mut [Product],
    cache: &EntityCache<Product>,
    updater: &dyn ProductUpdater,
    product_id: &str,
    changes: &ProductChanges,
) -> AdminResult<()> {
    changes.check()?;

    let accepted = updater
        .update_product(product_id, changes)
        .await
        .map_err(|e| AdminError::Mutation {
            id: product_id.to_string(),
            message: e.to_string(),
        })?;

    if !accepted {
        return Err(AdminError::Mutation {
            id: product_id.to_string(),
            message: "backend refused update".to_string(),
        });
    }

    if let Some(product) = products.iter_mut().find(|product| product.id == product_id) {
        changes.apply_to(product);
    }

    // Only refresh an entry the cache already holds
    if let Some(mut cached) = cache.get(product_id) {
        changes.apply_to(&mut cached);
        cache.merge([(product_id.to_string(), cached)]).await;
    }

    tracing::info!(product_id, "Product updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::storage::InMemoryStore;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Backend {
        refuse: bool,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProductUpdater for Backend {
        async fn update_product(&self, id: &str, _changes: &ProductChanges) -> Result<bool> {
            self.calls.lock().unwrap().push(id.to_string());
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok(!self.refuse)
        }
    }

    async fn cache_with(products: &[Product]) -> EntityCache<Product> {
        let cache = EntityCache::open(Arc::new(InMemoryStore::new())).await;
        cache
            .merge(products.iter().map(|p| (p.id.clone(), p.clone())))
            .await;
        cache
    }

    fn renamed(product: &Product, name: &str) -> ProductChanges {
        ProductChanges {
            name: Some(name.to_string()),
            ..ProductChanges::from(product)
        }
    }

    #[tokio::test]
    async fn test_update_applies_to_list_and_cache() {
        let mut products = vec![
            Product::new("p1", "Cap", "Kids", 5.0),
            Product::new("p2", "Coat", "Women", 90.0),
        ];
        let cache = cache_with(&products).await;
        let backend = Backend::default();

        let changes = ProductChanges {
            price: Some(7.5),
            ..renamed(&products[0], "Sun Cap")
        };
        update_product(&mut products, &cache, &backend, "p1", &changes)
            .await
            .unwrap();

        assert_eq!(products[0].name, "Sun Cap");
        assert_eq!(products[0].price, 7.5);
        assert_eq!(products[1].name, "Coat");
        assert_eq!(cache.get("p1").unwrap().name, "Sun Cap");
    }

    #[tokio::test]
    async fn test_update_does_not_add_uncached_product() {
        let mut products = vec![Product::new("p1", "Cap", "Kids", 5.0)];
        let cache = cache_with(&[]).await;
        let backend = Backend::default();

        let changes = renamed(&products[0], "Sun Cap");
        update_product(&mut products, &cache, &backend, "p1", &changes)
            .await
            .unwrap();

        assert_eq!(products[0].name, "Sun Cap");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_edit_is_not_sent() {
        let mut products = vec![Product::new("p1", "Cap", "Kids", 5.0)];
        let cache = cache_with(&products).await;
        let backend = Backend::default();

        let changes = ProductChanges {
            price: None,
            ..renamed(&products[0], "Sun Cap")
        };
        let err = update_product(&mut products, &cache, &backend, "p1", &changes)
            .await
            .unwrap_err();

        let AdminError::Validation(ValidationError::InvalidField { field, .. }) = err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert_eq!(field, "price");
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(products[0].name, "Cap");
    }

    #[tokio::test]
    async fn test_refused_or_failed_update_leaves_product() {
        let mut products = vec![Product::new("p1", "Cap", "Kids", 5.0)];
        let cache = cache_with(&products).await;
        let changes = renamed(&products[0], "Sun Cap");

        let refusing = Backend {
            refuse: true,
            ..Default::default()
        };
        let err = update_product(&mut products, &cache, &refusing, "p1", &changes)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Mutation { ref id, .. } if id == "p1"));

        let failing = Backend {
            fail: true,
            ..Default::default()
        };
        let err = update_product(&mut products, &cache, &failing, "p1", &changes)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));

        assert_eq!(products[0].name, "Cap");
        assert_eq!(cache.get("p1").unwrap().name, "Cap");
    }
}
