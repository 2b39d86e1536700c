//! Walkthrough of a dashboard session against an in-process backend
//!
//! Run with `RUST_LOG=storefront_admin=debug cargo run --example dashboard`
//! to see the cache and resolver logs.

use anyhow::{Result, anyhow};
use chrono::Utc;
use std::sync::Mutex;
use storefront_admin::prelude::*;
use tracing_subscriber::EnvFilter;

/// Catalogue held in memory; "p-offline" always fails to load
struct LocalBackend {
    catalogue: Mutex<Vec<Product>>,
}

#[async_trait]
impl EntityFetcher<Product> for LocalBackend {
    async fn fetch(&self, id: &str) -> Result<Option<Product>> {
        if id == "p-offline" {
            return Err(anyhow!("connection reset"));
        }
        let catalogue = self.catalogue.lock().map_err(|_| anyhow!("catalogue poisoned"))?;
        Ok(catalogue.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl EntityMutator for LocalBackend {
    async fn mutate(&self, id: &str) -> Result<bool> {
        let mut catalogue = self.catalogue.lock().map_err(|_| anyhow!("catalogue poisoned"))?;
        let before = catalogue.len();
        catalogue.retain(|p| p.id != id);
        Ok(catalogue.len() < before)
    }
}

#[async_trait]
impl StatusUpdater for LocalBackend {
    async fn update_status(&self, _order_id: &str, _status: OrderStatus) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl ProductUpdater for LocalBackend {
    async fn update_product(&self, id: &str, changes: &ProductChanges) -> Result<bool> {
        let mut catalogue = self.catalogue.lock().map_err(|_| anyhow!("catalogue poisoned"))?;
        let Some(product) = catalogue.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        changes.apply_to(product);
        Ok(true)
    }
}

fn seed() -> Vec<Product> {
    let rows = [
        ("p-101", "Linen Shirt", "Men", 39.5),
        ("p-102", "Wool Coat", "Women", 120.0),
        ("p-103", "Rain Jacket", "Kids", 45.0),
        ("p-104", "Denim Jacket", "Men", 80.0),
        ("p-105", "Silk Scarf", "Women", 25.0),
        ("p-106", "Sneakers", "Kids", 30.0),
    ];
    rows.into_iter()
        .map(|(id, name, category, price)| Product::new(id, name, category, price))
        .collect()
}

fn order(id: &str, city: &str, items: &[(&str, u32, f64)], status: OrderStatus) -> Order {
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

    Order {
        id: id.to_string(),
        user_id: format!("user-{}", id),
        amount: products.iter().map(LineItem::total).sum(),
        products,
        address: Address {
            first_name: "Sam".to_string(),
            last_name: id.to_uppercase(),
            city: city.to_string(),
            ..Default::default()
        },
        status,
        payment_method: "COD".to_string(),
        payment: false,
        shipping_method: None,
        date: Utc::now().timestamp_millis(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DashboardConfig::from_yaml_str(
        r#"
page_size: 4
product_view:
  search_fields: [name, category]
  category_field: category
  default_sort: "price:desc"
"#,
    )?;

    let backend = LocalBackend {
        catalogue: Mutex::new(seed()),
    };
    let store = InMemoryStore::new();
    let cache = Arc::new(EntityCache::<Product>::open(Arc::new(store.clone())).await);
    let backend = Arc::new(backend);
    let resolver = Arc::new(
        Resolver::new(cache.clone(), backend.clone())
            .with_fallback_suffix_len(config.fallback_suffix_len),
    );

    // === Product list ===
    let mut products = seed();
    let mut view = ViewController::new(
        ViewSpec::from_config(&config.product_view),
        config.product_view_state()?,
    );

    let page = view.render(&products);
    println!(
        "Products {}-{} of {} (page {}/{})",
        page.pagination.first_index(),
        page.pagination.last_index(),
        page.pagination.total,
        page.pagination.page,
        page.pagination.total_pages
    );
    for product in &page.items {
        println!(
            "  {:<8} {:<14} {:<6} {:>7.2}",
            product.id, product.name, product.category, product.price
        );
    }

    println!("Categories: {:?}", distinct_values(&products, "category"));
    view.set_filter(Some("Kids".to_string()));
    let kids = view.render(&products);
    println!("Kids: {:?}", kids.items.iter().map(|p| &p.name).collect::<Vec<_>>());

    // === Edit ===
    let changes = ProductChanges {
        price: Some(35.0),
        ..ProductChanges::from(&products[0])
    };
    update_product(&mut products, &cache, backend.as_ref(), "p-101", &changes).await?;
    println!("{} now costs {:.2}", products[0].name, products[0].price);

    // === Bulk delete ===
    let mut selection = Selection::new();
    selection.select("p-102");
    selection.select("p-999");

    let outcome = bulk_mutate(selection.ids().collect::<Vec<_>>(), backend.as_ref()).await;
    outcome.reconcile(&mut products, &mut selection);
    cache.remove(outcome.succeeded_ids.iter().map(String::as_str)).await;
    println!("{}", outcome.message("delete", "products"));

    // === Orders ===
    let mut orders = vec![
        order("o-1", "Lyon", &[("p-101", 2, 39.5)], OrderStatus::OrderPlaced),
        order("o-2", "Nantes", &[("p-105", 1, 25.0), ("p-offline", 1, 10.0)], OrderStatus::Packing),
        order("o-3", "Lille", &[("p-106", 3, 30.0)], OrderStatus::Delivered),
    ];

    let referenced: Vec<&str> = orders.iter().flat_map(|o| o.product_ids()).collect();
    let resolution = resolver.resolve(referenced).await;
    println!(
        "Resolved {} products ({} fetched, {} unresolved)",
        resolution.resolved.len(),
        resolution.fetched,
        resolution.unresolved.len()
    );

    change_status(&mut orders, backend.as_ref(), "o-1", OrderStatus::Shipped).await?;

    let labels = resolver.clone();
    let order_spec =
        ViewSpec::from_config(&config.order_view).with_computed_search(move |o: &Order| {
            o.product_ids().map(|id| labels.label_for(id)).collect()
        });
    let mut order_view = ViewController::new(order_spec, config.order_view_state()?);
    order_view.set_search("scarf");

    for o in order_view.render(&orders).items {
        let names: Vec<String> = o.product_ids().map(|id| resolver.label_for(id)).collect();
        println!("  {} {} [{}] {}", o.id, o.address.city, o.status, names.join(", "));
    }

    for (status, count) in status_counts(&orders) {
        println!("  {:<16} {}", status, count);
    }

    // === Export ===
    let all = render(
        &products,
        &ViewState {
            page_size: products.len().max(1),
            ..view.state().clone()
        },
        view.spec(),
    );
    println!("{}", export_filename("products", Utc::now().date_naive()));
    println!("{}", products_csv(&all.items));

    cache.flush().await?;
    println!("Persisted cache: {} bytes", store.contents().map(|s| s.len()).unwrap_or(0));

    Ok(())
}
