//! reqwest-backed collaborators for the storefront backend
//!
//! Enabled with the `http` feature. Every call carries the admin bearer
//! token; the backend answers with a JSON envelope whose `success` flag
//! decides the outcome.

use crate::core::{EntityFetcher, EntityMutator, ProductUpdater, StatusUpdater};
use crate::entities::{Order, OrderStatus, Product, ProductChanges};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    product: Option<Product>,
    #[serde(default)]
    products: Option<Vec<Product>>,
    #[serde(default)]
    orders: Option<Vec<Order>>,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    /// The listed records, or an error carrying the backend's message
    fn into_listing<T>(
        self,
        what: &str,
        pick: impl FnOnce(Self) -> Option<Vec<T>>,
    ) -> Result<Vec<T>> {
        if !self.success {
            bail!(
                "backend refused to list {}: {}",
                what,
                self.message.unwrap_or_default()
            );
        }
        Ok(pick(self).unwrap_or_default())
    }
}

/// Client for the storefront admin API
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Use a preconfigured client (timeouts, proxies)
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn envelope(&self, request: reqwest::RequestBuilder) -> Result<Envelope> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .context("request to backend failed")?
            .error_for_status()?;

        let envelope: Envelope = response
            .json()
            .await
            .context("backend returned an unexpected body")?;

        if !envelope.success {
            tracing::debug!(
                reason = envelope.message.as_deref().unwrap_or_default(),
                "Backend reported failure"
            );
        }

        Ok(envelope)
    }

    /// Every product in the catalogue
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let request = self.client.get(self.url("/api/products/list"));

        self.envelope(request)
            .await?
            .into_listing("products", |envelope| envelope.products)
    }

    /// Every order placed on the storefront
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let request = self
            .client
            .post(self.url("/api/order/list"))
            .json(&json!({}));

        self.envelope(request)
            .await?
            .into_listing("orders", |envelope| envelope.orders)
    }
}

#[async_trait]
impl EntityFetcher<Product> for BackendClient {
    async fn fetch(&self, id: &str) -> Result<Option<Product>> {
        let request = self
            .client
            .post(self.url("/api/products/single"))
            .json(&json!({ "productsId": id }));

        let envelope = self.envelope(request).await?;
        Ok(envelope.product.filter(|_| envelope.success))
    }
}

#[async_trait]
impl EntityMutator for BackendClient {
    async fn mutate(&self, id: &str) -> Result<bool> {
        let request = self
            .client
            .delete(self.url(&format!("/api/products/delete/{}", id)));

        Ok(self.envelope(request).await?.success)
    }
}

#[async_trait]
impl StatusUpdater for BackendClient {
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<bool> {
        let request = self
            .client
            .post(self.url("/api/order/status"))
            .json(&json!({ "orderId": order_id, "status": status }));

        Ok(self.envelope(request).await?.success)
    }
}

#[async_trait]
impl ProductUpdater for BackendClient {
    async fn update_product(&self, id: &str, changes: &ProductChanges) -> Result<bool> {
        let request = self
            .client
            .put(self.url(&format!("/api/products/update/{}", id)))
            .json(changes);

        Ok(self.envelope(request).await?.success)
    }
}
