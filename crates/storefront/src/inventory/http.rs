//! HTTP inventory client.
//!
//! Talks to a JSON API exposing `GET {base}/stock/{id}` and
//! `GET {base}/products/{id}`. Products are cached with `moka`; stock is
//! fetched on every call.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shoecart_core::{Product, ProductId, StockInfo};
use tracing::{debug, instrument};
use url::Url;

use super::{InventoryClient, InventoryError};
use crate::config::InventoryConfig;

/// Client for the inventory JSON API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct HttpInventoryClient {
    inner: Arc<HttpInventoryClientInner>,
}

struct HttpInventoryClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
    catalog: Cache<ProductId, Product>,
}

impl HttpInventoryClient {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let catalog = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpInventoryClientInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                token: config.token.clone(),
                catalog,
            }),
        })
    }

    /// GET a path relative to the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, InventoryError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(InventoryError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(path.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Inventory API returned non-success status"
            );
            return Err(InventoryError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse inventory response"
            );
            InventoryError::Parse(e)
        })
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, InventoryError> {
        let stock: StockInfo = self.get_json(&format!("stock/{product_id}")).await?;
        if stock.product_id != product_id {
            return Err(InventoryError::UnexpectedProduct {
                requested: product_id,
                received: stock.product_id,
            });
        }

        debug!(amount = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        if let Some(product) = self.inner.catalog.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{product_id}")).await?;
        if product.id != product_id {
            return Err(InventoryError::UnexpectedProduct {
                requested: product_id,
                received: product.id,
            });
        }

        self.inner.catalog.insert(product_id, product.clone()).await;

        Ok(product)
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
