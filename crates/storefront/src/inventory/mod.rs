//! Stock and catalog lookups.
//!
//! # Architecture
//!
//! - The inventory service is the source of truth for stock - never cached
//! - Catalog metadata is cached by the HTTP client (`moka`, configurable TTL)
//! - Any failure is reported as an [`InventoryError`]; the cart manager does
//!   not look at the cause, it aborts the operation
//!
//! # Implementations
//!
//! - [`HttpInventoryClient`] - JSON API (`GET stock/{id}`, `GET products/{id}`)
//! - [`MemoryInventory`] - In-process catalog for tests and offline sessions

mod http;
mod memory;

pub use http::HttpInventoryClient;
pub use memory::MemoryInventory;

use async_trait::async_trait;
use shoecart_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Read-only access to stock levels and product metadata.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, InventoryError>;

    /// Catalog metadata for a product.
    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError>;
}

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the inventory service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success status other than 404 and 429.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Stock or catalog answered for a different product than the one asked for.
    #[error("Inventory returned product {received} for product {requested}")]
    UnexpectedProduct {
        requested: ProductId,
        received: ProductId,
    },
}
