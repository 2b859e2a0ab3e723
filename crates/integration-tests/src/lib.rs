//! Integration tests for shoecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shoecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_protocol` - Cart manager against a file-backed snapshot
//! - `cart_api` - JSON routes through the axum router
//!
//! Fixtures here need no network: inventory is in memory and snapshots live
//! in a temporary directory.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use shoecart_core::{Product, ProductId};
use shoecart_storefront::cart::{CartManager, RecordingNotifier};
use shoecart_storefront::config::{InventoryConfig, StorageConfig, StorefrontConfig};
use shoecart_storefront::inventory::MemoryInventory;
use shoecart_storefront::storage::{CART_STORAGE_KEY, FileStore};
use tempfile::TempDir;

/// Catalog product with a predictable title and price.
#[must_use]
pub fn shoe(id: i32) -> Product {
    Product::new(ProductId::new(id), format!("Shoe {id}"), Decimal::new(9990, 2))
        .with_image(format!("https://cdn.example.com/{id}.jpg"))
}

/// Cart manager wired to an in-memory inventory and a snapshot file in a
/// temporary directory.
pub struct TestContext {
    pub manager: Arc<CartManager>,
    pub inventory: Arc<MemoryInventory>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: FileStore,
    dir: Arc<TempDir>,
}

impl TestContext {
    /// Fresh context with an empty data directory.
    pub async fn new(inventory: MemoryInventory) -> Self {
        let dir = Arc::new(TempDir::new().unwrap());
        Self::open(Arc::new(inventory), dir).await
    }

    /// New manager over the same inventory and data directory, as after a
    /// restart.
    pub async fn reopen(&self) -> Self {
        Self::open(self.inventory.clone(), self.dir.clone()).await
    }

    /// Raw snapshot text currently on disk.
    pub fn snapshot(&self) -> Option<String> {
        std::fs::read_to_string(self.store.path_for(CART_STORAGE_KEY)).ok()
    }

    /// Storefront configuration pointing at this context's data directory.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            inventory: InventoryConfig {
                base_url: url::Url::parse("http://127.0.0.1:9/").unwrap(),
                token: None,
                timeout: Duration::from_secs(1),
                catalog_ttl: Duration::from_secs(60),
            },
            storage: StorageConfig {
                data_dir: self.store.dir().to_path_buf(),
                key: CART_STORAGE_KEY.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// `(product id, amount)` pairs in cart order.
    pub async fn amounts(&self) -> Vec<(i32, u32)> {
        self.manager
            .cart()
            .await
            .iter()
            .map(|item| (item.product_id().as_i32(), item.amount))
            .collect()
    }

    async fn open(inventory: Arc<MemoryInventory>, dir: Arc<TempDir>) -> Self {
        let store = FileStore::new(dir.path());
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = CartManager::load(
            inventory.clone(),
            Arc::new(store.clone()),
            notifier.clone(),
            CART_STORAGE_KEY,
        )
        .await;

        Self {
            manager: Arc::new(manager),
            inventory,
            notifier,
            store,
            dir,
        }
    }
}
