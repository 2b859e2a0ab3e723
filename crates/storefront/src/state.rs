//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartManager, Notifier, TracingNotifier};
use crate::config::{StorageConfig, StorefrontConfig};
use crate::inventory::{HttpInventoryClient, InventoryError, MemoryInventory};
use crate::storage::FileStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is built once at startup
/// and handed to every consumer; there is no global cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: Arc<CartManager>,
}

impl AppState {
    /// Create a new application state around an existing cart manager.
    #[must_use]
    pub fn new(config: StorefrontConfig, cart: Arc<CartManager>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, cart }),
        }
    }

    /// Build the state from configuration: HTTP inventory, file-backed
    /// snapshot and tracing notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the inventory HTTP client cannot be built.
    pub async fn from_config(config: StorefrontConfig) -> Result<Self, InventoryError> {
        let cart = build_cart_manager(&config, Arc::new(TracingNotifier)).await?;
        Ok(Self::new(config, Arc::new(cart)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart manager.
    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }
}

/// Build a cart manager wired to the configured inventory API and data
/// directory.
///
/// # Errors
///
/// Returns an error if the inventory HTTP client cannot be built.
pub async fn build_cart_manager(
    config: &StorefrontConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<CartManager, InventoryError> {
    let inventory = HttpInventoryClient::new(&config.inventory)?;
    let store = FileStore::new(&config.storage.data_dir);

    Ok(CartManager::load(
        Arc::new(inventory),
        Arc::new(store),
        notifier,
        config.storage.key.clone(),
    )
    .await)
}

/// Build a cart manager over the configured snapshot with no inventory behind
/// it.
///
/// Stock and catalog lookups answer `NotFound`, so adds and updates fail with
/// their notices. Reading, removing and clearing work as usual.
pub async fn build_offline_cart_manager(
    storage: &StorageConfig,
    notifier: Arc<dyn Notifier>,
) -> CartManager {
    CartManager::load(
        Arc::new(MemoryInventory::new()),
        Arc::new(FileStore::new(&storage.data_dir)),
        notifier,
        storage.key.clone(),
    )
    .await
}
