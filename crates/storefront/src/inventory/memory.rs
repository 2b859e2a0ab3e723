//! In-process inventory.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use shoecart_core::{Product, ProductId, StockInfo};

use super::{InventoryClient, InventoryError};

/// Inventory held in memory.
///
/// Unknown products answer `NotFound` for both stock and catalog lookups.
/// Stock can be registered without a catalog entry to model a catalog that
/// lags behind the stock service.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    stock: Mutex<HashMap<ProductId, u32>>,
    catalog: Mutex<HashMap<ProductId, Product>>,
}

impl MemoryInventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with its available stock.
    #[must_use]
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.set_stock(product.id, stock);
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id, product);
        self
    }

    /// Set the available stock for a product.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id, amount);
    }
}

#[async_trait]
impl InventoryClient for MemoryInventory {
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, InventoryError> {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&product_id)
            .map(|&amount| StockInfo { product_id, amount })
            .ok_or_else(|| InventoryError::NotFound(format!("stock/{product_id}")))
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&product_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(format!("products/{product_id}")))
    }
}
