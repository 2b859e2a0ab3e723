//! Cart commands.
//!
//! # Environment Variables
//!
//! - `SHOECART_INVENTORY_URL` - Base URL of the stock and catalog API
//!   (only `add` and `update` need it)
//! - `SHOECART_DATA_DIR` - Directory holding the cart snapshot

use std::sync::Arc;

use shoecart_core::{Cart, LineItem, ProductId, UpdateProductAmount};
use shoecart_storefront::cart::{CartManager, TracingNotifier};
use shoecart_storefront::config::{ConfigError, StorageConfig, StorefrontConfig};
use shoecart_storefront::inventory::InventoryError;
use shoecart_storefront::state::{build_cart_manager, build_offline_cart_manager};
use thiserror::Error;

/// Errors that can occur while opening the cart.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Inventory client could not be built.
    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Load configuration and open the persisted cart with the inventory API.
pub async fn open() -> Result<CartManager, CartCommandError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(data_dir = %config.storage.data_dir.display(), "Opening cart");
    Ok(build_cart_manager(&config, Arc::new(TracingNotifier)).await?)
}

/// Open the persisted cart for commands that never query inventory.
pub async fn open_offline() -> CartManager {
    let storage = StorageConfig::from_env();
    tracing::debug!(data_dir = %storage.data_dir.display(), "Opening cart offline");
    build_offline_cart_manager(&storage, Arc::new(TracingNotifier)).await
}

/// Set a product's quantity.
pub async fn update(manager: &CartManager, product_id: ProductId, amount: i64) {
    manager
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
}

/// Log the cart contents.
pub async fn show(manager: &CartManager) {
    let cart = manager.cart().await;
    for line in render(&cart) {
        tracing::info!("{line}");
    }
}

fn render(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart.iter().map(render_item).collect();
    lines.push(format!(
        "{} item(s), {} unit(s)",
        cart.len(),
        cart.total_quantity()
    ));
    lines
}

fn render_item(item: &LineItem) -> String {
    format!(
        "#{} {} x{} @ {}",
        item.product_id(),
        item.product.title,
        item.amount,
        item.product.price
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shoecart_core::Product;

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render(&Cart::new()), vec!["Cart is empty".to_string()]);
    }

    #[test]
    fn test_render_lists_items_in_order() {
        let cart = Cart::new()
            .with_new_item(Product::new(ProductId::new(2), "Trail", Decimal::new(13990, 2)))
            .with_new_item(Product::new(ProductId::new(1), "Road", Decimal::new(17990, 2)));
        let cart = cart.with_incremented(ProductId::new(2)).unwrap();

        assert_eq!(
            render(&cart),
            vec![
                "#2 Trail x2 @ 139.90".to_string(),
                "#1 Road x1 @ 179.90".to_string(),
                "2 item(s), 3 unit(s)".to_string(),
            ]
        );
    }
}
