//! Catalog products, cart line items and stock levels.
//!
//! Products are copied into the cart the first time they are added, so a
//! [`LineItem`] carries the catalog metadata as it was at that moment. Fields
//! the cart does not know about are kept in [`Product::extra`] and written back
//! out unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// Product metadata as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price. Carried for display only.
    pub price: Decimal,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Any other catalog fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Create a product with no extra metadata.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }
}

/// One product entry in the cart with its quantity.
///
/// Serializes as a flat object: the product fields plus `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    /// Quantity in the cart. Never zero for an item held by a [`super::Cart`].
    pub amount: u32,
}

impl LineItem {
    /// Product id of this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// Available quantity for a product, as reported by the inventory service.
///
/// Fetched fresh for every mutation; never cached or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockInfo {
    /// Whether `requested` units can be satisfied by this stock level.
    #[must_use]
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}
