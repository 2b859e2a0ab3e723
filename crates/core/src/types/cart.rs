//! The cart: an ordered, copy-on-write sequence of line items.
//!
//! Order is the order in which products were first added. A cart never holds
//! two lines for the same product and never holds a line with a zero amount;
//! every constructor and transition in this module keeps both true.

use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::{LineItem, Product, ProductId};

/// Errors raised when a cart snapshot cannot be turned back into a cart.
#[derive(Debug, Error)]
pub enum CartSnapshotError {
    /// Snapshot is not a JSON array of line items.
    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Snapshot holds two lines for the same product.
    #[error("Duplicate line for product {0}")]
    DuplicateProduct(ProductId),

    /// Snapshot holds a line with amount zero.
    #[error("Zero amount for product {0}")]
    ZeroAmount(ProductId),
}

/// Request to set the quantity of a line to an explicit amount.
///
/// `amount` is signed: non-positive requests are accepted here and ignored by
/// the cart manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered sequence of line items.
///
/// Cloning is cheap; transitions return a new `Cart` and leave `self` as it
/// was, so a clone held elsewhere keeps seeing the old contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Arc<[LineItem]>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if two items share a product id or an item has a zero
    /// amount.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartSnapshotError> {
        for (index, item) in items.iter().enumerate() {
            if item.amount == 0 {
                return Err(CartSnapshotError::ZeroAmount(item.product_id()));
            }
            if items
                .iter()
                .take(index)
                .any(|earlier| earlier.product_id() == item.product_id())
            {
                return Err(CartSnapshotError::DuplicateProduct(item.product_id()));
            }
        }
        Ok(Self {
            items: items.into(),
        })
    }

    /// Parse a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for a list of line items
    /// or the items break the cart invariants.
    pub fn from_json(json: &str) -> Result<Self, CartSnapshotError> {
        let items: Vec<LineItem> = serde_json::from_str(json)?;
        Self::from_items(items)
    }

    /// Serialize the cart into its snapshot form.
    ///
    /// # Errors
    ///
    /// Returns an error if an item's extra metadata cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    /// Quantity of a product in the cart, zero if absent.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.find(product_id).map_or(0, |item| item.amount)
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Copy of this cart with one more unit of an existing line.
    ///
    /// Returns `None` if the product has no line.
    #[must_use]
    pub fn with_incremented(&self, product_id: ProductId) -> Option<Self> {
        self.find(product_id)?;
        Some(self.map_line(product_id, |item| {
            item.amount = item.amount.saturating_add(1);
        }))
    }

    /// Copy of this cart with a new line of amount 1 at the end.
    ///
    /// If the product already has a line, that line is incremented instead so
    /// the cart never holds two lines for one product.
    #[must_use]
    pub fn with_new_item(&self, product: Product) -> Self {
        if let Some(cart) = self.with_incremented(product.id) {
            return cart;
        }
        let mut items = self.items.to_vec();
        items.push(LineItem { product, amount: 1 });
        Self {
            items: items.into(),
        }
    }

    /// Copy of this cart with the product's line dropped.
    ///
    /// Returns `None` if the product has no line.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        self.find(product_id)?;
        let items: Vec<LineItem> = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        Some(Self {
            items: items.into(),
        })
    }

    /// Copy of this cart with the product's line set to `amount`.
    ///
    /// An absent product leaves the copy identical to `self`.
    #[must_use]
    pub fn with_amount(&self, product_id: ProductId, amount: NonZeroU32) -> Self {
        self.map_line(product_id, |item| item.amount = amount.get())
    }

    fn map_line(&self, product_id: ProductId, f: impl FnOnce(&mut LineItem)) -> Self {
        let mut items = self.items.to_vec();
        if let Some(item) = items.iter_mut().find(|item| item.product_id() == product_id) {
            f(item);
        }
        Self {
            items: items.into(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn shoe(id: i32) -> Product {
        Product::new(ProductId::new(id), format!("Shoe {id}"), Decimal::new(9990, 2))
    }

    fn line(id: i32, amount: u32) -> LineItem {
        LineItem {
            product: shoe(id),
            amount,
        }
    }

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.iter().map(|item| item.product_id().as_i32()).collect()
    }

    #[test]
    fn test_new_item_appends_with_amount_one() {
        let cart = Cart::new().with_new_item(shoe(2)).with_new_item(shoe(1));

        assert_eq!(ids(&cart), vec![2, 1]);
        assert_eq!(cart.amount_of(ProductId::new(2)), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_new_item_for_present_product_increments() {
        let cart = Cart::new().with_new_item(shoe(1)).with_new_item(shoe(1));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), 2);
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let before = Cart::from_items(vec![line(1, 1)]).unwrap();
        let after = before.with_incremented(ProductId::new(1)).unwrap();

        assert_eq!(before.amount_of(ProductId::new(1)), 1);
        assert_eq!(after.amount_of(ProductId::new(1)), 2);
    }

    #[test]
    fn test_increment_absent_is_none() {
        assert!(Cart::new().with_incremented(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_without_keeps_order_of_remaining() {
        let cart = Cart::from_items(vec![line(1, 1), line(2, 3), line(3, 1)]).unwrap();
        let cart = cart.without(ProductId::new(2)).unwrap();

        assert_eq!(ids(&cart), vec![1, 3]);
        assert!(cart.without(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_with_amount_on_absent_is_identity() {
        let cart = Cart::from_items(vec![line(1, 1)]).unwrap();
        let same = cart.with_amount(ProductId::new(9), NonZeroU32::new(4).unwrap());

        assert_eq!(same, cart);
    }

    #[test]
    fn test_with_amount_sets_line() {
        let cart = Cart::from_items(vec![line(1, 1), line(2, 1)]).unwrap();
        let cart = cart.with_amount(ProductId::new(2), NonZeroU32::new(4).unwrap());

        assert_eq!(cart.amount_of(ProductId::new(2)), 4);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(ids(&cart), vec![1, 2]);
    }

    #[test]
    fn test_from_items_rejects_duplicates() {
        let err = Cart::from_items(vec![line(1, 1), line(1, 2)]).unwrap_err();
        assert!(matches!(err, CartSnapshotError::DuplicateProduct(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_from_items_rejects_zero_amount() {
        let err = Cart::from_items(vec![line(4, 0)]).unwrap_err();
        assert!(matches!(err, CartSnapshotError::ZeroAmount(_)));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_order_and_metadata() {
        let mut product = shoe(5).with_image("5.jpg");
        product
            .extra
            .insert("color".to_string(), serde_json::json!("red"));
        let cart = Cart::from_items(vec![line(7, 2), LineItem { product, amount: 1 }]).unwrap();

        let json = cart.to_json().unwrap();
        let loaded = Cart::from_json(&json).unwrap();

        assert_eq!(loaded, cart);
        assert_eq!(loaded.to_json().unwrap(), json);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Cart::from_json("{not json"),
            Err(CartSnapshotError::Parse(_))
        ));
        assert!(Cart::from_json(r#"[{"id":1,"title":"a","price":"1","amount":0}]"#).is_err());
    }

    #[test]
    fn test_empty_cart_snapshot() {
        assert_eq!(Cart::new().to_json().unwrap(), "[]");
        assert!(Cart::from_json("[]").unwrap().is_empty());
    }
}
