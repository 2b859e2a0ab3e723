//! Cart operation errors.

use shoecart_core::ProductId;
use thiserror::Error;

use super::Notice;
use crate::inventory::InventoryError;
use crate::storage::StorageError;

/// Cart operation kind, used to pick the notice for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    /// Notice shown when this operation fails for any reason other than stock.
    #[must_use]
    pub const fn failure_notice(self) -> Notice {
        match self {
            Self::Add => Notice::AddFailed,
            Self::Remove => Notice::RemoveFailed,
            Self::Update => Notice::UpdateFailed,
        }
    }
}

/// Errors returned by the typed cart operations.
///
/// Every error leaves the cart and its snapshot as they were before the call.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity is more than the inventory has.
    #[error("Product {product_id}: requested {requested}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Inventory lookup failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Snapshot could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether this is an expected, shopper-correctable rejection rather than
    /// a failure.
    #[must_use]
    pub const fn is_policy_rejection(&self) -> bool {
        matches!(self, Self::StockExceeded { .. })
    }

    /// Notice for this error when raised by `operation`.
    #[must_use]
    pub const fn notice(&self, operation: Operation) -> Notice {
        match self {
            Self::StockExceeded { .. } => Notice::StockExceeded,
            _ => operation.failure_notice(),
        }
    }
}
