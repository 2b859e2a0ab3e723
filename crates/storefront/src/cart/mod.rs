//! Cart manager: the cart state machine and its snapshot synchronization.
//!
//! # Operations
//!
//! | operation | stock checked | absent product | present product |
//! |---|---|---|---|
//! | add | `current + 1` | fetch catalog entry, append with amount 1 | increment |
//! | remove | no | `NotInCart` | drop the line |
//! | update | `amount` | silent no-op | set amount |
//!
//! Each operation comes in two forms. The `try_*` form returns a typed
//! [`CartError`]. The plain form never fails: it maps the error to the single
//! [`Notice`] for that operation and hands it to the [`Notifier`].
//!
//! # Consistency
//!
//! A change is committed by writing the snapshot first and then swapping the
//! in-memory cart, both under the cart's write lock. If the write fails nothing
//! is swapped, so memory and storage never disagree about a committed change.
//!
//! Operations are not serialized against each other: the cart is read before
//! the inventory is queried and committed after, so two concurrent calls on
//! the same product can lose one update. The lock is never held across an
//! inventory call.

mod error;
mod notice;

pub use error::{CartError, Operation};
pub use notice::{Notice, Notifier, RecordingNotifier, TracingNotifier};

use std::num::NonZeroU32;
use std::sync::Arc;

use shoecart_core::{Cart, ProductId, UpdateProductAmount};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::inventory::InventoryClient;
use crate::storage::PersistentStore;

/// Result of a successful cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// New line appended with amount 1.
    Added { product_id: ProductId },
    /// Existing line increased by one.
    Incremented { product_id: ProductId, amount: u32 },
    /// Line dropped.
    Removed { product_id: ProductId },
    /// Line set to an explicit amount (possibly the amount it already had).
    AmountSet { product_id: ProductId, amount: u32 },
    /// Request ignored; nothing was written.
    Unchanged,
}

/// Stateful cart service backed by a persisted snapshot.
pub struct CartManager {
    cart: RwLock<Cart>,
    inventory: Arc<dyn InventoryClient>,
    store: Arc<dyn PersistentStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Create a manager seeded from the snapshot stored under `storage_key`.
    ///
    /// A missing, unreadable or invalid snapshot yields an empty cart.
    pub async fn load(
        inventory: Arc<dyn InventoryClient>,
        store: Arc<dyn PersistentStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();

        let cart = match store.read(&storage_key).await {
            Ok(Some(json)) => Cart::from_json(&json).unwrap_or_else(|e| {
                warn!(key = %storage_key, error = %e, "Discarding invalid cart snapshot");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        };

        info!(key = %storage_key, items = cart.len(), "Cart loaded");

        Self {
            cart: RwLock::new(cart),
            inventory,
            store,
            notifier,
            storage_key,
        }
    }

    /// Key the snapshot is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    // =========================================================================
    // Typed operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `StockExceeded` if the cart would hold more than the available
    /// stock, `Inventory` if stock or catalog lookup fails and `Storage` if
    /// the snapshot cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn try_add_product(&self, product_id: ProductId) -> Result<CartChange, CartError> {
        let cart = self.cart().await;
        let current = cart.amount_of(product_id);

        let stock = self.inventory.stock(product_id).await?;
        let requested = u64::from(current) + 1;
        if !stock.covers(requested) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let (updated, change) = match cart.with_incremented(product_id) {
            Some(updated) => {
                let amount = updated.amount_of(product_id);
                (updated, CartChange::Incremented { product_id, amount })
            }
            None => {
                let product = self.inventory.product(product_id).await?;
                (cart.with_new_item(product), CartChange::Added { product_id })
            }
        };

        self.commit(updated).await?;
        info!(change = ?change, "Cart updated");
        Ok(change)
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `NotInCart` if the product has no line and `Storage` if the
    /// snapshot cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn try_remove_product(&self, product_id: ProductId) -> Result<CartChange, CartError> {
        let cart = self.cart().await;
        let updated = cart
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(updated).await?;
        let change = CartChange::Removed { product_id };
        info!(change = ?change, "Cart updated");
        Ok(change)
    }

    /// Set a product's line to an explicit amount.
    ///
    /// Non-positive amounts and products without a line are ignored and return
    /// [`CartChange::Unchanged`]. Setting a line to the amount it already has
    /// still rewrites the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StockExceeded` if `amount` is more than the available stock,
    /// `Inventory` if the stock lookup fails and `Storage` if the snapshot
    /// cannot be written.
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<CartChange, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(CartChange::Unchanged);
        }

        let cart = self.cart().await;
        let exists = cart.find(product_id).is_some();

        let stock = self.inventory.stock(product_id).await?;
        if !exists {
            debug!("Ignoring update for product not in cart");
            return Ok(CartChange::Unchanged);
        }

        let requested = amount.unsigned_abs();
        let Some(amount) = u32::try_from(amount)
            .ok()
            .and_then(NonZeroU32::new)
            .filter(|_| stock.covers(requested))
        else {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        };

        self.commit(cart.with_amount(product_id, amount)).await?;
        let change = CartChange::AmountSet {
            product_id,
            amount: amount.get(),
        };
        info!(change = ?change, "Cart updated");
        Ok(change)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the snapshot cannot be written.
    #[instrument(skip(self))]
    pub async fn try_clear(&self) -> Result<(), CartError> {
        self.commit(Cart::new()).await?;
        info!("Cart cleared");
        Ok(())
    }

    // =========================================================================
    // Notifying operations
    // =========================================================================

    /// Add one unit of a product, notifying on rejection or failure.
    pub async fn add_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_add_product(product_id).await {
            self.report(Operation::Add, &err);
        }
    }

    /// Remove a product's line, notifying on failure.
    pub async fn remove_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_remove_product(product_id).await {
            self.report(Operation::Remove, &err);
        }
    }

    /// Set a product's line to an explicit amount, notifying on rejection or
    /// failure.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        if let Err(err) = self.try_update_product_amount(request).await {
            self.report(Operation::Update, &err);
        }
    }

    /// Log `err` and hand the notice for `operation` to the notifier.
    pub fn report(&self, operation: Operation, err: &CartError) {
        if err.is_policy_rejection() {
            info!(operation = ?operation, error = %err, "Cart change rejected");
        } else {
            tracing::error!(operation = ?operation, error = %err, "Cart operation failed");
        }
        self.notifier.notify(err.notice(operation));
    }

    /// Persist `cart`, then make it the current cart.
    ///
    /// The write lock is held across the store write so commits land in the
    /// store and in memory in the same order.
    async fn commit(&self, cart: Cart) -> Result<(), CartError> {
        let json = cart.to_json().map_err(crate::storage::StorageError::from)?;
        let mut current = self.cart.write().await;
        self.store.write(&self.storage_key, &json).await?;
        *current = cart;
        Ok(())
    }
}
