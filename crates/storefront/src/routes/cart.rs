//! Cart route handlers.
//!
//! Mutations go through the typed cart operations so the response can carry
//! the outcome. Rejections and failures are reported to the manager's
//! notifier and come back as the fixed notice text via [`AppError`].

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shoecart_core::{Cart, ProductId, UpdateProductAmount};
use tracing::instrument;

use crate::cart::{CartError, Operation};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Cart,
    pub total_quantity: u64,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        Self {
            total_quantity: cart.total_quantity(),
            items: cart,
        }
    }
}

/// Add/remove request body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_id: ProductId,
}

/// Notify the failure, then turn it into the response error.
fn reject(state: &AppState, operation: Operation, err: CartError) -> AppError {
    state.cart().report(operation, &err);
    AppError::cart(operation, err)
}

/// Display cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart().cart().await.into())
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<CartView>> {
    state
        .cart()
        .try_add_product(request.product_id)
        .await
        .map_err(|e| reject(&state, Operation::Add, e))?;

    Ok(Json(state.cart().cart().await.into()))
}

/// Set a line to an explicit amount.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateProductAmount>,
) -> Result<Json<CartView>> {
    state
        .cart()
        .try_update_product_amount(request)
        .await
        .map_err(|e| reject(&state, Operation::Update, e))?;

    Ok(Json(state.cart().cart().await.into()))
}

/// Remove a product's line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<CartView>> {
    state
        .cart()
        .try_remove_product(request.product_id)
        .await
        .map_err(|e| reject(&state, Operation::Remove, e))?;

    Ok(Json(state.cart().cart().await.into()))
}

/// Cart item count.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<u64> {
    Json(state.cart().cart().await.total_quantity())
}
