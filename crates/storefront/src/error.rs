//! Unified error handling with Sentry integration.
//!
//! Provides an `AppError` type that captures failures to Sentry before
//! responding to the client. Cart route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartError, Notice, Operation};
use crate::inventory::InventoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation was rejected or failed.
    #[error("{notice}: {source}")]
    Cart {
        notice: Notice,
        #[source]
        source: CartError,
    },
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    notice: Notice,
}

impl AppError {
    /// Wrap a cart error raised by `operation`.
    #[must_use]
    pub fn cart(operation: Operation, source: CartError) -> Self {
        Self::Cart {
            notice: source.notice(operation),
            source,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Cart { source, .. } => match source {
                CartError::StockExceeded { .. } => StatusCode::CONFLICT,
                CartError::NotInCart(_) | CartError::Inventory(InventoryError::NotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                CartError::Inventory(_) => StatusCode::BAD_GATEWAY,
                CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture operational failures to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::info!(error = %self, "Request rejected");
        }

        // Only the fixed notice text reaches the client
        let Self::Cart { notice, .. } = self;
        let body = ErrorBody {
            error: notice.message(),
            notice,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use shoecart_core::ProductId;

    use super::*;
    use crate::storage::StorageError;

    fn status_of(operation: Operation, err: CartError) -> StatusCode {
        AppError::cart(operation, err).into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::cart(Operation::Remove, CartError::NotInCart(ProductId::new(4)));
        assert_eq!(
            err.to_string(),
            "Error removing product: Product 4 is not in the cart"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(
                Operation::Add,
                CartError::StockExceeded {
                    product_id: ProductId::new(1),
                    requested: 2,
                    available: 1,
                }
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(Operation::Remove, CartError::NotInCart(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                Operation::Add,
                CartError::Inventory(InventoryError::NotFound("stock/1".to_string()))
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                Operation::Update,
                CartError::Inventory(InventoryError::RateLimited(5))
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                Operation::Add,
                CartError::Storage(StorageError::Io(std::io::Error::other("disk full")))
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_picks_operation_notice() {
        let AppError::Cart { notice, .. } = AppError::cart(
            Operation::Update,
            CartError::Inventory(InventoryError::RateLimited(5)),
        );
        assert_eq!(notice, Notice::UpdateFailed);
    }
}
