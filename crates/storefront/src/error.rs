//! Unified error type for storefront operations.
//!
//! Every module keeps its own error enum; [`AppError`] wraps them for the
//! [`crate::state::AppState`] API and classifies them into the three kinds
//! callers act on.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::wishlist::WishlistError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Cart mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wishlist mutation was rejected.
    #[error(transparent)]
    Wishlist(#[from] WishlistError),

    /// Checkout could not proceed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product is not in the current catalog snapshot.
    #[error("Product {0} is not in the catalog")]
    NotInCatalog(shopfront_core::ProductId),
}

/// Coarse classification used to pick how an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Service unreachable or answered with a failure status.
    Network,
    /// Lookup miss, remote or in the cached catalog.
    NotFound,
    /// Input rejected locally.
    Validation,
    /// Anything else (local storage, configuration, malformed responses).
    Internal,
}

impl AppError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(e) | Self::Checkout(CheckoutError::Api(e)) => api_kind(e),
            Self::NotInCatalog(_) | Self::Wishlist(WishlistError::NotFound(_)) => ErrorKind::NotFound,
            Self::Cart(_)
            | Self::Wishlist(WishlistError::Cart(_))
            | Self::Checkout(
                CheckoutError::EmptyCart
                | CheckoutError::Unavailable(_)
                | CheckoutError::Validation(_)
                | CheckoutError::InvalidStage { .. },
            ) => ErrorKind::Validation,
            Self::Config(_) | Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

const fn api_kind(e: &ApiError) -> ErrorKind {
    match e {
        ApiError::Network { .. } | ApiError::Status { .. } => ErrorKind::Network,
        ApiError::NotFound(_) => ErrorKind::NotFound,
        ApiError::Decode { .. } => ErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    #[test]
    fn test_kinds() {
        let err = AppError::from(ApiError::Status {
            endpoint: "GET /products".to_string(),
            status: 502,
            message: String::new(),
        });
        assert_eq!(err.kind(), ErrorKind::Network);

        let err = AppError::from(CheckoutError::Api(ApiError::NotFound("product 3".to_string())));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(
            AppError::from(CartError::ZeroQuantity).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::NotInCatalog(ProductId::new(3)).kind(),
            ErrorKind::NotFound
        );
    }
}
