//! Client for the remote catalog/order REST service.
//!
//! # Architecture
//!
//! - The service is the source of truth; nothing here is authoritative
//! - Product detail and images are cached in memory via `moka` (5 minute TTL)
//! - The full product list is NOT cached here; [`crate::catalog::CatalogCache`]
//!   owns snapshot semantics for it
//!
//! # Endpoints
//!
//! - `GET /products`, `GET /products/search?keyword=`
//! - `GET /product/{id}`, `GET /product/{id}/image`
//! - `GET /categories`
//! - `POST /auth/login`, `POST /auth/admin/login`, `POST /auth/register`
//! - `POST /orders`
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::CatalogClient;
//!
//! let client = CatalogClient::new(&config.api)?;
//! let products = client.list_products().await?;
//! let shoes = client.search_products("shoes").await?;
//! ```

mod cache;
mod client;
pub mod http;
pub mod types;

use std::future::Future;

pub use client::CatalogClient;
pub use http::RestClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog/order service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service could not be reached (connect failure, timeout, reset).
    #[error("Network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// Whether this is a `NetworkError` in the sense of the error taxonomy:
    /// the service was unreachable or answered with a non-2xx status.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }

    /// HTTP status code, when the service answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Anything that can produce a full catalog snapshot.
///
/// [`CatalogClient`] is the production source; the catalog cache is generic
/// over this trait so it can be driven by scripted sources in tests.
pub trait CatalogSource: Send + Sync {
    /// Fetch every product currently in the catalog.
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<CatalogItem>, ApiError>> + Send;
}

impl CatalogSource for CatalogClient {
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<CatalogItem>, ApiError>> + Send {
        self.list_products()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = ApiError::Status {
            endpoint: "GET /products".to_string(),
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "GET /products returned HTTP 503: maintenance");
    }

    #[test]
    fn test_network_classification() {
        let status = ApiError::Status {
            endpoint: "POST /orders".to_string(),
            status: 500,
            message: String::new(),
        };
        assert!(status.is_network());
        assert_eq!(status.status(), Some(500));

        let not_found = ApiError::NotFound("product 1".to_string());
        assert!(!not_found.is_network());
        assert_eq!(not_found.status(), Some(404));

        let decode = ApiError::Decode {
            endpoint: "GET /products".to_string(),
            message: "expected array".to_string(),
        };
        assert!(!decode.is_network());
        assert_eq!(decode.status(), None);
    }
}
