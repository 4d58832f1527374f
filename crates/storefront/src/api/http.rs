//! Shared REST plumbing for the storefront and admin clients.
//!
//! Every call goes through [`RestClient::execute`] (JSON response) or
//! [`RestClient::execute_empty`] (body ignored) so status handling, error
//! extraction and logging are identical across endpoints.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::ApiError;
use crate::config::ApiConfig;

/// Maximum number of body characters copied into logs and errors.
const BODY_SNIPPET_CHARS: usize = 200;

/// Low-level HTTP client bound to the service base URL.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Create a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the underlying HTTP client cannot be
    /// built (e.g. TLS backend initialisation failure).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiError::Network {
                endpoint: "client_init".to_string(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for a service path such as `/products`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Start a request against a service path.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.client.request(method, self.url(path))
    }

    /// `GET` a path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::execute`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(format!("GET {path}"), self.request(Method::GET, path))
            .await
    }

    /// Send a request and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// - `ApiError::Network` if the request never got a response
    /// - `ApiError::NotFound` on HTTP 404
    /// - `ApiError::Status` on any other non-2xx status
    /// - `ApiError::Decode` if the body is not the expected JSON
    pub async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: String,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = send(&endpoint, request).await?;
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| {
            error!(
                endpoint = %endpoint,
                error = %e,
                body = %snippet(&body),
                "Failed to parse service response"
            );
            ApiError::Decode {
                endpoint,
                message: e.to_string(),
            }
        })
    }

    /// Send a request whose response body is irrelevant.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::execute`], minus decoding.
    pub async fn execute_empty(
        &self,
        endpoint: String,
        request: RequestBuilder,
    ) -> Result<(), ApiError> {
        send(&endpoint, request).await.map(|_| ())
    }

    /// Send a request and return the raw body with its content type.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::execute`], minus decoding.
    pub async fn execute_bytes(
        &self,
        endpoint: String,
        request: RequestBuilder,
    ) -> Result<(Option<String>, Vec<u8>), ApiError> {
        let response = send(&endpoint, request).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network { endpoint, source })?;
        Ok((content_type, bytes.to_vec()))
    }
}

/// Send a request and map transport failures and error statuses.
async fn send(endpoint: &str, request: RequestBuilder) -> Result<Response, ApiError> {
    debug!(endpoint = %endpoint, "Calling catalog service");

    let response = request.send().await.map_err(|source| {
        warn!(endpoint = %endpoint, error = %source, "Catalog service unreachable");
        ApiError::Network {
            endpoint: endpoint.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(endpoint.to_string()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(
            endpoint = %endpoint,
            status = %status,
            body = %snippet(&body),
            "Catalog service returned non-success status"
        );
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(response)
}

/// Extract the `{"error": "..."}` message the service uses, falling back to
/// a truncated body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| snippet(body))
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::new(&ApiConfig {
            base_url: base.parse().unwrap(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slashes() {
        let api = client("http://localhost:8081/api/");
        assert_eq!(api.base_url(), "http://localhost:8081/api");
        assert_eq!(api.url("/products"), "http://localhost:8081/api/products");
        assert_eq!(api.url("product/4"), "http://localhost:8081/api/product/4");
    }

    #[test]
    fn test_error_message_prefers_service_error_field() {
        assert_eq!(
            error_message(r#"{"error": "Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(error_message(r#"{"message": "Category deleted"}"#), "Category deleted");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), BODY_SNIPPET_CHARS);
    }
}
