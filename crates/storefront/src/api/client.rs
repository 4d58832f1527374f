//! Storefront-side catalog/order service client.
//!
//! Caches product detail and images using `moka` (5-minute TTL). The product
//! list is always fetched fresh; snapshotting it is the catalog cache's job.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use tracing::{debug, instrument};

use shopfront_core::ProductId;

use super::ApiError;
use super::cache::{CacheValue, image_key, product_key};
use super::http::RestClient;
use super::types::{
    CatalogItem, Category, Credentials, OrderRequest, PlacedOrder, ProductImage, Registration,
    UserProfile,
};
use crate::config::ApiConfig;

/// Client for the public storefront endpoints of the catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    rest: RestClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                rest: RestClient::new(config)?,
                cache,
            }),
        })
    }

    /// The underlying REST client.
    #[must_use]
    pub fn rest(&self) -> &RestClient {
        &self.inner.rest
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let products: Vec<CatalogItem> = self.inner.rest.get("/products").await?;
        debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }

    /// Server-side keyword search.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(keyword = %keyword))]
    pub async fn search_products(&self, keyword: &str) -> Result<Vec<CatalogItem>, ApiError> {
        let request = self
            .inner
            .rest
            .request(Method::GET, "/products/search")
            .query(&[("keyword", keyword)]);
        self.inner
            .rest
            .execute("GET /products/search".to_string(), request)
            .await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<CatalogItem, ApiError> {
        let cache_key = product_key(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: CatalogItem = self.inner.rest.get(&format!("/product/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product's image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product has no image.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_image(&self, id: ProductId) -> Result<ProductImage, ApiError> {
        let cache_key = image_key(id);

        if let Some(CacheValue::Image(image)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product image");
            return Ok(image);
        }

        let path = format!("/product/{id}/image");
        let (content_type, bytes) = self
            .inner
            .rest
            .execute_bytes(format!("GET {path}"), self.inner.rest.request(Method::GET, &path))
            .await?;
        let image = ProductImage {
            content_type,
            bytes,
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Image(image.clone()))
            .await;

        Ok(image)
    }

    /// Drop cached detail and image for a product (after an admin edit).
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&product_key(id)).await;
        self.inner.cache.invalidate(&image_key(id)).await;
    }

    /// Public category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.inner.rest.get("/categories").await
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Customer login.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with status 401 on bad credentials or a
    /// blocked account.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        self.post_credentials("/auth/login", credentials).await
    }

    /// Administrator login.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with status 403 if the account is not an
    /// administrator.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn admin_login(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        self.post_credentials("/auth/admin/login", credentials).await
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with status 400 if the service rejects the
    /// registration (e.g. duplicate email).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        let request = self
            .inner
            .rest
            .request(Method::POST, "/auth/register")
            .json(registration);
        self.inner
            .rest
            .execute("POST /auth/register".to_string(), request)
            .await
    }

    async fn post_credentials(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<UserProfile, ApiError> {
        let request = self
            .inner
            .rest
            .request(Method::POST, path)
            .json(credentials);
        self.inner.rest.execute(format!("POST {path}"), request).await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Submit an order. The service re-prices every line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; nothing is recorded
    /// locally in that case.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ApiError> {
        let request = self.inner.rest.request(Method::POST, "/orders").json(order);
        self.inner
            .rest
            .execute("POST /orders".to_string(), request)
            .await
    }

    /// Fetch an order by the number the service assigned at placement.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown order numbers, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(order_number = %order_number))]
    pub async fn get_order(&self, order_number: &str) -> Result<PlacedOrder, ApiError> {
        self.inner
            .rest
            .get(&format!("/orders/{order_number}"))
            .await
    }
}
