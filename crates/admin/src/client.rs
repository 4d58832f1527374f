//! Admin REST client.
//!
//! Product writes go to `/product` as multipart forms; everything else lives
//! under `/admin` and speaks JSON.

use std::sync::Arc;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use shopfront_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};
use shopfront_storefront::api::{CatalogItem, Category, RestClient};
use shopfront_storefront::config::ApiConfig;

use crate::error::AdminError;
use crate::types::{
    AdminOrder, AdminUser, CategoryForm, DashboardStats, ImageUpload, ProductForm, StatusUpdate,
};

/// Client for the administrative endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    rest: RestClient,
}

impl AdminClient {
    /// Create a new admin client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, AdminError> {
        Ok(Self {
            inner: Arc::new(AdminClientInner {
                rest: RestClient::new(config)?,
            }),
        })
    }

    fn rest(&self) -> &RestClient {
        &self.inner.rest
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, AdminError> {
        Ok(self.rest().get(path).await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, AdminError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let request = self.rest().request(method.clone(), path).json(body);
        Ok(self.rest().execute(format!("{method} {path}"), request).await?)
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<(), AdminError> {
        let request = self.rest().request(method.clone(), path);
        Ok(self
            .rest()
            .execute_empty(format!("{method} {path}"), request)
            .await?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without calling the service if the
    /// form is invalid, or the service error otherwise.
    #[instrument(skip(self, form, image), fields(name = %form.name, with_image = image.is_some()))]
    pub async fn create_product(
        &self,
        form: &ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<CatalogItem, AdminError> {
        self.write_product(Method::POST, "/product".to_string(), form, image)
            .await
    }

    /// Replace a product's fields (and image, if given).
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_product`]; a missing product is
    /// `ApiError::NotFound`.
    #[instrument(skip(self, form, image), fields(product_id = %id, with_image = image.is_some()))]
    pub async fn update_product(
        &self,
        id: ProductId,
        form: &ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<CatalogItem, AdminError> {
        self.write_product(Method::PUT, format!("/product/{id}"), form, image)
            .await
    }

    async fn write_product(
        &self,
        method: Method,
        path: String,
        form: &ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<CatalogItem, AdminError> {
        form.validate().map_err(AdminError::Validation)?;

        let product_json = serde_json::to_string(&form.payload())?;
        let mut multipart = Form::new().part(
            "product",
            Part::text(product_json)
                .mime_str("application/json")
                .map_err(|e| AdminError::Image(e.to_string()))?,
        );
        if let Some(image) = image {
            let mut part = Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(content_type) = image.content_type.as_deref() {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| AdminError::Image(e.to_string()))?;
            }
            multipart = multipart.part("imageFile", part);
        }

        let endpoint = format!("{method} {path}");
        let request = self.rest().request(method, &path).multipart(multipart);
        let product: CatalogItem = self.rest().execute(endpoint, request).await?;
        info!(product_id = %product.id, "Saved product");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.send_empty(Method::DELETE, &format!("/product/{id}"))
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, AdminError> {
        self.get("/admin/categories").await
    }

    /// # Errors
    ///
    /// Returns the service error; missing ids are `ApiError::NotFound`.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, AdminError> {
        self.get(&format!("/admin/categories/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name, or the service
    /// error (400 on duplicate names).
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_category(&self, form: &CategoryForm) -> Result<Category, AdminError> {
        form.validate().map_err(AdminError::Validation)?;
        self.send_json(Method::POST, "/admin/categories", form).await
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name, or the service error.
    #[instrument(skip(self, form), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        form: &CategoryForm,
    ) -> Result<Category, AdminError> {
        form.validate().map_err(AdminError::Validation)?;
        self.send_json(Method::PUT, &format!("/admin/categories/{id}"), form)
            .await
    }

    /// Flip a category between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns the service error from either the read or the write.
    pub async fn toggle_category(&self, id: CategoryId) -> Result<Category, AdminError> {
        let current = self.get_category(id).await?;
        let form = CategoryForm {
            name: current.name,
            description: current.description,
            active: !current.active,
        };
        self.update_category(id, &form).await
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), AdminError> {
        self.send_empty(Method::DELETE, &format!("/admin/categories/{id}"))
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<AdminOrder>, AdminError> {
        self.get("/admin/orders").await
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(status = %status))]
    pub async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<AdminOrder>, AdminError> {
        self.get(&format!("/admin/orders/status/{}", status.as_str()))
            .await
    }

    /// # Errors
    ///
    /// Returns the service error; missing ids are `ApiError::NotFound`.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<AdminOrder, AdminError> {
        self.get(&format!("/admin/orders/{id}")).await
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<AdminOrder, AdminError> {
        self.send_json(
            Method::PUT,
            &format!("/admin/orders/{id}/status"),
            &StatusUpdate { status },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), AdminError> {
        self.send_empty(Method::DELETE, &format!("/admin/orders/{id}"))
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<AdminUser>, AdminError> {
        self.get("/admin/users").await
    }

    /// # Errors
    ///
    /// Returns the service error; missing ids are `ApiError::NotFound`.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<AdminUser, AdminError> {
        self.get(&format!("/admin/users/{id}")).await
    }

    /// Block or unblock an account. Blocked accounts cannot sign in.
    ///
    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn set_blocked(&self, id: UserId, blocked: bool) -> Result<AdminUser, AdminError> {
        let action = if blocked { "block" } else { "unblock" };
        let path = format!("/admin/users/{id}/{action}");
        let request = self.rest().request(Method::PUT, &path);
        Ok(self.rest().execute(format!("PUT {path}"), request).await?)
    }

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), AdminError> {
        self.send_empty(Method::DELETE, &format!("/admin/users/{id}"))
            .await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// # Errors
    ///
    /// Returns the service error.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats, AdminError> {
        self.get("/admin/dashboard").await
    }
}
