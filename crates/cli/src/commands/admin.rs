//! Administration commands. All of them need an administrator session.

use std::path::Path;

use shopfront_admin::{AdminClient, CategoryForm, ImageUpload, ProductForm};
use shopfront_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};
use shopfront_storefront::state::AppState;

use super::CliError;
use crate::ProductArgs;
use crate::output;

/// Build an admin client for the signed-in administrator.
///
/// # Errors
///
/// Returns [`CliError::NotAdmin`] unless an administrator is signed in.
pub fn connect(state: &AppState) -> Result<AdminClient, CliError> {
    if !state.session().is_admin() {
        return Err(CliError::NotAdmin);
    }
    Ok(AdminClient::new(&state.config().api)?)
}

pub async fn dashboard(admin: &AdminClient) -> Result<(), CliError> {
    output::dashboard(&admin.dashboard().await?);
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

fn content_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_string())
}

async fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Read {
        what: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload {
        file_name,
        content_type: content_type(path),
        bytes,
    })
}

async fn split_args(args: ProductArgs) -> Result<(ProductForm, Option<ImageUpload>), CliError> {
    let image = match args.image.as_deref() {
        Some(path) => Some(read_image(path).await?),
        None => None,
    };
    let form = ProductForm {
        name: args.name,
        description: args.description,
        brand: args.brand,
        price: args.price,
        category: args.category,
        release_date: args.release_date,
        stock_quantity: args.stock,
    };
    Ok((form, image))
}

pub async fn create_product(
    state: &AppState,
    admin: &AdminClient,
    args: ProductArgs,
) -> Result<(), CliError> {
    let (form, image) = split_args(args).await?;
    let product = admin.create_product(&form, image).await?;
    state.client().invalidate_product(product.id).await;
    output::message(&format!("Created product {}.", product.id));
    output::product(&product);
    Ok(())
}

pub async fn update_product(
    state: &AppState,
    admin: &AdminClient,
    id: ProductId,
    args: ProductArgs,
) -> Result<(), CliError> {
    let (form, image) = split_args(args).await?;
    let product = admin.update_product(id, &form, image).await?;
    state.client().invalidate_product(id).await;
    output::product(&product);
    Ok(())
}

pub async fn delete_product(
    state: &AppState,
    admin: &AdminClient,
    id: ProductId,
) -> Result<(), CliError> {
    admin.delete_product(id).await?;
    state.client().invalidate_product(id).await;
    output::message(&format!("Deleted product {id}."));
    Ok(())
}

// =============================================================================
// Categories
// =============================================================================

pub async fn list_categories(admin: &AdminClient) -> Result<(), CliError> {
    output::categories(&admin.list_categories().await?);
    Ok(())
}

pub async fn create_category(
    admin: &AdminClient,
    name: String,
    description: Option<String>,
    active: bool,
) -> Result<(), CliError> {
    let form = CategoryForm {
        name,
        description,
        active,
    };
    let category = admin.create_category(&form).await?;
    output::categories(std::slice::from_ref(&category));
    Ok(())
}

pub async fn toggle_category(admin: &AdminClient, id: CategoryId) -> Result<(), CliError> {
    let category = admin.toggle_category(id).await?;
    output::categories(std::slice::from_ref(&category));
    Ok(())
}

pub async fn delete_category(admin: &AdminClient, id: CategoryId) -> Result<(), CliError> {
    admin.delete_category(id).await?;
    output::message(&format!("Deleted category {id}."));
    Ok(())
}

// =============================================================================
// Orders
// =============================================================================

pub async fn list_orders(admin: &AdminClient, status: Option<OrderStatus>) -> Result<(), CliError> {
    let orders = match status {
        Some(status) => admin.orders_by_status(status).await?,
        None => admin.list_orders().await?,
    };
    output::admin_orders(&orders);
    Ok(())
}

pub async fn show_order(admin: &AdminClient, id: OrderId) -> Result<(), CliError> {
    output::admin_order(&admin.get_order(id).await?);
    Ok(())
}

pub async fn update_order_status(
    admin: &AdminClient,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), CliError> {
    let order = admin.update_order_status(id, status).await?;
    output::admin_orders(std::slice::from_ref(&order));
    Ok(())
}

pub async fn delete_order(admin: &AdminClient, id: OrderId) -> Result<(), CliError> {
    admin.delete_order(id).await?;
    output::message(&format!("Deleted order {id}."));
    Ok(())
}

// =============================================================================
// Users
// =============================================================================

pub async fn list_users(admin: &AdminClient) -> Result<(), CliError> {
    output::users(&admin.list_users().await?);
    Ok(())
}

pub async fn set_blocked(admin: &AdminClient, id: UserId, blocked: bool) -> Result<(), CliError> {
    let user = admin.set_blocked(id, blocked).await?;
    output::users(std::slice::from_ref(&user));
    Ok(())
}

pub async fn delete_user(admin: &AdminClient, id: UserId) -> Result<(), CliError> {
    admin.delete_user(id).await?;
    output::message(&format!("Deleted user {id}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            content_type(Path::new("shoe.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(content_type(Path::new("a/b.webp")).as_deref(), Some("image/webp"));
        assert_eq!(content_type(Path::new("notes.txt")), None);
        assert_eq!(content_type(Path::new("no_extension")), None);
    }
}
