//! Wishlist commands.

use shopfront_core::ProductId;
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

use super::{load_catalog, try_load_catalog};
use crate::output;

pub fn show(state: &AppState) {
    output::wishlist(state.wishlist().entries());
}

pub async fn add(state: &AppState, id: ProductId) -> Result<(), AppError> {
    load_catalog(state).await?;
    if state.wishlist_add(id).await? {
        output::message(&format!("Saved product {id}."));
    } else {
        output::message(&format!("Product {id} is already saved."));
    }
    Ok(())
}

pub async fn remove(state: &AppState, id: ProductId) -> Result<(), AppError> {
    if state.wishlist_remove(id).await? {
        output::message(&format!("Removed product {id} from the wishlist."));
    } else {
        output::message(&format!("Product {id} is not in the wishlist."));
    }
    Ok(())
}

pub async fn move_to_cart(state: &AppState, id: ProductId) -> Result<(), AppError> {
    // Prefer current availability; fall back to the saved record offline.
    try_load_catalog(state).await;
    let quantity = state.move_to_cart(id).await?;
    output::message(&format!("Moved product {id} to the cart (quantity {quantity})."));
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), AppError> {
    state.wishlist_clear().await?;
    output::message("Wishlist cleared.");
    Ok(())
}
