//! Cart commands.

use shopfront_core::ProductId;
use shopfront_storefront::checkout::OrderSummary;
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

use super::{load_catalog, try_load_catalog};
use crate::output;

pub async fn show(state: &AppState) -> Result<(), AppError> {
    if try_load_catalog(state).await {
        let reconciled = state.reconciled_cart();
        let summary = OrderSummary::from_cart(&reconciled, &state.config().pricing);
        output::cart(&reconciled, &summary);
    } else {
        // Without a catalog every line would look dangling; show what was stored.
        let cart = state.cart();
        if cart.is_empty() {
            output::message("Your cart is empty.");
        }
        for line in cart.lines() {
            output::message(&format!(
                "{:>6}  {:<40}  {:>4} x {}",
                line.item_id, line.name, line.quantity, line.unit_price
            ));
        }
    }
    Ok(())
}

pub async fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<(), AppError> {
    load_catalog(state).await?;
    let total = state.add_to_cart(id, quantity).await?;
    output::message(&format!("Added. Product {id} quantity is now {total}."));
    Ok(())
}

pub async fn set_quantity(state: &AppState, id: ProductId, quantity: i64) -> Result<(), AppError> {
    if state.set_quantity(id, quantity).await? {
        if quantity <= 0 {
            output::message(&format!("Removed product {id}."));
        } else {
            output::message(&format!("Product {id} quantity set to {quantity}."));
        }
    } else {
        output::message(&format!("Product {id} is not in the cart."));
    }
    Ok(())
}

pub async fn step(state: &AppState, id: ProductId, up: bool) -> Result<(), AppError> {
    let changed = if up {
        state.increment(id).await?
    } else {
        state.decrement(id).await?
    };
    match state.cart().get(id) {
        Some(line) if changed => {
            output::message(&format!("Product {id} quantity is now {}.", line.quantity));
        }
        _ => output::message(&format!("Product {id} is not in the cart.")),
    }
    Ok(())
}

pub async fn remove(state: &AppState, id: ProductId) -> Result<(), AppError> {
    if state.remove_from_cart(id).await? {
        output::message(&format!("Removed product {id}."));
    } else {
        output::message(&format!("Product {id} is not in the cart."));
    }
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), AppError> {
    state.clear_cart().await?;
    output::message("Cart cleared.");
    Ok(())
}
