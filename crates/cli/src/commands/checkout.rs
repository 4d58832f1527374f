//! Checkout and order history commands.

use shopfront_core::ShippingDetails;
use shopfront_storefront::error::AppError;
use shopfront_storefront::orders::OrderTab;
use shopfront_storefront::state::AppState;

use super::load_catalog;
use crate::CheckoutArgs;
use crate::output;

pub async fn run(state: &AppState, args: CheckoutArgs) -> Result<(), AppError> {
    load_catalog(state).await?;
    let mut checkout = state.begin_checkout()?;
    output::summary_lines(checkout.summary());

    let details = ShippingDetails {
        full_name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        pincode: args.pincode,
    };
    checkout.enter_details(details, args.payment)?;

    let record = state.submit_checkout(&mut checkout).await?;
    output::message("");
    output::message("Order placed.");
    output::order(&record);
    Ok(())
}

pub async fn orders(state: &AppState, tab: OrderTab, refresh: bool) -> Result<(), AppError> {
    if refresh {
        let changed = state.refresh_orders().await?;
        if changed > 0 {
            output::message(&format!("{changed} order(s) updated."));
        }
    }
    let history = state.orders();
    output::orders(history.filter(tab));
    Ok(())
}
