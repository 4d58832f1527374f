//! Catalog browsing commands.

use shopfront_core::ProductId;
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

use super::load_catalog;
use crate::output;

pub async fn list(state: &AppState, category: &str) -> Result<(), AppError> {
    load_catalog(state).await?;
    let snapshot = state.catalog().snapshot();
    output::products(snapshot.filter_by_category(category));
    Ok(())
}

pub async fn search(state: &AppState, keyword: &str, remote: bool) -> Result<(), AppError> {
    if remote {
        let items = state.client().search_products(keyword).await?;
        output::products(&items);
        return Ok(());
    }
    load_catalog(state).await?;
    let snapshot = state.catalog().snapshot();
    output::products(snapshot.filter_by_keyword(keyword));
    Ok(())
}

pub async fn show(state: &AppState, id: ProductId) -> Result<(), AppError> {
    let item = state.client().get_product(id).await?;
    output::product(&item);
    Ok(())
}

pub async fn categories(state: &AppState) -> Result<(), AppError> {
    load_catalog(state).await?;
    output::names(state.catalog().snapshot().categories());
    Ok(())
}
