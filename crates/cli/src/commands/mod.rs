//! Command implementations.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use thiserror::Error;

use shopfront_admin::AdminError;
use shopfront_storefront::catalog::RefreshOutcome;
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

/// Failures that only the command line can produce.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Administrator session required; run `shopfront login --admin` first")]
    NotAdmin,

    #[error("Failed to read {what}: {source}")]
    Read {
        what: String,
        #[source]
        source: std::io::Error,
    },
}

/// Refresh the catalog, failing the command if it cannot be loaded.
async fn load_catalog(state: &AppState) -> Result<(), AppError> {
    match state.refresh_catalog().await {
        RefreshOutcome::Failed(e) => Err(e.into()),
        RefreshOutcome::Applied { .. } | RefreshOutcome::Superseded => Ok(()),
    }
}

/// Refresh the catalog, carrying on with the last snapshot on failure.
async fn try_load_catalog(state: &AppState) -> bool {
    match state.refresh_catalog().await {
        RefreshOutcome::Failed(e) => {
            tracing::warn!("Catalog unavailable, prices may be out of date: {e}");
            false
        }
        RefreshOutcome::Applied { .. } | RefreshOutcome::Superseded => true,
    }
}
