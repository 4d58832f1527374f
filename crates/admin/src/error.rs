//! Admin client errors.

use thiserror::Error;

use shopfront_core::FieldError;
use shopfront_storefront::api::ApiError;

#[derive(Debug, Error)]
pub enum AdminError {
    /// The service call failed (network, status, not found, decode).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The form was rejected locally before any request was sent.
    #[error("Invalid form: {}", join(.0))]
    Validation(Vec<FieldError>),

    /// The image part could not be built.
    #[error("Invalid image: {0}")]
    Image(String),

    /// The JSON part could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AdminError {
    /// HTTP status code, when the service answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status(),
            _ => None,
        }
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
