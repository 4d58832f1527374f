//! Shopfront admin library.
//!
//! Typed client for the administrative endpoints of the shopfront REST
//! service: product maintenance (multipart upload with an optional image),
//! categories, orders, customer accounts and dashboard statistics.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_admin::{AdminClient, ProductForm};
//!
//! let admin = AdminClient::new(&config.api)?;
//! let stats = admin.dashboard().await?;
//! let created = admin.create_product(&form, None).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod error;
pub mod types;

pub use client::AdminClient;
pub use error::AdminError;
pub use types::*;
