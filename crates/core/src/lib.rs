//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types shared by every shopfront component:
//! - `storefront` - Catalog cache, cart, wishlist and checkout
//! - `admin` - Catalog, order and customer management client
//! - `cli` - Command-line console over both
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, money, statuses, email and shipping details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
