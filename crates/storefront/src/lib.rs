//! Shopfront storefront library.
//!
//! Client-side state for browsing and buying from the shopfront catalog
//! service: a remote client, an in-memory catalog cache, the cart, the
//! wishlist, checkout and local order history. [`state::AppState`] ties them
//! together for a running session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod session;
pub mod state;
pub mod storage;
pub mod wishlist;

#[cfg(test)]
mod testing;
