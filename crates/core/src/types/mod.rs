//! Core types for shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod shipping;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Money};
pub use shipping::{FieldError, PaymentMethod, ShippingDetails};
pub use status::*;
