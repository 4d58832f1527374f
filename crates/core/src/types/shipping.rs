//! Shipping and payment details collected at checkout.
//!
//! Validation is purely local; it never talks to the order service.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name (camelCase, as the service spells it).
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Where to deliver an order and who to contact about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl ShippingDetails {
    /// Check every field, returning all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the list of [`FieldError`]s when any field is invalid.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("fullName", "Full name is required"));
        }
        if let Err(e) = Email::parse(&self.email) {
            errors.push(FieldError::new("email", e.to_string()));
        }
        if !is_digits(&self.phone, 10) {
            errors.push(FieldError::new("phone", "Phone must be 10 digits"));
        }
        if self.address.trim().is_empty() {
            errors.push(FieldError::new("address", "Address is required"));
        }
        if self.city.trim().is_empty() {
            errors.push(FieldError::new("city", "City is required"));
        }
        if !is_digits(&self.pincode, 6) {
            errors.push(FieldError::new("pincode", "Pincode must be 6 digits"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    let value = value.trim();
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// How the customer intends to pay. Payment itself is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    CashOnDelivery,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "cod" | "cash_on_delivery" => Ok(Self::CashOnDelivery),
            other => Err(format!("invalid payment method: {other}")),
        }
    }
}
