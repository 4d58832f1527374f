//! Status enums for orders and users.

use serde::{Deserialize, Deserializer, Serialize};

/// Order lifecycle status as reported by the order service.
///
/// The service speaks upper case (`"SHIPPED"`); local order history written
/// by older clients used lower case, so both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "confirmed")]
    Confirmed,
    #[serde(alias = "processing")]
    Processing,
    #[serde(alias = "shipped")]
    Shipped,
    #[serde(alias = "delivered")]
    Delivered,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether the order is still moving towards delivery.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::Processing | Self::Shipped
        )
    }

    /// Wire name used by the order service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Role attached to a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum UserRole {
    /// Regular storefront customer.
    #[default]
    #[serde(rename = "USER")]
    Customer,
    /// Store administrator with access to the admin console.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything other than ADMIN is treated as a plain customer.
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some(role) if role.eq_ignore_ascii_case("ADMIN") => Self::Admin,
            _ => Self::Customer,
        })
    }
}

impl UserRole {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}
