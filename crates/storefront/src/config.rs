//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `SHOPFRONT_API_URL` - Catalog/order service base URL (default: `http://localhost:8081/api`)
//! - `SHOPFRONT_DATA_DIR` - Directory for local cart/wishlist/orders storage (default: `.shopfront`)
//! - `SHOPFRONT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SHOPFRONT_TAX_RATE` - Tax rate applied at checkout (default: 0.18)
//! - `SHOPFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal at which shipping is free (default: 999)
//! - `SHOPFRONT_SHIPPING_FEE` - Flat shipping fee below the threshold (default: 49)
//! - `SHOPFRONT_PAYMENT_DELAY_MS` - Simulated payment processing time (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8081/api";
const DEFAULT_DATA_DIR: &str = ".shopfront";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog/order service
    pub api: ApiConfig,
    /// Directory holding the local key-value documents
    pub data_dir: PathBuf,
    /// Checkout pricing rules
    pub pricing: PricingConfig,
    /// Simulated payment processing time
    pub payment_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Remote service connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Tax and shipping rules applied to the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax (0.18 = 18%)
    pub tax_rate: Decimal,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee below the threshold
    pub shipping_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(18, 2),
            free_shipping_threshold: Decimal::from(999),
            shipping_fee: Decimal::from(49),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = parse_or(&lookup, "SHOPFRONT_API_URL", || {
            Url::parse(DEFAULT_API_URL).map_err(|e| e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let timeout_secs: u64 = parse_or(&lookup, "SHOPFRONT_HTTP_TIMEOUT_SECS", || Ok(30))?;
        let payment_delay_ms: u64 = parse_or(&lookup, "SHOPFRONT_PAYMENT_DELAY_MS", || Ok(0))?;

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            tax_rate: parse_or(&lookup, "SHOPFRONT_TAX_RATE", || Ok(defaults.tax_rate))?,
            free_shipping_threshold: parse_or(&lookup, "SHOPFRONT_FREE_SHIPPING_THRESHOLD", || {
                Ok(defaults.free_shipping_threshold)
            })?,
            shipping_fee: parse_or(&lookup, "SHOPFRONT_SHIPPING_FEE", || {
                Ok(defaults.shipping_fee)
            })?,
        };
        for (key, value) in [
            ("SHOPFRONT_TAX_RATE", pricing.tax_rate),
            ("SHOPFRONT_FREE_SHIPPING_THRESHOLD", pricing.free_shipping_threshold),
            ("SHOPFRONT_SHIPPING_FEE", pricing.shipping_fee),
        ] {
            if value.is_sign_negative() {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "must not be negative".to_string(),
                ));
            }
        }

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            data_dir: lookup("SHOPFRONT_DATA_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            pricing,
            payment_delay: Duration::from_millis(payment_delay_ms),
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use the default.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: impl FnOnce() -> Result<T, String>,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => default().map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8081/api");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.payment_delay, Duration::ZERO);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPFRONT_API_URL", "https://shop.example.com/api/"),
            ("SHOPFRONT_DATA_DIR", "/tmp/shop"),
            ("SHOPFRONT_TAX_RATE", "0.05"),
            ("SHOPFRONT_PAYMENT_DELAY_MS", "2000"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();
        assert_eq!(config.api.base_url.host_str(), Some("shop.example.com"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.pricing.tax_rate, Decimal::new(5, 2));
        assert_eq!(config.payment_delay, Duration::from_secs(2));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[("SHOPFRONT_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_HTTP_TIMEOUT_SECS"));

        let err = load(&[("SHOPFRONT_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_API_URL"));

        let err = load(&[("SHOPFRONT_SHIPPING_FEE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_SHIPPING_FEE"));
    }
}
