//! Checkout flow: review, details, submit.
//!
//! Payment is simulated. Submitting posts the order to the service and only
//! a successful response produces an [`OrderRecord`]; the caller commits it
//! to history and the cart. A failure leaves everything as it was.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use shopfront_core::{FieldError, Money, PaymentMethod, ProductId, ShippingDetails};

use crate::api::{
    ApiError, CatalogClient, OrderItemRequest, OrderRequest, PlacedOrder, ProductRef,
};
use crate::cart::ReconciledCart;
use crate::config::PricingConfig;
use crate::orders::{OrderRecord, OrderRecordLine};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("{} product(s) in the cart are unavailable", .0.len())]
    Unavailable(Vec<ProductId>),

    #[error("Invalid details: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Checkout is at {actual:?}, expected {expected:?}")]
    InvalidStage {
        expected: CheckoutStage,
        actual: CheckoutStage,
    },

    #[error("Order could not be placed: {0}")]
    Api(#[from] ApiError),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Money breakdown shown before the order is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Price a reconciled cart. Dangling lines are already excluded.
    #[must_use]
    pub fn from_cart(cart: &ReconciledCart, pricing: &PricingConfig) -> Self {
        if cart.is_empty() {
            return Self::default();
        }
        let subtotal = cart.total();
        let tax = subtotal.scaled(pricing.tax_rate).round_to_units();
        let shipping = if subtotal.amount >= pricing.free_shipping_threshold {
            Money::zero()
        } else {
            Money::new(pricing.shipping_fee)
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }

    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Something that accepts orders. [`CatalogClient`] in production.
pub trait OrderPlacer: Send + Sync {
    fn submit_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<PlacedOrder, ApiError>> + Send;
}

impl OrderPlacer for CatalogClient {
    fn submit_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<PlacedOrder, ApiError>> + Send {
        self.place_order(order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Review,
    Details,
    Submitted,
}

/// One pass through checkout over a fixed view of the cart.
#[derive(Debug, Clone)]
pub struct Checkout {
    stage: CheckoutStage,
    cart: ReconciledCart,
    summary: OrderSummary,
    details: Option<(ShippingDetails, PaymentMethod)>,
}

impl Checkout {
    /// Start checkout at the review step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if nothing purchasable is in the cart
    /// - [`CheckoutError::Unavailable`] if any line is currently unavailable
    pub fn review(cart: ReconciledCart, pricing: &PricingConfig) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let unavailable: Vec<ProductId> = cart.unavailable().map(|line| line.item_id).collect();
        if !unavailable.is_empty() {
            return Err(CheckoutError::Unavailable(unavailable));
        }

        let summary = OrderSummary::from_cart(&cart, pricing);
        Ok(Self {
            stage: CheckoutStage::Review,
            cart,
            summary,
            details: None,
        })
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    #[must_use]
    pub const fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    #[must_use]
    pub const fn cart(&self) -> &ReconciledCart {
        &self.cart
    }

    fn expect_stage(&self, expected: CheckoutStage) -> Result<(), CheckoutError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidStage {
                expected,
                actual: self.stage,
            })
        }
    }

    /// Move from review to details. Invalid details keep the review step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] with every failing field, or
    /// [`CheckoutError::InvalidStage`] outside the review step.
    pub fn enter_details(
        &mut self,
        details: ShippingDetails,
        payment: PaymentMethod,
    ) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::Review)?;
        details.validate().map_err(CheckoutError::Validation)?;
        self.details = Some((details, payment));
        self.stage = CheckoutStage::Details;
        Ok(())
    }

    /// Go back from details to review.
    pub fn back(&mut self) {
        if self.stage == CheckoutStage::Details {
            self.stage = CheckoutStage::Review;
        }
    }

    fn order_request(&self) -> Result<OrderRequest, CheckoutError> {
        let (details, payment) = self.details.as_ref().ok_or(CheckoutError::InvalidStage {
            expected: CheckoutStage::Details,
            actual: self.stage,
        })?;
        let items = self
            .cart
            .lines
            .iter()
            .map(|line| OrderItemRequest {
                product: ProductRef { id: line.item_id },
                quantity: line.quantity,
            })
            .collect();
        Ok(OrderRequest::new(items, details, *payment))
    }

    /// Simulate payment, then place the order.
    ///
    /// On success the checkout moves to `Submitted` and the record to commit
    /// is returned. On failure the checkout stays at `Details` so the user
    /// can retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Api`] if the service rejects the order, or
    /// [`CheckoutError::InvalidStage`] outside the details step.
    #[instrument(skip(self, placer), fields(lines = self.cart.lines.len(), total = %self.summary.total))]
    pub async fn submit<P: OrderPlacer>(
        &mut self,
        placer: &P,
        payment_delay: Duration,
    ) -> Result<OrderRecord, CheckoutError> {
        self.expect_stage(CheckoutStage::Details)?;
        let request = self.order_request()?;

        if !payment_delay.is_zero() {
            info!(delay_ms = payment_delay.as_millis(), "Processing payment");
            tokio::time::sleep(payment_delay).await;
        }

        let placed = placer.submit_order(&request).await.map_err(|e| {
            warn!(error = %e, "Order submission failed");
            e
        })?;

        info!(order_number = %placed.order_number, "Order placed");
        let record = self.record(placed, request.payment_method);
        self.stage = CheckoutStage::Submitted;
        Ok(record)
    }

    fn record(&self, placed: PlacedOrder, payment_method: PaymentMethod) -> OrderRecord {
        let ship_to = self
            .details
            .as_ref()
            .map(|(details, _)| details.clone())
            .unwrap_or_default();
        OrderRecord {
            order_number: placed.order_number,
            id: placed.id,
            status: placed.status,
            placed_at: placed.created_at.unwrap_or_else(Utc::now),
            items: self
                .cart
                .lines
                .iter()
                .map(|line| OrderRecordLine {
                    item_id: line.item_id,
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            summary: self.summary,
            charged_total: Money::new(placed.total),
            payment_method,
            ship_to,
        }
    }
}
