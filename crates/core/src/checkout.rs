//! Checkout

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{self, PricingError},
};

/// Smallest order total accepted at checkout, in minor units (R$ 40,00).
/// The boundary is inclusive: a total of exactly this value passes.
pub const MINIMUM_ORDER_MINOR: i64 = 40_00;

/// Incentive granted for payment methods that settle immediately, in percent.
const INSTANT_TRANSFER_INCENTIVE_PERCENT: i64 = 5;

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Instant bank transfer; settles immediately and earns the incentive.
    Pix,

    /// Credit card.
    CreditCard,

    /// Bank payment slip.
    Boleto,
}

impl PaymentMethod {
    /// The incentive percentage for this method, if it qualifies.
    #[must_use]
    pub fn incentive_percent(self) -> Option<Decimal> {
        match self {
            PaymentMethod::Pix => Some(Decimal::new(INSTANT_TRANSFER_INCENTIVE_PERCENT, 0)),
            PaymentMethod::CreditCard | PaymentMethod::Boleto => None,
        }
    }
}

/// Errors that reject a checkout before any order is submitted.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("the cart is empty")]
    EmptyCart,

    /// The shipping fee was never calculated; a zero fee would be accepted.
    #[error("calculate the shipping fee before checking out")]
    ShippingNotCalculated,

    /// The order total is below the minimum order value.
    #[error("order total {total} is below the minimum of {minimum}")]
    BelowMinimum {
        /// The rejected order total.
        total: Money<'static, Currency>,

        /// The minimum accepted order total.
        minimum: Money<'static, Currency>,
    },

    /// Deriving a monetary value failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// The final payable breakdown shown to the customer and submitted with the
/// order.
///
/// The payment incentive lives only here: it is derived at checkout time and
/// never persisted into the cart's discount, so changing the payment method
/// simply derives a new summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    method: PaymentMethod,
    subtotal: Money<'static, Currency>,
    shipping_fee: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    incentive: Money<'static, Currency>,
    payable: Money<'static, Currency>,
}

impl CheckoutSummary {
    /// The payment method the summary was derived for.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Items subtotal, recomputed at checkout time.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// The calculated shipping fee.
    #[must_use]
    pub fn shipping_fee(&self) -> Money<'static, Currency> {
        self.shipping_fee
    }

    /// The coupon discount carried by the cart.
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// The payment-method incentive, zero for methods that do not qualify.
    #[must_use]
    pub fn incentive(&self) -> Money<'static, Currency> {
        self.incentive
    }

    /// The final payable amount.
    #[must_use]
    pub fn payable(&self) -> Money<'static, Currency> {
        self.payable
    }
}

/// Derive the final payable total for a cart and a selected payment method.
///
/// The subtotal is recomputed from the items rather than trusted from any
/// stored state. The coupon discount applies to the subtotal, the shipping
/// fee is added, and the instant-transfer incentive is applied last, to the
/// post-coupon post-shipping total.
///
/// # Errors
///
/// Returns a [`CheckoutError`] when the cart is empty, the shipping fee was
/// never calculated, the total is below [`MINIMUM_ORDER_MINOR`], or a
/// monetary value cannot be derived.
pub fn summarize(cart: &Cart, method: PaymentMethod) -> Result<CheckoutSummary, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let Some(shipping_fee) = cart.shipping_fee() else {
        return Err(CheckoutError::ShippingNotCalculated);
    };

    let subtotal = cart.items_subtotal()?;
    let discount = cart.discount();
    let currency = cart.currency();

    let total = subtotal.to_minor_units() + shipping_fee.to_minor_units()
        - discount.to_minor_units();

    if total < MINIMUM_ORDER_MINOR {
        return Err(CheckoutError::BelowMinimum {
            total: Money::from_minor(total, currency),
            minimum: Money::from_minor(MINIMUM_ORDER_MINOR, currency),
        });
    }

    let incentive = match method.incentive_percent() {
        Some(percent) => pricing::percent_of_minor(percent, total)?,
        None => 0,
    };

    Ok(CheckoutSummary {
        method,
        subtotal,
        shipping_fee,
        discount,
        incentive: Money::from_minor(incentive, currency),
        payable: Money::from_minor(total - incentive, currency),
    })
}
