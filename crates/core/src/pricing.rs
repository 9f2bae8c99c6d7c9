//! Pricing

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while deriving monetary values.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Summing line totals exceeded the representable range.
    #[error("subtotal arithmetic overflowed")]
    SubtotalOverflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculates the subtotal of a set of line items in minor units.
///
/// # Errors
///
/// Returns [`PricingError::SubtotalOverflow`] if a line total or the running
/// sum exceeds the representable range.
pub fn subtotal_minor(items: &[LineItem]) -> Result<i64, PricingError> {
    items.iter().try_fold(0_i64, |acc, item| {
        let line = item
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(item.quantity))
            .ok_or(PricingError::SubtotalOverflow)?;

        acc.checked_add(line).ok_or(PricingError::SubtotalOverflow)
    })
}

/// Calculates the subtotal of a set of line items.
///
/// An empty set yields zero in the given currency.
///
/// # Errors
///
/// Returns a [`PricingError`] if the sum overflows.
pub fn items_subtotal(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(subtotal_minor(items)?, currency))
}

/// Calculate a percentage of a minor-unit amount, rounded half away from zero.
pub(crate) fn percent_of_minor(percent: Decimal, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let Some(scaled) = percent.checked_mul(minor) else {
        return Err(PricingError::PercentConversion);
    };

    let Some(fraction) = scaled.checked_div(Decimal::ONE_HUNDRED) else {
        return Err(PricingError::PercentConversion);
    };

    let rounded = fraction.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().ok_or(PricingError::PercentConversion)
}
