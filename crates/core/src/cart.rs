//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    coupons::Coupon,
    items::{LineItem, LineItemId},
    pricing::{self, PricingError},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineItemId, &'static str, &'static str),

    /// Two items in a restored cart share the same identifier.
    #[error("Item {0} appears more than once")]
    DuplicateItemId(LineItemId),
}

/// Shopping cart state: line items, an optional shipping fee, and a coupon
/// discount.
///
/// The shipping fee is `None` until it has been explicitly calculated, which
/// is distinct from a legitimately-zero fee. All totals are derived from the
/// items on every read and never stored.
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<LineItem>,
    shipping_fee: Option<Money<'static, Currency>>,
    discount: Money<'static, Currency>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            shipping_fee: None,
            discount: Money::from_minor(0, currency),
            currency,
        }
    }

    /// Restore a cart from previously persisted state.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if an item's currency differs from the cart
    /// currency or two items share an identifier.
    pub fn restore(
        items: impl Into<Vec<LineItem>>,
        shipping_fee: Option<Money<'static, Currency>>,
        discount: Money<'static, Currency>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        for (i, item) in items.iter().enumerate() {
            let item_currency = item.unit_price.currency();

            if item_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    item.id.clone(),
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if items
                .iter()
                .skip(i + 1)
                .any(|other| other.id == item.id)
            {
                return Err(CartError::DuplicateItemId(item.id.clone()));
            }
        }

        Ok(Cart {
            items,
            shipping_fee,
            discount,
            currency,
        })
    }

    /// Add an item to the cart.
    ///
    /// If an item with the same id is already present, the new quantity is
    /// added to the existing one instead of inserting a duplicate line. No
    /// stock cap is enforced at this layer; stock limits belong to the
    /// calling UI.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::CurrencyMismatch`] if the item's currency
    /// differs from the cart currency.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        let item_currency = item.unit_price.currency();

        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }

        Ok(())
    }

    /// Remove the item with the given id. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, id: &LineItemId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Set the quantity of the item with the given id exactly (not additive).
    ///
    /// A quantity of zero is equivalent to [`Cart::remove_item`]. Updating an
    /// absent id is a no-op.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Empty the cart and reset the shipping fee and discount.
    pub fn clear(&mut self) {
        self.items.clear();
        self.shipping_fee = None;
        self.discount = Money::from_minor(0, self.currency);
    }

    /// Record a calculated shipping fee.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::CurrencyMismatch`] if the fee's currency
    /// differs from the cart currency.
    pub fn set_shipping_fee(&mut self, fee: Money<'static, Currency>) -> Result<(), CartError> {
        let fee_currency = fee.currency();

        if fee_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                LineItemId::new("shipping"),
                fee_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.shipping_fee = Some(fee);

        Ok(())
    }

    /// Apply a coupon to the cart.
    ///
    /// Percentage coupons set the discount to that percentage of the current
    /// items subtotal; the free-shipping coupon zeroes the shipping fee and
    /// leaves the discount untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount amount cannot be derived.
    pub fn apply_coupon(&mut self, coupon: &Coupon) -> Result<(), PricingError> {
        match coupon {
            Coupon::Percentage(percent) => {
                let subtotal = pricing::subtotal_minor(&self.items)?;
                let discount = pricing::percent_of_minor(*percent, subtotal)?;

                self.discount = Money::from_minor(discount, self.currency);
            }
            Coupon::FreeShipping => {
                self.shipping_fee = Some(Money::from_minor(0, self.currency));
            }
        }

        Ok(())
    }

    /// The line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Check if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculate the items subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum overflows.
    pub fn items_subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        pricing::items_subtotal(&self.items, self.currency)
    }

    /// The calculated shipping fee, or `None` when not yet calculated.
    #[must_use]
    pub fn shipping_fee(&self) -> Option<Money<'static, Currency>> {
        self.shipping_fee
    }

    /// The currently applied coupon discount.
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Calculate the cart total: subtotal + shipping fee − discount.
    ///
    /// An uncalculated shipping fee counts as zero here; checkout separately
    /// rejects carts whose fee was never calculated.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, PricingError> {
        let subtotal = pricing::subtotal_minor(&self.items)?;
        let shipping = self.shipping_fee.map_or(0, |fee| fee.to_minor_units());

        let total = subtotal
            .checked_add(shipping)
            .and_then(|sum| sum.checked_sub(self.discount.to_minor_units()))
            .ok_or(PricingError::SubtotalOverflow)?;

        Ok(Money::from_minor(total, self.currency))
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
