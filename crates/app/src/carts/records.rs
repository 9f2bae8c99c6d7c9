//! Stored cart records.
//!
//! Serde representations of the cart for the durable JSON document, separate
//! from the domain types: prices in minor units, an explicit record version,
//! and the time the blob was written.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use torque::{
    cart::{Cart, CartError},
    items::{ItemDimensions, LineItem, LineItemId},
};

/// Version written into every stored cart. Blobs with a different version
/// are discarded on load rather than migrated.
pub const STORED_CART_VERSION: u32 = 1;

/// The persisted cart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCart {
    /// Record schema version.
    pub version: u32,

    /// When the blob was written.
    pub saved_at: Timestamp,

    /// The persisted line items.
    pub items: Vec<StoredLineItem>,

    /// Calculated shipping fee in minor units, absent when never calculated.
    pub shipping_fee_minor: Option<i64>,

    /// Coupon discount in minor units.
    pub discount_minor: i64,
}

/// One persisted line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLineItem {
    /// Line item identifier.
    pub id: LineItemId,

    /// Display name snapshot.
    pub name: String,

    /// Unit price snapshot in minor units.
    pub unit_price_minor: i64,

    /// Number of units.
    pub quantity: u32,

    /// Display image reference.
    pub image_url: String,

    /// Selected variant label.
    #[serde(default)]
    pub variant_label: Option<String>,

    /// Physical attributes for shipping calculation.
    #[serde(default)]
    pub dimensions: ItemDimensions,
}

impl StoredCart {
    /// Snapshot a cart into its persisted representation.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            version: STORED_CART_VERSION,
            saved_at: Timestamp::now(),
            items: cart.items().iter().map(StoredLineItem::from_item).collect(),
            shipping_fee_minor: cart.shipping_fee().map(|fee| fee.to_minor_units()),
            discount_minor: cart.discount().to_minor_units(),
        }
    }

    /// Rebuild a cart from its persisted representation.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the stored items violate a cart invariant.
    pub fn into_cart(self, currency: &'static Currency) -> Result<Cart, CartError> {
        let items: Vec<LineItem> = self
            .items
            .into_iter()
            .map(|item| item.into_item(currency))
            .collect();

        Cart::restore(
            items,
            self.shipping_fee_minor
                .map(|minor| Money::from_minor(minor, currency)),
            Money::from_minor(self.discount_minor, currency),
            currency,
        )
    }
}

impl StoredLineItem {
    fn from_item(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price_minor: item.unit_price.to_minor_units(),
            quantity: item.quantity,
            image_url: item.image_url.clone(),
            variant_label: item.variant_label.clone(),
            dimensions: item.dimensions,
        }
    }

    fn into_item(self, currency: &'static Currency) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            unit_price: Money::from_minor(self.unit_price_minor, currency),
            quantity: self.quantity,
            image_url: self.image_url,
            variant_label: self.variant_label,
            dimensions: self.dimensions,
        }
    }
}
