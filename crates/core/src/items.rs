//! Line items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Identifier of a line item within a cart.
///
/// Composite of the product identifier and the selected variant identifier,
/// e.g. `"7201-red"`. Products without variants use the `"default"` variant
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Wrap an already-composed identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Compose an identifier from a product id and an optional variant id.
    #[must_use]
    pub fn from_parts(product_id: &str, variant_id: Option<&str>) -> Self {
        Self(format!("{product_id}-{}", variant_id.unwrap_or("default")))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Physical attributes of a single unit, used only for shipping calculation.
///
/// Products without registered physical data default every field to zero; the
/// packing calculator's minimum floors keep the resulting box valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDimensions {
    /// Unit weight in kilograms.
    pub weight_kg: f64,

    /// Unit height in centimetres.
    pub height_cm: f64,

    /// Unit width in centimetres.
    pub width_cm: f64,

    /// Unit length in centimetres.
    pub length_cm: f64,
}

impl ItemDimensions {
    /// Create dimensions from weight, height, width and length.
    #[must_use]
    pub fn new(weight_kg: f64, height_cm: f64, width_cm: f64, length_cm: f64) -> Self {
        Self {
            weight_kg,
            height_cm,
            width_cm,
            length_cm,
        }
    }

    /// Volume of a single unit in cubic centimetres.
    #[must_use]
    pub fn unit_volume(&self) -> f64 {
        self.height_cm * self.width_cm * self.length_cm
    }
}

/// One distinct product+variant entry in the cart.
///
/// `name` and `unit_price` are snapshots taken when the item was added and
/// are never re-fetched, even if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Identifier, unique within a cart.
    pub id: LineItemId,

    /// Display name snapshot.
    pub name: String,

    /// Unit price snapshot.
    pub unit_price: Money<'static, Currency>,

    /// Number of units, always at least 1.
    pub quantity: u32,

    /// Display image reference.
    pub image_url: String,

    /// Selected variant label, e.g. a colour name.
    pub variant_label: Option<String>,

    /// Physical attributes for shipping calculation.
    pub dimensions: ItemDimensions,
}
