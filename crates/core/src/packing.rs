//! Dimensional packing

use crate::items::LineItem;

/// Weight of the empty carton and filling material, in kilograms.
const BASE_CARTON_WEIGHT_KG: f64 = 0.2;

/// Volume margin applied before deriving the cubic dimension, so rounding
/// never produces an undersized box.
const VOLUME_SAFETY_MARGIN: f64 = 1.25;

/// Packaging overhead margin on the total weight.
const WEIGHT_MARGIN: f64 = 1.1;

/// The carton is not a cube: height runs short and length runs long.
const HEIGHT_FACTOR: f64 = 0.8;
const LENGTH_FACTOR: f64 = 1.2;

/// Smallest parcel the carrier accepts.
const MIN_HEIGHT_CM: f64 = 2.0;
const MIN_WIDTH_CM: f64 = 11.0;
const MIN_LENGTH_CM: f64 = 16.0;
const MIN_WEIGHT_KG: f64 = 0.3;

/// A single equivalent shipping carton for the whole cart, used to request a
/// rate quote as if the order were one package.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedBox {
    /// Carton height in centimetres.
    pub height_cm: f64,

    /// Carton width in centimetres.
    pub width_cm: f64,

    /// Carton length in centimetres.
    pub length_cm: f64,

    /// Carton weight in kilograms, including packaging.
    pub weight_kg: f64,
}

/// Derive the equivalent shipping carton for a set of line items.
///
/// The total item volume (plus a safety margin) is turned into a cubic
/// dimension, then stretched into a non-cubic carton shape. Every dimension
/// and the weight are floored at the carrier's minimum accepted parcel, so an
/// empty cart or items without physical data still produce a valid box.
#[must_use]
pub fn pack(items: &[LineItem]) -> PackedBox {
    let item_weight: f64 = items
        .iter()
        .map(|item| item.dimensions.weight_kg * f64::from(item.quantity))
        .sum();

    let total_volume: f64 = items
        .iter()
        .map(|item| item.dimensions.unit_volume() * f64::from(item.quantity))
        .sum();

    let cubic = (total_volume * VOLUME_SAFETY_MARGIN).cbrt();
    let total_weight = BASE_CARTON_WEIGHT_KG + item_weight;

    PackedBox {
        height_cm: (cubic * HEIGHT_FACTOR).max(MIN_HEIGHT_CM),
        width_cm: cubic.max(MIN_WIDTH_CM),
        length_cm: (cubic * LENGTH_FACTOR).max(MIN_LENGTH_CM),
        weight_kg: (total_weight * WEIGHT_MARGIN).max(MIN_WEIGHT_KG),
    }
}
