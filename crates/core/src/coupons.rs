//! Coupons

use rust_decimal::Decimal;

/// A predefined discount triggered by a user-entered code.
#[derive(Debug, Clone, PartialEq)]
pub enum Coupon {
    /// Reduce the payable total by this percentage of the items subtotal.
    Percentage(Decimal),

    /// Waive the shipping fee; the cart discount is left untouched.
    FreeShipping,
}

/// Look up a coupon code in the fixed table.
///
/// Codes are case-insensitive and surrounding whitespace is ignored. The
/// table is in-code in this version; moving it to external configuration is
/// a known extension point.
#[must_use]
pub fn lookup(code: &str) -> Option<Coupon> {
    match code.trim().to_ascii_uppercase().as_str() {
        "MOTO10" => Some(Coupon::Percentage(Decimal::new(10, 0))),
        "MOTO20" => Some(Coupon::Percentage(Decimal::new(20, 0))),
        "FRETE" => Some(Coupon::FreeShipping),
        _ => None,
    }
}
