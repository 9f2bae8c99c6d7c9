//! Integration test walking a realistic cart through the whole flow.
//!
//! The cart holds two parts:
//!
//! 1. Part A: R$ 100,00 × 2, 1 kg, 10×10×10 cm
//! 2. Part B: R$ 50,00 × 1, 0.5 kg, 5×5×5 cm
//!
//! Expected derivation:
//!
//! - Items subtotal: R$ 250,00
//! - `MOTO20` coupon: discount R$ 50,00
//! - Shipping fee: R$ 15,00
//! - Cart total: 250 + 15 − 50 = R$ 215,00
//! - Pix incentive (5% of the total): R$ 10,75 → payable R$ 204,25
//!
//! The packed box for the same items: volume 2125 cm³ × 1.25 margin →
//! cubic dimension ≈ 13.85 cm, weight (0.2 + 2.5) × 1.1 = 2.97 kg.

use rusty_money::{Money, iso::BRL};
use testresult::TestResult;

use torque::{
    cart::Cart,
    checkout::{self, PaymentMethod},
    coupons,
    items::{ItemDimensions, LineItem, LineItemId},
    packing,
};

fn part_a() -> LineItem {
    LineItem {
        id: LineItemId::from_parts("8831", Some("black")),
        name: "Handlebar riser".to_string(),
        unit_price: Money::from_minor(100_00, BRL),
        quantity: 2,
        image_url: "https://cdn.example/parts/8831.webp".to_string(),
        variant_label: Some("Black".to_string()),
        dimensions: ItemDimensions::new(1.0, 10.0, 10.0, 10.0),
    }
}

fn part_b() -> LineItem {
    LineItem {
        id: LineItemId::from_parts("2204", None),
        name: "Brake lever".to_string(),
        unit_price: Money::from_minor(50_00, BRL),
        quantity: 1,
        image_url: "https://cdn.example/parts/2204.webp".to_string(),
        variant_label: None,
        dimensions: ItemDimensions::new(0.5, 5.0, 5.0, 5.0),
    }
}

#[test]
fn full_checkout_flow_derives_expected_totals() -> TestResult {
    let mut cart = Cart::new(BRL);

    cart.add_item(part_a())?;
    cart.add_item(part_b())?;

    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.items_subtotal()?, Money::from_minor(250_00, BRL));

    let coupon = coupons::lookup("MOTO20").ok_or("MOTO20 missing from table")?;
    cart.apply_coupon(&coupon)?;

    assert_eq!(cart.discount(), Money::from_minor(50_00, BRL));

    cart.set_shipping_fee(Money::from_minor(15_00, BRL))?;

    assert_eq!(cart.total_price()?, Money::from_minor(215_00, BRL));

    let summary = checkout::summarize(&cart, PaymentMethod::Pix)?;

    assert_eq!(summary.subtotal(), Money::from_minor(250_00, BRL));
    assert_eq!(summary.shipping_fee(), Money::from_minor(15_00, BRL));
    assert_eq!(summary.discount(), Money::from_minor(50_00, BRL));
    assert_eq!(summary.incentive(), Money::from_minor(10_75, BRL));
    assert_eq!(summary.payable(), Money::from_minor(204_25, BRL));

    // The cart itself is untouched by the incentive derivation.
    assert_eq!(cart.total_price()?, Money::from_minor(215_00, BRL));

    Ok(())
}

#[test]
fn packed_box_for_the_same_cart_matches_the_carton_model() -> TestResult {
    let items = [part_a(), part_b()];

    let packed = packing::pack(&items);
    let cubic = 2656.25_f64.cbrt();

    assert!((packed.width_cm - cubic).abs() < 1e-9, "width follows cubic");
    assert!(
        (packed.height_cm - cubic * 0.8).abs() < 1e-9,
        "height runs short"
    );
    assert!(
        (packed.length_cm - cubic * 1.2).abs() < 1e-9,
        "length runs long"
    );
    assert!(
        (packed.weight_kg - 2.97).abs() < 1e-9,
        "weight carries the packaging margin"
    );

    Ok(())
}

#[test]
fn lowercase_coupon_code_behaves_identically() -> TestResult {
    let mut upper = Cart::new(BRL);
    let mut lower = Cart::new(BRL);

    upper.add_item(part_a())?;
    lower.add_item(part_a())?;

    let from_upper = coupons::lookup("MOTO10").ok_or("MOTO10 missing from table")?;
    let from_lower = coupons::lookup("moto10").ok_or("moto10 missing from table")?;

    upper.apply_coupon(&from_upper)?;
    lower.apply_coupon(&from_lower)?;

    assert_eq!(upper.discount(), lower.discount());
    assert_eq!(upper.discount(), Money::from_minor(20_00, BRL));

    Ok(())
}
