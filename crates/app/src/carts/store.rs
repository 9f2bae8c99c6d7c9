//! Cart store: in-memory state persisted on every mutation.

use rusty_money::{Money, iso::Currency};
use torque::{
    cart::{Cart, CartError},
    coupons,
    items::{LineItem, LineItemId},
    pricing::PricingError,
};
use tracing::warn;

use crate::carts::storage::CartStorage;

/// The cart plus its durable storage.
///
/// Every mutation persists the full state. Persistence is best-effort: a
/// failed save is logged and the in-memory cart stays authoritative, so a
/// storage problem never loses the session's cart.
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Open the store, rehydrating any previously persisted cart.
    ///
    /// A missing, malformed or outdated document starts an empty cart; the
    /// failure is logged, never surfaced.
    #[must_use]
    pub fn open(storage: Box<dyn CartStorage>, currency: &'static Currency) -> Self {
        let cart = match storage.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(currency),
            Err(error) => {
                warn!(error = %error, "failed to load stored cart; starting empty");
                Cart::new(currency)
            }
        };

        Self { cart, storage }
    }

    /// The current cart state.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add an item, merging quantities when the id is already present.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the item's currency differs from the cart
    /// currency.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        self.cart.add_item(item)?;
        self.persist();

        Ok(())
    }

    /// Remove the item with the given id; absent ids are a no-op.
    pub fn remove_item(&mut self, id: &LineItemId) {
        self.cart.remove_item(id);
        self.persist();
    }

    /// Set an item's quantity exactly; zero removes the item.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: u32) {
        self.cart.update_quantity(id, quantity);
        self.persist();
    }

    /// Empty the cart and reset the shipping fee and discount.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Record a calculated shipping fee.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the fee's currency differs from the cart
    /// currency.
    pub fn set_shipping_fee(&mut self, fee: Money<'static, Currency>) -> Result<(), CartError> {
        self.cart.set_shipping_fee(fee)?;
        self.persist();

        Ok(())
    }

    /// Apply a coupon code.
    ///
    /// Returns `Ok(false)` for unknown codes, leaving the cart untouched, so
    /// the caller can report "coupon not found" without treating it as a
    /// fault.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount amount cannot be derived.
    pub fn apply_discount(&mut self, code: &str) -> Result<bool, PricingError> {
        let Some(coupon) = coupons::lookup(code) else {
            return Ok(false);
        };

        self.cart.apply_coupon(&coupon)?;
        self.persist();

        Ok(true)
    }

    fn persist(&self) {
        if let Err(error) = self.storage.save(&self.cart) {
            warn!(error = %error, "failed to persist cart; continuing with in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rusty_money::iso::BRL;
    use testresult::TestResult;
    use torque::items::ItemDimensions;

    use crate::carts::storage::{MockCartStorage, StorageError};

    use super::*;

    fn item(id: &str, price_minor: i64, quantity: u32) -> LineItem {
        LineItem {
            id: LineItemId::new(id),
            name: format!("part {id}"),
            unit_price: Money::from_minor(price_minor, BRL),
            quantity,
            image_url: String::new(),
            variant_label: None,
            dimensions: ItemDimensions::default(),
        }
    }

    fn empty_storage() -> MockCartStorage {
        let mut storage = MockCartStorage::new();
        storage.expect_load().returning(|| Ok(None));
        storage
    }

    #[test]
    fn open_rehydrates_the_stored_cart() -> TestResult {
        let mut stored = Cart::new(BRL);
        stored.add_item(item("a", 100_00, 2))?;

        let mut storage = MockCartStorage::new();
        let loaded = stored.clone();
        storage.expect_load().return_once(move || Ok(Some(loaded)));

        let store = CartStore::open(Box::new(storage), BRL);

        assert_eq!(store.cart().items(), stored.items());

        Ok(())
    }

    #[test]
    fn open_with_failing_storage_starts_empty() {
        let mut storage = MockCartStorage::new();
        storage.expect_load().returning(|| {
            Err(StorageError::Read(io::Error::other("disk on fire")))
        });

        let store = CartStore::open(Box::new(storage), BRL);

        assert!(store.cart().is_empty());
    }

    #[test]
    fn every_mutation_persists_the_cart() -> TestResult {
        let mut storage = empty_storage();
        storage.expect_save().times(4).returning(|_| Ok(()));

        let mut store = CartStore::open(Box::new(storage), BRL);

        store.add_item(item("a", 100_00, 1))?;
        store.update_quantity(&LineItemId::new("a"), 3);
        store.remove_item(&LineItemId::new("a"));
        store.clear();

        Ok(())
    }

    #[test]
    fn failed_save_keeps_the_in_memory_state() -> TestResult {
        let mut storage = empty_storage();
        storage.expect_save().returning(|_| {
            Err(StorageError::Write(io::Error::other("read-only filesystem")))
        });

        let mut store = CartStore::open(Box::new(storage), BRL);

        store.add_item(item("a", 100_00, 2))?;

        assert_eq!(store.cart().total_items(), 2);

        Ok(())
    }

    #[test]
    fn unknown_coupon_returns_false_and_does_not_persist() -> TestResult {
        let mut storage = empty_storage();
        storage.expect_save().times(1).returning(|_| Ok(()));

        let mut store = CartStore::open(Box::new(storage), BRL);
        store.add_item(item("a", 100_00, 1))?;

        let applied = store.apply_discount("BOGUS")?;

        assert!(!applied, "unknown code must not apply");
        assert_eq!(store.cart().discount(), Money::from_minor(0, BRL));

        Ok(())
    }

    #[test]
    fn known_coupon_applies_and_persists() -> TestResult {
        let mut storage = empty_storage();
        storage.expect_save().times(2).returning(|_| Ok(()));

        let mut store = CartStore::open(Box::new(storage), BRL);
        store.add_item(item("a", 100_00, 1))?;

        let applied = store.apply_discount("moto10")?;

        assert!(applied, "known code must apply");
        assert_eq!(store.cart().discount(), Money::from_minor(10_00, BRL));

        Ok(())
    }
}
