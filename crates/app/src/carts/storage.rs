//! Durable cart storage.

use std::{fs, io, path::PathBuf};

use mockall::automock;
use rusty_money::iso::Currency;
use thiserror::Error;
use torque::cart::{Cart, CartError};
use tracing::warn;

use crate::carts::records::{STORED_CART_VERSION, StoredCart};

/// Errors that can occur while loading or saving the cart document.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the document failed for a reason other than it being absent.
    #[error("failed to read cart storage")]
    Read(#[source] io::Error),

    /// Writing the document failed.
    #[error("failed to write cart storage")]
    Write(#[source] io::Error),

    /// The document exists but is not valid JSON for the current records.
    #[error("cart storage contains malformed JSON")]
    Malformed(#[from] serde_json::Error),

    /// The stored items violate a cart invariant.
    #[error("stored cart is inconsistent")]
    Inconsistent(#[from] CartError),
}

/// Durable storage for a single cart.
#[automock]
pub trait CartStorage: Send + Sync {
    /// Load the persisted cart, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the document exists but cannot be read
    /// or decoded.
    fn load(&self) -> Result<Option<Cart>, StorageError>;

    /// Persist the full cart state.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the document cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), StorageError>;
}

/// Cart storage backed by one JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    currency: &'static Currency,
}

impl JsonFileStorage {
    /// Create storage for the given document path and cart currency.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, currency: &'static Currency) -> Self {
        Self {
            path: path.into(),
            currency,
        }
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StorageError::Read(error)),
        };

        let stored: StoredCart = serde_json::from_slice(&bytes)?;

        if stored.version != STORED_CART_VERSION {
            warn!(
                version = stored.version,
                expected = STORED_CART_VERSION,
                "discarding stored cart with unknown version"
            );

            return Ok(None);
        }

        Ok(Some(stored.into_cart(self.currency)?))
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let stored = StoredCart::from_cart(cart);
        let bytes = serde_json::to_vec_pretty(&stored)?;

        fs::write(&self.path, bytes).map_err(StorageError::Write)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::BRL};
    use testresult::TestResult;
    use torque::items::{ItemDimensions, LineItem, LineItemId};

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

    #[test]
    fn save_then_load_round_trips_the_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join("cart.json"), BRL);

        let mut cart = Cart::new(BRL);
        cart.add_item(item("a", 100_00, 2))?;
        cart.set_shipping_fee(Money::from_minor(15_00, BRL))?;

        storage.save(&cart)?;

        let loaded = storage.load()?.ok_or("expected a stored cart")?;

        assert_eq!(loaded.items(), cart.items());
        assert_eq!(loaded.total_price()?, cart.total_price()?);

        Ok(())
    }

    #[test]
    fn load_missing_document_returns_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join("absent.json"), BRL);

        assert!(storage.load()?.is_none());

        Ok(())
    }

    #[test]
    fn load_malformed_document_errors() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");
        fs::write(&path, b"{ not json")?;

        let storage = JsonFileStorage::new(path, BRL);
        let result = storage.load();

        assert!(matches!(result, Err(StorageError::Malformed(_))));

        Ok(())
    }

    #[test]
    fn load_unknown_version_is_discarded() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");

        let blob = serde_json::json!({
            "version": 99,
            "saved_at": "2026-08-06T12:00:00Z",
            "items": [],
            "shipping_fee_minor": null,
            "discount_minor": 0
        });
        fs::write(&path, serde_json::to_vec(&blob)?)?;

        let storage = JsonFileStorage::new(path, BRL);

        assert!(storage.load()?.is_none());

        Ok(())
    }
}
