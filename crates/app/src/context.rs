//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    carts::{CartStore, JsonFileStorage},
    config::AppConfig,
    shipping::{CarrierClient, CarrierSettings, ShippingResolver},
};

/// Errors that can occur while building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The configured warehouse postal code is malformed.
    #[error("warehouse postal code is invalid")]
    Origin(#[source] crate::shipping::PostalCodeError),
}

/// Wired application services: the persisting cart store and the shipping
/// resolver.
pub struct AppContext {
    /// The cart store, rehydrated from durable storage.
    pub carts: CartStore,

    /// The shipping rate resolver.
    pub shipping: ShippingResolver,
}

impl AppContext {
    /// Build the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured warehouse postal code does not
    /// parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let currency = rusty_money::iso::BRL;

        let origin = config
            .carrier
            .origin
            .parse()
            .map_err(AppInitError::Origin)?;

        let storage = JsonFileStorage::new(&config.storage.cart_path, currency);
        let carts = CartStore::open(Box::new(storage), currency);

        let client = CarrierClient::new(CarrierSettings {
            base_url: config.carrier.base_url.clone(),
            token: config.carrier.token.clone(),
        });

        let shipping = ShippingResolver::new(
            Arc::new(client),
            origin,
            config.carrier.service_id,
            currency,
        );

        Ok(Self { carts, shipping })
    }
}
