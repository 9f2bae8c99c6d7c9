//! Carrier rate-quote client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::ToPrimitive,
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the rate-quote endpoint under the configured base URL.
const CALCULATE_PATH: &str = "/api/v2/me/shipment/calculate";

/// Configuration for connecting to the carrier rate-quote API.
#[derive(Debug, Clone)]
pub struct CarrierSettings {
    /// Carrier API base URL, e.g. `"https://sandbox.melhorenvio.com.br"`.
    pub base_url: String,

    /// Bearer token credential; quotes fail without one.
    pub token: Option<String>,
}

/// A rate-quote request: origin, destination, the packed carton, and the
/// requested services.
#[derive(Debug, Clone, Serialize)]
pub struct RateRequest {
    /// Quote origin.
    pub from: RateAddress,

    /// Quote destination.
    pub to: RateAddress,

    /// The packages to quote; this store always sends one packed carton.
    pub products: Vec<RateProduct>,

    /// Carrier service ids to quote.
    pub services: Vec<u32>,
}

/// An address in a rate-quote request.
#[derive(Debug, Clone, Serialize)]
pub struct RateAddress {
    /// Postal code in the national format.
    pub postal_code: String,
}

/// One package in a rate-quote request.
#[derive(Debug, Clone, Serialize)]
pub struct RateProduct {
    /// Package width in centimetres.
    pub width: f64,

    /// Package height in centimetres.
    pub height: f64,

    /// Package length in centimetres.
    pub length: f64,

    /// Package weight in kilograms.
    pub weight: f64,

    /// Declared insurance value in major units.
    pub insurance_value: Decimal,

    /// Number of identical packages.
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
struct RateQuote {
    price: Decimal,
}

/// Errors that can occur while fetching a carrier quote.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// No bearer token was configured.
    #[error("carrier API credentials are not configured")]
    MissingCredentials,

    /// The carrier host could not be reached.
    #[error("could not reach the carrier rate service")]
    Transport(#[source] reqwest::Error),

    /// The carrier responded with a non-success status.
    #[error("carrier rate service responded with status {status}")]
    UnexpectedStatus {
        /// The response status.
        status: StatusCode,

        /// The response body, for the log.
        body: String,
    },

    /// The response body was not a quote list.
    #[error("carrier quote response could not be decoded")]
    Malformed(#[source] reqwest::Error),

    /// The carrier returned an empty quote list.
    #[error("carrier rate service returned no quotes")]
    NoQuotes,

    /// A quoted price could not be represented in minor units.
    #[error("carrier quoted an unrepresentable price: {0}")]
    InvalidPrice(Decimal),
}

/// Source of rate quotes; the resolver depends on this rather than on the
/// HTTP client so tests never touch a network.
#[automock]
#[async_trait]
pub trait RateGateway: Send + Sync {
    /// Fetch quotes for the request and return the first quoted price.
    async fn first_quote(
        &self,
        request: RateRequest,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, CarrierError>;
}

/// HTTP client for the carrier rate-quote API.
#[derive(Debug, Clone)]
pub struct CarrierClient {
    settings: CarrierSettings,
    http: Client,
}

impl CarrierClient {
    /// Create a new client from the given settings.
    #[must_use]
    pub fn new(settings: CarrierSettings) -> Self {
        Self {
            settings,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl RateGateway for CarrierClient {
    async fn first_quote(
        &self,
        request: RateRequest,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, CarrierError> {
        let Some(token) = self.settings.token.as_deref() else {
            return Err(CarrierError::MissingCredentials);
        };

        let url = format!(
            "{}{CALCULATE_PATH}",
            self.settings.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(CarrierError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(CarrierError::UnexpectedStatus { status, body });
        }

        let quotes: Vec<RateQuote> = response.json().await.map_err(CarrierError::Malformed)?;

        let Some(first) = quotes.first() else {
            return Err(CarrierError::NoQuotes);
        };

        Ok(Money::from_minor(price_to_minor(first.price)?, currency))
    }
}

/// Convert a quoted price in major units to minor units.
fn price_to_minor(price: Decimal) -> Result<i64, CarrierError> {
    let Some(scaled) = price.checked_mul(Decimal::ONE_HUNDRED) else {
        return Err(CarrierError::InvalidPrice(price));
    };

    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CarrierError::InvalidPrice(price))
}
