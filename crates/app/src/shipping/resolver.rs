//! Shipping rate resolution.

use std::sync::Arc;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use torque::{
    items::LineItem,
    packing,
    pricing::{self, PricingError},
};
use tracing::debug;

use crate::shipping::{
    carrier::{CarrierError, RateAddress, RateGateway, RateProduct, RateRequest},
    postal::{PostalCode, PostalCodeError},
    rates,
};

/// Errors that can occur while resolving a shipping fee.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// The destination is malformed; no I/O was attempted.
    #[error(transparent)]
    Postal(#[from] PostalCodeError),

    /// The carrier could not produce a usable quote.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// The insurance value could not be derived from the cart.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Resolves a shipping fee for a destination and a set of cart items.
///
/// Local destinations are served from the flat-rate table; everything else is
/// packed into a single carton and quoted through the carrier gateway.
pub struct ShippingResolver {
    gateway: Arc<dyn RateGateway>,
    origin: PostalCode,
    service_id: u32,
    currency: &'static Currency,
}

impl ShippingResolver {
    /// Create a resolver quoting from the given warehouse origin.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RateGateway>,
        origin: PostalCode,
        service_id: u32,
        currency: &'static Currency,
    ) -> Self {
        Self {
            gateway,
            origin,
            service_id,
            currency,
        }
    }

    /// Resolve the shipping fee for a destination postal code.
    ///
    /// # Errors
    ///
    /// Returns a [`ShippingError`] when the destination is malformed, the
    /// carrier cannot be reached, the carrier answers with an error or an
    /// empty quote list, or the insurance value cannot be derived. The fee is
    /// never silently defaulted.
    pub async fn calculate(
        &self,
        destination: &str,
        items: &[LineItem],
    ) -> Result<Money<'static, Currency>, ShippingError> {
        let destination: PostalCode = destination.parse()?;

        if let Some(fee) = rates::local_flat_rate(&destination, self.currency) {
            debug!(destination = %destination, "local flat rate, skipping carrier quote");
            return Ok(fee);
        }

        let carton = packing::pack(items);
        let insurance_minor = pricing::subtotal_minor(items)?;

        let request = RateRequest {
            from: RateAddress {
                postal_code: self.origin.as_str().to_string(),
            },
            to: RateAddress {
                postal_code: destination.as_str().to_string(),
            },
            products: vec![RateProduct {
                width: carton.width_cm,
                height: carton.height_cm,
                length: carton.length_cm,
                weight: carton.weight_kg,
                insurance_value: Decimal::new(insurance_minor, 2),
                quantity: 1,
            }],
            services: vec![self.service_id],
        };

        let fee = self.gateway.first_quote(request, self.currency).await?;

        debug!(destination = %destination, fee = %fee, "carrier quoted shipping fee");

        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;
    use torque::items::{ItemDimensions, LineItemId};

    use crate::shipping::carrier::MockRateGateway;

    use super::*;

    fn item(id: &str, price_minor: i64, quantity: u32) -> LineItem {
        LineItem {
            id: LineItemId::new(id),
            name: format!("part {id}"),
            unit_price: Money::from_minor(price_minor, BRL),
            quantity,
            image_url: String::new(),
            variant_label: None,
            dimensions: ItemDimensions::new(1.0, 10.0, 10.0, 10.0),
        }
    }

    fn resolver(gateway: MockRateGateway) -> TestResult<ShippingResolver> {
        Ok(ShippingResolver::new(
            Arc::new(gateway),
            "03047-000".parse()?,
            1,
            BRL,
        ))
    }

    #[tokio::test]
    async fn malformed_destination_never_calls_the_gateway() -> TestResult {
        let mut gateway = MockRateGateway::new();
        gateway.expect_first_quote().times(0);

        let resolver = resolver(gateway)?;
        let result = resolver.calculate("1234567", &[item("a", 100_00, 1)]).await;

        assert!(matches!(result, Err(ShippingError::Postal(_))));

        Ok(())
    }

    #[tokio::test]
    async fn local_destination_skips_the_gateway() -> TestResult {
        let mut gateway = MockRateGateway::new();
        gateway.expect_first_quote().times(0);

        let resolver = resolver(gateway)?;
        let fee = resolver
            .calculate("03112-090", &[item("a", 100_00, 1)])
            .await?;

        assert_eq!(fee, Money::from_minor(12_90, BRL));

        Ok(())
    }

    #[tokio::test]
    async fn remote_destination_quotes_the_packed_carton() -> TestResult {
        let mut gateway = MockRateGateway::new();

        gateway
            .expect_first_quote()
            .withf(|request, _| {
                let product = match request.products.as_slice() {
                    [product] => product,
                    _ => return false,
                };

                request.from.postal_code == "03047-000"
                    && request.to.postal_code == "88015-600"
                    && request.services == [1]
                    && product.quantity == 1
                    && product.insurance_value == Decimal::new(250_00, 2)
                    && (product.weight - (0.2 + 3.0) * 1.1).abs() < 1e-9
            })
            .returning(|_, _| Ok(Money::from_minor(42_50, BRL)));

        let resolver = resolver(gateway)?;
        let fee = resolver
            .calculate("88015-600", &[item("a", 100_00, 2), item("b", 50_00, 1)])
            .await?;

        assert_eq!(fee, Money::from_minor(42_50, BRL));

        Ok(())
    }

    #[tokio::test]
    async fn gateway_failures_surface_distinctly() -> TestResult {
        let mut gateway = MockRateGateway::new();
        gateway
            .expect_first_quote()
            .returning(|_, _| Err(CarrierError::NoQuotes));

        let resolver = resolver(gateway)?;
        let result = resolver.calculate("88015-600", &[item("a", 100_00, 1)]).await;

        assert!(matches!(
            result,
            Err(ShippingError::Carrier(CarrierError::NoQuotes))
        ));

        Ok(())
    }
}
