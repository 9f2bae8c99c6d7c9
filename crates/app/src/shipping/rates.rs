//! Local delivery flat rates.

use rusty_money::{Money, iso::Currency};

use crate::shipping::postal::PostalCode;

/// Postal prefixes around the warehouse delivered by the store's own courier
/// at a flat fee (in minor units), without involving the carrier API.
const LOCAL_FLAT_RATES: &[(&str, i64)] = &[
    ("030", 10_90),
    ("031", 12_90),
    ("032", 12_90),
    ("033", 14_90),
];

/// Look up the flat fee for a short-range local delivery.
///
/// Returns `None` when the destination is outside the local courier's range
/// and a carrier quote is required.
#[must_use]
pub fn local_flat_rate(
    destination: &PostalCode,
    currency: &'static Currency,
) -> Option<Money<'static, Currency>> {
    LOCAL_FLAT_RATES
        .iter()
        .find(|(prefix, _)| destination.as_str().starts_with(prefix))
        .map(|(_, fee_minor)| Money::from_minor(*fee_minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn local_prefix_resolves_to_flat_fee() -> TestResult {
        let destination: PostalCode = "03112-090".parse()?;

        assert_eq!(
            local_flat_rate(&destination, BRL),
            Some(Money::from_minor(12_90, BRL))
        );

        Ok(())
    }

    #[test]
    fn each_prefix_has_its_own_fee() -> TestResult {
        let close: PostalCode = "03047-000".parse()?;
        let farther: PostalCode = "03399-999".parse()?;

        assert_eq!(
            local_flat_rate(&close, BRL),
            Some(Money::from_minor(10_90, BRL))
        );
        assert_eq!(
            local_flat_rate(&farther, BRL),
            Some(Money::from_minor(14_90, BRL))
        );

        Ok(())
    }

    #[test]
    fn non_local_destination_returns_none() -> TestResult {
        let destination: PostalCode = "88015-600".parse()?;

        assert_eq!(local_flat_rate(&destination, BRL), None);

        Ok(())
    }
}
