//! Money conversion between stored minor units and displayed major units.

use rust_decimal::Decimal;
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Largest amount, in minor units, that is rendered exactly. Fifteen
/// significant digits survive a round trip through an IEEE-754 double, which
/// is what JSON numbers decode to on most clients.
pub const MAX_DISPLAY_MINOR_UNITS: u64 = 999_999_999_999_999;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    #[error("amount of {0} minor units is too large to display")]
    OutOfRange(u64),
}

/// Look up an ISO 4217 currency by its alphabetic code.
///
/// # Errors
///
/// Returns [`MoneyError::UnknownCurrency`] for codes missing from the ISO table.
pub fn find_currency(code: &str) -> Result<&'static Currency, MoneyError> {
    Currency::find(code).ok_or_else(|| MoneyError::UnknownCurrency(code.to_string()))
}

/// Convert an amount in minor units to major units, using the currency's
/// exponent (1999 EUR cents become 19.99).
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] above [`MAX_DISPLAY_MINOR_UNITS`].
pub fn to_major(minor: u64, currency: &'static Currency) -> Result<Decimal, MoneyError> {
    if minor > MAX_DISPLAY_MINOR_UNITS {
        return Err(MoneyError::OutOfRange(minor));
    }

    let minor_i64 = i64::try_from(minor).map_err(|_overflow| MoneyError::OutOfRange(minor))?;

    Ok(*Money::from_minor(minor_i64, currency).amount())
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::ToPrimitive;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn converts_cents_to_euros() -> TestResult {
        let eur = find_currency("EUR")?;

        assert_eq!(to_major(1999, eur)?, Decimal::new(1999, 2));
        assert_eq!(to_major(1999, eur)?.to_string(), "19.99");
        assert_eq!(to_major(5, eur)?.to_string(), "0.05");

        Ok(())
    }

    #[test]
    fn zero_is_rendered_as_zero() -> TestResult {
        let eur = find_currency("EUR")?;

        assert!(to_major(0, eur)?.is_zero());

        Ok(())
    }

    #[test]
    fn uses_the_currency_exponent() -> TestResult {
        let jpy = find_currency("JPY")?;

        assert_eq!(to_major(1999, jpy)?, Decimal::from(1999));

        Ok(())
    }

    #[test]
    fn major_units_survive_a_double_round_trip() -> TestResult {
        let eur = find_currency("EUR")?;

        for minor in [
            0,
            1,
            10,
            99,
            1999,
            123_456_789,
            987_654_321_012_345,
            MAX_DISPLAY_MINOR_UNITS,
        ] {
            let major = to_major(minor, eur)?;
            let as_float = major.to_f64().expect("decimal converts to f64");
            let back = (as_float * 100.0).round();

            assert_eq!(back.to_u64(), Some(minor), "round trip of {minor}");
        }

        Ok(())
    }

    #[test]
    fn rejects_amounts_beyond_the_display_range() -> TestResult {
        let eur = find_currency("EUR")?;

        assert_eq!(
            to_major(MAX_DISPLAY_MINOR_UNITS + 1, eur),
            Err(MoneyError::OutOfRange(MAX_DISPLAY_MINOR_UNITS + 1))
        );
        assert_eq!(
            to_major(u64::MAX, eur),
            Err(MoneyError::OutOfRange(u64::MAX))
        );

        Ok(())
    }

    #[test]
    fn unknown_currency_codes_are_rejected() {
        assert_eq!(
            find_currency("XXZ").err(),
            Some(MoneyError::UnknownCurrency("XXZ".to_string()))
        );
    }
}
