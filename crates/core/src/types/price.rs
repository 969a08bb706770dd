//! Type-safe menu price using decimal arithmetic.
//!
//! Prices are in Ethiopian birr and kept to two decimal places. They travel
//! as JSON numbers (the admin client sends `Number(price)`), but a numeric
//! string is accepted too.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a finite number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input exceeds the maximum.
    #[error("price must be at most {max}")]
    TooLarge {
        /// Maximum allowed price.
        max: u32,
    },
}

/// A non-negative price with two decimal places.
///
/// ```
/// use fenet_core::Price;
///
/// assert_eq!(Price::from_f64(140.0).unwrap().to_string(), "140.00");
/// assert_eq!("12.345".parse::<Price>().unwrap().to_string(), "12.35");
/// assert!(Price::from_f64(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Upper bound for a menu price.
    pub const MAX: u32 = 1_000_000;

    /// Number of decimal places kept.
    const SCALE: u32 = 2;

    /// Build a price from a decimal, rounding to two places.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > Decimal::from(Self::MAX) {
            return Err(PriceError::TooLarge { max: Self::MAX });
        }
        let mut rounded =
            amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Ok(Self(rounded))
    }

    /// Build a price from a JSON-style float.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is NaN/infinite, negative or too large.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotANumber);
        }
        let amount = Decimal::from_f64(value).ok_or(PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with postgres feature), stored as NUMERIC(10, 2)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_whole_number() {
        let price = Price::from_f64(140.0).unwrap();
        assert_eq!(price.amount(), Decimal::new(14000, 2));
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(Price::from_f64(0.0).is_ok());
        assert!(Price::from_f64(-0.0).is_ok());
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert_eq!(Price::from_f64(-0.5), Err(PriceError::Negative));
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotANumber));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_rejects_too_large() {
        assert_eq!(
            Price::from_f64(1_000_000.01),
            Err(PriceError::TooLarge { max: 1_000_000 })
        );
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!("12.345".parse::<Price>().unwrap().to_string(), "12.35");
        assert_eq!("0.125".parse::<Price>().unwrap().to_string(), "0.13");
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!("85".parse::<Price>().unwrap().to_string(), "85.00");
        assert_eq!(" 9.5 ".parse::<Price>().unwrap().to_string(), "9.50");
        assert_eq!("abc".parse::<Price>(), Err(PriceError::NotANumber));
        assert_eq!("".parse::<Price>(), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::from_f64(95.0).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "95.0");
    }
}
