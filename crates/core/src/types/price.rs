//! Type-safe price representation using decimal arithmetic.
//!
//! Unit prices are stored as `NUMERIC(10, 2)` and cart totals as
//! `NUMERIC(14, 2)`. Neither ever passes through floating point.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative amount of money in the shop currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount, rounded half-up to cents.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Create a price from an integer amount of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `qty` units at this unit price.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0 * Decimal::from(qty))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

// SQLx support (with postgres feature)
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
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(129_900).to_string(), "$1299.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_times() {
        let unit = Price::from_cents(1_999);
        assert_eq!(unit.times(3), Price::from_cents(5_997));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let prices = [Price::from_cents(100), Price::from_cents(250)];
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_cents(350));

        let empty: [Price; 0] = [];
        assert_eq!(empty.iter().sum::<Price>(), Price::ZERO);
    }

    #[test]
    fn test_new_rounds_to_cents() {
        let price = Price::new(Decimal::new(12_345, 3));
        assert_eq!(price.amount(), Decimal::new(1_235, 2));

        // Half a cent always rounds up, not to the even neighbour
        assert_eq!(Price::new(Decimal::new(12_355, 3)).amount(), Decimal::new(1_236, 2));
        assert_eq!(Price::new(Decimal::new(12_344, 3)).amount(), Decimal::new(1_234, 2));
    }
}
