//! Money amounts backed by decimal arithmetic.
//!
//! The storefront trades in a single currency (rupees), so `Money` carries
//! only an amount. Persistence maps it to NUMERIC; on the wire it serializes
//! as a decimal string.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a money amount from a raw decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a whole-rupee amount.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Take a percentage of this amount (e.g. `percent(10)` for 10%).
    #[must_use]
    pub fn percent(&self, percent: u32) -> Self {
        Self(self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED)
    }

    /// Round to a whole rupee, halves away from zero.
    ///
    /// Matches how the storefront has always rounded coupon discounts
    /// (`12.5` becomes `13`, not banker's `12`).
    #[must_use]
    pub fn round_rupee(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// True if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times() {
        let price = Money::from_rupees(100);
        assert_eq!(price.times(2), Money::from_rupees(200));
        assert_eq!(price.times(0), Money::ZERO);
    }

    #[test]
    fn test_percent() {
        let amount = Money::from_rupees(200);
        assert_eq!(amount.percent(10), Money::from_rupees(20));
    }

    #[test]
    fn test_round_rupee_half_away_from_zero() {
        let amount = Money::new(Decimal::new(125, 1)); // 12.5
        assert_eq!(amount.round_rupee(), Money::from_rupees(13));

        let amount = Money::new(Decimal::new(124, 1)); // 12.4
        assert_eq!(amount.round_rupee(), Money::from_rupees(12));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_rupees(10), Money::from_rupees(15)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_rupees(25));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupees(180).to_string(), "₹180");
    }

    #[test]
    fn test_serde_as_string() {
        // serde-with-str keeps decimals exact on the wire
        let json = serde_json::to_string(&Money::new(Decimal::new(9999, 2))).expect("serialize");
        assert_eq!(json, "\"99.99\"");
        let back: Money = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.amount(), Decimal::new(9999, 2));
    }
}
