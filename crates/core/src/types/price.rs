//! Type-safe price representation using decimal arithmetic.
//!
//! The shop sells in a single currency, so a price is just a non-floating
//! amount. Totals are summed exactly and only rounded when displayed.
//! Arithmetic saturates at [`Decimal::MAX`] instead of overflowing.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the shop currency.
///
/// Serializes as a decimal string (`"24.99"`) so JSON consumers never see
/// binary floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used when formatting for display.
    pub const SYMBOL: &'static str = "$";

    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price a catalog may list (one billion).
    ///
    /// At this bound a line of `u32::MAX` units stays far below
    /// [`Decimal::MAX`].
    pub const MAX_UNIT: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents (e.g. `2499` is `24.99`).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Amount rounded half away from zero to two fraction digits.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g. `"$19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", Self::SYMBOL, self.rounded())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(2499).amount(), Decimal::new(2499, 2));
    }

    #[test]
    fn test_display_pads_to_two_digits() {
        assert_eq!(Price::ZERO.display(), "$0.00");
        assert_eq!(Price::new(Decimal::new(5, 0)).display(), "$5.00");
        assert_eq!(Price::new(Decimal::new(105, 1)).display(), "$10.50");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(10_005, 3)).display(), "$10.01");
        assert_eq!(Price::new(Decimal::new(10_004, 3)).display(), "$10.00");
    }

    #[test]
    fn test_times_is_exact() {
        // 0.1 * 3 must not drift the way f64 does
        let price = Price::new(Decimal::new(1, 1));
        assert_eq!(price.times(3).amount(), Decimal::new(3, 1));
    }

    #[test]
    fn test_times_saturates_instead_of_panicking() {
        let huge = Price::new(Decimal::MAX - Decimal::ONE);
        assert_eq!(huge.times(5000).amount(), Decimal::MAX);
        assert_eq!(
            Price::MAX_UNIT.times(u32::MAX).amount(),
            Decimal::new(4_294_967_295_000_000_000, 0)
        );
    }

    #[test]
    fn test_add_saturates() {
        let total = Price::new(Decimal::MAX) + Price::from_cents(1);
        assert_eq!(total.amount(), Decimal::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(4998), Price::from_cents(799)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(5797));
        assert_eq!(total.display(), "$57.97");
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_cents(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from_cents(1).is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(799)).unwrap_or_default();
        assert_eq!(json, "\"7.99\"");
    }
}
