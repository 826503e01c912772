use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Signed money amount represented as an **integer number of minor units**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// payer credits, balances, transfers) to avoid floating-point drift across
/// many expenses.
///
/// The value is signed:
/// - positive = credit / is owed
/// - negative = debit / owes
///
/// How many minor units make up one major unit depends on the currency (see
/// `Currency::minor_units`); VND uses 0 fraction digits, so one minor unit is
/// one đồng.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(300_000);
/// assert_eq!(amount.minor(), 300_000);
/// assert_eq!(amount.share(1, 3).minor(), 100_000);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// Smaller of two amounts.
    #[must_use]
    pub fn min(self, rhs: Money) -> Money {
        Money(self.0.min(rhs.0))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Proportional share `self * weight / total_weight`, rounded
    /// half-away-from-zero to the minor unit.
    ///
    /// The intermediate product is computed in `i128`, so shares of large
    /// amounts with large weights (exact-split mode uses literal minor-unit
    /// amounts as weights) cannot overflow.
    ///
    /// `total_weight` must be positive; callers validate weight sums before
    /// reaching this point.
    #[must_use]
    pub fn share(self, weight: i64, total_weight: i64) -> Money {
        debug_assert!(total_weight > 0, "total_weight must be > 0");
        let numer = i128::from(self.0) * i128::from(weight);
        let denom = i128::from(total_weight);
        // Truncating division keeps the sign-matched half-adjustment
        // rounding away from zero; flooring would pull negative amounts one
        // unit too low.
        let half = if numer >= 0 { denom / 2 } else { -(denom / 2) };
        Money(((numer + half) / denom) as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_divides_proportionally() {
        assert_eq!(Money::new(300_000).share(1, 3).minor(), 100_000);
        assert_eq!(Money::new(300_000).share(100_000, 300_000).minor(), 100_000);
        assert_eq!(Money::new(300_000).share(200_000, 300_000).minor(), 200_000);
    }

    #[test]
    fn share_rounds_half_away_from_zero() {
        // 100 * 1 / 3 = 33.33.. -> 33; 100 * 1 / 8 = 12.5 -> 13
        assert_eq!(Money::new(100).share(1, 3).minor(), 33);
        assert_eq!(Money::new(100).share(1, 8).minor(), 13);
        assert_eq!(Money::new(-100).share(1, 8).minor(), -13);
        // Negative with a non-half remainder: -33.33.. rounds to -33, not -34.
        assert_eq!(Money::new(-100).share(1, 3).minor(), -33);
        assert_eq!(Money::new(-100).share(2, 3).minor(), -67);
    }

    #[test]
    fn sum_folds_from_zero() {
        let total: Money = [Money::new(10), Money::new(-4), Money::new(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(7));
    }
}
