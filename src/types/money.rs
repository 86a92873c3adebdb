//! Monetary amounts in integer cents
//!
//! Order arithmetic (line totals, discounts, refunds) must satisfy exact
//! equalities, so amounts are kept as whole cents and only rendered as
//! decimal currency at the output boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Amount of money in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Money = Money(0);

    /// Amount from whole cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount from a decimal currency value, rounded to the nearest cent
    pub fn from_amount(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Whole cents
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Decimal currency value
    pub fn as_amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a rate, rounding to the nearest cent
    pub fn scale(&self, rate: f64) -> Money {
        Money((self.0 as f64 * rate).round() as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
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

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0 * rhs as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_amount())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Money::from_amount(f64::deserialize(deserializer)?))
    }
}
