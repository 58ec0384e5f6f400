//! Money type for currency amounts
//!
//! Amounts are whole cents in an i64. Bill amounts, paycheck incomes and period
//! balances all flow through this type, so balance arithmetic never touches
//! floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use paycycle::models::Money;
    /// let rent = Money::from_cents(120_000); // $1200.00
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Decimal value in currency units, for CSV and report output
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse an amount such as "1200", "1200.5", "$60.00" or "-15.25"
    ///
    /// Fractions beyond two digits are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(trimmed.to_string());

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest).replace(',', "");

        let (whole, fraction) = match rest.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (rest.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction[..2].parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a caller-chosen currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Scale by a count, e.g. extra paychecks times the paycheck amount
impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, count: u32) -> Self {
        Self(self.0 * i64::from(count))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
