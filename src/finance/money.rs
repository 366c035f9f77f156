//! Exact USD totals held as integer cents

use crate::error::{Result, TradeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A USD amount counted in cents
///
/// Formats as `<dollars>.<cents>` with the cents always two digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonetaryTotal {
    cents: i64,
}

impl MonetaryTotal {
    pub const ZERO: MonetaryTotal = MonetaryTotal { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Whole dollars, truncated toward zero
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Cents past the whole dollars, always 0..=99
    pub fn cents_part(&self) -> u8 {
        (self.cents.unsigned_abs() % 100) as u8
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Add cents, failing instead of wrapping
    pub fn checked_add_cents(self, cents: i64) -> Result<Self> {
        self.cents
            .checked_add(cents)
            .map(Self::from_cents)
            .ok_or_else(|| {
                TradeError::Arithmetic(format!("Total overflowed adding {} cents to {}", cents, self))
            })
    }
}

impl Add for MonetaryTotal {
    type Output = MonetaryTotal;

    fn add(self, rhs: MonetaryTotal) -> MonetaryTotal {
        MonetaryTotal::from_cents(self.cents + rhs.cents)
    }
}

impl AddAssign for MonetaryTotal {
    fn add_assign(&mut self, rhs: MonetaryTotal) {
        self.cents += rhs.cents;
    }
}

impl Sum for MonetaryTotal {
    fn sum<I: Iterator<Item = MonetaryTotal>>(iter: I) -> Self {
        iter.fold(MonetaryTotal::ZERO, Add::add)
    }
}

impl fmt::Display for MonetaryTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
