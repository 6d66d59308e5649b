//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! Same discipline as [`crate::qty`]: integer smallest-unit arithmetic, never
//! floating point. Order totals, line totals and invoice amounts all flow
//! through this type; only display code converts to major units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for refunds and corrections
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// let price = Money::from_cents(450); // $4.50 latte
    /// assert_eq!(price.cents(), 450);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by an ordered quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(450);
    /// let line_total = unit_price.multiply_quantity(40);
    /// assert_eq!(line_total.cents(), 18000); // 40 lattes = $180.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Receipt collaborators format for
/// display themselves to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let tripled: Money = a * 3;
        assert_eq!(tripled.cents(), 3000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(450);
        assert_eq!(unit_price.multiply_quantity(40).cents(), 18000);
        assert_eq!(unit_price.multiply_quantity(0).cents(), 0);
    }
}
