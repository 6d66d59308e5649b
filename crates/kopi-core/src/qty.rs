//! # Quantity Module
//!
//! Provides the `Quantity` type for handling stock quantities safely.
//!
//! ## Why Integer Quantities?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A latte consumes 0.2 Litre of milk. In floating point:                │
//! │    0.2 × 3 = 0.6000000000000001  ❌ WRONG!                              │
//! │                                                                         │
//! │  Chained across a BOM explosion, the drift accumulates and the         │
//! │  "stock >= needed" check starts lying to us.                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer milli-units                                      │
//! │    0.2 Litre = 200 milli-Litre, 200 × 3 = 600 — exact, every time      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Three decimal places cover every factor in the unit conversion table
//! (gram/Kg and ml/Litre are both 1:1000), so multiplying a BOM line by an
//! ordered quantity is exact integer math. Rounding happens exactly once, in
//! [`crate::units::convert`], at the value that is written to stock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Number of milli-units in one whole unit.
pub const MILLI_PER_UNIT: i64 = 1000;

// =============================================================================
// Quantity Type
// =============================================================================

/// A stock quantity in milli-units (1/1000 of the item's native unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: a decrement can *compute* a negative value; the engine
///   guarantees a negative value is never *committed*
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Unit-agnostic**: the unit lives on the inventory item; pairing a
///   quantity with the wrong unit is what [`crate::units::convert`] guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milli-units.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::qty::Quantity;
    ///
    /// let milk = Quantity::from_milli(200); // 0.2 Litre
    /// assert_eq!(milk.milli(), 200);
    /// ```
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::qty::Quantity;
    ///
    /// let cups = Quantity::from_whole(5); // 5 Pcs
    /// assert_eq!(cups.milli(), 5000);
    /// ```
    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Returns the value in milli-units.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit part, rounded towards negative infinity.
    ///
    /// Used for operator-facing text: "1.7 Litre remaining" reads as
    /// "1 Litre" — fractional stock is not meaningful on a shelf label.
    ///
    /// ## Example
    /// ```rust
    /// use kopi_core::qty::Quantity;
    ///
    /// assert_eq!(Quantity::from_milli(1700).floor_whole(), 1);
    /// assert_eq!(Quantity::from_milli(-200).floor_whole(), -1);
    /// ```
    #[inline]
    pub const fn floor_whole(&self) -> i64 {
        self.0.div_euclid(MILLI_PER_UNIT)
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the quantity in whole units with up to three decimals.
///
/// ## Note
/// This is for logs and notification text. Trailing zeros are trimmed:
/// `200` milli displays as "0.2", `5000` as "5".
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / MILLI_PER_UNIT;
        let frac = abs % MILLI_PER_UNIT;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let text = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, text.trim_end_matches('0'))
        }
    }
}

/// Default quantity is zero.
impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

/// Addition of two quantities.
impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two quantities.
impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by an ordered quantity (exact, no rounding).
impl Mul<i64> for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Quantity(self.0 * count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
