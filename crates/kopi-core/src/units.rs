//! # Unit Conversion Table
//!
//! Pure conversion between compatible measurement units.
//!
//! ## Conversion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Unit Conversion Table                              │
//! │                                                                         │
//! │  Dimension   Units          Factor to base                             │
//! │  ─────────   ────────────   ──────────────                             │
//! │  Mass        gram, kg       gram = 1, kg = 1000                        │
//! │  Volume      ml, litre      ml = 1, litre = 1000                       │
//! │  Count       pcs, box       pcs = 1, box = 1 (1:1)                     │
//! │                                                                         │
//! │  Same unit           → identity, value untouched                        │
//! │  Same dimension      → scale by factor ratio, round once               │
//! │  Different dimension → IncompatibleUnits (data-integrity fault)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A BOM that declares a material in grams while the material is stocked in
//! ml is *bad catalog data*, not a business condition. Conversion fails loud
//! instead of coercing, and the checkout that hit it aborts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;
use crate::qty::Quantity;

// =============================================================================
// Dimension
// =============================================================================

/// The physical dimension a unit measures.
///
/// Conversion is only defined within one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

// =============================================================================
// Unit
// =============================================================================

/// A measurement unit an inventory item or BOM line is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Gram (mass base unit).
    Gram,
    /// Kilogram (1000 gram).
    Kg,
    /// Millilitre (volume base unit).
    Ml,
    /// Litre (1000 ml).
    Litre,
    /// Pieces (count base unit).
    Pcs,
    /// Box. Converts 1:1 with pieces; a per-item packing factor is catalog
    /// data this table does not own.
    Box,
}

impl Unit {
    /// Returns the dimension this unit measures.
    #[inline]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram | Unit::Kg => Dimension::Mass,
            Unit::Ml | Unit::Litre => Dimension::Volume,
            Unit::Pcs | Unit::Box => Dimension::Count,
        }
    }

    /// Returns the number of base units in one of this unit.
    #[inline]
    const fn factor(&self) -> i64 {
        match self {
            Unit::Gram | Unit::Ml | Unit::Pcs | Unit::Box => 1,
            Unit::Kg | Unit::Litre => 1000,
        }
    }

    /// Checks whether two units belong to the same dimension.
    #[inline]
    pub const fn is_compatible_with(&self, other: Unit) -> bool {
        self.dimension() as u8 == other.dimension() as u8
    }
}

/// Display uses the catalog spelling ("gram", "kg", "ml", "litre", "pcs",
/// "box") — the same strings the database stores.
impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Unit::Gram => "gram",
            Unit::Kg => "kg",
            Unit::Ml => "ml",
            Unit::Litre => "litre",
            Unit::Pcs => "pcs",
            Unit::Box => "box",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts a quantity from one unit into another.
///
/// ## Precision Policy
/// The value is scaled in `i128` and rounded half-away-from-zero **once**.
/// Callers multiply BOM quantities by the ordered count *before* converting
/// (exact integer math), so this single rounding is the only place precision
/// can be lost, and it lands on the value that is written to stock.
///
/// ## Errors
/// [`EngineError::IncompatibleUnits`] when the units measure different
/// dimensions (e.g. gram → ml).
///
/// ## Example
/// ```rust
/// use kopi_core::qty::Quantity;
/// use kopi_core::units::{convert, Unit};
///
/// // 8 Litre of milk, expressed in ml
/// let litres = Quantity::from_whole(8);
/// let ml = convert(litres, Unit::Litre, Unit::Ml).unwrap();
/// assert_eq!(ml, Quantity::from_whole(8000));
///
/// // gram → ml is a catalog fault
/// assert!(convert(litres, Unit::Gram, Unit::Ml).is_err());
/// ```
pub fn convert(qty: Quantity, from: Unit, to: Unit) -> Result<Quantity, EngineError> {
    // Identity first: no arithmetic, no drift, by definition
    if from == to {
        return Ok(qty);
    }

    if !from.is_compatible_with(to) {
        return Err(EngineError::IncompatibleUnits { from, to });
    }

    // value × from_factor / to_factor, widened so the intermediate product
    // cannot overflow, rounded half-away-from-zero
    let numer = qty.milli() as i128 * from.factor() as i128;
    let denom = to.factor() as i128;
    let half = denom / 2;
    let scaled = if numer >= 0 {
        (numer + half) / denom
    } else {
        (numer - half) / denom
    };

    Ok(Quantity::from_milli(scaled as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================
