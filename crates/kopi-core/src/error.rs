//! # Error Types
//!
//! Domain-specific error types for kopi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kopi-core errors (this file)                                          │
//! │  ├── EngineError      - Business rule violations during consumption    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kopi-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - What callers of the engine see                 │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError → CheckoutError → caller          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, units, amounts)
//! 3. Errors are enum variants, never String
//! 4. An insufficient-stock failure names the item that failed, never just
//!    "checkout failed"

use thiserror::Error;

use crate::units::Unit;

// =============================================================================
// Engine Error
// =============================================================================

/// Business rule violations raised while planning or applying consumption.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced inventory item does not exist.
    ///
    /// ## When This Occurs
    /// - Cart references an unknown product id
    /// - A BOM line references a material that was removed
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    /// A decrement would drive an item's stock negative.
    ///
    /// ## When This Occurs
    /// - Selling more than is on hand, directly or through a BOM explosion
    ///
    /// Amounts are in milli-units of the item's native unit.
    #[error(
        "Insufficient stock for {product}: available {available_milli} milli-{unit}, \
         requested {requested_milli} milli-{unit}"
    )]
    InsufficientStock {
        product: String,
        unit: Unit,
        available_milli: i64,
        requested_milli: i64,
    },

    /// BOM/material units belong to different measurement dimensions.
    ///
    /// This is bad catalog data, not a business condition; it is surfaced
    /// distinctly from stock shortages so an operator fixes the BOM instead
    /// of restocking.
    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: Unit, to: Unit },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a checkout request doesn't meet requirements.
/// Used for early validation before any business logic runs — nothing is
/// persisted when one of these is raised.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The cart has no line items.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
