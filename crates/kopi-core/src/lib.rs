//! # kopi-core: Pure Business Logic for Kopi POS
//!
//! This crate is the **heart** of the Kopi POS inventory consumption engine.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kopi POS Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        External Collaborators (POS UI, receipts, reports)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ checkout(request)                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kopi-db (Consumption Engine)                    │   │
//! │  │        one transaction: order + decrements + notifications      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kopi-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   units   │  │ qty/money │  │   plan    │  │  notify   │  │   │
//! │  │   │  convert  │  │fixed-point│  │ Direct /  │  │  breach   │  │   │
//! │  │   │   table   │  │arithmetic │  │ Exploded  │  │   rule    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, BillOfMaterials, SalesOrder, ...)
//! - [`qty`] - Quantity type with milli-unit integer arithmetic (no floats!)
//! - [`money`] - Money type with integer-cent arithmetic
//! - [`units`] - The unit conversion table
//! - [`plan`] - Consumption planning (the Direct/Exploded split)
//! - [`notify`] - Stock breach rule and alert text
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Arithmetic**: Quantities are milli-units, prices are cents -
//!    floating point never touches a stock level
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use kopi_core::qty::Quantity;
//! use kopi_core::units::{convert, Unit};
//!
//! // A BOM line: 0.2 litre of milk per latte, 40 lattes ordered
//! let per_unit = Quantity::from_milli(200);
//! let needed = per_unit * 40; // exact: 8 litre
//!
//! // Milk happens to be stocked in ml
//! let in_stock_unit = convert(needed, Unit::Litre, Unit::Ml).unwrap();
//! assert_eq!(in_stock_unit, Quantity::from_whole(8000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod notify;
pub mod plan;
pub mod qty;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kopi_core::Quantity` instead of
// `use kopi_core::qty::Quantity`

pub use error::{EngineError, EngineResult, ValidationError};
pub use money::Money;
pub use plan::{plan_line, ConsumptionPlan, MaterialDraw};
pub use qty::Quantity;
pub use types::*;
pub use units::{convert, Dimension, Unit};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single checkout.
///
/// ## Business Reason
/// Prevents runaway carts and keeps the decrement pass bounded.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum ordered quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
