//! # Consumption Planning
//!
//! Computes what a sale line will draw from stock, before anything is
//! written.
//!
//! ## Why a Plan?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Direct Sale vs BOM Sale                             │
//! │                                                                         │
//! │  Sell 5 × "Cup" (no BOM)                                               │
//! │       └── Direct: decrement Cup by 5 pcs                               │
//! │                                                                         │
//! │  Sell 40 × "Latte" (BOM: 0.2 litre Milk, 18 gram Beans per unit)      │
//! │       └── Exploded:                                                     │
//! │           ├── Milk  : 0.2 × 40 = 8 litre   (converted to Milk's unit)  │
//! │           └── Beans : 18 × 40  = 720 gram  (converted to Beans' unit)  │
//! │                                                                         │
//! │  Either way the result is a list of draws applied uniformly — the      │
//! │  branch happens exactly once, here, with no storage in sight.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The plan is a pure value: multiply, convert, fail fast on bad catalog
//! data. Storage-side application (conditional decrements, notifications)
//! lives in kopi-db.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::qty::Quantity;
use crate::types::{BillOfMaterials, InventoryItem};
use crate::units::convert;

// =============================================================================
// Plan Types
// =============================================================================

/// One stock decrement the engine will apply, in the target item's native
/// unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDraw {
    /// The inventory item to decrement.
    pub item_id: String,
    /// Amount to subtract, already converted to the item's stored unit.
    pub amount: Quantity,
}

/// How a single sale line consumes stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumptionPlan {
    /// No BOM: the ordered product's own stock is drawn down.
    Direct { draw: MaterialDraw },
    /// A BOM exists: the ordered product explodes into material draws.
    Exploded { draws: Vec<MaterialDraw> },
}

impl ConsumptionPlan {
    /// Returns the draws in application order, uniformly for both shapes.
    pub fn draws(&self) -> &[MaterialDraw] {
        match self {
            ConsumptionPlan::Direct { draw } => std::slice::from_ref(draw),
            ConsumptionPlan::Exploded { draws } => draws,
        }
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Computes the consumption plan for one sale line.
///
/// ## Arguments
/// * `product` - The ordered inventory item
/// * `bom` - The product's BOM, if one exists (absence means "sell direct")
/// * `materials` - The inventory items referenced by the BOM's lines
/// * `ordered_qty` - Whole units ordered
///
/// ## Precision
/// Per-unit quantities are multiplied by `ordered_qty` first (exact integer
/// math), then converted into each material's native unit (the single
/// rounding point). See [`crate::units::convert`].
///
/// ## Errors
/// * [`EngineError::ItemNotFound`] - a BOM line references a material not in
///   `materials`
/// * [`EngineError::IncompatibleUnits`] - a BOM line's unit and its
///   material's stored unit measure different dimensions
pub fn plan_line(
    product: &InventoryItem,
    bom: Option<&BillOfMaterials>,
    materials: &[InventoryItem],
    ordered_qty: i64,
) -> EngineResult<ConsumptionPlan> {
    let Some(bom) = bom else {
        return Ok(ConsumptionPlan::Direct {
            draw: MaterialDraw {
                item_id: product.id.clone(),
                amount: Quantity::from_whole(ordered_qty),
            },
        });
    };

    let mut draws = Vec::with_capacity(bom.lines.len());
    for line in &bom.lines {
        let material = materials
            .iter()
            .find(|m| m.id == line.material_id)
            .ok_or_else(|| EngineError::ItemNotFound(line.material_id.clone()))?;

        // Exact multiply, then the one rounding conversion
        let needed_in_line_unit = line.qty_per_unit() * ordered_qty;
        let needed = convert(needed_in_line_unit, line.unit, material.unit)?;

        draws.push(MaterialDraw {
            item_id: material.id.clone(),
            amount: needed,
        });
    }

    Ok(ConsumptionPlan::Exploded { draws })
}

// =============================================================================
// Unit Tests
// =============================================================================
