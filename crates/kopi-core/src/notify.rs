//! # Stock Breach Rules
//!
//! Decides when a decrement warrants an alert and renders the alert text.
//!
//! ## The Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   should notify  =  (limit is set AND stock <= limit)  OR  stock <= 0  │
//! │                                                                         │
//! │   stock <= 0                      → OutOfStock                          │
//! │   0 < stock <= limit              → LowStock                            │
//! │   stock above limit (or no limit) → nothing                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Alerts fire on every breaching transaction; `last_notified` is stamped
//! but not read back to suppress repeats (decision recorded in DESIGN.md).
//! Persistence and the one-alert-per-item-per-transaction guarantee live in
//! the orchestrator — this module is pure rule and text.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::qty::Quantity;
use crate::types::{InventoryItem, Notification, STOCK_NOTIFICATION_KIND};

// =============================================================================
// Breach Rule
// =============================================================================

/// The kind of threshold an item crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBreach {
    /// Stock is at or below zero.
    OutOfStock,
    /// Stock is at or below the configured reorder limit.
    LowStock,
}

/// Evaluates the notification rule against a post-decrement stock level.
///
/// ## Example
/// ```rust
/// use kopi_core::notify::{breach, StockBreach};
/// use kopi_core::qty::Quantity;
///
/// let limit = Some(Quantity::from_whole(2));
/// assert_eq!(breach(Quantity::from_whole(2), limit), Some(StockBreach::LowStock));
/// assert_eq!(breach(Quantity::from_whole(3), limit), None);
/// assert_eq!(breach(Quantity::zero(), None), Some(StockBreach::OutOfStock));
/// ```
pub fn breach(stock: Quantity, limit: Option<Quantity>) -> Option<StockBreach> {
    if stock.is_zero() || stock.is_negative() {
        return Some(StockBreach::OutOfStock);
    }
    match limit {
        Some(limit) if stock <= limit => Some(StockBreach::LowStock),
        _ => None,
    }
}

// =============================================================================
// Alert Construction
// =============================================================================

/// Builds the notification row for a breach.
///
/// The message reports stock **floored to a whole number** — fractional
/// units are not meaningful to an operator — tagged with the item's unit
/// and, when configured, its reorder limit.
///
/// ## Arguments
/// * `item` - The breached item (name, code, unit, limit)
/// * `stock_now` - Post-decrement stock level
/// * `kind` - Which threshold was crossed
/// * `at` - Transaction timestamp (one per checkout, not per alert)
pub fn build(
    item: &InventoryItem,
    stock_now: Quantity,
    kind: StockBreach,
    at: DateTime<Utc>,
) -> Notification {
    let reorder_hint = match item.limit() {
        Some(limit) => format!(" (reorder at {} {})", limit.floor_whole(), item.unit),
        None => String::new(),
    };

    let (title, message) = match kind {
        StockBreach::OutOfStock => (
            format!("Out of stock: {}", item.product),
            format!(
                "{} ({}) is out of stock: {} {} remaining{}.",
                item.product,
                item.code,
                stock_now.floor_whole(),
                item.unit,
                reorder_hint
            ),
        ),
        StockBreach::LowStock => (
            format!("Low stock: {}", item.product),
            format!(
                "{} ({}) is down to {} {}{}.",
                item.product,
                item.code,
                stock_now.floor_whole(),
                item.unit,
                reorder_hint
            ),
        ),
    };

    Notification {
        id: Uuid::new_v4().to_string(),
        title,
        message,
        kind: STOCK_NOTIFICATION_KIND.to_string(),
        related_id: item.id.clone(),
        is_read: false,
        created_at: at,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use crate::units::Unit;

    fn milk(stock_milli: i64, limit_milli: Option<i64>) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: "milk-id".to_string(),
            code: "MILK-1L".to_string(),
            product: "Milk".to_string(),
            category: Category::Material,
            unit: Unit::Litre,
            stock_milli,
            limit_milli,
            last_notified: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_breach_rule() {
        let limit = Some(Quantity::from_whole(2));

        // Landing exactly on the limit counts as a breach
        assert_eq!(
            breach(Quantity::from_whole(2), limit),
            Some(StockBreach::LowStock)
        );
        assert_eq!(breach(Quantity::from_whole(3), limit), None);
        assert_eq!(
            breach(Quantity::zero(), limit),
            Some(StockBreach::OutOfStock)
        );
        // Negative should never be committed, but the rule still classifies it
        assert_eq!(
            breach(Quantity::from_milli(-1), None),
            Some(StockBreach::OutOfStock)
        );
        // No limit, positive stock: silent
        assert_eq!(breach(Quantity::from_milli(1), None), None);
    }

    #[test]
    fn test_low_stock_message_floors_and_tags() {
        let item = milk(2_400, Some(2_500));
        let n = build(
            &item,
            Quantity::from_milli(2_400),
            StockBreach::LowStock,
            Utc::now(),
        );

        assert_eq!(n.title, "Low stock: Milk");
        // 2.4 litre floors to 2, limit 2.5 floors to 2
        assert_eq!(
            n.message,
            "Milk (MILK-1L) is down to 2 litre (reorder at 2 litre)."
        );
        assert_eq!(n.kind, STOCK_NOTIFICATION_KIND);
        assert_eq!(n.related_id, "milk-id");
        assert!(!n.is_read);
    }

    #[test]
    fn test_out_of_stock_message_without_limit() {
        let item = milk(0, None);
        let n = build(&item, Quantity::zero(), StockBreach::OutOfStock, Utc::now());

        assert_eq!(n.title, "Out of stock: Milk");
        assert_eq!(n.message, "Milk (MILK-1L) is out of stock: 0 litre remaining.");
    }

    #[test]
    fn test_out_of_stock_message_keeps_reorder_hint() {
        let item = milk(0, Some(2_000));
        let n = build(&item, Quantity::zero(), StockBreach::OutOfStock, Utc::now());

        assert_eq!(
            n.message,
            "Milk (MILK-1L) is out of stock: 0 litre remaining (reorder at 2 litre)."
        );
    }
}
