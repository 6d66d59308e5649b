//! # Domain Types
//!
//! Core domain types used throughout Kopi POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryItem   │   │ BillOfMaterials │   │   SalesOrder    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (SKU)     │   │  product_id     │   │  staff_id       │       │
//! │  │  unit, stock    │   │  lines[]        │   │  total_cents    │       │
//! │  │  limit          │   │   material_id   │   │  status         │       │
//! │  └─────────────────┘   │   qty_per_unit  │   └─────────────────┘       │
//! │                        │   unit          │                              │
//! │  ┌─────────────────┐   └─────────────────┘   ┌─────────────────┐       │
//! │  │    Invoice      │                         │  Notification   │       │
//! │  │  ─────────────  │   ┌─────────────────┐   │  ─────────────  │       │
//! │  │  order_id (1:1) │   │   SalesItem     │   │  related_id     │       │
//! │  │  amount_cents   │   │  snapshots of   │   │  kind = "stock" │       │
//! │  │  bank fields    │   │  product + qty  │   │  is_read        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (`code` on inventory items)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::qty::Quantity;
use crate::units::Unit;

// =============================================================================
// Inventory
// =============================================================================

/// What role an inventory item plays in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A finished good sold at the counter.
    Product,
    /// A raw material consumed through BOM explosion.
    Material,
    /// Packaging consumed alongside products.
    Packaging,
}

/// A stock-keeping record.
///
/// The `stock_milli` field is mutated exclusively by the consumption engine
/// (decrements) and by restock/limit edits outside the engine. It must never
/// be persisted negative after a committed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, unique.
    pub code: String,

    /// Display name shown to operators and in notifications.
    pub product: String,

    /// Role in the catalog (product, material, packaging).
    pub category: Category,

    /// Native measurement unit stock is kept in.
    pub unit: Unit,

    /// Current stock level in milli-units of `unit`.
    pub stock_milli: i64,

    /// Optional reorder threshold in milli-units. Stock at or below this
    /// is "low stock".
    pub limit_milli: Option<i64>,

    /// Last time a stock alert fired for this item. Written on every alert;
    /// not read to suppress repeats (see DESIGN.md).
    pub last_notified: Option<DateTime<Utc>>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the stock level as a Quantity.
    #[inline]
    pub fn stock(&self) -> Quantity {
        Quantity::from_milli(self.stock_milli)
    }

    /// Returns the reorder threshold, if one is configured.
    #[inline]
    pub fn limit(&self) -> Option<Quantity> {
        self.limit_milli.map(Quantity::from_milli)
    }
}

// =============================================================================
// Bill of Materials
// =============================================================================

/// One material draw in a BOM recipe.
///
/// `qty_per_unit_milli` is expressed in `unit`, which may differ from the
/// material's stored unit — the consumption plan converts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MaterialLine {
    /// The material consumed.
    pub material_id: String,

    /// Quantity consumed per one unit of output, in milli-`unit`.
    pub qty_per_unit_milli: i64,

    /// Unit this line expresses its quantity in.
    pub unit: Unit,

    /// Position within the BOM (lines apply in order).
    pub line_order: i64,
}

impl MaterialLine {
    /// Returns the per-unit quantity as a Quantity.
    #[inline]
    pub fn qty_per_unit(&self) -> Quantity {
        Quantity::from_milli(self.qty_per_unit_milli)
    }
}

/// A recipe mapping one output product to its raw materials.
///
/// At most one BOM is consulted per output product: the engine looks up the
/// first matching BOM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub id: String,
    /// The inventory item this BOM produces.
    pub product_id: String,
    /// Ordered material lines.
    pub lines: Vec<MaterialLine>,
}

// =============================================================================
// Sales Order
// =============================================================================

/// The status of a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted but not yet fulfilled (sales-order channel).
    Pending,
    /// Paid and fulfilled (POS checkout lands here).
    Completed,
    /// Cancelled through a separate workflow.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Completed
    }
}

/// Payment state of a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// A sale recorded by the consumption engine.
///
/// Created once per checkout; line items are immutable thereafter except
/// through a separate edit workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesOrder {
    pub id: String,
    /// Staff member (or user) who submitted the sale.
    pub staff_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    /// Order total in cents (Σ price × quantity across items).
    pub total_cents: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Free-form channel/campaign tag.
    pub tag: Option<String>,
    pub memo: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesOrder {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sales Item
// =============================================================================

/// A line item in a sales order.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub code_snapshot: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold, in whole units.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SalesItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// How an order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer; carries the receiving account details.
    Transfer,
}

/// Bank account details attached to a transfer payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransfer {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

/// The payment record created atomically with its order (one-to-one for the
/// POS flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    /// Amount paid in cents.
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    /// Bank details, set only when `payment_method` is `Transfer`.
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub payment_date: DateTime<Utc>,
}

impl Invoice {
    /// Returns the invoice amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Notification
// =============================================================================

/// Notification kind emitted by this engine. The notification-center
/// collaborator filters on it.
pub const STOCK_NOTIFICATION_KIND: &str = "stock";

/// A stock alert row. Append-only from this engine; read/delete lifecycle
/// belongs to the notification center.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Always [`STOCK_NOTIFICATION_KIND`] for rows written by this engine.
    pub kind: String,
    /// The inventory item this alert is about.
    pub related_id: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock_milli: i64, limit_milli: Option<i64>) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: "item-1".to_string(),
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
    fn test_item_accessors() {
        let it = item(10_000, Some(2_000));
        assert_eq!(it.stock(), Quantity::from_whole(10));
        assert_eq!(it.limit(), Some(Quantity::from_whole(2)));
        assert_eq!(item(0, None).limit(), None);
    }

    #[test]
    fn test_order_status_default_is_completed() {
        assert_eq!(OrderStatus::default(), OrderStatus::Completed);
    }

    #[test]
    fn test_material_line_quantity() {
        let line = MaterialLine {
            material_id: "item-1".to_string(),
            qty_per_unit_milli: 200,
            unit: Unit::Litre,
            line_order: 0,
        };
        assert_eq!(line.qty_per_unit(), Quantity::from_milli(200));
    }
}
