//! # Consumption Engine
//!
//! The one piece of orchestration in the system: turning a completed sale
//! into an atomically-recorded order with unit-converted stock decrements
//! and stock alerts.
//!
//! ## The Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 checkout(request) — one atomic unit                     │
//! │                                                                         │
//! │  validate request          ← nothing persisted on failure              │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  insert order header                                                   │
//! │       │                                                                 │
//! │       ▼  for each line, in input order                                 │
//! │  load product ── insert item row (snapshot)                            │
//! │       │                                                                 │
//! │       ├── BOM?  ── explode into material draws (unit-converted)        │
//! │       └── none ── draw the product's own stock                         │
//! │       │                                                                 │
//! │       ▼  for each draw                                                 │
//! │  conditional decrement ──── refused? ──► ABORT (InsufficientStock,     │
//! │       │                                  names the item; ROLLBACK)     │
//! │       ▼                                                                 │
//! │  breach rule → stage alert, stamp last_notified                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert invoice ── flush staged alerts ── COMMIT                       │
//! │                                                                         │
//! │  Two terminal states only: Committed (all writes visible) or           │
//! │  Aborted (none). Dropping the transaction — error path, caller         │
//! │  cancellation, timeout — rolls everything back.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::bom::BomRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::notification::NotificationRepository;
use crate::repository::order::OrderRepository;
use kopi_core::{
    notify, plan_line, validation, BankTransfer, EngineError, InventoryItem, Invoice, Money,
    Notification, OrderStatus, PaymentMethod, PaymentStatus, SalesItem, SalesOrder, Unit,
    ValidationError,
};

// =============================================================================
// Request / Response
// =============================================================================

/// One cart line in a checkout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: String,
    /// Whole units ordered. Must be positive.
    pub quantity: i64,
    /// Unit price in cents at time of sale. Must be non-negative.
    pub price_cents: i64,
}

/// A checkout call from a POS terminal or sales-order submission.
///
/// The caller is assumed to be authorized to submit a sale; this engine
/// still rejects an empty cart or an unknown product itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Staff member (or user) submitting the sale.
    pub staff_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    /// Cart lines, consumed in input order.
    pub items: Vec<CheckoutLine>,
    pub payment_method: PaymentMethod,
    /// Required when `payment_method` is `Transfer`.
    pub bank_transfer: Option<BankTransfer>,
    pub tag: Option<String>,
    pub memo: Option<String>,
}

/// Everything a successful checkout persisted, returned to the caller.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: SalesOrder,
    pub items: Vec<SalesItem>,
    pub invoice: Invoice,
    /// Stock alerts this checkout raised (at most one per item).
    pub notifications: Vec<Notification>,
}

// =============================================================================
// Checkout Error
// =============================================================================

/// What a checkout caller can get back instead of a receipt.
///
/// Every variant aborts the entire unit — there is no partial commit and no
/// internal retry. Recoverable conditions (lock contention, disconnects)
/// surface as [`CheckoutError::Storage`]; the caller retries the whole
/// checkout at its discretion.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Bad input: empty cart, missing actor, non-positive quantity.
    /// Reported before the transaction opens, nothing persisted.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced inventory item or BOM material does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// BOM/material units measure different dimensions. Bad catalog data —
    /// surfaced distinctly from stock shortages so an operator fixes the
    /// BOM instead of restocking.
    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: Unit, to: Unit },

    /// A decrement would drive the named item negative.
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

    /// Underlying persistence failure (connection loss, timeout, lock
    /// conflict).
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<EngineError> for CheckoutError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ItemNotFound(id) => CheckoutError::NotFound {
                entity: "Inventory item",
                id,
            },
            EngineError::InsufficientStock {
                product,
                unit,
                available_milli,
                requested_milli,
            } => CheckoutError::InsufficientStock {
                product,
                unit,
                available_milli,
                requested_milli,
            },
            EngineError::IncompatibleUnits { from, to } => {
                CheckoutError::IncompatibleUnits { from, to }
            }
            EngineError::Validation(v) => CheckoutError::Validation(v),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The consumption engine bound to a database.
///
/// Many engines may run concurrently (one per terminal); the conditional
/// decrement in [`InventoryRepository::try_decrement`] keeps their effects
/// on any shared inventory row linearizable.
#[derive(Debug, Clone)]
pub struct ConsumptionEngine {
    db: Database,
}

impl ConsumptionEngine {
    /// Creates an engine bound to the given database.
    pub fn new(db: Database) -> Self {
        ConsumptionEngine { db }
    }

    /// Records a completed sale atomically.
    ///
    /// ## What This Does
    /// 1. Validates the request (nothing persisted on failure)
    /// 2. Inserts the order header and its line items
    /// 3. Per line: plans consumption (direct or BOM explosion, unit
    ///    converted) and applies conditional decrements; a refused
    ///    decrement aborts with the failing item's name
    /// 4. Inserts the invoice and flushes staged stock alerts
    /// 5. Commits and returns the persisted graph
    ///
    /// Any failure rolls back the whole unit; so does dropping the future
    /// (caller cancellation).
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        validate_request(&request)?;

        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let total = request
            .items
            .iter()
            .fold(Money::zero(), |sum, line| {
                sum + Money::from_cents(line.price_cents).multiply_quantity(line.quantity)
            });

        debug!(order_id = %order_id, lines = request.items.len(), total = %total, "Opening checkout transaction");

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let order = SalesOrder {
            id: order_id.clone(),
            staff_id: request.staff_id.clone(),
            customer_id: request.customer_id.clone(),
            customer_name: request.customer_name.clone(),
            total_cents: total.cents(),
            status: OrderStatus::Completed,
            payment_status: PaymentStatus::Paid,
            tag: request.tag.clone(),
            memo: request.memo.clone(),
            order_date: now,
            created_at: now,
            updated_at: now,
        };
        // The header insert is the transaction's first statement: the unit
        // takes SQLite's write lock before any stock read, so two checkouts
        // touching the same rows serialize instead of racing on a stale
        // snapshot
        OrderRepository::insert_order(&mut tx, &order).await?;

        let mut items = Vec::with_capacity(request.items.len());
        let mut staged: Vec<Notification> = Vec::new();

        for line in &request.items {
            let product = InventoryRepository::get_on(&mut tx, &line.product_id)
                .await?
                .ok_or_else(|| CheckoutError::NotFound {
                    entity: "Inventory item",
                    id: line.product_id.clone(),
                })?;

            let item = SalesItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id.clone(),
                code_snapshot: product.code.clone(),
                name_snapshot: product.product.clone(),
                quantity: line.quantity,
                unit_price_cents: line.price_cents,
                line_total_cents: Money::from_cents(line.price_cents)
                    .multiply_quantity(line.quantity)
                    .cents(),
                created_at: now,
            };
            OrderRepository::insert_item(&mut tx, &item).await?;
            items.push(item);

            consume_line(&mut tx, &product, line.quantity, now, &mut staged).await?;
        }

        let (bank_name, account_number, account_holder) = match request.payment_method {
            PaymentMethod::Transfer => match request.bank_transfer {
                Some(bank) => (
                    Some(bank.bank_name),
                    Some(bank.account_number),
                    Some(bank.account_holder),
                ),
                None => (None, None, None),
            },
            _ => (None, None, None),
        };
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.clone(),
            amount_cents: total.cents(),
            payment_method: request.payment_method,
            bank_name,
            account_number,
            account_holder,
            payment_date: now,
        };
        OrderRepository::insert_invoice(&mut tx, &invoice).await?;

        // Alerts only exist for a transaction that survived the full
        // decrement pass
        NotificationRepository::insert_all(&mut tx, &staged).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order_id,
            total = %total,
            lines = items.len(),
            alerts = staged.len(),
            "Checkout committed"
        );

        Ok(CheckoutReceipt {
            order,
            items,
            invoice,
            notifications: staged,
        })
    }
}

// =============================================================================
// Internals
// =============================================================================

/// Validates the request shape before the transaction opens.
fn validate_request(request: &CheckoutRequest) -> Result<(), CheckoutError> {
    validation::validate_staff_id(&request.staff_id)?;
    validation::validate_cart_size(request.items.len())?;

    for line in &request.items {
        validation::validate_product_id(&line.product_id)?;
        validation::validate_quantity(line.quantity)?;
        validation::validate_price_cents(line.price_cents)?;
    }

    if request.payment_method == PaymentMethod::Transfer && request.bank_transfer.is_none() {
        return Err(ValidationError::Required {
            field: "bank_transfer".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Consumes stock for one sale line: plan, decrement, stage alerts.
async fn consume_line(
    conn: &mut SqliteConnection,
    product: &InventoryItem,
    ordered_qty: i64,
    now: DateTime<Utc>,
    staged: &mut Vec<Notification>,
) -> Result<(), CheckoutError> {
    let bom = BomRepository::find_by_output_product_on(conn, &product.id).await?;

    // Load every material the BOM references before planning, so a missing
    // material aborts before any draw in this line is applied
    let mut materials = Vec::new();
    if let Some(bom) = &bom {
        for bom_line in &bom.lines {
            let material = InventoryRepository::get_on(conn, &bom_line.material_id)
                .await?
                .ok_or_else(|| CheckoutError::NotFound {
                    entity: "BOM material",
                    id: bom_line.material_id.clone(),
                })?;
            materials.push(material);
        }
    }

    // Pure planning: multiplies, converts, and fails on bad catalog data
    // before this line touches stock
    let plan = plan_line(product, bom.as_ref(), &materials, ordered_qty)?;

    for draw in plan.draws() {
        let target = if draw.item_id == product.id {
            product
        } else {
            materials
                .iter()
                .find(|m| m.id == draw.item_id)
                .ok_or_else(|| CheckoutError::NotFound {
                    entity: "BOM material",
                    id: draw.item_id.clone(),
                })?
        };

        match InventoryRepository::try_decrement(conn, &draw.item_id, draw.amount).await? {
            Some(new_stock) => {
                if let Some(kind) = notify::breach(new_stock, target.limit()) {
                    // One alert per item per transaction: a later draw
                    // against the same item replaces the earlier staging
                    staged.retain(|n| n.related_id != draw.item_id);
                    staged.push(notify::build(target, new_stock, kind, now));
                    InventoryRepository::mark_notified(conn, &draw.item_id, now).await?;
                }
            }
            None => {
                warn!(
                    item = %target.product,
                    requested = %draw.amount,
                    "Conditional decrement refused, aborting checkout"
                );

                let available = InventoryRepository::get_on(conn, &draw.item_id)
                    .await?
                    .map(|i| i.stock_milli)
                    .unwrap_or(0);

                return Err(CheckoutError::InsufficientStock {
                    product: target.product.clone(),
                    unit: target.unit,
                    available_milli: available,
                    requested_milli: draw.amount.milli(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
