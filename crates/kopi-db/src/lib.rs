//! # kopi-db: Database Layer and Consumption Engine for Kopi POS
//!
//! This crate provides database access for the Kopi POS system and the one
//! orchestrated operation built on top of it: the atomic checkout.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kopi POS Data Flow                                 │
//! │                                                                         │
//! │  POS checkout / sales-order submission                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      kopi-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄──│  inventory     │   │  (embedded)  │   │   │
//! │  │   │               │   │  bom, order    │   │              │   │   │
//! │  │   │  SqlitePool   │   │  notification  │   │ 001_init.sql │   │   │
//! │  │   └───────────────┘   └───────┬────────┘   └──────────────┘   │   │
//! │  │                               │                                │   │
//! │  │   ┌───────────────────────────▼────────────────────────────┐  │   │
//! │  │   │        ConsumptionEngine (checkout.rs)                 │  │   │
//! │  │   │  one transaction: order + items + decrements +         │  │   │
//! │  │   │  invoice + notifications, commit-or-rollback           │  │   │
//! │  │   └────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`checkout`] - The consumption engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kopi_db::{CheckoutLine, CheckoutRequest, Database, DbConfig};
//! use kopi_core::PaymentMethod;
//!
//! let db = Database::new(DbConfig::new("path/to/kopi.db")).await?;
//!
//! let receipt = db.engine().checkout(CheckoutRequest {
//!     staff_id: "staff-7".into(),
//!     customer_id: None,
//!     customer_name: None,
//!     items: vec![CheckoutLine {
//!         product_id: latte_id,
//!         quantity: 2,
//!         price_cents: 450,
//!     }],
//!     payment_method: PaymentMethod::Cash,
//!     bank_transfer: None,
//!     tag: None,
//!     memo: None,
//! }).await?;
//!
//! println!("order {} raised {} alerts", receipt.order.id, receipt.notifications.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{
    CheckoutError, CheckoutLine, CheckoutReceipt, CheckoutRequest, ConsumptionEngine,
};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bom::BomRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::notification::NotificationRepository;
pub use repository::order::{OrderGraph, OrderRepository};
