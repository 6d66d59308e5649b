//! # Repository Module
//!
//! Database repository implementations for Kopi POS.
//!
//! ## Repository Pattern
//! Each repository abstracts one table family behind a clean API: the SQL is
//! isolated in one place and the checkout orchestrator composes repositories
//! instead of writing queries.
//!
//! Two kinds of methods per repository:
//! - pool-based reads/writes for standalone use by collaborators
//! - associated functions taking `&mut SqliteConnection` — the primitives
//!   the checkout transaction composes, so every read and write inside a
//!   checkout shares one connection and one transaction
//!
//! ## Available Repositories
//!
//! - [`inventory::InventoryRepository`] - stock records, conditional decrement
//! - [`bom::BomRepository`] - bill-of-materials catalog lookup
//! - [`order::OrderRepository`] - sales orders, items, invoices
//! - [`notification::NotificationRepository`] - stock alerts

pub mod bom;
pub mod inventory;
pub mod notification;
pub mod order;
