//! # Notification Repository
//!
//! Append access for stock alerts. Rows are flushed in bulk at the end of a
//! successful decrement pass — never for a transaction that aborts.
//!
//! The read/delete lifecycle belongs to the notification-center
//! collaborator; the reads here are its query surface.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kopi_core::Notification;

const NOTIFICATION_COLUMNS: &str = "id, title, message, kind, related_id, is_read, created_at";

/// Repository for notification operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NotificationRepository { pool }
    }

    /// Lists unread notifications, newest first.
    pub async fn list_unread(&self) -> DbResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE is_read = 0 ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists all notifications for one inventory item, newest first.
    pub async fn list_for_item(&self, item_id: &str) -> DbResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE related_id = ?1 ORDER BY created_at DESC, id"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts all notifications (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction Primitives
    // =========================================================================

    /// Bulk-appends staged notifications inside the checkout transaction.
    pub async fn insert_all(
        conn: &mut SqliteConnection,
        notifications: &[Notification],
    ) -> DbResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }

        debug!(count = notifications.len(), "Flushing staged notifications");

        for n in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (
                    id, title, message, kind, related_id, is_read, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&n.id)
            .bind(&n.title)
            .bind(&n.message)
            .bind(&n.kind)
            .bind(&n.related_id)
            .bind(n.is_read)
            .bind(n.created_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
