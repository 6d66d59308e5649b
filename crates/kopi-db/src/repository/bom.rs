//! # BOM Catalog Repository
//!
//! Read access to bill-of-materials recipes, plus the insert used by
//! catalog setup and tests.
//!
//! Absence of a BOM is a valid, expected outcome — it means the product
//! sells direct from its own stock. The engine consults the *first* BOM
//! for a product (at most one exists in practice).

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kopi_core::{BillOfMaterials, MaterialLine};

/// Repository for BOM catalog operations.
#[derive(Debug, Clone)]
pub struct BomRepository {
    pool: SqlitePool,
}

impl BomRepository {
    /// Creates a new BomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BomRepository { pool }
    }

    /// Finds the BOM whose output is the given product, if any.
    pub async fn find_by_output_product(
        &self,
        product_id: &str,
    ) -> DbResult<Option<BillOfMaterials>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_output_product_on(&mut conn, product_id).await
    }

    /// Inserts a BOM with its lines (catalog setup).
    ///
    /// Line order follows the vector order.
    pub async fn insert(&self, bom: &BillOfMaterials) -> DbResult<()> {
        debug!(id = %bom.id, product_id = %bom.product_id, lines = bom.lines.len(), "Inserting BOM");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bill_of_materials (id, product_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&bom.id)
        .bind(&bom.product_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (position, line) in bom.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO bom_lines (
                    id, bom_id, material_id, qty_per_unit_milli, unit, line_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&bom.id)
            .bind(&line.material_id)
            .bind(line.qty_per_unit_milli)
            .bind(line.unit)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    // Transaction Primitives
    // =========================================================================

    /// BOM lookup on an explicit connection, for use inside the checkout
    /// transaction.
    pub async fn find_by_output_product_on(
        conn: &mut SqliteConnection,
        product_id: &str,
    ) -> DbResult<Option<BillOfMaterials>> {
        let header = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT id, product_id FROM bill_of_materials
            WHERE product_id = ?1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some((id, product_id)) = header else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, MaterialLine>(
            r#"
            SELECT material_id, qty_per_unit_milli, unit, line_order
            FROM bom_lines
            WHERE bom_id = ?1
            ORDER BY line_order
            "#,
        )
        .bind(&id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(BillOfMaterials {
            id,
            product_id,
            lines,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kopi_core::{Category, InventoryItem, Unit};

    async fn seed_item(db: &Database, id: &str, unit: Unit) {
        let now = Utc::now();
        db.inventory()
            .insert(&InventoryItem {
                id: id.to_string(),
                code: id.to_uppercase(),
                product: id.to_string(),
                category: Category::Material,
                unit,
                stock_milli: 0,
                limit_milli: None,
                last_notified: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_absence_means_sell_direct() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_item(&db, "cup", Unit::Pcs).await;

        let found = db.boms().find_by_output_product("cup").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_and_lookup_preserves_line_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_item(&db, "latte", Unit::Pcs).await;
        seed_item(&db, "milk", Unit::Litre).await;
        seed_item(&db, "beans", Unit::Kg).await;

        let bom = BillOfMaterials {
            id: "bom-1".to_string(),
            product_id: "latte".to_string(),
            lines: vec![
                MaterialLine {
                    material_id: "milk".to_string(),
                    qty_per_unit_milli: 200,
                    unit: Unit::Litre,
                    line_order: 0,
                },
                MaterialLine {
                    material_id: "beans".to_string(),
                    qty_per_unit_milli: 18_000,
                    unit: Unit::Gram,
                    line_order: 1,
                },
            ],
        };
        db.boms().insert(&bom).await.unwrap();

        let loaded = db
            .boms()
            .find_by_output_product("latte")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.id, "bom-1");
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].material_id, "milk");
        assert_eq!(loaded.lines[0].unit, Unit::Litre);
        assert_eq!(loaded.lines[1].material_id, "beans");
        assert_eq!(loaded.lines[1].unit, Unit::Gram);
    }
}
