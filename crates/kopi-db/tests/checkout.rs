//! End-to-end checkout scenarios.
//!
//! These run against a real (temporary-file) SQLite database so the
//! conditional decrement, transaction rollback and WAL-serialized writers
//! are all exercised for real, including under concurrency.

use chrono::Utc;
use uuid::Uuid;

use kopi_core::{
    BankTransfer, BillOfMaterials, Category, InventoryItem, MaterialLine, PaymentMethod, Quantity,
    Unit,
};
use kopi_db::{CheckoutError, CheckoutLine, CheckoutRequest, Database, DbConfig};

// =============================================================================
// Helpers
// =============================================================================

async fn test_db() -> Database {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let path = std::env::temp_dir().join(format!("kopi-test-{}.db", Uuid::new_v4()));
    Database::new(DbConfig::new(path)).await.unwrap()
}

fn item(
    code: &str,
    name: &str,
    category: Category,
    unit: Unit,
    stock_milli: i64,
    limit_milli: Option<i64>,
) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        product: name.to_string(),
        category,
        unit,
        stock_milli,
        limit_milli,
        last_notified: None,
        created_at: now,
        updated_at: now,
    }
}

fn bom(product: &InventoryItem, lines: Vec<(&InventoryItem, i64, Unit)>) -> BillOfMaterials {
    BillOfMaterials {
        id: Uuid::new_v4().to_string(),
        product_id: product.id.clone(),
        lines: lines
            .into_iter()
            .enumerate()
            .map(|(position, (material, qty_per_unit_milli, unit))| MaterialLine {
                material_id: material.id.clone(),
                qty_per_unit_milli,
                unit,
                line_order: position as i64,
            })
            .collect(),
    }
}

fn cash_sale(lines: Vec<CheckoutLine>) -> CheckoutRequest {
    CheckoutRequest {
        staff_id: "staff-7".to_string(),
        customer_id: None,
        customer_name: None,
        items: lines,
        payment_method: PaymentMethod::Cash,
        bank_transfer: None,
        tag: None,
        memo: None,
    }
}

fn line(product: &InventoryItem, quantity: i64, price_cents: i64) -> CheckoutLine {
    CheckoutLine {
        product_id: product.id.clone(),
        quantity,
        price_cents,
    }
}

async fn stock_of(db: &Database, id: &str) -> Quantity {
    db.inventory().get(id).await.unwrap().unwrap().stock()
}

// =============================================================================
// Scenario 1: BOM sale down to the limit
// =============================================================================

#[tokio::test]
async fn forty_lattes_drain_milk_to_its_limit_and_alert_once() {
    let db = test_db().await;

    let milk = item("MILK-1L", "Milk", Category::Material, Unit::Litre, 10_000, Some(2_000));
    let latte = item("LATTE", "Latte", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&milk).await.unwrap();
    db.inventory().insert(&latte).await.unwrap();
    // 0.2 litre of milk per latte
    db.boms().insert(&bom(&latte, vec![(&milk, 200, Unit::Litre)])).await.unwrap();

    let receipt = db
        .engine()
        .checkout(cash_sale(vec![line(&latte, 40, 450)]))
        .await
        .unwrap();

    // 10 - 0.2×40 = 2 litre, exactly at the limit
    assert_eq!(stock_of(&db, &milk.id).await, Quantity::from_whole(2));

    // stock == limit triggers exactly one low-stock alert
    assert_eq!(receipt.notifications.len(), 1);
    let alert = &receipt.notifications[0];
    assert_eq!(alert.related_id, milk.id);
    assert_eq!(alert.title, "Low stock: Milk");
    assert_eq!(db.notifications().count().await.unwrap(), 1);

    // last_notified was stamped inside the same transaction
    let milk_after = db.inventory().get(&milk.id).await.unwrap().unwrap();
    assert!(milk_after.last_notified.is_some());

    // The order graph is persisted and complete
    assert_eq!(receipt.order.total_cents, 40 * 450);
    let graph = db.orders().get(&receipt.order.id).await.unwrap().unwrap();
    assert_eq!(graph.items.len(), 1);
    assert_eq!(graph.items[0].quantity, 40);
    assert_eq!(graph.items[0].name_snapshot, "Latte");
    assert_eq!(graph.invoice.unwrap().amount_cents, 40 * 450);
}

// =============================================================================
// Scenario 2: BOM sale overdraws → full rollback
// =============================================================================

#[tokio::test]
async fn sixty_lattes_abort_naming_milk_and_persist_nothing() {
    let db = test_db().await;

    let milk = item("MILK-1L", "Milk", Category::Material, Unit::Litre, 10_000, Some(2_000));
    let latte = item("LATTE", "Latte", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&milk).await.unwrap();
    db.inventory().insert(&latte).await.unwrap();
    db.boms().insert(&bom(&latte, vec![(&milk, 200, Unit::Litre)])).await.unwrap();

    let err = db
        .engine()
        .checkout(cash_sale(vec![line(&latte, 60, 450)]))
        .await
        .unwrap_err();

    // Names the material, not just "checkout failed"
    match err {
        CheckoutError::InsufficientStock {
            product,
            unit,
            available_milli,
            requested_milli,
        } => {
            assert_eq!(product, "Milk");
            assert_eq!(unit, Unit::Litre);
            assert_eq!(available_milli, 10_000);
            assert_eq!(requested_milli, 12_000);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Atomicity: no order, no invoice, no stock mutation, no alert
    assert_eq!(stock_of(&db, &milk.id).await, Quantity::from_whole(10));
    assert_eq!(db.orders().count().await.unwrap(), 0);
    assert_eq!(db.notifications().count().await.unwrap(), 0);
    let invoices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(invoices, 0);
}

// =============================================================================
// Scenario 3: direct sale to zero, then overdraw
// =============================================================================

#[tokio::test]
async fn direct_sale_drains_to_zero_then_next_sale_fails() {
    let db = test_db().await;

    let cup = item("CUP", "Cup", Category::Packaging, Unit::Pcs, 5_000, None);
    db.inventory().insert(&cup).await.unwrap();

    let receipt = db
        .engine()
        .checkout(cash_sale(vec![line(&cup, 5, 200)]))
        .await
        .unwrap();

    assert_eq!(stock_of(&db, &cup.id).await, Quantity::zero());
    assert_eq!(receipt.notifications.len(), 1);
    assert_eq!(receipt.notifications[0].title, "Out of stock: Cup");

    // A sixth unit in a new transaction fails and changes nothing
    let err = db
        .engine()
        .checkout(cash_sale(vec![line(&cup, 1, 200)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
    assert_eq!(stock_of(&db, &cup.id).await, Quantity::zero());
    assert_eq!(db.orders().count().await.unwrap(), 1);
    assert_eq!(db.notifications().count().await.unwrap(), 1);
}

// =============================================================================
// Scenario 4: incompatible BOM units are a data-integrity fault
// =============================================================================

#[tokio::test]
async fn gram_bom_line_against_ml_material_aborts_before_touching_stock() {
    let db = test_db().await;

    let syrup = item("SYRUP", "Syrup", Category::Material, Unit::Ml, 5_000, None);
    let mocha = item("MOCHA", "Mocha", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&syrup).await.unwrap();
    db.inventory().insert(&mocha).await.unwrap();
    // BOM declared in gram, material stored in ml
    db.boms().insert(&bom(&mocha, vec![(&syrup, 10_000, Unit::Gram)])).await.unwrap();

    let err = db
        .engine()
        .checkout(cash_sale(vec![line(&mocha, 1, 500)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::IncompatibleUnits {
            from: Unit::Gram,
            to: Unit::Ml
        }
    ));

    assert_eq!(stock_of(&db, &syrup.id).await, Quantity::from_whole(5));
    assert_eq!(db.orders().count().await.unwrap(), 0);
    assert_eq!(db.notifications().count().await.unwrap(), 0);
}

// =============================================================================
// Scenario 5: concurrent checkouts never oversell
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_checkouts_against_one_material_are_linearized() {
    let db = test_db().await;

    let juice = item("JUICE", "Juice", Category::Material, Unit::Litre, 10_000, None);
    db.inventory().insert(&juice).await.unwrap();

    let engine_a = db.engine();
    let engine_b = db.engine();
    let req_a = cash_sale(vec![line(&juice, 6, 300)]);
    let req_b = cash_sale(vec![line(&juice, 6, 300)]);

    let task_a = tokio::spawn(async move { engine_a.checkout(req_a).await });
    let task_b = tokio::spawn(async move { engine_b.checkout(req_b).await });
    let result_a = task_a.await.unwrap();
    let result_b = task_b.await.unwrap();

    // Exactly one commits, regardless of interleaving
    let outcomes = [&result_a, &result_b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);

    let loser = outcomes.into_iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        CheckoutError::InsufficientStock { .. }
    ));

    // 10 - 6 = 4 litre, never negative
    assert_eq!(stock_of(&db, &juice.id).await, Quantity::from_whole(4));
    assert_eq!(db.orders().count().await.unwrap(), 1);
}

// =============================================================================
// Conversion, invoices and alert bookkeeping
// =============================================================================

#[tokio::test]
async fn bom_quantities_convert_into_each_materials_native_unit() {
    let db = test_db().await;

    // Beans stocked in kg, BOM declares grams per cup
    let beans = item("BEANS", "Beans", Category::Material, Unit::Kg, 2_000, None);
    let milk = item("MILK-1L", "Milk", Category::Material, Unit::Litre, 10_000, None);
    let latte = item("LATTE", "Latte", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&beans).await.unwrap();
    db.inventory().insert(&milk).await.unwrap();
    db.inventory().insert(&latte).await.unwrap();
    db.boms()
        .insert(&bom(
            &latte,
            vec![(&milk, 200, Unit::Litre), (&beans, 18_000, Unit::Gram)],
        ))
        .await
        .unwrap();

    db.engine()
        .checkout(cash_sale(vec![line(&latte, 10, 450)]))
        .await
        .unwrap();

    // Conservation: 0.2 litre × 10 and 18 gram × 10 = 0.18 kg, exactly
    assert_eq!(stock_of(&db, &milk.id).await, Quantity::from_whole(8));
    assert_eq!(stock_of(&db, &beans.id).await, Quantity::from_milli(1_820));
}

#[tokio::test]
async fn transfer_payment_carries_bank_details_onto_the_invoice() {
    let db = test_db().await;

    let cup = item("CUP", "Cup", Category::Packaging, Unit::Pcs, 10_000, None);
    db.inventory().insert(&cup).await.unwrap();

    let mut request = cash_sale(vec![line(&cup, 2, 200)]);
    request.payment_method = PaymentMethod::Transfer;
    request.bank_transfer = Some(BankTransfer {
        bank_name: "First Bank".to_string(),
        account_number: "000-111-222".to_string(),
        account_holder: "Kopi POS".to_string(),
    });
    request.customer_name = Some("Regular".to_string());
    request.tag = Some("wholesale".to_string());

    let receipt = db.engine().checkout(request).await.unwrap();

    assert_eq!(receipt.invoice.payment_method, PaymentMethod::Transfer);
    assert_eq!(receipt.invoice.bank_name.as_deref(), Some("First Bank"));
    assert_eq!(receipt.invoice.account_number.as_deref(), Some("000-111-222"));
    assert_eq!(receipt.invoice.amount_cents, 400);

    let graph = db.orders().get(&receipt.order.id).await.unwrap().unwrap();
    assert_eq!(graph.order.customer_name.as_deref(), Some("Regular"));
    assert_eq!(graph.order.tag.as_deref(), Some("wholesale"));
    assert_eq!(
        graph.invoice.unwrap().account_holder.as_deref(),
        Some("Kopi POS")
    );
}

#[tokio::test]
async fn unknown_product_aborts_with_not_found() {
    let db = test_db().await;

    let err = db
        .engine()
        .checkout(cash_sale(vec![CheckoutLine {
            product_id: "no-such-item".to_string(),
            quantity: 1,
            price_cents: 100,
        }]))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::NotFound { .. }));
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_cart_is_rejected_before_the_transaction_opens() {
    let db = test_db().await;

    let err = db.engine().checkout(cash_sale(vec![])).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(db.orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn one_item_breached_by_two_lines_alerts_exactly_once() {
    let db = test_db().await;

    // Both drinks draw from the same milk
    let milk = item("MILK-1L", "Milk", Category::Material, Unit::Litre, 5_000, Some(4_000));
    let latte = item("LATTE", "Latte", Category::Product, Unit::Pcs, 0, None);
    let flat_white = item("FLAT", "Flat White", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&milk).await.unwrap();
    db.inventory().insert(&latte).await.unwrap();
    db.inventory().insert(&flat_white).await.unwrap();
    db.boms().insert(&bom(&latte, vec![(&milk, 200, Unit::Litre)])).await.unwrap();
    db.boms().insert(&bom(&flat_white, vec![(&milk, 150, Unit::Litre)])).await.unwrap();

    let receipt = db
        .engine()
        .checkout(cash_sale(vec![line(&latte, 5, 450), line(&flat_white, 4, 400)]))
        .await
        .unwrap();

    // 5 - 1.0 - 0.6 = 3.4 litre, below the 4-litre limit after both draws
    assert_eq!(stock_of(&db, &milk.id).await, Quantity::from_milli(3_400));

    // One alert for the item, reflecting the final stock level
    assert_eq!(receipt.notifications.len(), 1);
    assert_eq!(receipt.notifications[0].related_id, milk.id);
    assert!(receipt.notifications[0].message.contains("down to 3 litre"));
    assert_eq!(db.notifications().count().await.unwrap(), 1);
}

#[tokio::test]
async fn failure_on_a_later_line_rolls_back_earlier_decrements() {
    let db = test_db().await;

    let cup = item("CUP", "Cup", Category::Packaging, Unit::Pcs, 10_000, None);
    let milk = item("MILK-1L", "Milk", Category::Material, Unit::Litre, 1_000, None);
    let latte = item("LATTE", "Latte", Category::Product, Unit::Pcs, 0, None);
    db.inventory().insert(&cup).await.unwrap();
    db.inventory().insert(&milk).await.unwrap();
    db.inventory().insert(&latte).await.unwrap();
    db.boms().insert(&bom(&latte, vec![(&milk, 200, Unit::Litre)])).await.unwrap();

    // Line 1 (cups) succeeds, line 2 (lattes) overdraws the milk
    let err = db
        .engine()
        .checkout(cash_sale(vec![line(&cup, 3, 200), line(&latte, 6, 450)]))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // The cup decrement from line 1 was rolled back with everything else
    assert_eq!(stock_of(&db, &cup.id).await, Quantity::from_whole(10));
    assert_eq!(stock_of(&db, &milk.id).await, Quantity::from_whole(1));
    assert_eq!(db.orders().count().await.unwrap(), 0);
    assert_eq!(db.notifications().count().await.unwrap(), 0);
}
