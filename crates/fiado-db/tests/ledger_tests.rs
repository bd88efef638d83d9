//! End-to-end tests for the sale/credit ledger engine against an in-memory
//! SQLite database.
//!
//! Each test gets its own isolated database. The recurring assertions:
//! `amount_paid + amount_pending == total` on every sale, stored status
//! matches the derived one, and per-product movement deltas sum to current
//! stock.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use fiado_core::{
    derive_status, Client, CoreError, CreateSaleInput, Money, PaymentMethod, PaymentTerms,
    Product, RegisterPaymentInput, Sale, SaleLineInput, SaleStatus, ValidationError,
    GENERAL_CLIENT_ID,
};
use fiado_db::{Database, DbConfig, LedgerError, LowStockNotifier};

// =============================================================================
// Helpers
// =============================================================================

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Inserts a product with zero stock, then stocks it through the ledger so
/// the movement trail covers every unit on hand.
async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> String {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        cost_cents: price_cents / 2,
        price_cents,
        stock: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();

    if stock > 0 {
        db.stock()
            .adjust(&product.id, stock, "initial stock")
            .await
            .unwrap();
    }

    product.id
}

async fn seed_client(db: &Database, name: &str) -> String {
    let now = Utc::now();
    let client = Client {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.clients().insert(&client).await.unwrap();
    client.id
}

fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> SaleLineInput {
    SaleLineInput {
        product_id: product_id.to_string(),
        quantity,
        unit_price_cents,
    }
}

fn sale_input(client_id: &str, items: Vec<SaleLineInput>, terms: PaymentTerms) -> CreateSaleInput {
    CreateSaleInput {
        client_id: client_id.to_string(),
        items,
        discount_cents: 0,
        method: PaymentMethod::Cash,
        terms,
        notes: None,
    }
}

async fn fetch_sale(db: &Database, sale_id: &str) -> Sale {
    db.sales().get_by_id(sale_id).await.unwrap().unwrap()
}

async fn product_stock(db: &Database, product_id: &str) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .stock
}

/// Asserts the two ledger invariants every sale must satisfy.
fn assert_sale_invariants(sale: &Sale) {
    assert_eq!(
        sale.amount_paid_cents + sale.amount_pending_cents,
        sale.total_cents,
        "paid + pending must equal total"
    );
    assert_eq!(
        sale.status,
        derive_status(sale.total(), sale.amount_paid()),
        "stored status must match the derived one"
    );
}

/// Asserts that the movement trail accounts for every unit on hand.
async fn assert_movements_sum_to_stock(db: &Database, product_id: &str) {
    let movements = db.stock().movements(product_id).await.unwrap();
    let delta_sum: i64 = movements.iter().map(|m| m.delta()).sum();
    assert_eq!(delta_sum, product_stock(db, product_id).await);
}

// =============================================================================
// Sale creation
// =============================================================================

#[tokio::test]
async fn paid_sale_settles_in_full_and_decrements_stock() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria Lopez").await;
    let product = seed_product(&db, "Arroz 1kg", 1000, 20).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 2, 1000)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap();

    assert_eq!(created.total_cents, 2000);

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.amount_paid_cents, 2000);
    assert_eq!(sale.amount_pending_cents, 0);
    assert_sale_invariants(&sale);

    assert_eq!(product_stock(&db, &product).await, 18);
    assert_movements_sum_to_stock(&db, &product).await;

    // A sale settled at the counter has nothing on the payment ledger.
    assert!(db.sales().get_payments(&created.sale_id).await.unwrap().is_empty());

    // The line item froze the product name and subtotal.
    let items = db.sales().get_items(&created.sale_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name_snapshot, "Arroz 1kg");
    assert_eq!(items[0].subtotal_cents, 2000);
}

#[tokio::test]
async fn insufficient_stock_rejects_and_changes_nothing() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Aceite 900ml", 5500, 5).await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 6, 5500)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::InsufficientStock {
            available: 5,
            requested: 6,
            ..
        })
    ));

    assert_eq!(product_stock(&db, &product).await, 5);
    // Only the initial stocking movement exists.
    assert_eq!(db.stock().movements(&product).await.unwrap().len(), 1);
    assert!(db.ledger().client_debt(&client).await.unwrap().debts.is_empty());
}

#[tokio::test]
async fn mid_cart_failure_rolls_back_earlier_stock_decrements() {
    let db = test_db().await;
    let client = seed_client(&db, "Ana").await;
    let plenty = seed_product(&db, "Galletas", 1200, 50).await;
    let scarce = seed_product(&db, "Cafe 200g", 7800, 1).await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&plenty, 3, 1200), line(&scarce, 2, 7800)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::InsufficientStock { .. })
    ));

    // The first line's decrement was staged before the second line failed;
    // the rollback must have undone it, movement row included.
    assert_eq!(product_stock(&db, &plenty).await, 50);
    assert_eq!(db.stock().movements(&plenty).await.unwrap().len(), 1);
    assert_movements_sum_to_stock(&db, &plenty).await;
}

#[tokio::test]
async fn unknown_product_fails_with_not_found() {
    let db = test_db().await;
    let client = seed_client(&db, "Luis").await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&Uuid::new_v4().to_string(), 1, 500)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::NotFound { entity: "Product", .. })
    ));
}

#[tokio::test]
async fn unknown_client_fails_with_not_found() {
    let db = test_db().await;
    let product = seed_product(&db, "Pan", 2800, 10).await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            &Uuid::new_v4().to_string(),
            vec![line(&product, 1, 2800)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::NotFound { entity: "Client", .. })
    ));
    assert_eq!(product_stock(&db, &product).await, 10);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;

    let err = db
        .ledger()
        .create_sale(sale_input(&client, vec![], PaymentTerms::Paid))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::Validation(ValidationError::EmptyCart))
    ));
}

#[tokio::test]
async fn flat_discount_reduces_total_once() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Huevos 12pz", 3800, 30).await;

    let mut input = sale_input(&client, vec![line(&product, 2, 3800)], PaymentTerms::Paid);
    input.discount_cents = 600;

    let created = db.ledger().create_sale(input).await.unwrap();
    assert_eq!(created.total_cents, 7000);

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.subtotal_cents, 7600);
    assert_eq!(sale.discount_cents, 600);
    assert_sale_invariants(&sale);

    // Line subtotals stay undiscounted; the discount lives on the sale only.
    let items = db.sales().get_items(&created.sale_id).await.unwrap();
    assert_eq!(items[0].subtotal_cents, 7600);
}

#[tokio::test]
async fn discount_exceeding_subtotal_is_rejected() {
    let db = test_db().await;
    let client = seed_client(&db, "Ana").await;
    let product = seed_product(&db, "Azucar 1kg", 2400, 10).await;

    let mut input = sale_input(&client, vec![line(&product, 1, 2400)], PaymentTerms::Paid);
    input.discount_cents = 2401;

    let err = db.ledger().create_sale(input).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Core(CoreError::Validation(
            ValidationError::DiscountExceedsSubtotal { .. }
        ))
    ));
    assert_eq!(product_stock(&db, &product).await, 10);
}

// =============================================================================
// Credit terms and the walk-in client
// =============================================================================

#[tokio::test]
async fn credit_sale_with_deposit_starts_partial() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;
    let product = seed_product(&db, "Frijol 500g", 1000, 25).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 2, 1000)],
            PaymentTerms::Credit { deposit_cents: 500 },
        ))
        .await
        .unwrap();

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Partial);
    assert_eq!(sale.amount_paid_cents, 500);
    assert_eq!(sale.amount_pending_cents, 1500);
    assert_sale_invariants(&sale);

    // The deposit shows up as one payment row.
    let payments = db.sales().get_payments(&created.sale_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_cents, 500);
    assert_eq!(payments[0].notes.as_deref(), Some("initial deposit"));
}

#[tokio::test]
async fn credit_sale_without_deposit_starts_pending() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Leche 1L", 2200, 40).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 3, 2200)],
            PaymentTerms::Credit { deposit_cents: 0 },
        ))
        .await
        .unwrap();

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Pending);
    assert_eq!(sale.amount_paid_cents, 0);
    assert_eq!(sale.amount_pending_cents, sale.total_cents);
    assert_sale_invariants(&sale);
    assert!(db.sales().get_payments(&created.sale_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn credit_deposit_covering_total_settles_immediately() {
    let db = test_db().await;
    let client = seed_client(&db, "Ana").await;
    let product = seed_product(&db, "Jabon", 1400, 55).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 1, 1400)],
            PaymentTerms::Credit { deposit_cents: 1400 },
        ))
        .await
        .unwrap();

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.amount_pending_cents, 0);
    assert_sale_invariants(&sale);
}

#[tokio::test]
async fn deposit_over_total_is_rejected() {
    let db = test_db().await;
    let client = seed_client(&db, "Luis").await;
    let product = seed_product(&db, "Papel 4pz", 3200, 28).await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 1, 3200)],
            PaymentTerms::Credit { deposit_cents: 3300 },
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::Validation(
            ValidationError::DepositExceedsTotal { .. }
        ))
    ));
}

#[tokio::test]
async fn general_client_cannot_buy_on_credit() {
    let db = test_db().await;
    let product = seed_product(&db, "Coca-Cola 600ml", 1500, 60).await;

    let err = db
        .ledger()
        .create_sale(sale_input(
            GENERAL_CLIENT_ID,
            vec![line(&product, 1, 1500)],
            PaymentTerms::Credit { deposit_cents: 0 },
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::Validation(
            ValidationError::CreditSaleToGeneralClient
        ))
    ));

    // Nothing was mutated.
    assert_eq!(product_stock(&db, &product).await, 60);
    assert!(db
        .ledger()
        .client_debt(GENERAL_CLIENT_ID)
        .await
        .unwrap()
        .debts
        .is_empty());
}

#[tokio::test]
async fn general_client_paid_sale_is_fine() {
    let db = test_db().await;
    let product = seed_product(&db, "Pan Blanco", 2800, 25).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            GENERAL_CLIENT_ID,
            vec![line(&product, 1, 2800)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap();

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(product_stock(&db, &product).await, 24);
}

// =============================================================================
// Abono registration
// =============================================================================

async fn credit_sale(db: &Database, client: &str, product: &str, deposit: i64) -> String {
    db.ledger()
        .create_sale(sale_input(
            client,
            vec![line(product, 2, 1000)],
            PaymentTerms::Credit {
                deposit_cents: deposit,
            },
        ))
        .await
        .unwrap()
        .sale_id
}

#[tokio::test]
async fn abono_reduces_pending_and_rederives_status() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;
    let product = seed_product(&db, "Arroz", 1000, 50).await;
    let sale_id = credit_sale(&db, &client, &product, 500).await;

    let registered = db
        .ledger()
        .register_payment(RegisterPaymentInput {
            sale_id: sale_id.clone(),
            client_id: client.clone(),
            amount_cents: 700,
            method: PaymentMethod::Cash,
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(registered.new_pending_cents, 800);

    let sale = fetch_sale(&db, &sale_id).await;
    assert_eq!(sale.status, SaleStatus::Partial);
    assert_eq!(sale.amount_paid_cents, 1200);
    assert_sale_invariants(&sale);
}

#[tokio::test]
async fn abono_equal_to_pending_settles_the_sale() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Frijol", 1000, 50).await;
    let sale_id = credit_sale(&db, &client, &product, 500).await;

    db.ledger()
        .register_payment(RegisterPaymentInput {
            sale_id: sale_id.clone(),
            client_id: client.clone(),
            amount_cents: 1500,
            method: PaymentMethod::Transfer,
            notes: Some("final abono".to_string()),
        })
        .await
        .unwrap();

    let sale = fetch_sale(&db, &sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.amount_pending_cents, 0);
    assert_sale_invariants(&sale);

    // Deposit + final abono: two rows summing to the full total.
    let payments = db.sales().get_payments(&sale_id).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(db.sales().get_total_paid(&sale_id).await.unwrap(), 2000);
}

#[tokio::test]
async fn abono_over_pending_is_rejected_and_changes_nothing() {
    let db = test_db().await;
    let client = seed_client(&db, "Ana").await;
    let product = seed_product(&db, "Cafe", 1000, 50).await;
    let sale_id = credit_sale(&db, &client, &product, 500).await;

    let err = db
        .ledger()
        .register_payment(RegisterPaymentInput {
            sale_id: sale_id.clone(),
            client_id: client.clone(),
            amount_cents: 1501,
            method: PaymentMethod::Cash,
            notes: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::Validation(
            ValidationError::PaymentExceedsPending {
                amount_cents: 1501,
                pending_cents: 1500,
            }
        ))
    ));

    let sale = fetch_sale(&db, &sale_id).await;
    assert_eq!(sale.amount_paid_cents, 500);
    assert_eq!(sale.amount_pending_cents, 1500);
    assert_eq!(db.sales().get_payments(&sale_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_positive_abono_is_rejected() {
    let db = test_db().await;
    let client = seed_client(&db, "Luis").await;
    let product = seed_product(&db, "Azucar", 1000, 50).await;
    let sale_id = credit_sale(&db, &client, &product, 0).await;

    for amount in [0, -100] {
        let err = db
            .ledger()
            .register_payment(RegisterPaymentInput {
                sale_id: sale_id.clone(),
                client_id: client.clone(),
                amount_cents: amount,
                method: PaymentMethod::Cash,
                notes: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }
}

#[tokio::test]
async fn abono_on_unknown_sale_fails_with_not_found() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;

    let err = db
        .ledger()
        .register_payment(RegisterPaymentInput {
            sale_id: Uuid::new_v4().to_string(),
            client_id: client,
            amount_cents: 100,
            method: PaymentMethod::Cash,
            notes: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Core(CoreError::NotFound { entity: "Sale", .. })
    ));
}

#[tokio::test]
async fn credit_round_trip_pending_to_paid() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Leche", 1000, 50).await;
    let sale_id = credit_sale(&db, &client, &product, 0).await;

    let sale = fetch_sale(&db, &sale_id).await;
    assert_eq!(sale.status, SaleStatus::Pending);
    assert_eq!(sale.amount_pending_cents, sale.total_cents);

    db.ledger()
        .register_payment(RegisterPaymentInput {
            sale_id: sale_id.clone(),
            client_id: client.clone(),
            amount_cents: sale.total_cents,
            method: PaymentMethod::Cash,
            notes: None,
        })
        .await
        .unwrap();

    let sale = fetch_sale(&db, &sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.amount_pending_cents, 0);
    assert_sale_invariants(&sale);
}

// =============================================================================
// Debt aggregation
// =============================================================================

#[tokio::test]
async fn client_debt_sums_outstanding_sales_only() {
    let db = test_db().await;
    let debtor = seed_client(&db, "Maria").await;
    let other = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Arroz", 1000, 100).await;

    // Two credit sales for the debtor (pending 1500 + 2000), one paid sale,
    // and one credit sale for someone else.
    credit_sale(&db, &debtor, &product, 500).await;
    credit_sale(&db, &debtor, &product, 0).await;
    db.ledger()
        .create_sale(sale_input(
            &debtor,
            vec![line(&product, 1, 1000)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap();
    credit_sale(&db, &other, &product, 0).await;

    let debt = db.ledger().client_debt(&debtor).await.unwrap();
    assert_eq!(debt.debts.len(), 2);
    assert_eq!(debt.total_debt_cents, 3500);
    assert_eq!(
        debt.total_debt_cents,
        debt.debts.iter().map(|s| s.amount_pending_cents).sum::<i64>()
    );

    // A client with no credit history owes nothing.
    let clean = seed_client(&db, "Ana").await;
    let none = db.ledger().client_debt(&clean).await.unwrap();
    assert!(none.debts.is_empty());
    assert_eq!(none.total_debt_cents, 0);
}

#[tokio::test]
async fn portfolio_summary_rolls_up_all_outstanding_sales() {
    let db = test_db().await;
    let maria = seed_client(&db, "Maria").await;
    let jorge = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Frijol", 1000, 100).await;

    credit_sale(&db, &maria, &product, 0).await; // pending 2000
    credit_sale(&db, &maria, &product, 500).await; // partial 1500
    credit_sale(&db, &jorge, &product, 0).await; // pending 2000
    db.ledger()
        .create_sale(sale_input(
            &jorge,
            vec![line(&product, 1, 1000)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap();

    let summary = db.ledger().portfolio_summary().await.unwrap();
    assert_eq!(summary.total_pending_sales, 3);
    assert_eq!(summary.total_pending_cents, 5500);
    assert_eq!(summary.distinct_clients_with_debt, 2);
    assert_eq!(summary.pending_count, 2);
    assert_eq!(summary.partial_count, 1);

    // Stable under repeated calls absent mutation.
    let again = db.ledger().portfolio_summary().await.unwrap();
    assert_eq!(summary, again);
}

// =============================================================================
// Sale reversal
// =============================================================================

#[tokio::test]
async fn reversal_restores_stock_and_erases_the_sale() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;
    let product = seed_product(&db, "Aceite", 1000, 20).await;
    let sale_id = credit_sale(&db, &client, &product, 500).await;

    assert_eq!(product_stock(&db, &product).await, 18);

    db.ledger().reverse_sale(&sale_id).await.unwrap();

    assert_eq!(product_stock(&db, &product).await, 20);
    assert!(db.sales().get_by_id(&sale_id).await.unwrap().is_none());
    assert!(db.sales().get_items(&sale_id).await.unwrap().is_empty());
    assert!(db.sales().get_payments(&sale_id).await.unwrap().is_empty());

    // The audit trail keeps both sides of the story.
    let movements = db.stock().movements(&product).await.unwrap();
    assert_eq!(movements.len(), 3); // initial stock, sale, reversal
    assert_movements_sum_to_stock(&db, &product).await;
    let reversal = movements.last().unwrap();
    assert_eq!(reversal.reason, "sale reversal");
    assert_eq!(reversal.ref_id.as_deref(), Some(sale_id.as_str()));
}

#[tokio::test]
async fn reversal_is_not_idempotent() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Pan", 1000, 10).await;
    let sale_id = credit_sale(&db, &client, &product, 0).await;

    db.ledger().reverse_sale(&sale_id).await.unwrap();

    let err = db.ledger().reverse_sale(&sale_id).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Core(CoreError::NotFound { entity: "Sale", .. })
    ));

    // The second attempt touched nothing.
    assert_eq!(product_stock(&db, &product).await, 10);
}

// =============================================================================
// Low-stock notification
// =============================================================================

#[derive(Default)]
struct CapturingNotifier {
    alerts: Mutex<Vec<(String, i64)>>,
}

impl LowStockNotifier for CapturingNotifier {
    fn send_low_stock_alert(&self, product_name: &str, current_stock: i64) {
        self.alerts
            .lock()
            .unwrap()
            .push((product_name.to_string(), current_stock));
    }
}

#[tokio::test]
async fn sale_below_threshold_dispatches_low_stock_alert() {
    let db = test_db().await;
    let client = seed_client(&db, "Maria").await;
    let low = seed_product(&db, "Cafe Soluble", 7800, 11).await;
    let high = seed_product(&db, "Galletas", 1200, 70).await;

    let notifier = Arc::new(CapturingNotifier::default());
    let ledger = db.ledger_with_notifier(notifier.clone());

    ledger
        .create_sale(sale_input(
            &client,
            vec![line(&low, 2, 7800), line(&high, 2, 1200)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap();

    let alerts = notifier.alerts.lock().unwrap();
    assert_eq!(alerts.as_slice(), &[("Cafe Soluble".to_string(), 9)]);
}

#[tokio::test]
async fn failed_sale_dispatches_no_alert() {
    let db = test_db().await;
    let client = seed_client(&db, "Jorge").await;
    let product = seed_product(&db, "Leche", 2200, 3).await;

    let notifier = Arc::new(CapturingNotifier::default());
    let ledger = db.ledger_with_notifier(notifier.clone());

    ledger
        .create_sale(sale_input(
            &client,
            vec![line(&product, 5, 2200)],
            PaymentTerms::Paid,
        ))
        .await
        .unwrap_err();

    assert!(notifier.alerts.lock().unwrap().is_empty());
}

// =============================================================================
// Stock ledger primitive
// =============================================================================

#[tokio::test]
async fn manual_adjustment_shares_the_audited_primitive() {
    let db = test_db().await;
    let product = seed_product(&db, "Jabon", 1400, 0).await;

    let adj = db.stock().adjust(&product, 30, "restock").await.unwrap();
    assert_eq!(adj.stock_before, 0);
    assert_eq!(adj.stock_after, 30);

    let adj = db.stock().adjust(&product, -4, "damaged goods").await.unwrap();
    assert_eq!(adj.stock_before, 30);
    assert_eq!(adj.stock_after, 26);

    let err = db.stock().adjust(&product, -27, "impossible").await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Core(CoreError::InsufficientStock { available: 26, .. })
    ));

    assert_eq!(product_stock(&db, &product).await, 26);
    assert_movements_sum_to_stock(&db, &product).await;

    // Movement types follow the delta's sign.
    let movements = db.stock().movements(&product).await.unwrap();
    let kinds: Vec<_> = movements.iter().map(|m| m.movement_type).collect();
    use fiado_core::MovementType::*;
    assert_eq!(kinds, vec![Inbound, Outbound]);
}

#[tokio::test]
async fn money_survives_a_full_ledger_cycle_exactly() {
    // One sale, several abonos of awkward sizes: integer cents must land on
    // exactly zero pending, with the payment rows summing to the total.
    let db = test_db().await;
    let client = seed_client(&db, "Ana").await;
    let product = seed_product(&db, "Arroz", 3333, 10).await;

    let created = db
        .ledger()
        .create_sale(sale_input(
            &client,
            vec![line(&product, 3, 3333)],
            PaymentTerms::Credit { deposit_cents: 0 },
        ))
        .await
        .unwrap();
    assert_eq!(created.total_cents, 9999);

    for amount in [3333, 3333, 3332, 1] {
        db.ledger()
            .register_payment(RegisterPaymentInput {
                sale_id: created.sale_id.clone(),
                client_id: client.clone(),
                amount_cents: amount,
                method: PaymentMethod::Cash,
                notes: None,
            })
            .await
            .unwrap();
    }

    let sale = fetch_sale(&db, &created.sale_id).await;
    assert_eq!(sale.status, SaleStatus::Paid);
    assert_eq!(sale.amount_pending_cents, 0);
    assert_eq!(sale.amount_paid(), Money::from_cents(9999));
    assert_sale_invariants(&sale);
    assert_eq!(
        db.sales().get_total_paid(&created.sale_id).await.unwrap(),
        9999
    );
}
