//! Repository round trips against a real `PostgreSQL` instance:
//! settlement, archival, and the per-user filter.
//!
//! All tests here are ignored by default; see the crate docs for the
//! environment they need.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use comanda_core::{Email, LineItem, OrderStatus, ProductId, TableId, UserId, UserRole};
use comanda_server::db::{
    ArchiveOutcome, OrderQuery, OrderRepository, UserRepository,
};
use comanda_server::services::OrderService;
use comanda_server::sync::OrderFeed;

use comanda_integration_tests::test_pool;

async fn create_user(pool: &sqlx::PgPool, name: &str) -> UserId {
    let email = format!("{}@example.com", Uuid::new_v4());
    let email = Email::parse(&email).expect("valid email");
    UserRepository::new(pool)
        .create_with_password(&email, name, UserRole::Client, "unused-hash")
        .await
        .expect("user created")
        .id
}

fn sample_items() -> Vec<LineItem> {
    vec![
        LineItem::new(
            ProductId::new(Uuid::new_v4()),
            "Tacos al pastor",
            Decimal::from(10_000),
            2,
            None,
        )
        .expect("valid line item"),
    ]
}

// =============================================================================
// Round Trips
// =============================================================================

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_order_round_trip_preserves_items_and_history() {
    let pool = test_pool().await;
    let user = create_user(&pool, "Ana").await;
    let repo = OrderRepository::new(&pool);

    let created = repo
        .create(user, TableId::new("9"), sample_items())
        .await
        .expect("order created");

    let fetched = repo
        .get(created.id)
        .await
        .expect("query succeeds")
        .expect("order found");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.status, OrderStatus::Pedido);
    assert_eq!(fetched.items, created.items);
    assert!(fetched.status_history.get(OrderStatus::Pedido).is_some());
}

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_set_status_merges_into_history() {
    let pool = test_pool().await;
    let user = create_user(&pool, "Ana").await;
    let repo = OrderRepository::new(&pool);

    let order = repo
        .create(user, TableId::new("9"), sample_items())
        .await
        .expect("order created");

    repo.set_status(order.id, OrderStatus::Cocinando, Utc::now())
        .await
        .expect("status set");
    repo.set_status(order.id, OrderStatus::ListoParaRecoger, Utc::now())
        .await
        .expect("status set");

    let fetched = repo
        .get(order.id)
        .await
        .expect("query succeeds")
        .expect("order found");

    assert_eq!(fetched.status, OrderStatus::ListoParaRecoger);
    // Pedido, Cocinando, and Listo para recoger are all stamped.
    assert_eq!(fetched.status_history.len(), 3);
}

// =============================================================================
// Per-user subscription filtering
// =============================================================================

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_user_listing_never_shows_other_users_orders() {
    let pool = test_pool().await;
    let ana = create_user(&pool, "Ana").await;
    let luis = create_user(&pool, "Luis").await;
    let repo = OrderRepository::new(&pool);

    let mine = repo
        .create(ana, TableId::new("1"), sample_items())
        .await
        .expect("order created");
    let theirs = repo
        .create(luis, TableId::new("2"), sample_items())
        .await
        .expect("order created");

    // A chef advancing the other diner's order must not leak it into
    // Ana's listing.
    repo.set_status(theirs.id, OrderStatus::Cocinando, Utc::now())
        .await
        .expect("status set");

    let listed = repo
        .list(&OrderQuery::for_user(ana))
        .await
        .expect("listing succeeds");

    assert!(listed.iter().any(|order| order.id == mine.id));
    assert!(listed.iter().all(|order| order.user_id == ana));
}

// =============================================================================
// Settlement
// =============================================================================

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_settle_records_receipt_and_keeps_order_active() {
    let pool = test_pool().await;
    let user = create_user(&pool, "Ana").await;
    let repo = OrderRepository::new(&pool);
    let feed = OrderFeed::new();
    let service = OrderService::new(&pool, &feed);

    let order = repo
        .create(user, TableId::new("5"), sample_items())
        .await
        .expect("order created");

    // Settling before the order is ready must fail.
    assert!(service.settle(order.id).await.is_err());

    repo.set_status(order.id, OrderStatus::ListoParaPagar, Utc::now())
        .await
        .expect("status set");

    let (settled, receipt) = service.settle(order.id).await.expect("settles");
    assert_eq!(settled.status, OrderStatus::Pagado);
    assert_eq!(receipt.order_id, order.id);
    assert_eq!(receipt.subtotal, Decimal::from(20_000));
    assert_eq!(receipt.tax, Decimal::from(3_200));
    assert_eq!(receipt.total, Decimal::from(23_200));
    assert_eq!(receipt.customer_name, "Ana");

    // Paid but not archived: still in the active set.
    assert!(
        repo.get(order.id)
            .await
            .expect("query succeeds")
            .is_some()
    );
}

// =============================================================================
// Archival
// =============================================================================

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_archive_moves_paid_order_to_history_unchanged() {
    let pool = test_pool().await;
    let user = create_user(&pool, "Ana").await;
    let repo = OrderRepository::new(&pool);

    let order = repo
        .create(user, TableId::new("8"), sample_items())
        .await
        .expect("order created");
    repo.set_status(order.id, OrderStatus::Pagado, Utc::now())
        .await
        .expect("status set");
    let before = repo
        .get(order.id)
        .await
        .expect("query succeeds")
        .expect("order found");

    let outcome = repo.archive(order.id).await.expect("archive succeeds");
    assert_eq!(outcome, ArchiveOutcome::Archived);

    // Gone from the active set, intact in history.
    assert!(
        repo.get(order.id)
            .await
            .expect("query succeeds")
            .is_none()
    );
    let archived = repo
        .get_archived(order.id)
        .await
        .expect("query succeeds")
        .expect("order in history");
    assert_eq!(archived.items, before.items);
    assert_eq!(archived.status, before.status);
    assert_eq!(archived.created_at, before.created_at);

    // Archiving again is a no-op, not a duplicate.
    let again = repo.archive(order.id).await.expect("archive succeeds");
    assert_eq!(again, ArchiveOutcome::AlreadyArchived);
}

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_archive_rejects_unpaid_orders() {
    let pool = test_pool().await;
    let user = create_user(&pool, "Ana").await;
    let repo = OrderRepository::new(&pool);

    let order = repo
        .create(user, TableId::new("8"), sample_items())
        .await
        .expect("order created");

    let outcome = repo.archive(order.id).await.expect("archive succeeds");
    assert_eq!(outcome, ArchiveOutcome::NotPaid(OrderStatus::Pedido));

    // Still active.
    assert!(
        repo.get(order.id)
            .await
            .expect("query succeeds")
            .is_some()
    );
}
