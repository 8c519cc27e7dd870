//! Change-feed semantics: every event a subscriber sees is the complete
//! current result set for its query.

use futures::StreamExt;
use rust_decimal::Decimal;
use uuid::Uuid;

use comanda_core::{Email, LineItem, ProductId, TableId, UserRole};
use comanda_server::db::{OrderQuery, UserRepository};
use comanda_server::services::OrderService;
use comanda_server::sync::{self, OrderFeed};

use comanda_integration_tests::test_pool;

#[test]
fn test_notify_with_no_subscribers_is_a_no_op() {
    let feed = OrderFeed::new();
    assert_eq!(feed.subscriber_count(), 0);
    feed.notify();
}

#[tokio::test]
#[ignore = "requires COMANDA_TEST_DATABASE_URL"]
async fn test_subscription_replays_full_snapshots_on_change() {
    let pool = test_pool().await;

    let email = format!("{}@example.com", Uuid::new_v4());
    let email = Email::parse(&email).expect("valid email");
    let user = UserRepository::new(&pool)
        .create_with_password(&email, "Ana", UserRole::Client, "unused-hash")
        .await
        .expect("user created");

    let feed = OrderFeed::new();
    let mut stream = Box::pin(feed.subscribe(pool.clone(), OrderQuery::for_user(user.id)));

    // First event: the current (empty) result set.
    let initial = stream.next().await.expect("initial snapshot");
    assert!(initial.is_empty());

    let item = LineItem::new(
        ProductId::new(Uuid::new_v4()),
        "Flan napolitano",
        Decimal::from(5_500),
        1,
        None,
    )
    .expect("valid line item");
    let placed = OrderService::new(&pool, &feed)
        .place(user.id, TableId::new("3"), vec![item])
        .await
        .expect("order placed");

    // Next event: the complete set again, now holding the new order.
    let snapshot = stream.next().await.expect("refreshed snapshot");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, placed.id);

    // One-shot fetch sees the same result set as the stream.
    let fetched = sync::fetch(&pool, &OrderQuery::for_user(user.id))
        .await
        .expect("fetch succeeds");
    assert_eq!(fetched.len(), snapshot.len());
}
