//! PostgreSQL store tests. Run with:
//!
//! ```bash
//! TEST_DATABASE_URL=postgres://localhost/orders_test cargo test -p order-service -- --ignored
//! ```

use order_service::model::{AccountId, Order, OrderedLineItem, ProductDetails, MAX_QUANTITY};
use order_service::store::{collect_orders, OrderStore, PgOrderStore, StoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

fn get_test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

async fn connect() -> PgOrderStore {
    let database_url = get_test_database_url().expect("TEST_DATABASE_URL required");
    let store = PgOrderStore::connect(&database_url, 2, Duration::from_secs(5))
        .await
        .expect("should connect");
    store.migrate().await.expect("should migrate");
    store
}

/// A fresh account per test so runs do not see each other's orders.
fn fresh_account() -> AccountId {
    AccountId::new(format!("test_{}", ulid::Ulid::new()))
}

fn order(account_id: &AccountId, items: &[(&str, u32, Decimal)]) -> Order {
    let items = items
        .iter()
        .map(|(id, quantity, price)| {
            OrderedLineItem::resolved(
                (*id).into(),
                *quantity,
                ProductDetails {
                    name: id.to_string(),
                    description: String::new(),
                    unit_price: *price,
                },
            )
        })
        .collect();
    Order::place(account_id.clone(), items).expect("valid order")
}

async fn orders_of(store: &PgOrderStore, account_id: &AccountId) -> Vec<Order> {
    collect_orders(store.rows_for_account(account_id))
        .await
        .expect("should read rows")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL TEST_DATABASE_URL"]
async fn test_persist_and_read_back() {
    let store = connect().await;
    let account_id = fresh_account();

    let first = order(&account_id, &[("p2", 1, dec!(5)), ("p1", 2, dec!(10))]);
    let second = order(&account_id, &[("p3", 7, dec!(0.01))]);
    store.persist(&first).await.unwrap();
    store.persist(&second).await.unwrap();

    let orders = orders_of(&store, &account_id).await;
    assert_eq!(orders.len(), 2);
    assert!(orders[0].id() < orders[1].id());

    let read = orders.iter().find(|o| o.id() == first.id()).unwrap();
    assert_eq!(read.total_price(), dec!(25));
    assert_eq!(read.created_at(), first.created_at());
    assert_eq!(read.account_id(), &account_id);
    let items: Vec<(&str, u32)> = read
        .line_items()
        .iter()
        .map(|i| (i.product_id.as_str(), i.quantity))
        .collect();
    assert_eq!(items, [("p1", 2), ("p2", 1)]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL TEST_DATABASE_URL"]
async fn test_rejected_line_item_rolls_back_header() {
    let store = connect().await;
    let account_id = fresh_account();

    // TEXT columns refuse NUL bytes, so the header insert succeeds first
    let doomed = order(&account_id, &[("p1", 1, dec!(1)), ("p\0", 1, dec!(1))]);
    let err = store.persist(&doomed).await.unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));

    assert!(orders_of(&store, &account_id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL TEST_DATABASE_URL"]
async fn test_largest_quantity_fits_the_column() {
    let store = connect().await;
    let account_id = fresh_account();
    let placed = order(&account_id, &[("p1", MAX_QUANTITY, dec!(0.01))]);

    store.persist(&placed).await.unwrap();

    let orders = orders_of(&store, &account_id).await;
    assert_eq!(orders[0].line_items()[0].quantity, MAX_QUANTITY);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL TEST_DATABASE_URL"]
async fn test_duplicate_order_is_rejected() {
    let store = connect().await;
    let account_id = fresh_account();
    let placed = order(&account_id, &[("p1", 1, dec!(1))]);

    store.persist(&placed).await.unwrap();
    assert!(store.persist(&placed).await.is_err());
    assert_eq!(orders_of(&store, &account_id).await.len(), 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL TEST_DATABASE_URL"]
async fn test_large_order_spans_insert_chunks() {
    let store = connect().await;
    let account_id = fresh_account();

    let ids: Vec<String> = (0..2500).map(|n| format!("p{n:05}")).collect();
    let items: Vec<(&str, u32, Decimal)> =
        ids.iter().map(|id| (id.as_str(), 1, dec!(1))).collect();
    let big = order(&account_id, &items);

    store.persist(&big).await.unwrap();

    let orders = orders_of(&store, &account_id).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].line_items().len(), 2500);
    assert_eq!(orders[0].total_price(), dec!(2500));
}
