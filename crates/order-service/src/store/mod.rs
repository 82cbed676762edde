//! # Order Store
//!
//! Persistence for order aggregates. The aggregator only sees the [`OrderStore`] trait:
//!
//! - [`postgres::PgOrderStore`]: `orders` + `order_products` tables through `sqlx`.
//! - [`memory::MemoryOrderStore`]: an actor owning in-memory tables, with fault injection.
//!
//! Both write an order atomically and read it back as a flat, id-sorted row stream that
//! [`grouping`] folds into aggregates.

pub mod grouping;
pub mod memory;
pub mod postgres;

pub use grouping::{collect_orders, group_rows, GroupRows, OrderFold};
pub use memory::{Fault, MemoryOrderStore, MemoryStoreActor};
pub use postgres::PgOrderStore;

use crate::model::{AccountId, Order, OrderId, OrderRow};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Flat join rows for one account, ascending by order id.
pub type RowStream<'a> = BoxStream<'a, Result<OrderRow, StoreError>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed stored row: {0}")]
    Decode(String),

    /// A key or check constraint rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The row stream violated its ascending order id contract.
    #[error("rows out of order: {next} arrived after {previous}")]
    RowsOutOfOrder { previous: OrderId, next: OrderId },

    #[error("injected failure: {0}")]
    Injected(&'static str),

    #[error("store actor closed")]
    Closed,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes the header and every line item as one unit. On error nothing is visible.
    async fn persist(&self, order: &Order) -> Result<(), StoreError>;

    /// Streams every line item of every order placed by `account_id`, one row each,
    /// sorted by order id and then product id.
    fn rows_for_account<'a>(&'a self, account_id: &'a AccountId) -> RowStream<'a>;
}
