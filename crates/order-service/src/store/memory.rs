//! In-memory order store.
//!
//! Same shape as a [`ResourceActor`](actor_framework::ResourceActor): one task owns the
//! tables and serves requests sequentially over an mpsc channel, and [`MemoryOrderStore`]
//! is the cloneable client. Writes go through a staged transaction that is applied only
//! after every insert succeeds.

use super::{OrderStore, RowStream, StoreError};
use crate::model::{AccountId, Order, OrderHeader, OrderId, OrderRow, ProductId, MAX_QUANTITY};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryFutureExt};
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A write step that can be made to fail once, for exercising rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The `orders` insert fails.
    HeaderInsert,
    /// The `order_products` insert fails after the header went in.
    LineItemInsert,
}

enum StoreRequest {
    Persist {
        order: Order,
        respond_to: oneshot::Sender<Result<(), StoreError>>,
    },
    Rows {
        account_id: AccountId,
        respond_to: oneshot::Sender<Vec<OrderRow>>,
    },
    InjectFault {
        fault: Fault,
        respond_to: oneshot::Sender<()>,
    },
}

/// Writes staged by one `persist` call.
#[derive(Default)]
struct Transaction {
    headers: Vec<OrderHeader>,
    line_items: Vec<((OrderId, ProductId), u32)>,
}

/// Server half: owns the `orders` and `order_products` tables.
pub struct MemoryStoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    orders: BTreeMap<OrderId, OrderHeader>,
    order_products: BTreeMap<(OrderId, ProductId), u32>,
    fault: Option<Fault>,
}

/// Client half: cheap to clone, implements [`OrderStore`].
#[derive(Clone)]
pub struct MemoryOrderStore {
    sender: mpsc::Sender<StoreRequest>,
}

/// Creates the store actor and its client.
pub fn new(buffer_size: usize) -> (MemoryStoreActor, MemoryOrderStore) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = MemoryStoreActor {
        receiver,
        orders: BTreeMap::new(),
        order_products: BTreeMap::new(),
        fault: None,
    };
    (actor, MemoryOrderStore { sender })
}

impl MemoryStoreActor {
    pub async fn run(mut self) {
        info!("Order store started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                StoreRequest::Persist { order, respond_to } => match self.stage(&order) {
                    // The caller was cancelled while the request was queued
                    Ok(_) if respond_to.is_closed() => {
                        warn!(order_id = %order.id(), "Caller gone, discarding write");
                    }
                    Ok(tx) => {
                        self.commit(tx);
                        info!(
                            order_id = %order.id(),
                            items = order.line_items().len(),
                            "Persisted"
                        );
                        if respond_to.send(Ok(())).is_err() {
                            warn!(order_id = %order.id(), "Caller gone after commit");
                        }
                    }
                    Err(e) => {
                        warn!(order_id = %order.id(), error = %e, "Rolled back");
                        let _ = respond_to.send(Err(e));
                    }
                },
                StoreRequest::Rows {
                    account_id,
                    respond_to,
                } => {
                    let rows = self.rows_for(&account_id);
                    debug!(%account_id, rows = rows.len(), "Rows");
                    let _ = respond_to.send(rows);
                }
                StoreRequest::InjectFault { fault, respond_to } => {
                    debug!(?fault, "Fault armed");
                    self.fault = Some(fault);
                    let _ = respond_to.send(());
                }
            }
        }

        info!(orders = self.orders.len(), "Order store shutdown");
    }

    /// Runs every insert against a staged transaction. Nothing is applied until `commit`.
    fn stage(&mut self, order: &Order) -> Result<Transaction, StoreError> {
        let mut tx = Transaction::default();
        self.insert_header(&mut tx, order.header())?;
        for item in order.line_items() {
            self.insert_line_item(&mut tx, order.id(), &item.product_id, item.quantity)?;
        }
        Ok(tx)
    }

    fn trip(&mut self, step: Fault) -> Result<(), StoreError> {
        if self.fault == Some(step) {
            self.fault = None;
            return Err(StoreError::Injected(match step {
                Fault::HeaderInsert => "orders insert",
                Fault::LineItemInsert => "order_products insert",
            }));
        }
        Ok(())
    }

    fn insert_header(
        &mut self,
        tx: &mut Transaction,
        header: OrderHeader,
    ) -> Result<(), StoreError> {
        self.trip(Fault::HeaderInsert)?;
        if self.orders.contains_key(&header.id) || tx.headers.iter().any(|h| h.id == header.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate order id {}",
                header.id
            )));
        }
        tx.headers.push(header);
        Ok(())
    }

    fn insert_line_item(
        &mut self,
        tx: &mut Transaction,
        order_id: OrderId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        self.trip(Fault::LineItemInsert)?;
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(StoreError::Constraint(format!(
                "quantity {quantity} for {product_id} out of range"
            )));
        }
        let key = (order_id, product_id.clone());
        if self.order_products.contains_key(&key) || tx.line_items.iter().any(|(k, _)| *k == key)
        {
            return Err(StoreError::Constraint(format!(
                "duplicate line item {product_id} in order {order_id}"
            )));
        }
        tx.line_items.push((key, quantity));
        Ok(())
    }

    fn commit(&mut self, tx: Transaction) {
        for header in tx.headers {
            self.orders.insert(header.id, header);
        }
        self.order_products.extend(tx.line_items);
    }

    /// Join of both tables for one account, by order id then product id.
    fn rows_for(&self, account_id: &AccountId) -> Vec<OrderRow> {
        let mut rows = Vec::new();
        for header in self.orders.values().filter(|h| &h.account_id == account_id) {
            let first = (header.id, ProductId::new(""));
            let items = self
                .order_products
                .range(first..)
                .take_while(|((order_id, _), _)| *order_id == header.id);
            for ((_, product_id), quantity) in items {
                rows.push(OrderRow {
                    order_id: header.id,
                    created_at: header.created_at,
                    account_id: header.account_id.clone(),
                    total_price: header.total_price,
                    product_id: product_id.clone(),
                    quantity: *quantity,
                });
            }
        }
        rows
    }
}

impl MemoryOrderStore {
    /// Makes the next write reaching `fault` fail. The fault fires once.
    pub async fn inject_fault(&self, fault: Fault) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::InjectFault { fault, respond_to })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Closed)
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn persist(&self, order: &Order) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Persist {
                order: order.clone(),
                respond_to,
            })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Closed)?
    }

    fn rows_for_account<'a>(&'a self, account_id: &'a AccountId) -> RowStream<'a> {
        let fetch = async move {
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(StoreRequest::Rows {
                    account_id: account_id.clone(),
                    respond_to,
                })
                .await
                .map_err(|_| StoreError::Closed)?;
            let rows = response.await.map_err(|_| StoreError::Closed)?;
            Ok::<_, StoreError>(stream::iter(rows.into_iter().map(Ok)))
        };
        fetch.try_flatten_stream().boxed()
    }
}
