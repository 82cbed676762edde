//! Folding sorted join rows back into [`Order`] aggregates.
//!
//! Rows arrive ordered by order id, so one pass that keeps only the order being built is
//! enough. A row whose id sorts before the current one means the source broke that
//! contract, and is reported instead of silently splitting an order in two.

use super::StoreError;
use crate::model::{Order, OrderHeader, OrderRow, OrderedLineItem};
use futures::{pin_mut, Stream, TryStreamExt};

/// Single-pass grouping state.
#[derive(Debug, Default)]
pub struct OrderFold {
    current: Option<(OrderHeader, Vec<OrderedLineItem>)>,
}

impl OrderFold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one row. Returns the previous order once a row for a new order arrives.
    pub fn push(&mut self, row: OrderRow) -> Result<Option<Order>, StoreError> {
        if let Some((header, items)) = self.current.as_mut() {
            if header.id == row.order_id {
                items.push(row.into_line_item());
                return Ok(None);
            }
            if row.order_id < header.id {
                return Err(StoreError::RowsOutOfOrder {
                    previous: header.id,
                    next: row.order_id,
                });
            }
        }

        let header = row.header();
        let sealed = self
            .current
            .replace((header, vec![row.into_line_item()]))
            .map(|(header, items)| Order::restore(header, items));
        Ok(sealed)
    }

    /// Seals the order still being built, if any.
    pub fn finish(self) -> Option<Order> {
        self.current
            .map(|(header, items)| Order::restore(header, items))
    }
}

/// Iterator adapter that groups a row iterator into orders.
///
/// Stops after the first error.
pub struct GroupRows<I> {
    rows: I,
    fold: OrderFold,
    done: bool,
}

pub fn group_rows<I>(rows: I) -> GroupRows<I::IntoIter>
where
    I: IntoIterator<Item = Result<OrderRow, StoreError>>,
{
    GroupRows {
        rows: rows.into_iter(),
        fold: OrderFold::new(),
        done: false,
    }
}

impl<I> Iterator for GroupRows<I>
where
    I: Iterator<Item = Result<OrderRow, StoreError>>,
{
    type Item = Result<Order, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let result = match self.rows.next() {
                Some(Ok(row)) => self.fold.push(row),
                Some(Err(e)) => Err(e),
                None => {
                    self.done = true;
                    return std::mem::take(&mut self.fold).finish().map(Ok);
                }
            };
            match result {
                Ok(Some(order)) => return Some(Ok(order)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Drains a row stream into orders, in first-seen order.
pub async fn collect_orders<S>(rows: S) -> Result<Vec<Order>, StoreError>
where
    S: Stream<Item = Result<OrderRow, StoreError>>,
{
    pin_mut!(rows);
    let mut fold = OrderFold::new();
    let mut orders = Vec::new();

    while let Some(row) = rows.try_next().await? {
        if let Some(order) = fold.push(row)? {
            orders.push(order);
        }
    }
    orders.extend(fold.finish());

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountId, OrderId};
    use chrono::Utc;
    use futures::stream;
    use rust_decimal::Decimal;

    fn rows_for(order_id: OrderId, products: &[&str]) -> Vec<OrderRow> {
        let created_at = Utc::now();
        products
            .iter()
            .map(|product| OrderRow {
                order_id,
                created_at,
                account_id: AccountId::from("acc_1"),
                total_price: Decimal::ONE,
                product_id: (*product).into(),
                quantity: 1,
            })
            .collect()
    }

    /// Three ascending order ids.
    fn three_ids() -> [OrderId; 3] {
        let mut ids = [OrderId::new(), OrderId::new(), OrderId::new()];
        ids.sort();
        ids
    }

    fn item_counts(orders: &[Order]) -> Vec<usize> {
        orders.iter().map(|o| o.line_items().len()).collect()
    }

    #[test]
    fn test_groups_sorted_rows_in_first_seen_order() {
        let [a, b, c] = three_ids();
        let rows: Vec<_> = [
            rows_for(a, &["p1", "p2"]),
            rows_for(b, &["p1"]),
            rows_for(c, &["p1", "p2", "p3"]),
        ]
        .concat();

        let orders: Vec<Order> = group_rows(rows.into_iter().map(Ok))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(item_counts(&orders), [2, 1, 3]);
        let ids: Vec<_> = orders.iter().map(Order::id).collect();
        assert_eq!(ids, [a, b, c]);

        let products: Vec<Vec<&str>> = orders
            .iter()
            .map(|o| o.line_items().iter().map(|i| i.product_id.as_str()).collect())
            .collect();
        assert_eq!(products, [vec!["p1", "p2"], vec!["p1"], vec!["p1", "p2", "p3"]]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let no_rows: Vec<Result<OrderRow, StoreError>> = Vec::new();
        assert_eq!(group_rows(no_rows).count(), 0);
        assert!(OrderFold::new().finish().is_none());
    }

    #[test]
    fn test_rejects_rows_that_go_backwards() {
        let [a, b, _] = three_ids();
        let rows = [rows_for(b, &["p1"]), rows_for(a, &["p1"])].concat();

        let mut groups = group_rows(rows.into_iter().map(Ok));
        match groups.next() {
            Some(Err(StoreError::RowsOutOfOrder { previous, next })) => {
                assert_eq!(previous, b);
                assert_eq!(next, a);
            }
            other => panic!("expected RowsOutOfOrder, got {other:?}"),
        }
        assert!(groups.next().is_none());
    }

    #[tokio::test]
    async fn test_collect_orders_from_stream() {
        let [a, b, c] = three_ids();
        let rows = [
            rows_for(a, &["p1", "p2"]),
            rows_for(b, &["p1"]),
            rows_for(c, &["p1", "p2", "p3"]),
        ]
        .concat();

        let orders = collect_orders(stream::iter(rows.into_iter().map(Ok)))
            .await
            .unwrap();
        assert_eq!(item_counts(&orders), [2, 1, 3]);
    }

    #[tokio::test]
    async fn test_collect_orders_propagates_stream_errors() {
        let [a, _, _] = three_ids();
        let mut rows: Vec<Result<OrderRow, StoreError>> =
            rows_for(a, &["p1"]).into_iter().map(Ok).collect();
        rows.push(Err(StoreError::Decode("bad quantity".to_string())));

        let err = collect_orders(stream::iter(rows)).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
