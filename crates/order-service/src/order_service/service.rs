use super::OrderError;
use crate::account_actor::AccountError;
use crate::catalog_actor::ProductError;
use crate::clients::{AccountVerifier, ProductResolver};
use crate::context::RequestContext;
use crate::model::{
    AccountId, Order, OrderedLineItem, ProductDetails, ProductId, RequestedLine, MAX_QUANTITY,
};
use crate::store::{collect_orders, OrderStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Places orders and reads them back, enriched with live catalog data.
///
/// Holds shared handles only, so clones serve requests concurrently.
#[derive(Clone)]
pub struct OrderService {
    accounts: Arc<dyn AccountVerifier>,
    catalog: Arc<dyn ProductResolver>,
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(
        accounts: Arc<dyn AccountVerifier>,
        catalog: Arc<dyn ProductResolver>,
        store: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            store,
        }
    }

    /// Validates, prices and persists a new order.
    ///
    /// Account verification and product resolution run concurrently. Requested products
    /// the catalog does not know are dropped; if none are left the order is refused with
    /// [`OrderError::NoValidProducts`]. The returned order is exactly what was persisted.
    #[instrument(
        skip(self, ctx, account_id, lines),
        fields(%account_id, lines = lines.len())
    )]
    pub async fn place_order(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        lines: Vec<RequestedLine>,
    ) -> Result<Order, OrderError> {
        debug!(?lines, "place_order called");
        let requested = validate_placement(&account_id, lines)?;
        ctx.check()?;

        let ids: BTreeSet<ProductId> = requested.iter().map(|(id, _)| id.clone()).collect();
        let verify = async {
            self.accounts
                .verify(&account_id)
                .await
                .map_err(|e| account_failure(&account_id, e))
        };
        let resolve = async {
            self.catalog
                .resolve_batch(&ids)
                .await
                .map_err(catalog_failure)
        };
        let ((), resolved) = ctx.run(async { tokio::try_join!(verify, resolve) }).await??;

        let line_items = merge(requested, resolved);
        if line_items.is_empty() {
            warn!("No requested product resolved");
            return Err(OrderError::NoValidProducts);
        }

        let order = Order::place(account_id, line_items)
            .map_err(|e| OrderError::InvalidArgument(e.to_string()))?;

        ctx.run(self.store.persist(&order))
            .await?
            .map_err(OrderError::PersistenceFailed)?;

        info!(
            order_id = %order.id(),
            total = %order.total_price(),
            items = order.line_items().len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Every order of `account_id`, grouped from the store's sorted rows and enriched with
    /// one batch catalog lookup.
    ///
    /// Products that no longer resolve keep whatever snapshot they had; the read does not
    /// fail because of them. Totals are never recomputed.
    #[instrument(skip(self, ctx, account_id), fields(%account_id))]
    pub async fn get_orders_for_account(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> Result<Vec<Order>, OrderError> {
        if account_id.is_empty() {
            return Err(OrderError::InvalidArgument(
                "account id must not be empty".to_string(),
            ));
        }
        ctx.check()?;

        let mut orders = ctx
            .run(collect_orders(self.store.rows_for_account(account_id)))
            .await?
            .map_err(OrderError::RetrievalFailed)?;

        if orders.is_empty() {
            debug!("No orders");
            return Ok(orders);
        }

        let ids: BTreeSet<ProductId> = orders
            .iter()
            .flat_map(Order::line_items)
            .map(|item| item.product_id.clone())
            .collect();
        let resolved = ctx
            .run(self.catalog.resolve_batch(&ids))
            .await?
            .map_err(catalog_failure)?;

        let missing = ids.len() - ids.iter().filter(|id| resolved.contains_key(*id)).count();
        if missing > 0 {
            warn!(missing, "Products no longer in catalog, keeping their snapshots");
        }

        for order in &mut orders {
            order.refresh_details(|id| resolved.get(id).cloned());
        }

        info!(orders = orders.len(), products = ids.len(), "Orders retrieved");
        Ok(orders)
    }
}

/// Checks a placement request before any I/O and coalesces repeated products.
///
/// Returns `(product, quantity)` pairs in first-seen order.
fn validate_placement(
    account_id: &AccountId,
    lines: Vec<RequestedLine>,
) -> Result<Vec<(ProductId, u32)>, OrderError> {
    if account_id.is_empty() {
        return Err(OrderError::InvalidArgument(
            "account id must not be empty".to_string(),
        ));
    }
    if lines.is_empty() {
        return Err(OrderError::InvalidArgument(
            "an order needs at least one line".to_string(),
        ));
    }

    let mut requested: Vec<(ProductId, u32)> = Vec::with_capacity(lines.len());
    let mut index: HashMap<ProductId, usize> = HashMap::with_capacity(lines.len());

    for line in lines {
        if line.product_id.is_empty() {
            return Err(OrderError::InvalidArgument(
                "product id must not be empty".to_string(),
            ));
        }
        let quantity = u32::try_from(line.quantity)
            .ok()
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
            .ok_or_else(|| {
                OrderError::InvalidArgument(format!(
                    "quantity {} for product {} must be between 1 and {MAX_QUANTITY}",
                    line.quantity, line.product_id,
                ))
            })?;

        match index.get(&line.product_id) {
            Some(&at) => {
                let (product_id, total) = &mut requested[at];
                *total = total
                    .checked_add(quantity)
                    .filter(|q| *q <= MAX_QUANTITY)
                    .ok_or_else(|| {
                        OrderError::InvalidArgument(format!(
                            "combined quantity for product {product_id} exceeds {MAX_QUANTITY}"
                        ))
                    })?;
            }
            None => {
                index.insert(line.product_id.clone(), requested.len());
                requested.push((line.product_id, quantity));
            }
        }
    }

    Ok(requested)
}

/// Pairs each requested product with its resolved details. Unresolved products are
/// dropped and logged.
fn merge(
    requested: Vec<(ProductId, u32)>,
    mut resolved: HashMap<ProductId, ProductDetails>,
) -> Vec<OrderedLineItem> {
    requested
        .into_iter()
        .filter_map(|(product_id, quantity)| match resolved.remove(&product_id) {
            Some(details) => Some(OrderedLineItem::resolved(product_id, quantity, details)),
            None => {
                warn!(%product_id, quantity, "Product did not resolve, dropping line");
                None
            }
        })
        .collect()
}

fn account_failure(account_id: &AccountId, error: AccountError) -> OrderError {
    match error {
        AccountError::NotFound(_) => OrderError::AccountNotFound(account_id.clone()),
        other => OrderError::AccountUnavailable(other.to_string()),
    }
}

fn catalog_failure(error: ProductError) -> OrderError {
    OrderError::CatalogUnavailable(error.to_string())
}
