use super::{AccountId, ProductDetails, ProductId};
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Order identifier - ULID based.
///
/// ULIDs sort lexicographically by creation time, so ordering rows by id also orders
/// them by placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(ulid::Ulid);

impl OrderId {
    /// Generate a new unique OrderId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

impl From<ulid::Ulid> for OrderId {
    fn from(id: ulid::Ulid) -> Self {
        Self(id)
    }
}

/// Largest quantity a single line item can carry. The `order_products.quantity`
/// column is a 32-bit signed integer.
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// One line of an incoming placement request, before validation.
///
/// The quantity is signed so that non-positive values can be rejected explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl RequestedLine {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A product/quantity pairing inside an order.
///
/// `details` is the display snapshot. Only `product_id` and `quantity` are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub details: Option<ProductDetails>,
}

impl OrderedLineItem {
    /// A line item as read back from storage, not yet enriched.
    pub fn unresolved(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            details: None,
        }
    }

    pub fn resolved(product_id: ProductId, quantity: u32, details: ProductDetails) -> Self {
        Self {
            product_id,
            quantity,
            details: Some(details),
        }
    }

    /// `quantity × unit_price`, or `None` if unpriced or on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        let details = self.details.as_ref()?;
        details.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Reasons an [`Order`] cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidOrder {
    #[error("an order needs at least one line item")]
    NoLineItems,
    #[error("line item {0} has no resolved price")]
    Unpriced(ProductId),
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    #[error("quantity {quantity} for product {product_id} is out of range")]
    QuantityOutOfRange { product_id: ProductId, quantity: u32 },
    #[error("order total overflows")]
    TotalOverflow,
}

/// The persisted header of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: OrderId,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub total_price: Decimal,
}

/// The order aggregate: header plus every line item.
///
/// Orders are immutable once built. The only mutation allowed is refreshing the display
/// snapshot of line items at read time. Orders serialize for output but can only be
/// built through [`Order::place`] or [`Order::restore`]:
///
/// ```compile_fail
/// let order: order_service::model::Order = serde_yaml::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    account_id: AccountId,
    created_at: DateTime<Utc>,
    total_price: Decimal,
    line_items: Vec<OrderedLineItem>,
}

impl Order {
    /// Builds a new order from priced line items.
    ///
    /// Assigns a fresh id and the current timestamp, and fixes the total at
    /// `Σ quantity × unit_price`.
    pub fn place(
        account_id: AccountId,
        line_items: Vec<OrderedLineItem>,
    ) -> Result<Self, InvalidOrder> {
        if line_items.is_empty() {
            return Err(InvalidOrder::NoLineItems);
        }

        let mut seen = HashSet::with_capacity(line_items.len());
        let mut total_price = Decimal::ZERO;
        for item in &line_items {
            if !seen.insert(&item.product_id) {
                return Err(InvalidOrder::DuplicateProduct(item.product_id.clone()));
            }
            if item.quantity == 0 || item.quantity > MAX_QUANTITY {
                return Err(InvalidOrder::QuantityOutOfRange {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                });
            }
            let line_total = match (&item.details, item.line_total()) {
                (None, _) => return Err(InvalidOrder::Unpriced(item.product_id.clone())),
                (Some(_), None) => return Err(InvalidOrder::TotalOverflow),
                (Some(_), Some(line_total)) => line_total,
            };
            total_price = total_price
                .checked_add(line_total)
                .ok_or(InvalidOrder::TotalOverflow)?;
        }

        Ok(Self {
            id: OrderId::new(),
            account_id,
            // Postgres keeps microseconds
            created_at: Utc::now().trunc_subsecs(6),
            total_price,
            line_items,
        })
    }

    /// Rebuilds a persisted order. The stored total is kept as is.
    pub fn restore(header: OrderHeader, line_items: Vec<OrderedLineItem>) -> Self {
        Self {
            id: header.id,
            account_id: header.account_id,
            created_at: header.created_at,
            total_price: header.total_price,
            line_items,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn line_items(&self) -> &[OrderedLineItem] {
        &self.line_items
    }

    pub fn header(&self) -> OrderHeader {
        OrderHeader {
            id: self.id,
            account_id: self.account_id.clone(),
            created_at: self.created_at,
            total_price: self.total_price,
        }
    }

    /// Flattens the aggregate into one row per line item.
    pub fn to_rows(&self) -> Vec<OrderRow> {
        self.line_items
            .iter()
            .map(|item| OrderRow {
                order_id: self.id,
                created_at: self.created_at,
                account_id: self.account_id.clone(),
                total_price: self.total_price,
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Replaces the display snapshot of every item whose product is in `resolved`.
    /// Items whose product did not resolve keep their current snapshot.
    pub(crate) fn refresh_details<F>(&mut self, mut resolved: F)
    where
        F: FnMut(&ProductId) -> Option<ProductDetails>,
    {
        for item in &mut self.line_items {
            if let Some(details) = resolved(&item.product_id) {
                item.details = Some(details);
            }
        }
    }
}

/// One row of the order × line-item join, as produced by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub account_id: AccountId,
    pub total_price: Decimal,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderRow {
    pub fn header(&self) -> OrderHeader {
        OrderHeader {
            id: self.order_id,
            account_id: self.account_id.clone(),
            created_at: self.created_at,
            total_price: self.total_price,
        }
    }

    pub fn into_line_item(self) -> OrderedLineItem {
        OrderedLineItem::unresolved(self.product_id, self.quantity)
    }
}
