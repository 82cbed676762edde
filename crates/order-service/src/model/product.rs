use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A catalog product.
///
/// # Actor Framework
/// Implements [`ActorEntity`](actor_framework::ActorEntity) in
/// [`catalog_actor::entity`](crate::catalog_actor::entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl Product {
    /// The catalog view of this product as seen by orders.
    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            unit_price: self.price,
        }
    }
}

/// Authoritative attributes of a product, as resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// Partial update of a catalog product. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}
