//! # Catalog Client
//!
//! Provides a high‑level API for interacting with the `Product` catalog actor, and resolves
//! product batches for the order aggregator.
use super::ProductResolver;
use crate::catalog_actor::ProductError;
use crate::model::{Product, ProductCreate, ProductDetails, ProductId, ProductUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Client for interacting with the Catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for CatalogClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<ProductError>() {
            Ok(entity_error) => entity_error,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CatalogClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Removes a product from the catalog. Orders that reference it keep their snapshot.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), ProductError> {
        self.delete(id).await
    }
}

#[async_trait]
impl ProductResolver for CatalogClient {
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn resolve_batch(
        &self,
        ids: &BTreeSet<ProductId>,
    ) -> Result<HashMap<ProductId, ProductDetails>, ProductError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let products = self.get_many(ids.iter().cloned().collect()).await?;
        debug!(resolved = products.len(), "Resolved batch");

        Ok(products
            .into_iter()
            .map(|product| {
                let details = product.details();
                (product.id, details)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_get_many, MockClient};
    use rust_decimal_macros::dec;

    fn product(id: &str, price: rust_decimal::Decimal) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            description: String::new(),
            price,
        }
    }

    #[tokio::test]
    async fn test_resolve_batch_is_one_sorted_round_trip() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let catalog = CatalogClient::new(client);

        let resolve_task = tokio::spawn(async move {
            let ids: BTreeSet<ProductId> = BTreeSet::from(["p2".into(), "p1".into(), "p3".into()]);
            catalog.resolve_batch(&ids).await
        });

        let (ids, responder) = expect_get_many(&mut receiver)
            .await
            .expect("Expected GetMany request");
        let requested: Vec<_> = ids.iter().map(ProductId::as_str).collect();
        assert_eq!(requested, ["p1", "p2", "p3"]);

        // p2 is unknown to the catalog
        responder
            .send(Ok(vec![product("p1", dec!(10)), product("p3", dec!(2.5))]))
            .unwrap();

        let resolved = resolve_task.await.unwrap().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[&ProductId::from("p1")].unit_price, dec!(10));
        assert_eq!(resolved[&ProductId::from("p3")].name, "Product p3");
        assert!(!resolved.contains_key(&ProductId::from("p2")));

        // Only one request was sent
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_empty_batch_sends_nothing() {
        let mock = MockClient::<Product>::new();
        let resolved = CatalogClient::new(mock.client())
            .resolve_batch(&BTreeSet::new())
            .await
            .unwrap();
        assert!(resolved.is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_resolve_batch_transport_failure() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_get_many(vec!["p1".into()])
            .return_err(FrameworkError::ActorDropped);

        let result = CatalogClient::new(mock.client())
            .resolve_batch(&BTreeSet::from(["p1".into()]))
            .await;

        assert!(matches!(
            result,
            Err(ProductError::ActorCommunicationError(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_unknown_product_is_not_found() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_delete("p9".into())
            .return_err(FrameworkError::NotFound("p9".to_string()));

        let result = CatalogClient::new(mock.client())
            .remove_product("p9".into())
            .await;

        assert_eq!(result, Err(ProductError::NotFound("p9".to_string())));
    }
}
