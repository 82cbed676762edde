use super::ServiceConfig;
use crate::clients::{AccountClient, CatalogClient};
use crate::order_service::OrderService;
use crate::store::{MemoryOrderStore, OrderStore, PgOrderStore, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running order system: collaborator actors, the order store and the aggregator.
///
/// # Architecture
///
/// - **Account actor**: owns accounts, answers verification
/// - **Catalog actor**: owns products, answers batch resolution
/// - **Order store**: PostgreSQL when a `database_url` is configured, otherwise an
///   in-memory store actor
/// - **[`OrderService`]**: wired to all three through their traits
///
/// # Example
///
/// ```ignore
/// let config = ServiceConfig::load(None)?;
/// let system = OrderSystem::connect(&config).await?;
///
/// let account_id = system.account_client.create_account(account).await?;
/// let order = system
///     .order_service
///     .place_order(&config.request_context(), account_id, lines)
///     .await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub account_client: AccountClient,

    pub catalog_client: CatalogClient,

    /// Holds clones of both clients and the store.
    pub order_service: OrderService,

    memory_store: Option<MemoryOrderStore>,

    /// Task handles for every running actor (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts the system with the in-memory order store, whatever `database_url` says.
    pub fn new(config: &ServiceConfig) -> Self {
        let (store_actor, store) = crate::store::memory::new(config.actor_buffer_size);
        let store_handle = tokio::spawn(store_actor.run());

        let mut system = Self::with_store(config, Arc::new(store.clone()));
        system.memory_store = Some(store);
        system.handles.push(store_handle);
        system
    }

    /// Starts the system with PostgreSQL if `database_url` is set (creating the tables if
    /// needed), or with the in-memory store otherwise.
    pub async fn connect(config: &ServiceConfig) -> Result<Self, StoreError> {
        let Some(url) = config.database_url.as_deref() else {
            info!("No database configured, using in-memory order store");
            return Ok(Self::new(config));
        };

        let store =
            PgOrderStore::connect(url, config.max_connections, config.acquire_timeout()).await?;
        store.migrate().await?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    fn with_store(config: &ServiceConfig, store: Arc<dyn OrderStore>) -> Self {
        // Accounts and products have no dependencies (Context = ())
        let (account_actor, account_client) = crate::account_actor::new(config.actor_buffer_size);
        let (catalog_actor, catalog_client) = crate::catalog_actor::new(config.actor_buffer_size);

        let account_handle = tokio::spawn(account_actor.run(()));
        let catalog_handle = tokio::spawn(catalog_actor.run(()));

        let order_service = OrderService::new(
            Arc::new(account_client.clone()),
            Arc::new(catalog_client.clone()),
            store,
        );

        Self {
            account_client,
            catalog_client,
            order_service,
            memory_store: None,
            handles: vec![account_handle, catalog_handle],
        }
    }

    /// The in-memory store, when the system runs on one. Used to inject write faults.
    pub fn memory_store(&self) -> Option<&MemoryOrderStore> {
        self.memory_store.as_ref()
    }

    /// Drops every client, which closes the actor channels, then waits for each actor
    /// to finish.
    ///
    /// Clones of the clients or of `order_service` held elsewhere keep their actor alive,
    /// so drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_service);
        drop(self.account_client);
        drop(self.catalog_client);
        drop(self.memory_store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
