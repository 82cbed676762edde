//! Demo: places an order and reads it back.
//!
//! ```bash
//! RUST_LOG=info cargo run -p order-service                   # in-memory store
//! DATABASE_URL=postgres://... cargo run -p order-service     # PostgreSQL
//! cargo run -p order-service -- config/order-service.yaml    # YAML config file
//! ```

use order_service::lifecycle::{setup_tracing, OrderSystem, ServiceConfig};
use order_service::model::{AccountCreate, ProductCreate, RequestedLine};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServiceConfig::load(config_path.as_deref()).map_err(|e| e.to_string())?;
    info!(database = config.database_url.is_some(), "Starting order system");

    let system = OrderSystem::connect(&config)
        .await
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("setup");
    let (account_id, product_ids) = async {
        let account_id = system
            .account_client
            .create_account(AccountCreate {
                name: "Alice".to_string(),
            })
            .await
            .map_err(|e| e.to_string())?;

        let mut product_ids = Vec::new();
        for (name, price) in [("Keyboard", Decimal::new(4999, 2)), ("Cable", Decimal::new(899, 2))] {
            let id = system
                .catalog_client
                .create_product(ProductCreate {
                    name: name.to_string(),
                    description: format!("{name} for the demo"),
                    price,
                })
                .await
                .map_err(|e| e.to_string())?;
            product_ids.push(id);
        }
        Ok::<_, String>((account_id, product_ids))
    }
    .instrument(span)
    .await?;

    info!(%account_id, products = product_ids.len(), "Catalog ready");

    let lines = vec![
        RequestedLine::new(product_ids[0].clone(), 1),
        RequestedLine::new(product_ids[1].clone(), 3),
        RequestedLine::new("no-such-product", 1),
    ];

    let span = tracing::info_span!("order_placement");
    let placed = system
        .order_service
        .place_order(&config.request_context(), account_id.clone(), lines)
        .instrument(span)
        .await;

    match placed {
        Ok(order) => info!(order_id = %order.id(), total = %order.total_price(), "Order placed"),
        Err(e) => error!(error = %e, "Order placement failed"),
    }

    let span = tracing::info_span!("order_retrieval");
    let orders = system
        .order_service
        .get_orders_for_account(&config.request_context(), &account_id)
        .instrument(span)
        .await
        .map_err(|e| e.to_string())?;

    for order in &orders {
        info!(
            order_id = %order.id(),
            items = order.line_items().len(),
            total = %order.total_price(),
            "Order"
        );
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
