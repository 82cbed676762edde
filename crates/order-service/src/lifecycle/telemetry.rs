//! # Tracing Setup
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # placements, retrievals, actor lifecycle
//! RUST_LOG=debug cargo run    # plus request payloads and per-message actor logs
//! RUST_LOG=order_service=debug,actor_framework=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a placement reads roughly:
//!
//! ```text
//! INFO Created entity_type="Account" id=01J... size=1
//! INFO order_placement:place_order: Persisted order_id=01J... items=2
//! INFO order_placement:place_order: Order placed order_id=01J... total=25 items=2
//! ```
//!
//! Products dropped during placement, and products that no longer resolve on read, are
//! reported at `warn`.

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
