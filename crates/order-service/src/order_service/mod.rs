//! # Order Aggregator
//!
//! [`OrderService`] is the only component that talks to all three collaborators:
//!
//! ```text
//! place_order:  validate -> (verify account || resolve products) -> merge -> price -> persist
//! get_orders:   store rows -> group -> resolve products (one batch) -> enrich
//! ```
//!
//! It is written against [`AccountVerifier`](crate::clients::AccountVerifier),
//! [`ProductResolver`](crate::clients::ProductResolver) and
//! [`OrderStore`](crate::store::OrderStore), so tests can swap any of them out.
//!
//! Every downstream call runs under the caller's [`RequestContext`](crate::context::RequestContext);
//! once it is cancelled or past its deadline the call is abandoned and the request fails
//! with [`OrderError::Cancelled`].

pub mod error;
pub mod service;

pub use error::*;
pub use service::OrderService;
