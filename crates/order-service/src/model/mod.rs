//! # Domain Model
//!
//! Plain data types shared by the collaborators, the store and the order aggregator.
//!
//! - [`account`]: [`Account`] and its DTOs, managed by the account actor.
//! - [`product`]: [`Product`] and its DTOs, managed by the catalog actor.
//! - [`order`]: the [`Order`] aggregate, its line items and the flat [`OrderRow`] used by the store.

pub mod account;
pub mod order;
pub mod product;

pub use account::*;
pub use order::*;
pub use product::*;
