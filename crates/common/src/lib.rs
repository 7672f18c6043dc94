//! Shared types used across the domain, persistence and application crates.

mod types;

pub use types::{CustomerId, Money, OrderId, OrderItemId, ProductId};
