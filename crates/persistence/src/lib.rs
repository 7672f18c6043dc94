//! Repository implementations for customers, products and orders.
//!
//! [`memory`] keeps aggregates in process and is used by tests and local
//! runs. [`postgres`] stores them in PostgreSQL through `sqlx`.

pub mod memory;
pub mod postgres;

pub use memory::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryRepository,
};
pub use postgres::{
    PgCustomerRepository, PgOrderRepository, PgProductRepository, connect, run_migrations,
};
