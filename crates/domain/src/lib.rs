//! Domain layer for the customer-events sample.
//!
//! This crate provides:
//! - Customer, Product and Order aggregates with their value objects
//! - [`DomainEvent`] and [`EventHandler`] contracts
//! - [`EventDispatcher`], a synchronous process-local publish/subscribe registry
//! - [`Repository`] contract implemented by the persistence crate

pub mod aggregate;
pub mod customer;
pub mod error;
pub mod event;
pub mod order;
pub mod product;
pub mod repository;

pub use aggregate::Aggregate;
pub use customer::{
    Address, Customer, CustomerAddressChangedLogHandler, CustomerChangedAddressEvent,
    CustomerCreatedEvent, CustomerEventData, FirstCustomerCreatedLogHandler,
    SecondCustomerCreatedLogHandler,
};
pub use error::{DomainError, RepositoryError, RepositoryResult};
pub use event::{
    DispatchError, DomainEvent, EventDispatcher, EventHandler, HandlerError, RegisteredHandler,
};
pub use order::{Order, OrderItem};
pub use product::{
    Product, ProductCreatedEvent, ProductEventData, SendEmailWhenProductIsCreatedHandler,
};
pub use repository::{CustomerRepository, OrderRepository, ProductRepository, Repository};

pub use common::{CustomerId, Money, OrderId, OrderItemId, ProductId};
