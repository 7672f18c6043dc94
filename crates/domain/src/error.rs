//! Domain error types.

use common::OrderItemId;
use thiserror::Error;

/// Validation errors raised by entities and value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Entity identifier is missing.
    #[error("Id is required")]
    IdRequired,

    /// Entity name is missing.
    #[error("Name is required")]
    NameRequired,

    /// A required address component is missing.
    #[error("{field} is required")]
    AddressFieldRequired { field: &'static str },

    /// Customers cannot be activated without an address.
    #[error("Address is mandatory to activate a customer")]
    AddressRequiredToActivate,

    /// Price must not be negative.
    #[error("Price must be greater than or equal to zero")]
    NegativePrice,

    /// Quantity must be positive.
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    /// Orders need at least one item.
    #[error("Items are required")]
    ItemsRequired,

    /// Orders need a customer reference.
    #[error("CustomerId is required")]
    CustomerIdRequired,

    /// Item not present in the order.
    #[error("Item not found: {0}")]
    ItemNotFound(OrderItemId),

    /// Item ids must be unique within an order.
    #[error("Duplicate item: {0}")]
    DuplicateItem(OrderItemId),
}

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No stored row matches the requested id.
    #[error("{aggregate} not found")]
    NotFound { aggregate: &'static str },

    /// A row with the same id already exists.
    #[error("{aggregate} with id {id} already exists")]
    DuplicateKey { aggregate: &'static str, id: String },

    /// Error raised by the storage engine, passed through untouched.
    #[error(transparent)]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a storage engine error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        RepositoryError::Storage(Box::new(err))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
