//! Repository contract implemented by persistence adapters.

use async_trait::async_trait;

use crate::aggregate::Aggregate;
use crate::customer::Customer;
use crate::error::RepositoryResult;
use crate::order::Order;
use crate::product::Product;

/// Persistence adapter for one aggregate type.
///
/// Implementations must reconstruct entities so that a `find` right after a
/// `create` returns a value equal to the created entity, nested collections
/// included and in the same order.
#[async_trait]
pub trait Repository<A: Aggregate>: Send + Sync {
    /// Stores a new aggregate.
    ///
    /// Fails with `RepositoryError::DuplicateKey` if the id already exists.
    async fn create(&self, entity: &A) -> RepositoryResult<()>;

    /// Overwrites the stored state of an existing aggregate.
    ///
    /// Returns the number of affected rows. Zero means nothing matched; this
    /// is not an error.
    async fn update(&self, entity: &A) -> RepositoryResult<u64>;

    /// Loads an aggregate by id.
    ///
    /// Fails with `RepositoryError::NotFound` if no row matches.
    async fn find(&self, id: &A::Id) -> RepositoryResult<A>;

    /// Loads every stored aggregate. Returns an empty vector for an empty store.
    async fn find_all(&self) -> RepositoryResult<Vec<A>>;
}

/// Repository for [`Customer`] aggregates.
pub trait CustomerRepository: Repository<Customer> {}

impl<T: Repository<Customer> + ?Sized> CustomerRepository for T {}

/// Repository for [`Product`] aggregates.
pub trait ProductRepository: Repository<Product> {}

impl<T: Repository<Product> + ?Sized> ProductRepository for T {}

/// Repository for [`Order`] aggregates.
///
/// Updates match on both the order id and the customer id and rewrite the
/// stored total together with the item rows.
pub trait OrderRepository: Repository<Order> {}

impl<T: Repository<Order> + ?Sized> OrderRepository for T {}
