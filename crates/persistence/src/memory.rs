use std::sync::Arc;

use async_trait::async_trait;
use domain::{Aggregate, Customer, Order, Product, Repository, RepositoryError, RepositoryResult};
use tokio::sync::RwLock;

/// In-memory repository implementation for testing and local runs.
///
/// Rows are kept in insertion order, so `find_all` returns aggregates in the
/// order they were created. Clones share the same storage.
pub struct InMemoryRepository<A: Aggregate> {
    rows: Arc<RwLock<Vec<A>>>,
}

/// In-memory customer repository.
pub type InMemoryCustomerRepository = InMemoryRepository<Customer>;

/// In-memory product repository.
pub type InMemoryProductRepository = InMemoryRepository<Product>;

/// In-memory order repository.
pub type InMemoryOrderRepository = InMemoryRepository<Order>;

impl<A: Aggregate> InMemoryRepository<A> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns the number of stored aggregates.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Removes every stored aggregate.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}

impl<A: Aggregate> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

#[async_trait]
impl<A: Aggregate> Repository<A> for InMemoryRepository<A> {
    #[tracing::instrument(skip_all, fields(aggregate = A::NAME, id = %entity.id()))]
    async fn create(&self, entity: &A) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(RepositoryError::DuplicateKey {
                aggregate: A::NAME,
                id: entity.id().to_string(),
            });
        }

        rows.push(entity.clone());
        metrics::counter!("repository_operations", "op" => "create", "aggregate" => A::NAME)
            .increment(1);
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(aggregate = A::NAME, id = %entity.id()))]
    async fn update(&self, entity: &A) -> RepositoryResult<u64> {
        let mut rows = self.rows.write().await;
        metrics::counter!("repository_operations", "op" => "update", "aggregate" => A::NAME)
            .increment(1);

        match rows.iter_mut().find(|row| entity.same_key(row)) {
            Some(row) => {
                *row = entity.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    #[tracing::instrument(skip_all, fields(aggregate = A::NAME, %id))]
    async fn find(&self, id: &A::Id) -> RepositoryResult<A> {
        let rows = self.rows.read().await;
        metrics::counter!("repository_operations", "op" => "find", "aggregate" => A::NAME)
            .increment(1);

        rows.iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or(RepositoryError::NotFound { aggregate: A::NAME })
    }

    async fn find_all(&self) -> RepositoryResult<Vec<A>> {
        metrics::counter!("repository_operations", "op" => "find_all", "aggregate" => A::NAME)
            .increment(1);
        Ok(self.rows.read().await.clone())
    }
}
