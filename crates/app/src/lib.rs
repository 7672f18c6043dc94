//! Host application for the customer-events sample.
//!
//! Builds the event dispatcher with the default handlers, selects the
//! repository backend from [`Config`] and exposes the application services.

pub mod config;
pub mod error;
pub mod services;

use std::sync::Arc;

use domain::{
    CustomerAddressChangedLogHandler, CustomerChangedAddressEvent, CustomerCreatedEvent,
    CustomerRepository, EventDispatcher, FirstCustomerCreatedLogHandler, OrderRepository,
    ProductCreatedEvent, ProductRepository, SecondCustomerCreatedLogHandler,
    SendEmailWhenProductIsCreatedHandler,
};
use persistence::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
    PgCustomerRepository, PgOrderRepository, PgProductRepository,
};

pub use config::{Config, LogFormat};
pub use error::AppError;
pub use services::{CustomerService, OrderService, ProductService};

/// Creates a dispatcher with the default handlers registered.
pub fn default_dispatcher() -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();

    dispatcher.register(
        CustomerCreatedEvent::EVENT_TYPE,
        Arc::new(FirstCustomerCreatedLogHandler),
    );
    dispatcher.register(
        CustomerCreatedEvent::EVENT_TYPE,
        Arc::new(SecondCustomerCreatedLogHandler),
    );
    dispatcher.register(
        CustomerChangedAddressEvent::EVENT_TYPE,
        Arc::new(CustomerAddressChangedLogHandler),
    );
    dispatcher.register(
        ProductCreatedEvent::EVENT_TYPE,
        Arc::new(SendEmailWhenProductIsCreatedHandler),
    );

    dispatcher
}

/// The repositories used by the services.
#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn CustomerRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepository::new()),
            products: Arc::new(InMemoryProductRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            customers: Arc::new(PgCustomerRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool)),
        }
    }

    /// Selects the backend from `config`. With a database URL this connects
    /// and runs the migrations first.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.database_url {
            Some(url) => {
                tracing::info!(
                    max_connections = config.max_connections,
                    "using PostgreSQL repositories"
                );
                let pool = persistence::connect(url, config.max_connections).await?;
                persistence::run_migrations(&pool).await?;
                Ok(Self::postgres(pool))
            }
            None => {
                tracing::info!("using in-memory repositories");
                Ok(Self::in_memory())
            }
        }
    }
}

/// Application services sharing one dispatcher.
#[derive(Clone)]
pub struct Services {
    pub customers: CustomerService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(repositories: Repositories, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            customers: CustomerService::new(
                Arc::clone(&repositories.customers),
                Arc::clone(&dispatcher),
            ),
            products: ProductService::new(repositories.products, dispatcher),
            orders: OrderService::new(repositories.orders, repositories.customers),
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::Repository;

    use super::*;

    #[test]
    fn default_dispatcher_registers_sample_handlers() {
        let dispatcher = default_dispatcher();

        assert_eq!(
            dispatcher
                .event_handlers(CustomerCreatedEvent::EVENT_TYPE)
                .len(),
            2
        );
        assert_eq!(
            dispatcher
                .event_handlers(CustomerChangedAddressEvent::EVENT_TYPE)
                .len(),
            1
        );
        assert_eq!(
            dispatcher
                .event_handlers(ProductCreatedEvent::EVENT_TYPE)
                .len(),
            1
        );
        assert!(dispatcher.event_handlers("OrderPlacedEvent").is_empty());
    }

    #[tokio::test]
    async fn in_memory_backend_without_database_url() {
        let repositories = Repositories::from_config(&Config::default()).await.unwrap();
        assert!(repositories.customers.find_all().await.unwrap().is_empty());
    }
}
