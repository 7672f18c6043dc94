//! Integration tests for the application services over in-memory repositories.

use std::sync::Arc;
use std::sync::Mutex;

use app::{AppError, Repositories, Services};
use async_trait::async_trait;
use domain::{
    Address, Customer, CustomerChangedAddressEvent, CustomerCreatedEvent, CustomerId,
    DomainError, EventDispatcher, EventHandler, HandlerError, Money, OrderItem,
    ProductCreatedEvent, ProductId, Repository, RepositoryResult,
};
use persistence::InMemoryCustomerRepository;

/// Records the payload of every event it sees.
#[derive(Default)]
struct Journal {
    lines: Mutex<Vec<String>>,
}

impl Journal {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

struct CreatedJournal(Arc<Journal>);

impl EventHandler for CreatedJournal {
    type Event = CustomerCreatedEvent;

    fn handle(&self, event: &CustomerCreatedEvent) -> Result<(), HandlerError> {
        self.0.push(format!("created {} at {}", event.id(), event.address()));
        Ok(())
    }
}

struct MovedJournal(Arc<Journal>);

impl EventHandler for MovedJournal {
    type Event = CustomerChangedAddressEvent;

    fn handle(&self, event: &CustomerChangedAddressEvent) -> Result<(), HandlerError> {
        self.0.push(format!("moved {} to {}", event.id(), event.address()));
        Ok(())
    }
}

struct ProductJournal(Arc<Journal>);

impl EventHandler for ProductJournal {
    type Event = ProductCreatedEvent;

    fn handle(&self, event: &ProductCreatedEvent) -> Result<(), HandlerError> {
        self.0.push(format!("product {}", event.name()));
        Ok(())
    }
}

struct FailingHandler;

impl EventHandler for FailingHandler {
    type Event = CustomerCreatedEvent;

    fn handle(&self, _event: &CustomerCreatedEvent) -> Result<(), HandlerError> {
        Err(HandlerError::failed("smtp down"))
    }
}

/// Finds customers but never matches a row on update, as if the row was
/// deleted between the read and the write.
struct VanishingCustomers(InMemoryCustomerRepository);

#[async_trait]
impl Repository<Customer> for VanishingCustomers {
    async fn create(&self, entity: &Customer) -> RepositoryResult<()> {
        self.0.create(entity).await
    }

    async fn update(&self, _entity: &Customer) -> RepositoryResult<u64> {
        Ok(0)
    }

    async fn find(&self, id: &CustomerId) -> RepositoryResult<Customer> {
        self.0.find(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        self.0.find_all().await
    }
}

fn journal_dispatcher(journal: &Arc<Journal>) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(
        CustomerCreatedEvent::EVENT_TYPE,
        Arc::new(CreatedJournal(Arc::clone(journal))),
    );
    dispatcher.register(
        CustomerChangedAddressEvent::EVENT_TYPE,
        Arc::new(MovedJournal(Arc::clone(journal))),
    );
    dispatcher.register(
        ProductCreatedEvent::EVENT_TYPE,
        Arc::new(ProductJournal(Arc::clone(journal))),
    );
    dispatcher
}

fn setup() -> (Services, Repositories, Arc<Journal>) {
    let journal = Arc::new(Journal::default());
    let dispatcher = journal_dispatcher(&journal);

    let repositories = Repositories::in_memory();
    let services = Services::new(repositories.clone(), Arc::new(dispatcher));
    (services, repositories, journal)
}

fn address(n: u32) -> Address {
    Address::new(
        format!("Street {n}"),
        n,
        format!("Zipcode {n}"),
        format!("City {n}"),
    )
    .unwrap()
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn register_persists_then_notifies() {
        let (services, repositories, journal) = setup();
        let id = CustomerId::new("123");

        let customer = services
            .customers
            .register(id.clone(), "Customer 1", Some(address(1)))
            .await
            .unwrap();

        assert_eq!(repositories.customers.find(&id).await.unwrap(), customer);
        assert_eq!(
            journal.lines(),
            vec!["created 123 at Street 1, 1, Zipcode 1, City 1"]
        );
    }

    #[tokio::test]
    async fn invalid_customer_is_neither_stored_nor_announced() {
        let (services, repositories, journal) = setup();

        let err = services
            .customers
            .register(CustomerId::new("123"), "", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::NameRequired)));
        assert!(repositories.customers.find_all().await.unwrap().is_empty());
        assert!(journal.lines().is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_is_not_announced_twice() {
        let (services, _, journal) = setup();
        let id = CustomerId::new("123");
        services
            .customers
            .register(id.clone(), "Customer 1", None)
            .await
            .unwrap();

        let err = services
            .customers
            .register(id, "Customer 1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Repository(_)));
        assert_eq!(journal.lines().len(), 1);
    }

    #[tokio::test]
    async fn change_address_updates_and_notifies() {
        let (services, repositories, journal) = setup();
        let id = CustomerId::new("123");
        services
            .customers
            .register(id.clone(), "Customer 1", Some(address(1)))
            .await
            .unwrap();

        services
            .customers
            .change_address(&id, address(2))
            .await
            .unwrap();

        let stored = repositories.customers.find(&id).await.unwrap();
        assert_eq!(stored.address(), Some(&address(2)));
        assert_eq!(
            journal.lines().last().map(String::as_str),
            Some("moved 123 to Street 2, 2, Zipcode 2, City 2")
        );
    }

    #[tokio::test]
    async fn change_address_of_unknown_customer_fails() {
        let (services, _, journal) = setup();

        let err = services
            .customers
            .change_address(&CustomerId::new("456ABC"), address(2))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Customer not found");
        assert!(journal.lines().is_empty());
    }

    #[tokio::test]
    async fn activate_requires_address() {
        let (services, _, _) = setup();
        let id = CustomerId::new("123");
        services
            .customers
            .register(id.clone(), "Customer 1", None)
            .await
            .unwrap();

        let err = services.customers.activate(&id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::AddressRequiredToActivate)
        ));

        services
            .customers
            .change_address(&id, address(1))
            .await
            .unwrap();
        assert!(services.customers.activate(&id).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn change_address_that_writes_nothing_is_not_announced() {
        let journal = Arc::new(Journal::default());
        let mut repositories = Repositories::in_memory();
        repositories.customers = Arc::new(VanishingCustomers(InMemoryCustomerRepository::new()));
        let services = Services::new(repositories, Arc::new(journal_dispatcher(&journal)));
        let id = CustomerId::new("123");
        services
            .customers
            .register(id.clone(), "Customer 1", Some(address(1)))
            .await
            .unwrap();

        let err = services
            .customers
            .change_address(&id, address(2))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            journal.lines(),
            vec!["created 123 at Street 1, 1, Zipcode 1, City 1"]
        );
        assert!(services.customers.activate(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn handler_failure_surfaces_after_persisting() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(CustomerCreatedEvent::EVENT_TYPE, Arc::new(FailingHandler));
        let repositories = Repositories::in_memory();
        let services = Services::new(repositories.clone(), Arc::new(dispatcher));
        let id = CustomerId::new("123");

        let err = services
            .customers
            .register(id.clone(), "Customer 1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Dispatch(_)));
        assert!(err.to_string().contains("smtp down"));
        assert!(repositories.customers.find(&id).await.is_ok());
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn create_product_notifies() {
        let (services, _, journal) = setup();

        services
            .products
            .create(ProductId::new("p1"), "Product 1", Money::from_units(10))
            .await
            .unwrap();

        assert_eq!(journal.lines(), vec!["product Product 1"]);
        assert_eq!(services.products.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let (services, _, journal) = setup();

        let err = services
            .products
            .create(ProductId::new("p1"), "Product 1", Money::from_cents(-1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::NegativePrice)));
        assert!(journal.lines().is_empty());
    }
}

mod orders {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> OrderItem {
        OrderItem::new(id, "Item", Money::from_units(price), "p1", quantity).unwrap()
    }

    #[tokio::test]
    async fn place_order_stores_order_and_rewards_customer() {
        let (services, repositories, _) = setup();
        let id = CustomerId::new("c1");
        services
            .customers
            .register(id.clone(), "Customer 1", Some(address(1)))
            .await
            .unwrap();

        let order = services
            .orders
            .place(&id, vec![item("i1", 10, 1), item("i2", 20, 2)])
            .await
            .unwrap();

        assert_eq!(order.total(), Money::from_units(50));
        assert_eq!(repositories.orders.find(order.id()).await.unwrap(), order);
        let customer = repositories.customers.find(&id).await.unwrap();
        assert_eq!(customer.reward_points(), 25);
    }

    #[tokio::test]
    async fn place_order_for_unknown_customer_fails() {
        let (services, repositories, _) = setup();

        let err = services
            .orders
            .place(&CustomerId::new("nobody"), vec![item("i1", 10, 1)])
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(repositories.orders.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_order_is_rejected() {
        let (services, _, _) = setup();
        let id = CustomerId::new("c1");
        services
            .customers
            .register(id.clone(), "Customer 1", None)
            .await
            .unwrap();

        let err = services.orders.place(&id, vec![]).await.unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::ItemsRequired)));
    }
}
