//! Application services.
//!
//! Each service mutates an entity, persists it through its repository and
//! then notifies the shared dispatcher. Nothing is dispatched when
//! validation or persistence fails.

use std::sync::Arc;

use domain::{
    Address, Customer, CustomerChangedAddressEvent, CustomerCreatedEvent, CustomerEventData,
    CustomerId, CustomerRepository, EventDispatcher, Money, Order, OrderId, OrderItem,
    OrderRepository, Product, ProductCreatedEvent, ProductEventData, ProductId,
    ProductRepository, Repository, RepositoryError,
};

use crate::error::AppError;

/// Registers customers and changes their addresses.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    dispatcher: Arc<EventDispatcher>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Creates and stores a customer, then emits `CustomerCreatedEvent`.
    #[tracing::instrument(skip_all, fields(customer_id = %id))]
    pub async fn register(
        &self,
        id: CustomerId,
        name: impl Into<String>,
        address: Option<Address>,
    ) -> Result<Customer, AppError> {
        let mut customer = Customer::new(id, name)?;
        if let Some(address) = address {
            customer.change_address(address);
        }

        self.repository.create(&customer).await?;

        let event = CustomerCreatedEvent::new(CustomerEventData::from_customer(&customer));
        self.dispatcher.notify(&event)?;

        tracing::debug!("customer registered");
        Ok(customer)
    }

    /// Moves an existing customer, then emits `CustomerChangedAddressEvent`.
    #[tracing::instrument(skip_all, fields(customer_id = %id))]
    pub async fn change_address(
        &self,
        id: &CustomerId,
        address: Address,
    ) -> Result<Customer, AppError> {
        let mut customer = self.repository.find(id).await?;
        customer.change_address(address);

        ensure_updated(self.repository.update(&customer).await?, "Customer")?;

        let event = CustomerChangedAddressEvent::new(CustomerEventData::from_customer(&customer));
        self.dispatcher.notify(&event)?;

        Ok(customer)
    }

    /// Activates an existing customer. Fails if it has no address.
    #[tracing::instrument(skip_all, fields(customer_id = %id))]
    pub async fn activate(&self, id: &CustomerId) -> Result<Customer, AppError> {
        let mut customer = self.repository.find(id).await?;
        customer.activate()?;
        ensure_updated(self.repository.update(&customer).await?, "Customer")?;
        Ok(customer)
    }

    pub async fn find(&self, id: &CustomerId) -> Result<Customer, AppError> {
        Ok(self.repository.find(id).await?)
    }
}

/// Creates products.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    dispatcher: Arc<EventDispatcher>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Creates and stores a product, then emits `ProductCreatedEvent`.
    #[tracing::instrument(skip_all, fields(product_id = %id, %price))]
    pub async fn create(
        &self,
        id: ProductId,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Product, AppError> {
        let product = Product::new(id, name, price)?;

        self.repository.create(&product).await?;

        let event = ProductCreatedEvent::new(ProductEventData::from(&product));
        self.dispatcher.notify(&event)?;

        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repository.find_all().await?)
    }
}

/// Places orders and rewards the ordering customer.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, customers: Arc<dyn CustomerRepository>) -> Self {
        Self { orders, customers }
    }

    /// Places an order for an existing customer.
    ///
    /// The customer earns one reward point per two whole currency units of
    /// the order total.
    #[tracing::instrument(skip_all, fields(%customer_id, items = items.len()))]
    pub async fn place(
        &self,
        customer_id: &CustomerId,
        items: Vec<OrderItem>,
    ) -> Result<Order, AppError> {
        let mut customer = self.customers.find(customer_id).await?;
        let order = Order::new(OrderId::generate(), customer_id.clone(), items)?;

        self.orders.create(&order).await?;

        customer.add_reward_points(reward_points(order.total()));
        ensure_updated(self.customers.update(&customer).await?, "Customer")?;

        tracing::info!(order_id = %order.id(), total = %order.total(), "order placed");
        Ok(order)
    }

    /// Sum of the totals of `orders`.
    pub fn total(orders: &[Order]) -> Money {
        orders.iter().map(Order::total).sum()
    }
}

/// Treats an update that matched no row as a missing aggregate.
fn ensure_updated(affected: u64, aggregate: &'static str) -> Result<(), AppError> {
    if affected == 0 {
        return Err(RepositoryError::NotFound { aggregate }.into());
    }
    Ok(())
}

fn reward_points(total: Money) -> u32 {
    u32::try_from(total.cents().max(0) / 200).unwrap_or(u32::MAX)
}
