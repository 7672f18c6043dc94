//! Application entry point.
//!
//! Wires the dispatcher, repositories and services together and runs a
//! short walkthrough: register a customer, move it, add a product and place
//! an order.

use std::sync::Arc;

use app::{AppError, Config, LogFormat, Repositories, Services};
use domain::{Address, CustomerId, Money, OrderItem, OrderItemId, ProductId};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run(services: &Services) -> Result<(), AppError> {
    let customer_id = CustomerId::generate();
    services
        .customers
        .register(
            customer_id.clone(),
            "Customer 1",
            Some(Address::new("Street 1", 1, "Zipcode 1", "City 1")?),
        )
        .await?;

    services
        .customers
        .change_address(&customer_id, Address::new("Street 2", 2, "Zipcode 2", "City 2")?)
        .await?;
    services.customers.activate(&customer_id).await?;

    let product = services
        .products
        .create(ProductId::generate(), "Product 1", Money::from_units(10))
        .await?;

    let item = OrderItem::new(
        OrderItemId::generate(),
        product.name(),
        product.price(),
        product.id().clone(),
        2,
    )?;
    services.orders.place(&customer_id, vec![item]).await?;

    let customer = services.customers.find(&customer_id).await?;
    tracing::info!(
        customer_id = %customer.id(),
        reward_points = customer.reward_points(),
        active = customer.is_active(),
        "walkthrough finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Select repositories
    let repositories = Repositories::from_config(&config)
        .await
        .expect("failed to initialize repositories");

    // 3. Build the dispatcher once and share it with the services
    let dispatcher = Arc::new(app::default_dispatcher());
    let services = Services::new(repositories, dispatcher);

    if let Err(err) = run(&services).await {
        tracing::error!(error = %err, "walkthrough failed");
        std::process::exit(1);
    }
}
