use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use domain::{
    Address, Customer, CustomerId, Money, Order, OrderId, OrderItem, Product, ProductId,
    Repository, RepositoryError, RepositoryResult,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

/// Opens a connection pool to `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Maps an insert failure, turning unique violations into `DuplicateKey`.
fn insert_error(err: sqlx::Error, aggregate: &'static str, id: &impl Display) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::DuplicateKey {
            aggregate,
            id: id.to_string(),
        };
    }
    RepositoryError::storage(err)
}

fn decode_u32(value: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn record(op: &'static str, aggregate: &'static str) {
    metrics::counter!("repository_operations", "op" => op, "aggregate" => aggregate).increment(1);
}

/// PostgreSQL-backed customer repository.
///
/// The address is flattened into nullable columns; a row with any of them
/// null is read back as a customer without address.
#[derive(Debug, Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Creates a new `PgCustomerRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_customer(row: &PgRow) -> Result<Customer, sqlx::Error> {
        let street: Option<String> = row.try_get("street")?;
        let number: Option<i64> = row.try_get("number")?;
        let zipcode: Option<String> = row.try_get("zipcode")?;
        let city: Option<String> = row.try_get("city")?;

        let address = match (street, number, zipcode, city) {
            (Some(street), Some(number), Some(zipcode), Some(city)) => {
                Some(Address::restore(street, decode_u32(number)?, zipcode, city))
            }
            _ => None,
        };

        Ok(Customer::restore(
            CustomerId::new(row.try_get::<String, _>("id")?),
            row.try_get("name")?,
            address,
            row.try_get("active")?,
            decode_u32(row.try_get("reward_points")?)?,
        ))
    }
}

#[async_trait]
impl Repository<Customer> for PgCustomerRepository {
    #[tracing::instrument(skip_all, fields(id = %entity.id()))]
    async fn create(&self, entity: &Customer) -> RepositoryResult<()> {
        let address = entity.address();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, active, reward_points, street, number, zipcode, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entity.id().as_str())
        .bind(entity.name())
        .bind(entity.is_active())
        .bind(i64::from(entity.reward_points()))
        .bind(address.map(Address::street))
        .bind(address.map(|a| i64::from(a.number())))
        .bind(address.map(Address::zip))
        .bind(address.map(Address::city))
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "Customer", entity.id()))?;

        record("create", "Customer");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(id = %entity.id()))]
    async fn update(&self, entity: &Customer) -> RepositoryResult<u64> {
        let address = entity.address();

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, active = $3, reward_points = $4,
                street = $5, number = $6, zipcode = $7, city = $8
            WHERE id = $1
            "#,
        )
        .bind(entity.id().as_str())
        .bind(entity.name())
        .bind(entity.is_active())
        .bind(i64::from(entity.reward_points()))
        .bind(address.map(Address::street))
        .bind(address.map(|a| i64::from(a.number())))
        .bind(address.map(Address::zip))
        .bind(address.map(Address::city))
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        record("update", "Customer");
        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, fields(%id))]
    async fn find(&self, id: &CustomerId) -> RepositoryResult<Customer> {
        let row = sqlx::query(
            r#"
            SELECT id, name, active, reward_points, street, number, zipcode, city
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::storage)?
        .ok_or(RepositoryError::NotFound {
            aggregate: "Customer",
        })?;

        record("find", "Customer");
        Self::row_to_customer(&row).map_err(RepositoryError::storage)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, active, reward_points, street, number, zipcode, city
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        record("find_all", "Customer");
        rows.iter()
            .map(Self::row_to_customer)
            .collect::<Result<_, _>>()
            .map_err(RepositoryError::storage)
    }
}

/// PostgreSQL-backed product repository. Prices are stored in cents.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Creates a new `PgProductRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &PgRow) -> Result<Product, sqlx::Error> {
        Ok(Product::restore(
            ProductId::new(row.try_get::<String, _>("id")?),
            row.try_get("name")?,
            Money::from_cents(row.try_get("price")?),
        ))
    }
}

#[async_trait]
impl Repository<Product> for PgProductRepository {
    #[tracing::instrument(skip_all, fields(id = %entity.id()))]
    async fn create(&self, entity: &Product) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO products (id, name, price) VALUES ($1, $2, $3)")
            .bind(entity.id().as_str())
            .bind(entity.name())
            .bind(entity.price().cents())
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(e, "Product", entity.id()))?;

        record("create", "Product");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(id = %entity.id()))]
    async fn update(&self, entity: &Product) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE products SET name = $2, price = $3 WHERE id = $1")
            .bind(entity.id().as_str())
            .bind(entity.name())
            .bind(entity.price().cents())
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        record("update", "Product");
        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip_all, fields(%id))]
    async fn find(&self, id: &ProductId) -> RepositoryResult<Product> {
        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::storage)?
            .ok_or(RepositoryError::NotFound {
                aggregate: "Product",
            })?;

        record("find", "Product");
        Self::row_to_product(&row).map_err(RepositoryError::storage)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, price FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        record("find_all", "Product");
        rows.iter()
            .map(Self::row_to_product)
            .collect::<Result<_, _>>()
            .map_err(RepositoryError::storage)
    }
}

/// PostgreSQL-backed order repository.
///
/// The computed total is written to `orders.total` on create and update.
/// Items live in `order_items`, keyed by `(order_id, id)`, with a `position`
/// column preserving order.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a new `PgOrderRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), sqlx::Error> {
        for (position, item) in order.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, name, price, quantity, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id().as_str())
            .bind(order.id().as_str())
            .bind(item.product_id().as_str())
            .bind(item.name())
            .bind(item.price().cents())
            .bind(i64::from(item.quantity()))
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    fn row_to_item(row: &PgRow) -> Result<OrderItem, sqlx::Error> {
        Ok(OrderItem::restore(
            row.try_get::<String, _>("id")?.into(),
            row.try_get("name")?,
            Money::from_cents(row.try_get("price")?),
            ProductId::new(row.try_get::<String, _>("product_id")?),
            decode_u32(row.try_get("quantity")?)?,
        ))
    }

    async fn load_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, product_id, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_item).collect()
    }
}

#[async_trait]
impl Repository<Order> for PgOrderRepository {
    #[tracing::instrument(skip_all, fields(id = %entity.id(), customer_id = %entity.customer_id()))]
    async fn create(&self, entity: &Order) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::storage)?;

        sqlx::query("INSERT INTO orders (id, customer_id, total) VALUES ($1, $2, $3)")
            .bind(entity.id().as_str())
            .bind(entity.customer_id().as_str())
            .bind(entity.total().cents())
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error(e, "Order", entity.id()))?;

        Self::insert_items(&mut tx, entity)
            .await
            .map_err(RepositoryError::storage)?;

        tx.commit().await.map_err(RepositoryError::storage)?;
        record("create", "Order");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(id = %entity.id(), customer_id = %entity.customer_id()))]
    async fn update(&self, entity: &Order) -> RepositoryResult<u64> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::storage)?;

        let affected =
            sqlx::query("UPDATE orders SET total = $3 WHERE id = $1 AND customer_id = $2")
                .bind(entity.id().as_str())
                .bind(entity.customer_id().as_str())
                .bind(entity.total().cents())
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::storage)?
                .rows_affected();

        if affected > 0 {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(entity.id().as_str())
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::storage)?;

            Self::insert_items(&mut tx, entity)
                .await
                .map_err(RepositoryError::storage)?;
        }

        tx.commit().await.map_err(RepositoryError::storage)?;
        record("update", "Order");
        Ok(affected)
    }

    #[tracing::instrument(skip_all, fields(%id))]
    async fn find(&self, id: &OrderId) -> RepositoryResult<Order> {
        let row = sqlx::query("SELECT id, customer_id FROM orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::storage)?
            .ok_or(RepositoryError::NotFound { aggregate: "Order" })?;

        let customer_id: String = row.try_get("customer_id").map_err(RepositoryError::storage)?;
        let items = self.load_items(id).await.map_err(RepositoryError::storage)?;

        record("find", "Order");
        Ok(Order::restore(id.clone(), CustomerId::new(customer_id), items))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Order>> {
        let order_rows = sqlx::query("SELECT id, customer_id FROM orders ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, order_id, name, price, product_id, quantity
            FROM order_items
            ORDER BY order_id ASC, position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        let mut items: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let order_id: String = row.try_get("order_id").map_err(RepositoryError::storage)?;
            let item = Self::row_to_item(row).map_err(RepositoryError::storage)?;
            items.entry(order_id).or_default().push(item);
        }

        record("find_all", "Order");
        order_rows
            .iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                let customer_id: String = row.try_get("customer_id")?;
                let order_items = items.remove(&id).unwrap_or_default();
                Ok(Order::restore(
                    OrderId::new(id),
                    CustomerId::new(customer_id),
                    order_items,
                ))
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(RepositoryError::storage)
    }
}
