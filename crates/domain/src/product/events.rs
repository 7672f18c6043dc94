//! Product domain events and handlers.

use std::any::Any;

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::event::{DomainEvent, EventHandler, HandlerError};

/// Payload of [`ProductCreatedEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEventData {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
}

impl From<&Product> for ProductEventData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().clone(),
            name: product.name().to_string(),
            price: product.price(),
        }
    }
}

/// A product was created.
#[derive(Debug, Clone)]
pub struct ProductCreatedEvent {
    occurred_at: DateTime<Utc>,
    data: ProductEventData,
}

impl ProductCreatedEvent {
    pub const EVENT_TYPE: &'static str = "ProductCreatedEvent";

    pub fn new(data: ProductEventData) -> Self {
        Self {
            occurred_at: Utc::now(),
            data,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn price(&self) -> Money {
        self.data.price
    }
}

impl DomainEvent for ProductCreatedEvent {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.data.id,
            "name": self.data.name,
            "price": self.data.price,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Announces newly created products by email. The mail transport is a log line.
#[derive(Debug, Default)]
pub struct SendEmailWhenProductIsCreatedHandler;

impl SendEmailWhenProductIsCreatedHandler {
    pub fn message(&self, event: &ProductCreatedEvent) -> String {
        format!(
            "Sending email: product {} ({}) created at {}",
            event.name(),
            event.id(),
            event.price()
        )
    }
}

impl EventHandler for SendEmailWhenProductIsCreatedHandler {
    type Event = ProductCreatedEvent;

    fn handle(&self, event: &ProductCreatedEvent) -> Result<(), HandlerError> {
        tracing::info!(product_id = %event.id(), "{}", self.message(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_from_product() {
        let product = Product::new("p1", "Product 1", Money::from_units(10)).unwrap();
        let event = ProductCreatedEvent::new(ProductEventData::from(&product));

        assert_eq!(event.event_type(), "ProductCreatedEvent");
        assert_eq!(event.id().as_str(), "p1");
        assert_eq!(
            event.payload(),
            serde_json::json!({"id": "p1", "name": "Product 1", "price": 1000})
        );
    }

    #[test]
    fn email_message() {
        let product = Product::new("p1", "Product 1", Money::from_units(10)).unwrap();
        let event = ProductCreatedEvent::new(ProductEventData::from(&product));

        assert_eq!(
            SendEmailWhenProductIsCreatedHandler.message(&event),
            "Sending email: product Product 1 (p1) created at $10.00"
        );
        assert!(SendEmailWhenProductIsCreatedHandler.handle(&event).is_ok());
    }
}
