//! Customer domain events.

use std::any::Any;

use chrono::{DateTime, Utc};
use common::CustomerId;
use serde::{Deserialize, Serialize};

use super::Customer;
use crate::event::DomainEvent;

/// Payload shared by customer events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerEventData {
    pub id: CustomerId,
    pub name: String,
    /// Display form of the address, e.g. `"Street 1, 1, Zipcode 1, City 1"`.
    pub address: String,
}

impl CustomerEventData {
    pub fn new(
        id: impl Into<CustomerId>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }

    /// Captures the current state of `customer`. A missing address becomes an
    /// empty string.
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id().clone(),
            name: customer.name().to_string(),
            address: customer
                .address()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "address": self.address,
        })
    }
}

/// A customer was created.
#[derive(Debug, Clone)]
pub struct CustomerCreatedEvent {
    occurred_at: DateTime<Utc>,
    data: CustomerEventData,
}

impl CustomerCreatedEvent {
    pub const EVENT_TYPE: &'static str = "CustomerCreatedEvent";

    pub fn new(data: CustomerEventData) -> Self {
        Self {
            occurred_at: Utc::now(),
            data,
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn address(&self) -> &str {
        &self.data.address
    }
}

impl DomainEvent for CustomerCreatedEvent {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn payload(&self) -> serde_json::Value {
        self.data.to_json()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A customer's address was changed.
#[derive(Debug, Clone)]
pub struct CustomerChangedAddressEvent {
    occurred_at: DateTime<Utc>,
    data: CustomerEventData,
}

impl CustomerChangedAddressEvent {
    pub const EVENT_TYPE: &'static str = "CustomerChangedAddressEvent";

    pub fn new(data: CustomerEventData) -> Self {
        Self {
            occurred_at: Utc::now(),
            data,
        }
    }

    pub fn id(&self) -> &CustomerId {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn address(&self) -> &str {
        &self.data.address
    }
}

impl DomainEvent for CustomerChangedAddressEvent {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn payload(&self) -> serde_json::Value {
        self.data.to_json()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
