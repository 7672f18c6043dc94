//! Log handlers for customer events.

use super::{CustomerChangedAddressEvent, CustomerCreatedEvent};
use crate::event::{EventHandler, HandlerError};

/// First log line emitted when a customer is created.
#[derive(Debug, Default)]
pub struct FirstCustomerCreatedLogHandler;

impl FirstCustomerCreatedLogHandler {
    pub fn message(&self, _event: &CustomerCreatedEvent) -> String {
        "This is the first log of the event: CustomerCreated".to_string()
    }
}

impl EventHandler for FirstCustomerCreatedLogHandler {
    type Event = CustomerCreatedEvent;

    fn handle(&self, event: &CustomerCreatedEvent) -> Result<(), HandlerError> {
        tracing::info!(customer_id = %event.id(), "{}", self.message(event));
        Ok(())
    }
}

/// Second log line emitted when a customer is created.
#[derive(Debug, Default)]
pub struct SecondCustomerCreatedLogHandler;

impl SecondCustomerCreatedLogHandler {
    pub fn message(&self, _event: &CustomerCreatedEvent) -> String {
        "This is the second log of the event: CustomerCreated".to_string()
    }
}

impl EventHandler for SecondCustomerCreatedLogHandler {
    type Event = CustomerCreatedEvent;

    fn handle(&self, event: &CustomerCreatedEvent) -> Result<(), HandlerError> {
        tracing::info!(customer_id = %event.id(), "{}", self.message(event));
        Ok(())
    }
}

/// Logs the new address of a customer.
#[derive(Debug, Default)]
pub struct CustomerAddressChangedLogHandler;

impl CustomerAddressChangedLogHandler {
    pub fn message(&self, event: &CustomerChangedAddressEvent) -> String {
        format!(
            "Customer address: {}, {} changed to: {}",
            event.id(),
            event.name(),
            event.address()
        )
    }
}

impl EventHandler for CustomerAddressChangedLogHandler {
    type Event = CustomerChangedAddressEvent;

    fn handle(&self, event: &CustomerChangedAddressEvent) -> Result<(), HandlerError> {
        tracing::info!(customer_id = %event.id(), "{}", self.message(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerEventData;

    fn data() -> CustomerEventData {
        CustomerEventData::new("123", "Customer 1", "Street 2, 2, Zipcode 2, City 2")
    }

    #[test]
    fn address_changed_message() {
        let event = CustomerChangedAddressEvent::new(data());
        assert_eq!(
            CustomerAddressChangedLogHandler.message(&event),
            "Customer address: 123, Customer 1 changed to: Street 2, 2, Zipcode 2, City 2"
        );
        assert!(CustomerAddressChangedLogHandler.handle(&event).is_ok());
    }

    #[test]
    fn created_messages() {
        let event = CustomerCreatedEvent::new(data());
        assert!(FirstCustomerCreatedLogHandler.message(&event).contains("first"));
        assert!(SecondCustomerCreatedLogHandler.message(&event).contains("second"));
        assert!(FirstCustomerCreatedLogHandler.handle(&event).is_ok());
        assert!(SecondCustomerCreatedLogHandler.handle(&event).is_ok());
    }
}
