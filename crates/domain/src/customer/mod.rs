//! Customer aggregate, its events and handlers.

mod address;
mod entity;
mod events;
mod handlers;

pub use address::Address;
pub use entity::Customer;
pub use events::{CustomerChangedAddressEvent, CustomerCreatedEvent, CustomerEventData};
pub use handlers::{
    CustomerAddressChangedLogHandler, FirstCustomerCreatedLogHandler,
    SecondCustomerCreatedLogHandler,
};
