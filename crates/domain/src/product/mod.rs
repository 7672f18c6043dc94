//! Product aggregate and its events.

mod entity;
mod events;

pub use entity::Product;
pub use events::{ProductCreatedEvent, ProductEventData, SendEmailWhenProductIsCreatedHandler};
