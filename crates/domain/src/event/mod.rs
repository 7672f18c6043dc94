//! Domain event and handler contracts.

mod dispatcher;

use std::any::Any;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use dispatcher::{EventDispatcher, RegisteredHandler};

/// Trait for domain events.
///
/// Domain events are immutable records of a state change. The timestamp is
/// fixed when the event is constructed and the payload is never mutated.
pub trait DomainEvent: Any + Send + Sync + std::fmt::Debug {
    /// Returns the stable identifier used to route this event to handlers.
    fn event_type(&self) -> &'static str;

    /// Returns when the event was constructed.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Returns the event payload as a JSON object.
    fn payload(&self) -> serde_json::Value;

    /// Returns the event as `Any` so the dispatcher can hand handlers their
    /// concrete event type.
    fn as_any(&self) -> &dyn Any;
}

/// A unit of reaction to one concrete event type.
pub trait EventHandler: Send + Sync {
    /// The event type this handler accepts.
    type Event: DomainEvent;

    /// Reacts to the event.
    fn handle(&self, event: &Self::Event) -> Result<(), HandlerError>;
}

/// Error returned by an event handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler failed with a message.
    #[error("{0}")]
    Failed(String),

    /// The handler failed with an underlying error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Creates a handler error from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// Errors returned by [`EventDispatcher::notify`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A handler failed; remaining handlers were not invoked.
    #[error("handler {handler} failed on {event_type}: {source}")]
    Handler {
        event_type: &'static str,
        handler: &'static str,
        #[source]
        source: HandlerError,
    },

    /// A handler was registered under a type whose events it cannot accept.
    #[error("handler {handler} registered for {event_type} expects {expected}")]
    UnexpectedEvent {
        event_type: &'static str,
        handler: &'static str,
        expected: &'static str,
    },
}
