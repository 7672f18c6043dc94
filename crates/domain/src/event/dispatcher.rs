//! Synchronous, process-local event dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DispatchError, DomainEvent, EventHandler};

type Invoke = dyn Fn(&dyn DomainEvent) -> Result<(), DispatchError> + Send + Sync;

/// A handler registration held by the dispatcher.
///
/// Registrations remember the address of the `Arc` they were created from,
/// so two instances of the same handler type are distinct registrants.
pub struct RegisteredHandler {
    key: usize,
    name: &'static str,
    invoke: Box<Invoke>,
}

impl RegisteredHandler {
    fn new<H: EventHandler + 'static>(handler: Arc<H>) -> Self {
        let key = handler_key(&handler);
        let name = std::any::type_name::<H>();

        let invoke = move |event: &dyn DomainEvent| {
            let typed = event
                .as_any()
                .downcast_ref::<H::Event>()
                .ok_or_else(|| DispatchError::UnexpectedEvent {
                    event_type: event.event_type(),
                    handler: name,
                    expected: std::any::type_name::<H::Event>(),
                })?;

            handler
                .handle(typed)
                .map_err(|source| DispatchError::Handler {
                    event_type: event.event_type(),
                    handler: name,
                    source,
                })
        };

        Self {
            key,
            name,
            invoke: Box::new(invoke),
        }
    }

    /// Returns the handler's type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this registration was created from `handler`.
    pub fn is<H: EventHandler + 'static>(&self, handler: &Arc<H>) -> bool {
        self.key == handler_key(handler)
    }
}

impl std::fmt::Debug for RegisteredHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn handler_key<H>(handler: &Arc<H>) -> usize {
    Arc::as_ptr(handler) as usize
}

/// Registry mapping event type identifiers to ordered handler lists.
///
/// - `register` appends, so the same instance registered twice runs twice
/// - `notify` runs handlers in registration order on the calling thread
/// - the first handler error stops delivery and is returned to the caller
///
/// Mutation requires `&mut self`; build the dispatcher at startup and share it
/// behind an `Arc` afterwards.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Vec<RegisteredHandler>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `event_type`.
    pub fn register<H: EventHandler + 'static>(
        &mut self,
        event_type: impl Into<String>,
        handler: Arc<H>,
    ) {
        let event_type = event_type.into();
        let registration = RegisteredHandler::new(handler);
        tracing::debug!(%event_type, handler = registration.name, "registering event handler");

        self.handlers
            .entry(event_type)
            .or_default()
            .push(registration);
    }

    /// Removes every registration of `handler` for `event_type`.
    ///
    /// Unknown event types and handlers are ignored.
    pub fn unregister<H: EventHandler + 'static>(&mut self, event_type: &str, handler: &Arc<H>) {
        if let Some(list) = self.handlers.get_mut(event_type) {
            list.retain(|registered| !registered.is(handler));
        }
    }

    /// Removes every registration for every event type.
    pub fn unregister_all(&mut self) {
        self.handlers.clear();
    }

    /// Returns the handlers registered for `event_type`, in registration order.
    pub fn event_handlers(&self, event_type: &str) -> &[RegisteredHandler] {
        self.handlers
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Delivers `event` to every handler registered for its type.
    ///
    /// Handlers run synchronously in registration order. The first failure is
    /// returned and the handlers after it are not invoked.
    #[tracing::instrument(skip_all, fields(event_type = event.event_type()))]
    pub fn notify(&self, event: &dyn DomainEvent) -> Result<(), DispatchError> {
        let handlers = self.event_handlers(event.event_type());
        metrics::counter!("domain_events_dispatched", "event_type" => event.event_type())
            .increment(1);

        for registered in handlers {
            tracing::trace!(handler = registered.name, "invoking event handler");
            (registered.invoke)(event)?;
            metrics::counter!("domain_event_handlers_invoked").increment(1);
        }

        Ok(())
    }
}
