//! Synchronous event bus with ordered, fallible handlers.

use crate::topic::{Topic, TopicPattern};

/// Boxed error returned by a handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for event handlers.
pub type HandlerResult = Result<(), BoxError>;

/// An event handler failed during [`EventBus::emit`].
#[derive(Debug, thiserror::Error)]
#[error("handler for \"{topic}\" failed")]
pub struct HandlerError {
    topic: String,
    #[source]
    source: BoxError,
}

impl HandlerError {
    /// The topic whose dispatch failed.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

struct Subscription<P> {
    pattern: TopicPattern,
    handler: Box<dyn FnMut(&Topic, &mut P) -> HandlerResult>,
}

/// A synchronous publish/subscribe registry over hierarchical topics.
///
/// Handlers are plain closures invoked in registration order; emission is a
/// sequence of direct calls with no queuing or parallelism. The payload type
/// `P` is chosen by the instantiating layer, so one bus carries document
/// sections while another carries doc-build events.
pub struct EventBus<P> {
    subscriptions: Vec<Subscription<P>>,
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl<P> EventBus<P> {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe a handler to every topic matching `pattern`.
    pub fn register<F>(&mut self, pattern: impl Into<TopicPattern>, handler: F)
    where
        F: FnMut(&Topic, &mut P) -> HandlerResult + 'static,
    {
        self.subscriptions.push(Subscription {
            pattern: pattern.into(),
            handler: Box::new(handler),
        });
    }

    /// Dispatch `topic` to every matching handler, in registration order.
    ///
    /// Returns the number of handlers invoked. The first handler error aborts
    /// the dispatch; remaining handlers do not run.
    pub fn emit(&mut self, topic: &Topic, payload: &mut P) -> Result<usize, HandlerError> {
        let mut dispatched = 0;
        for subscription in &mut self.subscriptions {
            if subscription.pattern.matches(topic) {
                (subscription.handler)(topic, payload).map_err(|source| HandlerError {
                    topic: topic.as_str().to_owned(),
                    source,
                })?;
                dispatched += 1;
            }
        }
        Ok(dispatched)
    }

    /// Number of registered subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the bus has no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}
