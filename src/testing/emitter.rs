//! Synchronous event emitter used by test cases to observe emissions.

use std::fmt;

use serde_json::Value;

/// Handle returned by [`Emitter::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One emitted event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub data: Value,
}

type Handler = Box<dyn FnMut(&Event)>;

struct Subscription {
    id: SubscriptionId,
    event_type: String,
    handler: Handler,
}

/// Dispatches events to handlers subscribed to an exact event type.
///
/// Handlers run synchronously, in subscription order, during [`Emitter::emit`].
#[derive(Default)]
pub struct Emitter {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event_type: impl Into<String>, handler: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            event_type: event_type.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Emit an event and return how many handlers saw it.
    pub fn emit(&mut self, event_type: &str, data: Value) -> usize {
        let event = Event {
            event_type: event_type.to_string(),
            data,
        };
        let mut notified = 0;
        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|subscription| subscription.event_type == event_type)
        {
            (subscription.handler)(&event);
            notified += 1;
        }
        tracing::trace!(event_type, notified, "emitted");
        notified
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.event_type == event_type)
            .count()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_emit_reaches_only_matching_handlers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();

        let first = seen.clone();
        emitter.on("a", move |event| first.borrow_mut().push(format!("1:{}", event.data)));
        let second = seen.clone();
        emitter.on("a", move |event| second.borrow_mut().push(format!("2:{}", event.data)));
        let other = seen.clone();
        emitter.on("b", move |_| other.borrow_mut().push("b".to_string()));

        assert_eq!(emitter.emit("a", json!(7)), 2);
        assert_eq!(*seen.borrow(), vec!["1:7", "2:7"]);
    }

    #[test]
    fn test_off_removes_subscription() {
        let mut emitter = Emitter::new();
        let id = emitter.on("a", |_| {});
        assert_eq!(emitter.listener_count("a"), 1);
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        assert_eq!(emitter.emit("a", Value::Null), 0);
    }
}
