//! Update fan-out to presentation subscribers.

use std::panic::{self, AssertUnwindSafe};

use crate::StatusEvent;

type Handler = Box<dyn FnMut(&StatusEvent)>;

/// Ordered registry of update subscribers
#[derive(Default)]
pub struct UpdateBus {
    handlers: Vec<Handler>,
}

impl UpdateBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; delivery follows registration order.
    pub fn subscribe(&mut self, handler: impl FnMut(&StatusEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver one event to every subscriber. A panicking subscriber is
    /// logged and skipped; the rest still receive the event.
    pub fn publish(&mut self, event: &StatusEvent) {
        for (index, handler) in self.handlers.iter_mut().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                tracing::warn!("update subscriber {} panicked", index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn active(speed: f64) -> StatusEvent {
        StatusEvent::Active {
            speed,
            accuracy: 5.0,
            heading: None,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = UpdateBus::new();

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.subscribe(move |_| seen.borrow_mut().push(tag));
        }

        bus.publish(&active(1.0));
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = UpdateBus::new();

        {
            let seen = seen.clone();
            bus.subscribe(move |_| seen.borrow_mut().push("before"));
        }
        bus.subscribe(|_| panic!("subscriber bug"));
        {
            let seen = seen.clone();
            bus.subscribe(move |_| seen.borrow_mut().push("after"));
        }

        bus.publish(&active(1.0));
        assert_eq!(*seen.borrow(), vec!["before", "after"]);

        // The bus stays usable, faulty subscriber included
        bus.publish(&active(2.0));
        assert_eq!(*seen.borrow(), vec!["before", "after", "before", "after"]);
    }

    #[test]
    fn test_publish_with_no_subscribers() {
        let mut bus = UpdateBus::new();
        assert!(bus.is_empty());
        bus.publish(&active(1.0));
    }
}
