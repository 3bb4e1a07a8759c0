//! Page event registration abstract Trait

use std::sync::{Arc, PoisonError, RwLock};

use crate::types::PageEvent;

/// Whether the default action of an event (submit, navigation) should still happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Continue,
    PreventDefault,
}

impl EventDisposition {
    pub fn is_prevented(self) -> bool {
        self == Self::PreventDefault
    }
}

/// A registered page event handler
pub trait PageEventHandler: Send + Sync {
    /// Handle `event`
    ///
    /// # Arguments
    /// * `event` - The dispatched event
    /// * `default_prevented` - Whether an earlier handler already prevented the default action
    fn handle(&self, event: &PageEvent, default_prevented: bool) -> EventDisposition;
}

/// Event source Trait
///
/// Handlers are invoked in registration order.
pub trait EventSource: Send + Sync {
    fn register(&self, handler: Arc<dyn PageEventHandler>);
}

/// In-memory event source
///
/// Default implementation, used by headless hosts and tests. The host calls
/// `dispatch` for every event it observes.
#[derive(Default)]
pub struct InMemoryEventSource {
    handlers: RwLock<Vec<Arc<dyn PageEventHandler>>>,
}

impl InMemoryEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every handler for `event` and report the final disposition
    pub fn dispatch(&self, event: &PageEvent) -> EventDisposition {
        // Handlers may register further handlers; don't hold the lock while calling them.
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut prevented = false;
        for handler in handlers {
            if handler.handle(event, prevented).is_prevented() {
                prevented = true;
            }
        }

        log::trace!("Dispatched {} (prevented: {prevented})", event.name());
        if prevented {
            EventDisposition::PreventDefault
        } else {
            EventDisposition::Continue
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl EventSource for InMemoryEventSource {
    fn register(&self, handler: Arc<dyn PageEventHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    struct Preventer;

    impl PageEventHandler for Preventer {
        fn handle(&self, _event: &PageEvent, _default_prevented: bool) -> EventDisposition {
            EventDisposition::PreventDefault
        }
    }

    #[derive(Default)]
    struct Recorder {
        saw_prevented: AtomicBool,
    }

    impl PageEventHandler for Recorder {
        fn handle(&self, _event: &PageEvent, default_prevented: bool) -> EventDisposition {
            self.saw_prevented.store(default_prevented, Ordering::SeqCst);
            EventDisposition::Continue
        }
    }

    #[test]
    fn later_handlers_see_prevented_flag() {
        let source = InMemoryEventSource::new();
        let recorder = Arc::new(Recorder::default());
        source.register(Arc::new(Preventer));
        source.register(recorder.clone());

        let disposition = source.dispatch(&PageEvent::Load);

        assert!(disposition.is_prevented());
        assert!(recorder.saw_prevented.load(Ordering::SeqCst));
    }

    #[test]
    fn no_handlers_continue() {
        let source = InMemoryEventSource::new();
        assert_eq!(source.dispatch(&PageEvent::Load), EventDisposition::Continue);
        assert_eq!(source.handler_count(), 0);
    }
}
