//! Outbox of `ChatEvent`s raised by a `ChatSession`.
//!
//! Hydration, the send pipeline, reset and expansion changes push onto it.
//! Nothing is delivered eagerly: the host polls `ChatHandle::drainEvents`
//! after each awaited call (or on its own render tick) and re-renders from
//! what it gets.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use chat_types::event::ChatEvent;

/// Cloning shares the queue, so a host can keep a handle while the session
/// owns another.
#[derive(Clone)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: ChatEvent) {
        log::trace!("[chat session] event {:?}", event);
        self.queue.borrow_mut().push_back(event);
    }

    /// Everything raised since the previous drain, oldest first.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
