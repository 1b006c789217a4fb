//! Property-changed notifications for the host's data-binding layer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Raised once per successful attribute mutation, naming the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChanged {
    pub control_id: String,
    pub property: &'static str,
}

/// Token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&PropertyChanged)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
    queued: VecDeque<PropertyChanged>,
    removed: Vec<SubscriptionId>,
    dispatching: bool,
}

/// Single-threaded notification bus shared between controls and observers.
///
/// Clones share the same registry. Callbacks run synchronously on the
/// raising call and may call back into the bus: a subscriber added during
/// dispatch only sees later events, a subscriber removed during dispatch
/// receives no further events, and an event raised from a callback is
/// delivered after the one in flight.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&PropertyChanged) + 'static) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = self.registry.borrow_mut();
        registry.subscribers.retain(|(existing, _)| *existing != id);
        // The subscriber may be in the list taken out for dispatch.
        if registry.dispatching {
            registry.removed.push(id);
        }
    }

    pub fn raise(&self, event: PropertyChanged) {
        {
            let mut registry = self.registry.borrow_mut();
            registry.queued.push_back(event);
            if registry.dispatching {
                return;
            }
            registry.dispatching = true;
        }

        while let Some(event) = self.next_queued() {
            // Take the subscriber list out of the cell so callbacks can
            // subscribe, unsubscribe and raise without a borrow conflict.
            let mut dispatched = std::mem::take(&mut self.registry.borrow_mut().subscribers);
            for (id, callback) in dispatched.iter_mut() {
                if self.registry.borrow().removed.contains(id) {
                    continue;
                }
                callback(&event);
            }

            let mut registry = self.registry.borrow_mut();
            // Subscribers added during dispatch landed in the cell.
            let added = std::mem::take(&mut registry.subscribers);
            dispatched.extend(added);
            let removed = std::mem::take(&mut registry.removed);
            dispatched.retain(|(id, _)| !removed.contains(id));
            registry.subscribers = dispatched;
        }

        self.registry.borrow_mut().dispatching = false;
    }

    fn next_queued(&self) -> Option<PropertyChanged> {
        self.registry.borrow_mut().queued.pop_front()
    }
}
