// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};
use tracing::trace;

type Callback = Rc<dyn Fn()>;

/// The callbacks registered on a store and all of its views.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(u64, Callback)>>,
}

impl Subscribers {
    pub(crate) fn subscribe(self: &Rc<Self>, callback: impl Fn() + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let callback: Callback = Rc::new(callback);
        self.callbacks.borrow_mut().push((id, callback));
        trace!(id, "subscribed");
        Subscription {
            registry: Rc::downgrade(self),
            id,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Invokes every callback in registration order.
    ///
    /// Works on a copy of the list taken up front and holds no borrow while a callback runs,
    /// so callbacks may change the list or update the store. Callbacks unsubscribed
    /// during the pass are still called in it.
    pub(crate) fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        trace!(count = callbacks.len(), "notifying subscribers");
        for callback in &callbacks {
            callback();
        }
    }

    fn remove(&self, id: u64) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(other, _)| *other != id);
        before != callbacks.len()
    }

    fn contains(&self, id: u64) -> bool {
        self.callbacks.borrow().iter().any(|(other, _)| *other == id)
    }
}

/// A handle to a callback registered with [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping the handle does _not_ unsubscribe; the callback stays registered for as long as
/// the store lives unless [`Subscription::unsubscribe`] is called.
#[must_use = "a subscription can only be cancelled through its handle"]
pub struct Subscription {
    registry: Weak<Subscribers>,
    id: u64,
}

impl Subscription {
    /// Removes the callback. Calling this more than once has no further effect.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if registry.remove(self.id) {
            trace!(id = self.id, "unsubscribed");
        }
    }

    /// Returns true while the callback is registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
