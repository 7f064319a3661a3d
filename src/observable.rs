//! Observables: callback lists with explicit subscription handles.
//!
//! Subscribing with [`Observable::add`] returns an [`Observer`] handle. The
//! handle is the only way to unsubscribe and removing it twice is a no-op, so
//! owners can tear down deterministically by `take()`-ing their handles.
//!
//! Notification works on a snapshot of the current observers. Callbacks may
//! add or remove observers (including themselves) while a notification is
//! running; removed observers are skipped for the rest of the pass and added
//! ones are first called on the next notification.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// Per-notification state passed to every callback.
#[derive(Debug, Default)]
pub struct EventState {
    /// Set to stop the remaining observers of this pass from being called.
    pub skip_next_observers: bool,
}

/// Handle returned by [`Observable::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observer(u64);

type Callback<T> = RefCell<Box<dyn FnMut(&mut T, &mut EventState)>>;

struct Slot<T> {
    id: u64,
    removed: Cell<bool>,
    callback: Callback<T>,
}

pub struct Observable<T> {
    observers: RefCell<Vec<Rc<Slot<T>>>>,
    next_id: Cell<u64>,
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn add(&self, callback: impl FnMut(&mut T, &mut EventState) + 'static) -> Observer {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().push(Rc::new(Slot {
            id,
            removed: Cell::new(false),
            callback: RefCell::new(Box::new(callback)),
        }));
        Observer(id)
    }

    /// Unsubscribes `observer`. Returns false if it was not (or no longer) registered.
    pub fn remove(&self, observer: &Observer) -> bool {
        let mut observers = self.observers.borrow_mut();
        match observers.iter().position(|slot| slot.id == observer.0) {
            Some(idx) => {
                observers.remove(idx).removed.set(true);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.observers
            .borrow_mut()
            .drain(..)
            .for_each(|slot| slot.removed.set(true));
    }

    pub fn has_observers(&self) -> bool {
        !self.observers.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }

    /// Calls every observer with `data`. Returns false if an observer
    /// stopped the pass via [`EventState::skip_next_observers`].
    pub fn notify_observers(&self, data: &mut T) -> bool {
        let snapshot: Vec<Rc<Slot<T>>> = self.observers.borrow().clone();
        let mut state = EventState::default();
        for slot in snapshot {
            if slot.removed.get() {
                continue;
            }
            match slot.callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(data, &mut state),
                Err(_) => {
                    log::warn!(
                        "Observer {} is already running, skipping re-entrant notification",
                        slot.id
                    );
                    continue;
                }
            }
            if state.skip_next_observers {
                return false;
            }
        }
        true
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.len())
            .finish()
    }
}
