#![forbid(unsafe_code)]

//! Retained state with a stable setter.
//!
//! [`StateCell<T>`] is the state-retention primitive the rest of the crate is
//! built on: a shared, version-tracked value whose writes go through
//! [`StateAction`]s, plus one [`StateSetter`] whose identity never changes
//! for the life of the cell.
//!
//! # Invariants
//!
//! 1. Every applied action bumps the version exactly once. Unlike an
//!    equality-checked observable, writing an equal value still counts: the
//!    value type need not implement `PartialEq`.
//! 2. An action is applied against the value current at dispatch time, so
//!    consecutive functional updates compose.
//! 3. A discarded action (`StateAction::Update` returning `None`) leaves the
//!    value and version untouched and notifies nobody.
//! 4. Subscribers are notified in registration order, with a snapshot of
//!    the new value, outside any internal borrow.
//! 5. [`StateCell::setter`] returns clones of one callback.
//!
//! # Failure Modes
//!
//! - An updater that dispatches into its own cell panics with a `RefCell`
//!   borrow error. Reading the cell from an updater is fine.
//! - A panicking updater leaves the previous value in place.
//! - Calling a setter after every `StateCell` clone is dropped is a no-op.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::batch::defer_or_run;
use super::callback::Callback;

/// A write to a [`StateCell`].
pub enum StateAction<T> {
    /// Replace the value.
    Replace(T),
    /// Compute the next value from the current one; `None` discards the write.
    Update(Box<dyn FnOnce(&T) -> Option<T>>),
}

impl<T> StateAction<T> {
    /// Functional update that may discard itself.
    pub fn update(f: impl FnOnce(&T) -> Option<T> + 'static) -> Self {
        Self::Update(Box::new(f))
    }

    /// Produce the next value, or `None` to leave `previous` in place.
    pub fn apply(self, previous: &T) -> Option<T> {
        match self {
            Self::Replace(next) => Some(next),
            Self::Update(f) => f(previous),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(v) => f.debug_tuple("Replace").field(v).finish(),
            Self::Update(_) => f.write_str("Update(<fn>)"),
        }
    }
}

/// The stable setter of a [`StateCell`].
pub type StateSetter<T> = Callback<StateAction<T>>;

type Subscriber<T> = dyn Fn(&T);

struct Slot<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Subscriber<T>>>,
    notify_queued: bool,
}

struct Shared<T> {
    slot: RefCell<Slot<T>>,
    setter: OnceCell<StateSetter<T>>,
}

/// Shared, version-tracked state.
pub struct StateCell<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + 'static> StateCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                slot: RefCell::new(Slot {
                    value,
                    version: 0,
                    subscribers: Vec::new(),
                    notify_queued: false,
                }),
                setter: OnceCell::new(),
            }),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.slot.borrow().value.clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.slot.borrow().value)
    }

    /// Number of applied writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.slot.borrow().version
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.dispatch(StateAction::Replace(value));
    }

    /// Replace the value with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.dispatch(StateAction::update(move |prev| Some(f(prev))));
    }

    /// Apply `action` against the current value. Returns whether it was applied.
    pub fn dispatch(&self, action: StateAction<T>) -> bool {
        let next = {
            let slot = self.shared.slot.borrow();
            action.apply(&slot.value)
        };
        let Some(next) = next else {
            return false;
        };
        {
            let mut slot = self.shared.slot.borrow_mut();
            slot.value = next;
            slot.version += 1;
        }
        self.schedule_notify();
        true
    }

    /// The setter for this cell. Every call returns a clone of the same callback.
    #[must_use]
    pub fn setter(&self) -> StateSetter<T> {
        self.shared
            .setter
            .get_or_init(|| {
                let weak = Rc::downgrade(&self.shared);
                Callback::new(move |action: StateAction<T>| {
                    if let Some(shared) = weak.upgrade() {
                        StateCell { shared }.dispatch(action);
                    }
                })
            })
            .clone()
    }

    /// Register `callback` for every applied write. Dropping the
    /// [`Subscription`] unregisters it.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Subscriber<T>> = Rc::new(callback);
        self.shared
            .slot
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Live subscriber count.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared
            .slot
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Whether both handles share one cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Write without bumping the version or notifying. Used to seed a slot
    /// during render.
    pub(crate) fn seed(&self, value: T) {
        self.shared.slot.borrow_mut().value = value;
    }

    fn schedule_notify(&self) {
        {
            let mut slot = self.shared.slot.borrow_mut();
            if slot.notify_queued {
                return;
            }
            slot.notify_queued = true;
        }
        let weak = Rc::downgrade(&self.shared);
        defer_or_run(move || {
            if let Some(shared) = weak.upgrade() {
                StateCell { shared }.notify_now();
            }
        });
    }

    fn notify_now(&self) {
        let (value, subscribers) = {
            let mut slot = self.shared.slot.borrow_mut();
            slot.notify_queued = false;
            slot.subscribers.retain(|w| w.strong_count() > 0);
            let live: Vec<_> = slot.subscribers.iter().filter_map(Weak::upgrade).collect();
            (slot.value.clone(), live)
        };
        for callback in subscribers {
            callback(&value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.shared.slot.borrow();
        f.debug_struct("StateCell")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .finish()
    }
}

/// RAII guard for a [`StateCell::subscribe`] registration.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
