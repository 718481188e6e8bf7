#![forbid(unsafe_code)]

//! Field binding: slicing one composite value into per-key accessors.
//!
//! A [`FieldBinder`] is bound to one composite value and one change sink.
//! [`FieldBinder::field`] returns a [`FieldAccessor`] for a key: the key's
//! current value plus an `on_change` handler. Handlers are created on first
//! use and cached for the binder's lifetime, so a component can pass them
//! down every render without looking like it changed its props.
//!
//! Invoking a handler submits a functional [`StateAction`] to the sink. When
//! the sink applies it, against whatever the composite is *at that moment*,
//! the action clones the composite, writes the key, and marks it touched.
//!
//! # Usage
//!
//! ```ignore
//! use std::collections::BTreeMap;
//! use formcell_runtime::fields::FieldBinder;
//!
//! let form = FieldBinder::uncontrolled(BTreeMap::from([
//!     ("username".to_string(), String::new()),
//!     ("password".to_string(), String::new()),
//! ]));
//!
//! let username = form.field("username");
//! username.set("a@b.com".to_string());
//!
//! assert_eq!(form.field("username").value.as_deref(), Some("a@b.com"));
//! assert!(form.is_touched(&"username".to_string()));
//! assert!(username.on_change.ptr_eq(&form.field("username").on_change));
//! ```
//!
//! # Invariants
//!
//! 1. `field(k).on_change` is the same callback for every call with `k`.
//! 2. A change to `k` leaves every other key's value as it was.
//! 3. Touched keys stay touched.
//! 4. Two functional updates submitted in one turn compose: the second sees
//!    the result of the first.
//! 5. An uncontrolled binder ignores external values; [`FieldBinder::rebind`]
//!    on it is a no-op.
//!
//! # Failure Modes
//!
//! - Updater on an absent key, or a list write past the end: the update is
//!   discarded with a warning, nothing is touched, the sink sees no write.
//! - Handler called after the binder was dropped: logged at debug, ignored.
//! - A panicking updater propagates; the composite keeps its previous value.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use formcell_core::{Change, Composite, FieldError, RawEvent, Resolved, TouchedSet};

use crate::adapter::ValueSink;
use crate::instance::Hooks;
use crate::reactive::{Callback, StateAction, StateCell, StateSetter};

/// Cached per-field change handler.
pub type FieldHandler<V> = Callback<Change<V>>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// When a change marks its field touched.
pub enum TouchPolicy<V> {
    /// Every applied change touches, even one writing an equal value.
    OnAttempt,
    /// Only a change to a different value touches.
    OnChange(fn(&V, &V) -> bool),
}

impl<V: PartialEq> TouchPolicy<V> {
    /// Touch only when the new value differs from the previous one.
    #[must_use]
    pub fn on_change() -> Self {
        Self::OnChange(<V as PartialEq>::eq)
    }
}

impl<V> TouchPolicy<V> {
    fn touches(&self, previous: Option<&V>, next: &V) -> bool {
        match self {
            Self::OnAttempt => true,
            Self::OnChange(eq) => previous.is_none_or(|prev| !eq(prev, next)),
        }
    }
}

impl<V> Clone for TouchPolicy<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for TouchPolicy<V> {}

impl<V> Default for TouchPolicy<V> {
    fn default() -> Self {
        Self::OnAttempt
    }
}

impl<V> fmt::Debug for TouchPolicy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnAttempt => f.write_str("OnAttempt"),
            Self::OnChange(_) => f.write_str("OnChange"),
        }
    }
}

/// Binder configuration.
#[derive(Debug, Clone)]
pub struct FieldsConfig<V> {
    /// Name used in log records.
    pub label: Cow<'static, str>,
    pub touch: TouchPolicy<V>,
}

impl<V> Default for FieldsConfig<V> {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("fields"),
            touch: TouchPolicy::OnAttempt,
        }
    }
}

impl<V> FieldsConfig<V> {
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_touch(mut self, touch: TouchPolicy<V>) -> Self {
        self.touch = touch;
        self
    }
}

// ---------------------------------------------------------------------------
// FieldAccessor
// ---------------------------------------------------------------------------

/// One field of a composite: its current value and its change handler.
pub struct FieldAccessor<V> {
    /// Value at the key, `None` if the key is absent.
    pub value: Option<V>,
    pub on_change: FieldHandler<V>,
}

impl<V: 'static> FieldAccessor<V> {
    /// Submit a literal value.
    pub fn set(&self, value: V) {
        self.on_change.call(Change::Value(value));
    }

    /// Submit a functional update over the previous value.
    pub fn update(&self, f: impl FnOnce(&V) -> V + 'static) {
        self.on_change.call(Change::update(f));
    }

    /// Submit a raw event; its carried value becomes the new value.
    pub fn emit(&self, event: impl Into<RawEvent<V>>) {
        self.on_change.call(Change::Event(event.into()));
    }

    /// The handler as a [`ValueSink`], for driving a controlled adapter.
    #[must_use]
    pub fn sink(&self) -> ValueSink<V> {
        ValueSink::field(self.on_change.clone())
    }
}

impl<V: Clone + Default> FieldAccessor<V> {
    /// The value, or `V::default()` for an absent key.
    #[must_use]
    pub fn value_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }
}

impl<V: Clone> Clone for FieldAccessor<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<V: PartialEq> PartialEq for FieldAccessor<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.on_change == other.on_change
    }
}

impl<V: fmt::Debug> fmt::Debug for FieldAccessor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("value", &self.value)
            .field("on_change", &self.on_change)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FieldBinder
// ---------------------------------------------------------------------------

enum Source<C: Composite> {
    /// The binder owns the composite.
    Owned(StateCell<C>),
    /// The caller owns the composite; refreshed by `rebind`.
    Controlled { value: C, sink: StateSetter<C> },
}

struct BinderInner<C: Composite> {
    source: RefCell<Source<C>>,
    handlers: RefCell<AHashMap<C::Key, FieldHandler<C::Value>>>,
    touched: RefCell<TouchedSet<C::Key>>,
    config: FieldsConfig<C::Value>,
}

impl<C: Composite> BinderInner<C> {
    fn sink(&self) -> StateSetter<C> {
        match &*self.source.borrow() {
            Source::Owned(cell) => cell.setter(),
            Source::Controlled { sink, .. } => sink.clone(),
        }
    }

    fn with_value<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        match &*self.source.borrow() {
            Source::Owned(cell) => cell.with(f),
            Source::Controlled { value, .. } => f(value),
        }
    }
}

/// Per-key accessors over one composite value.
///
/// Cloning a `FieldBinder` clones a handle; all clones share the handler
/// cache, the touched set, and (when uncontrolled) the state.
pub struct FieldBinder<C: Composite> {
    inner: Rc<BinderInner<C>>,
}

impl<C: Composite> Clone for FieldBinder<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: Composite> FieldBinder<C> {
    /// A binder that owns its composite, initialized once to `initial`.
    #[must_use]
    pub fn uncontrolled(initial: C) -> Self {
        Self::from_state(StateCell::new(initial), FieldsConfig::default())
    }

    /// [`FieldBinder::uncontrolled`] with a configuration.
    #[must_use]
    pub fn uncontrolled_with_config(initial: C, config: FieldsConfig<C::Value>) -> Self {
        Self::from_state(StateCell::new(initial), config)
    }

    /// A binder owning an existing state cell.
    #[must_use]
    pub fn from_state(cell: StateCell<C>, config: FieldsConfig<C::Value>) -> Self {
        Self::with_source(Source::Owned(cell), config)
    }

    /// A binder over a caller-owned composite and its change sink.
    #[must_use]
    pub fn controlled(value: C, on_change: StateSetter<C>) -> Self {
        Self::controlled_with_config(value, on_change, FieldsConfig::default())
    }

    /// [`FieldBinder::controlled`] with a configuration.
    #[must_use]
    pub fn controlled_with_config(
        value: C,
        on_change: StateSetter<C>,
        config: FieldsConfig<C::Value>,
    ) -> Self {
        Self::with_source(
            Source::Controlled {
                value,
                sink: on_change,
            },
            config,
        )
    }

    fn with_source(source: Source<C>, config: FieldsConfig<C::Value>) -> Self {
        Self {
            inner: Rc::new(BinderInner {
                source: RefCell::new(source),
                handlers: RefCell::new(AHashMap::new()),
                touched: RefCell::new(TouchedSet::new()),
                config,
            }),
        }
    }

    /// Whether the caller owns the composite.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(&*self.inner.source.borrow(), Source::Controlled { .. })
    }

    /// Refresh a controlled binder with the caller's latest value and sink.
    ///
    /// Cached handlers keep their identity and submit to the new sink from
    /// now on. Ignored for uncontrolled binders.
    pub fn rebind(&self, value: C, on_change: StateSetter<C>) {
        let mut source = self.inner.source.borrow_mut();
        match &mut *source {
            Source::Controlled { value: v, sink } => {
                *v = value;
                *sink = on_change;
            }
            Source::Owned(_) => {
                tracing::debug!(
                    binder = %self.inner.config.label,
                    "ignoring external value for an uncontrolled binder"
                );
            }
        }
    }

    /// The accessor for `key`: fresh value, cached handler.
    pub fn field(&self, key: impl Into<C::Key>) -> FieldAccessor<C::Value> {
        let key = key.into();
        let on_change = self.handler(&key);
        let value = self.inner.with_value(|composite| composite.get(&key).cloned());
        FieldAccessor { value, on_change }
    }

    /// Shorthand for `field(key).on_change.call(change)`.
    pub fn change(&self, key: impl Into<C::Key>, change: impl Into<Change<C::Value>>) {
        let key = key.into();
        self.handler(&key).call(change.into());
    }

    /// Submit a literal value for `key`.
    pub fn set(&self, key: impl Into<C::Key>, value: C::Value) {
        self.change(key, Change::Value(value));
    }

    /// Submit a functional update for `key`.
    pub fn update(
        &self,
        key: impl Into<C::Key>,
        f: impl FnOnce(&C::Value) -> C::Value + 'static,
    ) {
        self.change(key, Change::update(f));
    }

    /// Snapshot of the whole composite.
    #[must_use]
    pub fn value(&self) -> C {
        self.inner.with_value(C::clone)
    }

    /// Borrow the whole composite.
    pub fn with_value<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        self.inner.with_value(f)
    }

    /// Snapshot of the touched set.
    #[must_use]
    pub fn touched(&self) -> TouchedSet<C::Key> {
        self.inner.touched.borrow().clone()
    }

    #[must_use]
    pub fn is_touched(&self, key: &C::Key) -> bool {
        self.inner.touched.borrow().is_touched(key)
    }

    /// Number of cached handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    /// The owned state cell, for uncontrolled binders.
    #[must_use]
    pub fn state(&self) -> Option<StateCell<C>> {
        match &*self.inner.source.borrow() {
            Source::Owned(cell) => Some(cell.clone()),
            Source::Controlled { .. } => None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FieldsConfig<C::Value> {
        &self.inner.config
    }

    fn handler(&self, key: &C::Key) -> FieldHandler<C::Value> {
        if let Some(handler) = self.inner.handlers.borrow().get(key) {
            return handler.clone();
        }
        let handler = field_handler(Rc::downgrade(&self.inner), key.clone());
        tracing::trace!(
            binder = %self.inner.config.label,
            field = ?key,
            "created field handler"
        );
        self.inner
            .handlers
            .borrow_mut()
            .insert(key.clone(), handler.clone());
        handler
    }
}

impl<C> fmt::Debug for FieldBinder<C>
where
    C: Composite + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinder")
            .field("label", &self.inner.config.label)
            .field("controlled", &self.is_controlled())
            .field("value", &self.value())
            .field("touched", &self.touched())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Build the cached handler for `key`. Holds the binder weakly so the cache
/// does not keep its own owner alive.
fn field_handler<C: Composite>(
    binder: Weak<BinderInner<C>>,
    key: C::Key,
) -> FieldHandler<C::Value> {
    Callback::new(move |change: Change<C::Value>| {
        let Some(inner) = binder.upgrade() else {
            tracing::debug!(field = ?key, "field handler called after its binder was dropped");
            return;
        };
        let action = field_update(Rc::downgrade(&inner), key.clone(), change.resolve());
        let sink = inner.sink();
        drop(inner);
        sink.call(action);
    })
}

/// The functional update a field handler submits: clone, write, touch.
fn field_update<C: Composite>(
    binder: Weak<BinderInner<C>>,
    key: C::Key,
    change: Resolved<C::Value>,
) -> StateAction<C> {
    StateAction::update(move |previous: &C| {
        let current = previous.get(&key);
        let Some(next) = change.apply(current) else {
            let err = FieldError::missing(&key);
            tracing::warn!(field = ?key, error = %err, "discarded field update");
            return None;
        };

        let binder = binder.upgrade();
        let touch = binder
            .as_ref()
            .is_some_and(|inner| inner.config.touch.touches(current, &next));

        let mut clone = previous.clone();
        if let Err(err) = clone.set(key.clone(), next) {
            tracing::warn!(field = ?key, error = %err, "discarded field update");
            return None;
        }

        if let Some(inner) = binder {
            if touch {
                inner.touched.borrow_mut().mark(key.clone());
            }
            tracing::trace!(
                binder = %inner.config.label,
                field = ?key,
                touched = touch,
                "applied field change"
            );
        }
        Some(clone)
    })
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// Uncontrolled field binding for the component being rendered.
///
/// `initial` runs on the first render only. Writes through the returned
/// binder mark the instance for re-render.
pub fn use_fields<C: Composite>(cx: &mut Hooks<'_>, initial: impl FnOnce() -> C) -> FieldBinder<C> {
    use_fields_with_config(cx, initial, FieldsConfig::default)
}

/// [`use_fields`] with a configuration, evaluated on the first render only.
pub fn use_fields_with_config<C: Composite>(
    cx: &mut Hooks<'_>,
    initial: impl FnOnce() -> C,
    config: impl FnOnce() -> FieldsConfig<C::Value>,
) -> FieldBinder<C> {
    let cell = cx.use_state(initial);
    cx.use_persisted(move || FieldBinder::from_state(cell, config()))
}

/// Controlled field binding: the caller owns `value` and applies actions
/// sent to `on_change`.
pub fn use_controlled_fields<C: Composite>(
    cx: &mut Hooks<'_>,
    value: C,
    on_change: StateSetter<C>,
) -> FieldBinder<C> {
    let binder = cx.use_persisted(|| FieldBinder::controlled(value.clone(), on_change.clone()));
    binder.rebind(value, on_change);
    binder
}
