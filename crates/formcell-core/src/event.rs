#![forbid(unsafe_code)]

//! Raw UI events as emitted by native form controls.
//!
//! A native control does not hand its new value to `on_change` directly; it
//! emits an event whose `target` carries the value. Some hosts wrap that in a
//! synthetic event that keeps the original under `native_event`. Both shapes
//! collapse to the carried value through [`RawEvent::into_value`].

/// What happened on the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// Value edited (keystroke, paste).
    #[default]
    Input,
    /// Value committed (blur, select, toggle).
    Change,
    /// Pointer activation.
    Click,
}

/// The control an event was dispatched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget<V> {
    pub value: V,
}

/// An event straight from the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent<V> {
    pub kind: EventKind,
    pub target: EventTarget<V>,
}

impl<V> NativeEvent<V> {
    #[must_use]
    pub fn new(kind: EventKind, value: V) -> Self {
        Self {
            kind,
            target: EventTarget { value },
        }
    }

    /// `Input` event carrying `value`.
    #[must_use]
    pub fn input(value: V) -> Self {
        Self::new(EventKind::Input, value)
    }

    /// `Change` event carrying `value`.
    #[must_use]
    pub fn change(value: V) -> Self {
        Self::new(EventKind::Change, value)
    }
}

/// A host-level wrapper around a [`NativeEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticEvent<V> {
    pub native_event: NativeEvent<V>,
    /// Whether the host already stopped propagation.
    pub propagation_stopped: bool,
}

impl<V> SyntheticEvent<V> {
    #[must_use]
    pub fn wrap(native_event: NativeEvent<V>) -> Self {
        Self {
            native_event,
            propagation_stopped: false,
        }
    }
}

/// Either event shape a control may emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent<V> {
    Native(NativeEvent<V>),
    Synthetic(SyntheticEvent<V>),
}

impl<V> RawEvent<V> {
    /// Kind of the underlying native event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Native(ev) => ev.kind,
            Self::Synthetic(ev) => ev.native_event.kind,
        }
    }

    /// Borrow the carried value.
    #[must_use]
    pub fn value(&self) -> &V {
        match self {
            Self::Native(ev) => &ev.target.value,
            Self::Synthetic(ev) => &ev.native_event.target.value,
        }
    }

    /// Collapse the event to the value its target carries.
    #[must_use]
    pub fn into_value(self) -> V {
        match self {
            Self::Native(ev) => ev.target.value,
            Self::Synthetic(ev) => ev.native_event.target.value,
        }
    }
}

impl<V> From<NativeEvent<V>> for RawEvent<V> {
    fn from(ev: NativeEvent<V>) -> Self {
        Self::Native(ev)
    }
}

impl<V> From<SyntheticEvent<V>> for RawEvent<V> {
    fn from(ev: SyntheticEvent<V>) -> Self {
        Self::Synthetic(ev)
    }
}
