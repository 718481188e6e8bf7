#![forbid(unsafe_code)]

//! The unions accepted at the UI boundary, and the one rule that collapses them.
//!
//! Two boundaries, two unions:
//!
//! - [`Emitted<V>`]: what a presentational component hands its `on_change`.
//!   Either a literal value or a [`RawEvent`]. Value adapters accept this.
//! - [`Change<V>`]: what a field handler accepts. Adds the functional
//!   [`Updater`] branch, since only the field binder owns a previous value to
//!   apply it to.
//!
//! Both reduce events the same way, through [`RawEvent::into_value`].
//!
//! # Invariants
//!
//! 1. An updater is never mistaken for a literal: the branches are separate
//!    variants, so a field value type may itself be a function type without
//!    ambiguity.
//! 2. Event detection is by variant, never by the key being changed.

use std::fmt;

use crate::event::{NativeEvent, RawEvent, SyntheticEvent};

/// A functional update over a field's previous value.
pub type Updater<V> = Box<dyn FnOnce(&V) -> V>;

// ---------------------------------------------------------------------------
// Emitted<V>: adapter boundary
// ---------------------------------------------------------------------------

/// What a component emits from its `on_change`: a value or a raw event.
#[derive(Clone, PartialEq)]
pub enum Emitted<V> {
    Value(V),
    Event(RawEvent<V>),
}

impl<V> Emitted<V> {
    /// Reduce to a literal value.
    #[must_use]
    pub fn into_value(self) -> V {
        match self {
            Self::Value(v) => v,
            Self::Event(ev) => ev.into_value(),
        }
    }

    /// Whether this came from an event rather than a literal.
    #[must_use]
    pub fn is_event(&self) -> bool {
        matches!(self, Self::Event(_))
    }
}

impl<V: fmt::Debug> fmt::Debug for Emitted<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Event(ev) => f.debug_tuple("Event").field(ev).finish(),
        }
    }
}

impl<V> From<RawEvent<V>> for Emitted<V> {
    fn from(ev: RawEvent<V>) -> Self {
        Self::Event(ev)
    }
}

impl<V> From<NativeEvent<V>> for Emitted<V> {
    fn from(ev: NativeEvent<V>) -> Self {
        Self::Event(ev.into())
    }
}

impl<V> From<SyntheticEvent<V>> for Emitted<V> {
    fn from(ev: SyntheticEvent<V>) -> Self {
        Self::Event(ev.into())
    }
}

// ---------------------------------------------------------------------------
// Change<V>: field-binder boundary
// ---------------------------------------------------------------------------

/// What a field handler accepts: a literal, a functional updater, or a raw event.
pub enum Change<V> {
    Value(V),
    Update(Updater<V>),
    Event(RawEvent<V>),
}

/// A [`Change`] with the event branch already collapsed.
pub enum Resolved<V> {
    Value(V),
    Update(Updater<V>),
}

impl<V> Change<V> {
    /// Literal replacement.
    #[must_use]
    pub fn value(v: V) -> Self {
        Self::Value(v)
    }

    /// Functional update over the previous field value.
    #[must_use]
    pub fn update(f: impl FnOnce(&V) -> V + 'static) -> Self {
        Self::Update(Box::new(f))
    }

    /// Collapse the event branch; keep updaters as updaters.
    #[must_use]
    pub fn resolve(self) -> Resolved<V> {
        match self {
            Self::Value(v) => Resolved::Value(v),
            Self::Event(ev) => Resolved::Value(ev.into_value()),
            Self::Update(f) => Resolved::Update(f),
        }
    }
}

impl<V> Resolved<V> {
    /// Produce the next field value from the previous one.
    ///
    /// Returns `None` for an updater when there is no previous value.
    pub fn apply(self, previous: Option<&V>) -> Option<V> {
        match self {
            Self::Value(v) => Some(v),
            Self::Update(f) => previous.map(f),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Change<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Update(_) => f.write_str("Update(<fn>)"),
            Self::Event(ev) => f.debug_tuple("Event").field(ev).finish(),
        }
    }
}

impl<V> From<Emitted<V>> for Change<V> {
    fn from(emitted: Emitted<V>) -> Self {
        match emitted {
            Emitted::Value(v) => Self::Value(v),
            Emitted::Event(ev) => Self::Event(ev),
        }
    }
}

impl<V> From<RawEvent<V>> for Change<V> {
    fn from(ev: RawEvent<V>) -> Self {
        Self::Event(ev)
    }
}

impl<V> From<NativeEvent<V>> for Change<V> {
    fn from(ev: NativeEvent<V>) -> Self {
        Self::Event(ev.into())
    }
}

impl<V> From<SyntheticEvent<V>> for Change<V> {
    fn from(ev: SyntheticEvent<V>) -> Self {
        Self::Event(ev.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_literal_passes_through() {
        assert_eq!(Emitted::Value(7).into_value(), 7);
    }

    #[test]
    fn emitted_event_collapses() {
        let e: Emitted<String> = NativeEvent::input("typed".to_string()).into();
        assert!(e.is_event());
        assert_eq!(e.into_value(), "typed");
    }

    #[test]
    fn emitted_synthetic_collapses() {
        let e: Emitted<bool> = SyntheticEvent::wrap(NativeEvent::change(true)).into();
        assert!(e.into_value());
    }

    #[test]
    fn change_event_resolves_to_value() {
        let c: Change<u8> = NativeEvent::change(3).into();
        assert_eq!(c.resolve().apply(Some(&1)), Some(3));
    }

    #[test]
    fn change_updater_sees_previous() {
        let c = Change::update(|s: &String| format!("{s}X"));
        assert_eq!(c.resolve().apply(Some(&"a".to_string())), Some("aX".to_string()));
    }

    #[test]
    fn updater_without_previous_is_none() {
        let c = Change::update(|n: &i32| n + 1);
        assert_eq!(c.resolve().apply(None), None);
    }

    #[test]
    fn literal_without_previous_is_some() {
        assert_eq!(Change::value(5).resolve().apply(None), Some(5));
    }

    #[test]
    fn function_typed_literal_is_not_an_updater() {
        fn double(n: i32) -> i32 {
            n * 2
        }
        let c = Change::value(double as fn(i32) -> i32);
        let Some(f) = c.resolve().apply(None) else {
            panic!("literal should apply without a previous value");
        };
        assert_eq!(f(4), 8);
    }

    #[test]
    fn debug_hides_updater() {
        let c = Change::update(|n: &i32| *n);
        assert_eq!(format!("{c:?}"), "Update(<fn>)");
        assert_eq!(format!("{:?}", Change::value(1)), "Value(1)");
    }

    #[test]
    fn emitted_into_change() {
        let c: Change<i32> = Emitted::Value(2).into();
        assert!(matches!(c, Change::Value(2)));
    }
}
