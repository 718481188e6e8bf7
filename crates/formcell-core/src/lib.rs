#![forbid(unsafe_code)]

//! Value-level vocabulary for formcell.
//!
//! Nothing in this crate owns state or holds callbacks. It defines what a
//! composite form value is ([`Composite`]), how a single field change is
//! expressed at the UI boundary ([`Change`], [`Emitted`], [`RawEvent`]), the
//! monotonic [`TouchedSet`], and the [`FieldError`] returned when a change
//! cannot be applied.
//!
//! The stateful pieces (field binders, value adapters, the render host) live
//! in `formcell-runtime`.

pub mod change;
pub mod composite;
pub mod error;
pub mod event;
pub mod touched;

pub use change::{Change, Emitted, Resolved, Updater};
pub use composite::{Composite, CompositeKind};
pub use error::FieldError;
pub use event::{EventKind, EventTarget, NativeEvent, RawEvent, SyntheticEvent};
pub use touched::TouchedSet;
