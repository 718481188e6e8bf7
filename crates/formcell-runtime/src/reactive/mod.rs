#![forbid(unsafe_code)]

//! Reactive primitives for formcell.
//!
//! - [`Callback`]: a shared handler compared by identity.
//! - [`StateCell`]: version-tracked retained state with a stable
//!   [`StateSetter`] and RAII [`Subscription`]s.
//! - [`BatchScope`]: RAII guard that defers `StateCell` notifications until
//!   the outermost scope exits.
//!
//! # Architecture
//!
//! Everything is single-threaded: `Rc<RefCell<..>>` for shared state, `Weak`
//! back-references wherever a callback would otherwise keep its owner alive.
//! Subscribers are stored as `Weak` function pointers and pruned lazily
//! during notification.

pub mod batch;
pub mod callback;
pub mod state;

pub use batch::{BatchScope, batch};
pub use callback::Callback;
pub use state::{StateAction, StateCell, StateSetter, Subscription};
