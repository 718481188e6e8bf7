#![forbid(unsafe_code)]

//! Stateful half of formcell.
//!
//! - [`fields`]: [`FieldBinder`], per-key change handlers over a composite
//!   value, with touched tracking and copy-on-write updates.
//! - [`adapter`]: [`ValueAdapter`], which lets one presentational input be
//!   used controlled or uncontrolled and reduces emitted events to values.
//! - [`instance`]: the render-lifecycle host ([`Instance`], [`Hooks`]) both
//!   of the above retain their state in.
//! - [`reactive`]: [`StateCell`], [`Callback`], and [`BatchScope`].
//!
//! # Logging
//!
//! Everything logs through `tracing`. Handler creation and applied updates
//! are `trace`, memo hits and mode changes are `debug`, discarded updates
//! (missing key, index out of range) are `warn`. No subscriber is installed
//! here.

pub mod adapter;
pub mod fields;
pub mod instance;
pub mod reactive;

pub use adapter::{
    AdapterMode, AdapterProps, DEFAULT_DISPLAY_NAME, EmitHandler, FnComponent, InputComponent,
    InputProps, MountedInput, ValueAdapter, ValueSink, component_fn, input,
};
pub use fields::{
    FieldAccessor, FieldBinder, FieldHandler, FieldsConfig, TouchPolicy, use_controlled_fields,
    use_fields, use_fields_with_config,
};
pub use instance::{Hooks, Instance};
pub use reactive::{
    BatchScope, Callback, StateAction, StateCell, StateSetter, Subscription, batch,
};
