#![forbid(unsafe_code)]

//! formcell: per-field handlers over one composite value, and inputs that
//! work controlled or uncontrolled.
//!
//! ```
//! use std::collections::BTreeMap;
//! use formcell::prelude::*;
//!
//! let form = Instance::new("signup");
//! let fields = form.render(|cx| {
//!     use_fields(cx, || BTreeMap::from([("email".to_owned(), String::new())]))
//! });
//! fields.field("email").set("a@b.com".to_owned());
//!
//! assert!(form.needs_render());
//! assert!(fields.is_touched(&"email".to_owned()));
//! ```
//!
//! The crates behind the facade:
//! - [`core`]: composite containers, change and event types, [`FieldError`].
//! - [`runtime`]: field binders, value adapters, the render host.

pub use formcell_core as core;
pub use formcell_runtime as runtime;

pub use formcell_core::{
    Change, Composite, CompositeKind, Emitted, EventKind, EventTarget, FieldError, NativeEvent,
    RawEvent, Resolved, SyntheticEvent, TouchedSet, Updater,
};
pub use formcell_runtime::{
    AdapterMode, AdapterProps, BatchScope, Callback, EmitHandler, FieldAccessor, FieldBinder,
    FieldHandler, FieldsConfig, FnComponent, Hooks, InputComponent, InputProps, Instance,
    MountedInput, StateAction, StateCell, StateSetter, Subscription, TouchPolicy, ValueAdapter,
    ValueSink, batch, component_fn, input, use_controlled_fields, use_fields,
    use_fields_with_config,
};

/// Everything needed to build a form.
pub mod prelude {
    pub use crate::{
        AdapterProps, BatchScope, Change, Composite, Emitted, FieldAccessor, FieldBinder,
        FieldsConfig, Hooks, InputComponent, InputProps, Instance, NativeEvent, RawEvent,
        StateCell, SyntheticEvent, TouchPolicy, ValueAdapter, ValueSink, component_fn, input,
        use_controlled_fields, use_fields, use_fields_with_config,
    };
}
