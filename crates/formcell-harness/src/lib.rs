#![forbid(unsafe_code)]

//! Test fixtures for formcell.
//!
//! - [`components`]: reference presentational inputs that emit in each of
//!   the shapes an adapter must accept: native events ([`TextInput`]),
//!   literal values ([`Toggle`]), synthetic events ([`Checkbox`]).
//! - [`RenderLog`]: records which component rendered with which value, so
//!   tests can assert on memoization.
//! - [`init_tracing`]: installs a `tracing` subscriber once per test binary.
//!
//! The rendered output of every reference component is a [`Rendered`]
//! frame; the `type_text`/`click` helpers drive its `on_change` the way a
//! user would.

pub mod components;
pub mod logging;

pub use components::{
    Checkbox, EmitShape, RenderLog, Rendered, TextInput, TextInputProps, Toggle, click,
    type_text,
};
pub use logging::init_tracing;
