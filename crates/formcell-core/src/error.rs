#![forbid(unsafe_code)]

//! Errors raised when a field change cannot be applied to a composite value.

use thiserror::Error;

/// Why a single-key write into a [`Composite`](crate::Composite) was refused.
///
/// These are caller contract violations rather than runtime faults. The
/// binder in `formcell-runtime` logs them and discards the update, leaving
/// the previous composite value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A list write landed past the end. Appending at `index == len` is allowed.
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A functional update targeted a key with no previous value.
    #[error("field {key} has no previous value to update")]
    MissingKey { key: String },
}

impl FieldError {
    /// Build a [`FieldError::MissingKey`] from any debuggable key.
    #[must_use]
    pub fn missing(key: &impl std::fmt::Debug) -> Self {
        Self::MissingKey {
            key: format!("{key:?}"),
        }
    }
}
