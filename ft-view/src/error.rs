//! Errors raised while reading or writing native records

use ft_types::IntKind;
use thiserror::Error;

/// An error that occurs when accessing a native record.
///
/// Every variant indicates a programming error: a view used before it was
/// attached, or a descriptor that does not agree with how it is being
/// accessed. None of them are expected to be recovered from at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("the view is not attached to a record (null base address)")]
    NullReference,

    #[error("read of {width} bytes at offset {offset} is outside the {size} byte record")]
    OutOfBounds {
        offset: usize,
        width: usize,
        size: usize,
    },

    #[error("no field {0} in this record")]
    NoSuchField(String),

    #[error("field '{field}' is {found}, not {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' is {resolved} bytes on this target, but was accessed as {requested} bytes")]
    PlatformMismatch {
        field: &'static str,
        resolved: usize,
        requested: usize,
    },

    #[error("the pointer in field '{0}' cannot be followed from this view")]
    ForeignPointer(&'static str),

    #[error("buffer of {available} bytes is too small for a {needed} byte record")]
    Truncated { needed: usize, available: usize },

    #[error("value {value} does not fit in a field of type {kind}")]
    Overflow { value: String, kind: IntKind },
}
