//! Lightweight failure encoding for hot paths.
//!
//! A failure here carries no information beyond the fact that it happened: [`StatusFlag`] is a
//! boolean, and [`ValueOrFailure<T>`] is a value or the unit [`Failure`] marker.

use std::convert::Infallible;

use crate::status::Status;

/// The unit failure marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, thiserror::Error)]
#[error("failed")]
pub struct Failure;

/// The unit success marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Success;

/// Boolean success flag, the value-less counterpart of [`ValueOrFailure`].
///
/// ```rust
/// use tryseq::{Failure, StatusFlag, Success};
///
/// assert!(StatusFlag::from(Success).ok());
/// assert!(!StatusFlag::from(Failure).ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusFlag(bool);

impl StatusFlag {
    #[inline]
    pub const fn new(ok: bool) -> Self {
        Self(ok)
    }

    /// Returns `true` on success.
    #[inline]
    pub const fn ok(self) -> bool {
        self.0
    }
}

impl From<Success> for StatusFlag {
    fn from(_: Success) -> Self {
        Self(true)
    }
}

impl From<Failure> for StatusFlag {
    fn from(_: Failure) -> Self {
        Self(false)
    }
}

impl From<bool> for StatusFlag {
    fn from(ok: bool) -> Self {
        Self(ok)
    }
}

/// Either a value, or a failure that carries nothing.
///
/// ```rust
/// use tryseq::{Failure, ValueOrFailure};
///
/// let v = ValueOrFailure::Value(3);
/// assert_eq!(v.value(), Some(&3));
///
/// let f: ValueOrFailure<i32> = Failure.into();
/// assert!(!f.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueOrFailure<T> {
    Value(T),
    Failure,
}

impl<T> ValueOrFailure<T> {
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, ValueOrFailure::Value(_))
    }

    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            ValueOrFailure::Value(v) => Some(v),
            ValueOrFailure::Failure => None,
        }
    }

    #[inline]
    pub fn into_value(self) -> Option<T> {
        match self {
            ValueOrFailure::Value(v) => Some(v),
            ValueOrFailure::Failure => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> ValueOrFailure<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ValueOrFailure::Value(v) => ValueOrFailure::Value(f(v)),
            ValueOrFailure::Failure => ValueOrFailure::Failure,
        }
    }

    /// Converts into a standard `Result` with [`Failure`] as the error.
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            ValueOrFailure::Value(v) => Ok(v),
            ValueOrFailure::Failure => Err(Failure),
        }
    }
}

impl<T> From<Failure> for ValueOrFailure<T> {
    fn from(_: Failure) -> Self {
        ValueOrFailure::Failure
    }
}

impl<T> From<Option<T>> for ValueOrFailure<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => ValueOrFailure::Value(v),
            None => ValueOrFailure::Failure,
        }
    }
}

impl<T, E> From<Result<T, E>> for ValueOrFailure<T> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(v) => ValueOrFailure::Value(v),
            Err(_) => ValueOrFailure::Failure,
        }
    }
}

/// Dropping the code and message of a rich failure.
impl From<Status> for Failure {
    fn from(_: Status) -> Self {
        Failure
    }
}

/// A bare failure surfaces as `CANCELLED` in the rich encoding.
impl From<Failure> for Status {
    fn from(_: Failure) -> Self {
        Status::cancelled("failed")
    }
}

impl From<Infallible> for Failure {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
