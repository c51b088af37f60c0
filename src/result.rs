//! The success/failure capability shared by every result encoding.
//!
//! Sequencing combinators never look at a concrete result type. They only need to split a
//! result into "succeeded with a value" or "failed", and to build a result from either side.
//! [`Fallible`] captures exactly that, and is implemented for both encodings:
//!
//! | encoding | with a value          | without a value |
//! |----------|-----------------------|-----------------|
//! | rich     | `Result<T, Status>`   | [`Status`]      |
//! | flag     | [`ValueOrFailure<T>`] | [`StatusFlag`]  |
//!
//! `Result<T, E>` is implemented for every `E`, so `Result<T, Infallible>` serves as the
//! encoding of a step that cannot fail. Its failure type converts into both [`Status`] and
//! [`Failure`], which is what lets raw steps sit in the same chain as fallible ones.
//!
//! # Examples
//!
//! ```
//! use tryseq::{Fallible, Failure, Status, ValueOrFailure};
//!
//! fn double<R: Fallible<Value = i32>>(r: R) -> R {
//!     match r.into_result() {
//!         Ok(v) => R::from_value(v * 2),
//!         Err(e) => R::from_failure(e),
//!     }
//! }
//!
//! assert_eq!(double(Ok::<_, Status>(2)), Ok(4));
//! assert_eq!(double(ValueOrFailure::Value(2)), ValueOrFailure::Value(4));
//! assert_eq!(double(ValueOrFailure::from(Failure)), ValueOrFailure::Failure);
//! ```

use crate::{
    flag::{Failure, StatusFlag, ValueOrFailure},
    status::Status,
};

/// A result encoding: either a success carrying [`Value`](Fallible::Value), or a failure
/// carrying [`Failure`](Fallible::Failure).
pub trait Fallible: Sized {
    /// Payload on success.
    type Value;
    /// Payload on failure.
    type Failure;

    /// Build the success variant.
    fn from_value(value: Self::Value) -> Self;

    /// Build the failure variant.
    fn from_failure(failure: Self::Failure) -> Self;

    /// Returns `true` on success.
    fn succeeded(&self) -> bool;

    /// Split into the standard `Result`.
    fn into_result(self) -> Result<Self::Value, Self::Failure>;

    /// Re-encode a failure of another encoding into this one.
    fn rethrow<F>(failure: F) -> Self
    where
        Self::Failure: From<F>,
    {
        Self::from_failure(failure.into())
    }
}

impl<T, E> Fallible for Result<T, E> {
    type Value = T;
    type Failure = E;

    #[inline]
    fn from_value(value: T) -> Self {
        Ok(value)
    }

    #[inline]
    fn from_failure(failure: E) -> Self {
        Err(failure)
    }

    #[inline]
    fn succeeded(&self) -> bool {
        self.is_ok()
    }

    #[inline]
    fn into_result(self) -> Result<T, E> {
        self
    }
}

impl Fallible for Status {
    type Value = ();
    type Failure = Status;

    fn from_value((): ()) -> Self {
        Status::ok()
    }

    /// An OK status carried as a failure becomes `Unknown`, so it cannot read as success.
    fn from_failure(failure: Status) -> Self {
        if failure.is_ok() {
            return Status::unknown("OK status reported as a failure");
        }
        failure
    }

    fn succeeded(&self) -> bool {
        self.is_ok()
    }

    fn into_result(self) -> Result<(), Status> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<T> Fallible for ValueOrFailure<T> {
    type Value = T;
    type Failure = Failure;

    #[inline]
    fn from_value(value: T) -> Self {
        ValueOrFailure::Value(value)
    }

    #[inline]
    fn from_failure(_: Failure) -> Self {
        ValueOrFailure::Failure
    }

    #[inline]
    fn succeeded(&self) -> bool {
        self.is_ok()
    }

    #[inline]
    fn into_result(self) -> Result<T, Failure> {
        ValueOrFailure::into_result(self)
    }
}

impl Fallible for StatusFlag {
    type Value = ();
    type Failure = Failure;

    #[inline]
    fn from_value((): ()) -> Self {
        StatusFlag::new(true)
    }

    #[inline]
    fn from_failure(_: Failure) -> Self {
        StatusFlag::new(false)
    }

    #[inline]
    fn succeeded(&self) -> bool {
        self.ok()
    }

    #[inline]
    fn into_result(self) -> Result<(), Failure> {
        if self.ok() {
            Ok(())
        } else {
            Err(Failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::status::Code;

    #[test]
    fn test_status_splits_on_code() {
        assert_eq!(Status::ok().into_result(), Ok(()));
        assert_eq!(
            Status::aborted("x").into_result(),
            Err(Status::aborted("x"))
        );
        assert!(Status::from_value(()).succeeded());
    }

    #[test]
    fn test_ok_status_as_failure_stays_a_failure() {
        let status = Status::from_failure(Status::ok());
        assert!(!status.succeeded());
        assert_eq!(status.code(), Code::Unknown);

        let rethrown: Status = Fallible::rethrow(Status::ok());
        assert_eq!(rethrown.into_result().map_err(|s| s.code()), Err(Code::Unknown));
    }

    #[test]
    fn test_status_flag_round_trips_through_result() {
        assert_eq!(StatusFlag::new(true).into_result(), Ok(()));
        assert_eq!(StatusFlag::new(false).into_result(), Err(Failure));
        assert!(!StatusFlag::from_failure(Failure).succeeded());
    }

    #[test]
    fn test_rethrow_between_encodings() {
        let rich: Result<u8, Status> = Fallible::rethrow(Failure);
        assert_eq!(rich.map_err(|s| s.code()), Err(Code::Cancelled));

        let flag: ValueOrFailure<u8> = Fallible::rethrow(Status::internal("lost"));
        assert_eq!(flag, ValueOrFailure::Failure);

        let same: Result<u8, Status> = Fallible::rethrow(Status::not_found("k"));
        assert_eq!(same, Err(Status::not_found("k")));
    }

    #[test]
    fn test_infallible_result_is_always_success() {
        let raw: Result<&str, Infallible> = Fallible::from_value("raw");
        assert!(raw.succeeded());
        assert_eq!(raw.into_result(), Ok("raw"));
    }
}
