//! Core trait for poll-driven promises.
//!
//! A [`Promise`] is a repeatable, zero-argument operation: each call to
//! [`poll()`](Promise::poll) either reports [`Poll::Pending`] or finishes with
//! [`Poll::Ready`]. Polling is the only thing a driver ever does with one.
//!
//! Three kinds of values are promises out of the box:
//!
//! - closures `FnMut() -> Poll<T>`, the terminal building block,
//! - [`Poll<T>`] itself, an immediate value handed out on the first poll,
//! - the combinators in this crate.
//!
//! # Examples
//!
//! ```rust
//! use tryseq::prelude::*;
//!
//! let mut polls = 0;
//! let mut p = move || {
//!     polls += 1;
//!     if polls < 3 { Poll::Pending } else { Poll::Ready(polls) }
//! };
//!
//! assert!(p.poll().is_pending());
//! assert!(p.poll().is_pending());
//! assert_eq!(p.poll(), Poll::Ready(3));
//! ```

use std::{any::type_name, fmt};

use either::Either;

use crate::{
    map::Map,
    poll::Poll,
    result::Fallible,
    seq::{try_seq, TrySeq},
    snapshot::{PromiseSnapshot, SeqStep},
};

/// A suspendable computation driven by repeated polling.
///
/// Implementations must resume in-flight work when polled again after `Pending`, never
/// restart it. Polling again after `Ready` is a contract violation; combinators panic.
pub trait Promise {
    /// Value produced when the promise is ready.
    type Output;

    /// Advance the computation as far as it can go without blocking.
    fn poll(&mut self) -> Poll<Self::Output>;

    /// Describe the promise's current structure without advancing it.
    fn snapshot(&self) -> PromiseSnapshot {
        PromiseSnapshot::Leaf {
            type_name: type_name::<Self>(),
        }
    }

    /// Append the steps this promise contributes when it heads a sequence into `steps`.
    ///
    /// A plain promise is a single step which is active for as long as it is alive. Sequences
    /// override this to flatten themselves, which is what makes `try_seq(try_seq(a, b), c)`
    /// report three steps instead of two.
    fn snapshot_steps(&self, steps: &mut Vec<SeqStep>) {
        steps.push(SeqStep::active(type_name::<Self>(), self.snapshot()));
    }

    /// Append the steps of this promise type once the value itself has been consumed.
    fn step_layout(steps: &mut Vec<SeqStep>)
    where
        Self: Sized,
    {
        steps.push(SeqStep::idle(type_name::<Self>()));
    }

    /// Continue with a promise built from this promise's success value.
    ///
    /// Shorthand for [`try_seq(self, next)`](crate::try_seq).
    ///
    /// ```rust
    /// use tryseq::prelude::*;
    ///
    /// let mut p = Poll::Ready(Ok::<_, Status>(20))
    ///     .try_then(|v| Poll::Ready(Ok::<_, Status>(v + 1)));
    /// assert_eq!(p.poll(), Poll::Ready(Ok(21)));
    /// ```
    fn try_then<F, N>(self, next: F) -> TrySeq<Self, F, N>
    where
        Self: Sized,
        Self::Output: Fallible,
        F: FnOnce(<Self::Output as Fallible>::Value) -> N,
        N: Promise,
        N::Output: Fallible,
        <N::Output as Fallible>::Failure: From<<Self::Output as Fallible>::Failure>,
    {
        try_seq(self, next)
    }

    /// Transform the output once it is ready.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnOnce(Self::Output) -> U,
    {
        Map::new(self, f)
    }

    /// Erase the promise's type.
    fn boxed<'a>(self) -> BoxPromise<'a, Self::Output>
    where
        Self: Sized + 'a,
    {
        BoxPromise(Box::new(self))
    }
}

impl<F, T> Promise for F
where
    F: FnMut() -> Poll<T>,
{
    type Output = T;

    #[inline]
    fn poll(&mut self) -> Poll<T> {
        self()
    }
}

/// An immediate value: ready on the first poll.
impl<T> Promise for Poll<T> {
    type Output = T;

    #[inline]
    fn poll(&mut self) -> Poll<T> {
        self.take()
    }
}

impl<L, R> Promise for Either<L, R>
where
    L: Promise,
    R: Promise<Output = L::Output>,
{
    type Output = L::Output;

    fn poll(&mut self) -> Poll<Self::Output> {
        match self {
            Either::Left(l) => l.poll(),
            Either::Right(r) => r.poll(),
        }
    }

    fn snapshot(&self) -> PromiseSnapshot {
        match self {
            Either::Left(l) => l.snapshot(),
            Either::Right(r) => r.snapshot(),
        }
    }
}

/// A type-erased promise.
///
/// Useful when a chain's length is only known at runtime, or when step functions need to
/// return different promise types. Since the erased type has no static step layout, a boxed
/// promise always reports itself as a single step.
pub struct BoxPromise<'a, T>(Box<dyn Promise<Output = T> + 'a>);

impl<T> Promise for BoxPromise<'_, T> {
    type Output = T;

    #[inline]
    fn poll(&mut self) -> Poll<T> {
        self.0.poll()
    }

    /// A boxed chain heading a sequence counts as one step; its own steps are nested in
    /// this snapshot.
    fn snapshot(&self) -> PromiseSnapshot {
        self.0.snapshot()
    }
}

impl<T> fmt::Debug for BoxPromise<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxPromise").field(&self.0.snapshot()).finish()
    }
}
