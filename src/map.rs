//! Transforming a promise's output.

use crate::{poll::Poll, promise::Promise, ready, snapshot::PromiseSnapshot};

/// Applies a function to the output of the wrapped promise once it is ready.
///
/// Created via [`Promise::map`].
///
/// # Examples
///
/// ```
/// use tryseq::prelude::*;
///
/// let mut p = (|| Poll::Ready(20)).map(|x: i32| x.to_string());
/// assert_eq!(p.poll(), Poll::Ready("20".to_string()));
/// ```
///
/// `Poll` has an inherent `map`, so use `Promise::map(p, f)` to wrap an immediate value.
pub struct Map<P, F> {
    promise: P,
    f: Option<F>,
}

impl<P, F> Map<P, F> {
    pub(crate) fn new(promise: P, f: F) -> Self {
        Self { promise, f: Some(f) }
    }
}

impl<P, F, U> Promise for Map<P, F>
where
    P: Promise,
    F: FnOnce(P::Output) -> U,
{
    type Output = U;

    fn poll(&mut self) -> Poll<U> {
        let output = ready!(self.promise.poll());
        match self.f.take() {
            Some(f) => Poll::Ready(f(output)),
            None => panic!("`Map` polled after completion"),
        }
    }

    fn snapshot(&self) -> PromiseSnapshot {
        self.promise.snapshot()
    }
}
