use crate::{
    poll::Poll, promise::Promise, result::Fallible, seq::iter::TrySeqIter,
    snapshot::PromiseSnapshot,
};

/// Fold an owned container through a fallible asynchronous step.
///
/// Behaves like [`try_seq_iter`](crate::try_seq_iter), but takes the container by value, so
/// the promise owns every element and may be moved or stored independently of the
/// container's original owner. Each element is moved into the step function exactly once.
/// Dropping the promise early drops the elements that were never handed out.
///
/// # Examples
///
/// ```
/// use tryseq::prelude::*;
///
/// let names = vec!["ada".to_string(), "bob".to_string()];
/// let mut p = try_seq_container(names, 0, |name: String, len: usize| {
///     Poll::Ready(Ok::<_, Status>(len + name.len()))
/// });
/// assert_eq!(p.poll(), Poll::Ready(Ok(6)));
/// ```
pub fn try_seq_container<C, A, F, N>(container: C, init: A, step: F) -> TrySeqContainer<C, A, F, N>
where
    C: IntoIterator,
    F: FnMut(C::Item, A) -> N,
    N: Promise,
    N::Output: Fallible<Value = A>,
{
    TrySeqContainer {
        fold: crate::seq::try_seq_iter(container, init, step),
    }
}

/// Promise returned by [`try_seq_container`].
pub struct TrySeqContainer<C, A, F, N>
where
    C: IntoIterator,
{
    fold: TrySeqIter<C::IntoIter, A, F, N>,
}

impl<C, A, F, N> TrySeqContainer<C, A, F, N>
where
    C: IntoIterator,
{
    /// Number of elements handed to the step function so far.
    pub fn started(&self) -> usize {
        self.fold.started()
    }
}

impl<C, A, F, N> Promise for TrySeqContainer<C, A, F, N>
where
    C: IntoIterator,
    F: FnMut(C::Item, A) -> N,
    N: Promise,
    N::Output: Fallible<Value = A>,
{
    type Output = N::Output;

    #[inline]
    fn poll(&mut self) -> Poll<Self::Output> {
        self.fold.poll()
    }

    fn snapshot(&self) -> PromiseSnapshot {
        self.fold.snapshot()
    }
}
