use std::any::type_name;

use crate::{poll::Poll, promise::Promise, ready, result::Fallible, snapshot::PromiseSnapshot};

/// Fold an iterator through a fallible asynchronous step.
///
/// For each element, `step(element, accumulator)` builds a promise; its success value becomes
/// the accumulator for the next element. The first failure ends the fold and no further
/// elements are pulled from the iterator. An empty iterator resolves to `init` on the first poll.
///
/// # Examples
///
/// ```
/// use tryseq::prelude::*;
///
/// let mut sum = try_seq_iter(1..=5, 0, |x: i32, acc: i32| Poll::Ready(Ok::<_, Status>(acc + x)));
/// assert_eq!(sum.poll(), Poll::Ready(Ok(15)));
/// ```
pub fn try_seq_iter<I, A, F, N>(iter: I, init: A, step: F) -> TrySeqIter<I::IntoIter, A, F, N>
where
    I: IntoIterator,
    F: FnMut(I::Item, A) -> N,
    N: Promise,
    N::Output: Fallible<Value = A>,
{
    TrySeqIter {
        iter: iter.into_iter(),
        step,
        state: State::Between(init),
        started: 0,
    }
}

/// Promise returned by [`try_seq_iter`].
pub struct TrySeqIter<I, A, F, N> {
    iter: I,
    step: F,
    state: State<A, N>,
    started: usize,
}

enum State<A, N> {
    /// Waiting to pull the next element.
    Between(A),
    Running(N),
    Done,
}

impl<I, A, F, N> TrySeqIter<I, A, F, N> {
    /// Number of elements handed to the step function so far.
    pub fn started(&self) -> usize {
        self.started
    }
}

impl<I, A, F, N> Promise for TrySeqIter<I, A, F, N>
where
    I: Iterator,
    F: FnMut(I::Item, A) -> N,
    N: Promise,
    N::Output: Fallible<Value = A>,
{
    type Output = N::Output;

    fn poll(&mut self) -> Poll<Self::Output> {
        loop {
            match &mut self.state {
                State::Between(_) => {
                    let next = self.iter.next();
                    let State::Between(acc) = std::mem::replace(&mut self.state, State::Done)
                    else {
                        unreachable!()
                    };
                    let Some(item) = next else {
                        tracing::trace!(elements = self.started, "try_seq_iter: exhausted");
                        return Poll::Ready(N::Output::from_value(acc));
                    };
                    self.started += 1;
                    self.state = State::Running((self.step)(item, acc));
                }
                State::Running(step) => match ready!(step.poll()).into_result() {
                    Ok(acc) => self.state = State::Between(acc),
                    Err(failure) => {
                        self.state = State::Done;
                        tracing::trace!(
                            element = self.started - 1,
                            step = type_name::<F>(),
                            "try_seq_iter: short-circuit"
                        );
                        return Poll::Ready(N::Output::from_failure(failure));
                    }
                },
                State::Done => panic!("`TrySeqIter` polled after completion"),
            }
        }
    }

    fn snapshot(&self) -> PromiseSnapshot {
        PromiseSnapshot::Fold {
            started: self.started,
            polling: match &self.state {
                State::Running(step) => Some(Box::new(step.snapshot())),
                State::Between(_) | State::Done => None,
            },
        }
    }
}
