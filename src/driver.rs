//! Functions for driving promises to completion.
//!
//! Promises never block on their own; something has to poll them. This module provides a
//! synchronous driver for the current thread and a [`Future`] adapter for async runtimes.

use std::{
    future::Future,
    pin::Pin,
    task::{self, Context},
    time::Duration,
};

use serde::Deserialize;

use crate::{poll::Poll, promise::Promise};

/// What the synchronous driver does between two polls that returned `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Idle {
    /// Poll again immediately.
    #[default]
    Spin,
    /// Give up the rest of the time slice.
    Yield,
    /// Sleep for a fixed number of microseconds.
    Sleep { micros: u64 },
}

impl Idle {
    fn pause(self) {
        match self {
            Idle::Spin => std::hint::spin_loop(),
            Idle::Yield => std::thread::yield_now(),
            Idle::Sleep { micros } => std::thread::sleep(Duration::from_micros(micros)),
        }
    }
}

/// Settings for [`drive_with`].
///
/// Deserializable so embedders can keep it in their own configuration files. Missing fields
/// take their defaults: no poll budget, spin between polls.
///
/// ```
/// use tryseq::driver::{DriveOptions, Idle};
///
/// let json = r#"{ "max_polls": 100, "idle": { "strategy": "sleep", "micros": 50 } }"#;
/// let options: DriveOptions = serde_json::from_str(json).unwrap();
/// assert_eq!(options.max_polls, Some(100));
/// assert_eq!(options.idle, Idle::Sleep { micros: 50 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveOptions {
    /// Give up after this many polls.
    pub max_polls: Option<usize>,
    pub idle: Idle,
}

impl DriveOptions {
    pub fn with_max_polls(mut self, max_polls: usize) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    pub fn with_idle(mut self, idle: Idle) -> Self {
        self.idle = idle;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    #[error("promise still pending after {polls} polls")]
    BudgetExhausted { polls: usize },
}

/// Poll a promise on the current thread until it is ready.
///
/// Spins between polls. Use [`drive_with`] for a poll budget or a gentler idle strategy.
///
/// ```rust
/// use tryseq::prelude::*;
///
/// let mut left = 3;
/// let countdown = move || {
///     left -= 1;
///     if left == 0 { Poll::Ready("liftoff") } else { Poll::Pending }
/// };
/// assert_eq!(drive(countdown), "liftoff");
/// ```
pub fn drive<P: Promise>(mut promise: P) -> P::Output {
    let mut polls = 0usize;
    loop {
        polls += 1;
        if let Poll::Ready(output) = promise.poll() {
            tracing::debug!(polls, "promise resolved");
            return output;
        }
        std::hint::spin_loop();
    }
}

/// Poll a promise on the current thread until it is ready or the poll budget runs out.
///
/// On [`DriveError::BudgetExhausted`] the promise has been dropped, which cancels it.
pub fn drive_with<P: Promise>(
    mut promise: P,
    options: DriveOptions,
) -> Result<P::Output, DriveError> {
    let mut polls = 0usize;
    loop {
        if options.max_polls.is_some_and(|max| polls >= max) {
            tracing::warn!(polls, snapshot = ?promise.snapshot(), "poll budget exhausted");
            return Err(DriveError::BudgetExhausted { polls });
        }
        polls += 1;
        if let Poll::Ready(output) = promise.poll() {
            tracing::debug!(polls, "promise resolved");
            return Ok(output);
        }
        options.idle.pause();
    }
}

/// Adapts a promise into a [`Future`].
///
/// A promise has no way to register interest in an event, so every `Pending` wakes the task
/// again right away. The future is ready as soon as the promise is.
///
/// Requires `Unpin`; wrap a self-referential promise with [`Promise::boxed`] first.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct PromiseFuture<P> {
    promise: P,
}

impl<P> PromiseFuture<P> {
    pub fn new(promise: P) -> Self {
        Self { promise }
    }

    pub fn into_inner(self) -> P {
        self.promise
    }
}

impl<P> Future for PromiseFuture<P>
where
    P: Promise + Unpin,
{
    type Output = P::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> task::Poll<P::Output> {
        match self.get_mut().promise.poll() {
            Poll::Ready(output) => task::Poll::Ready(output),
            Poll::Pending => {
                cx.waker().wake_by_ref();
                task::Poll::Pending
            }
        }
    }
}

/// Async version of [`drive`].
pub async fn drive_async<P>(promise: P) -> P::Output
where
    P: Promise + Unpin,
{
    PromiseFuture::new(promise).await
}
