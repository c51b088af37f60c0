//! In-memory one-way channel whose receive side is a promise.
//!
//! Backed by [`std::sync::mpsc`], so the two halves may live on different threads. Sending
//! never blocks. Receiving returns a [`Recv`] promise that stays `Pending` until a value
//! arrives and fails with [`Code::Unavailable`](crate::Code::Unavailable) once every sender is
//! gone and the buffer is drained.

use std::sync::mpsc::{self, TryRecvError};

use crate::{
    poll::Poll,
    promise::Promise,
    status::{Status, StatusOr},
};

/// Create a connected sender/receiver pair.
pub fn pipe<T>() -> (PipeSender<T>, PipeReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (PipeSender { tx }, PipeReceiver { rx })
}

#[derive(Debug)]
pub struct PipeSender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for PipeSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> PipeSender<T> {
    /// Push a value. Fails with `Unavailable` if the receiver has been dropped.
    pub fn send(&self, value: T) -> Result<(), Status> {
        self.tx.send(value).map_err(|_| {
            tracing::trace!("pipe: send on closed pipe");
            Status::unavailable("pipe receiver dropped")
        })
    }
}

#[derive(Debug)]
pub struct PipeReceiver<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> PipeReceiver<T> {
    /// A promise for the next value.
    pub fn recv(&self) -> Recv<'_, T> {
        Recv {
            rx: &self.rx,
            done: false,
        }
    }
}

/// Promise returned by [`PipeReceiver::recv`].
#[derive(Debug)]
#[must_use = "promises do nothing unless polled"]
pub struct Recv<'a, T> {
    rx: &'a mpsc::Receiver<T>,
    done: bool,
}

impl<T> Promise for Recv<'_, T> {
    type Output = StatusOr<T>;

    fn poll(&mut self) -> Poll<StatusOr<T>> {
        assert!(!self.done, "`Recv` polled after completion");
        let received = match self.rx.try_recv() {
            Ok(value) => Ok(value),
            Err(TryRecvError::Empty) => return Poll::Pending,
            Err(TryRecvError::Disconnected) => {
                tracing::trace!("pipe: all senders dropped");
                Err(Status::unavailable("pipe closed"))
            }
        };
        self.done = true;
        Poll::Ready(received)
    }
}
