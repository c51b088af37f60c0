//! # tryseq: Fallible Sequencing for Poll-Driven Promises
//!
//! Build suspendable computations out of small steps and run them in order, stopping at
//! the first failure.
//!
//! ## Core Traits
//!
//! - **[`Promise`]**: a repeatable computation that reports [`Poll::Pending`] until it is
//!   [`Poll::Ready`]
//! - **[`Fallible`]**: the success/failure view of a result, implemented for the rich
//!   encoding (`Result<T, Status>`, [`Status`]) and the flag encoding ([`ValueOrFailure`],
//!   [`StatusFlag`])
//!
//! ## Example
//!
//! ```
//! use tryseq::prelude::*;
//!
//! let mut fetched = false;
//! let fetch = move || {
//!     // Pretend the first poll finds nothing yet.
//!     if !std::mem::replace(&mut fetched, true) {
//!         return Poll::Pending;
//!     }
//!     Poll::Ready(Ok::<_, Status>("42"))
//! };
//!
//! let mut p = tryseq::try_seq!(
//!     fetch,
//!     |text: &str| {
//!         let parsed = text.parse::<u32>();
//!         Poll::Ready(parsed.map_err(|e| Status::invalid_argument(e.to_string())))
//!     },
//!     |n: u32| Poll::Ready(Ok::<_, Status>(n * 2)),
//! );
//!
//! assert!(p.poll().is_pending());
//! assert_eq!(p.poll(), Poll::Ready(Ok(84)));
//! ```
//!
//! ## Common Functions
//!
//! **Sequencing:**
//! - [`try_seq(first, next)`](try_seq) and [`try_seq!`] - fixed chains of steps
//! - [`try_seq_iter(iter, init, step)`](try_seq_iter) - fold an iterator
//! - [`try_seq_container(container, init, step)`](try_seq_container) - fold an owned container
//!
//! **Execution:**
//! - [`drive(promise)`](driver::drive) - poll on the current thread until ready
//! - [`PromiseFuture`](driver::PromiseFuture) - poll from an async runtime
//!
//! **Introspection:**
//! - [`Promise::snapshot`] - see which step of a chain is being polled

mod flag;
mod map;
mod poll;
mod promise;
mod result;
mod seq;
mod snapshot;
mod status;

pub mod driver;
pub mod pipe;
pub mod prelude;

pub use flag::*;
pub use map::*;
pub use poll::*;
pub use promise::*;
pub use result::*;
pub use seq::*;
pub use snapshot::*;
pub use status::*;
