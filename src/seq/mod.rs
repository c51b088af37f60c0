//! Fallible sequencing.
//!
//! - [`try_seq`] and [`try_seq!`](crate::try_seq!) chain a fixed number of steps, each built
//!   from the previous step's success value.
//! - [`try_seq_iter`] folds a runtime-length iterator through one step function.
//! - [`try_seq_container`] does the same over a container the promise owns.
//!
//! All three stop at the first failure and report it in the result encoding of the final step.

mod container;
mod iter;
mod try_seq;

pub use container::*;
pub use iter::*;
pub use try_seq::*;
