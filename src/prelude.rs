//! Commonly used imports
//!
//! Use `use tryseq::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{BoxPromise, Poll, Promise};

// Result encodings
pub use crate::{Failure, Fallible, Status, StatusFlag, StatusOr, ValueOrFailure};

// Sequencing
pub use crate::seq::{try_seq, try_seq_container, try_seq_iter};

// Execution
pub use crate::driver::{drive, drive_with, DriveOptions};
