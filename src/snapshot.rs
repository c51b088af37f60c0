//! Structural snapshots of live promises.
//!
//! A snapshot records what a promise is made of and which part of it is currently being
//! polled. Taking one only reads the promise; it never advances it. The types serialize with
//! `serde` so diagnostics tooling can render them however it likes.

use serde::Serialize;

/// Shape of a promise at the moment the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromiseSnapshot {
    /// A promise with no visible structure, usually a closure.
    Leaf { type_name: &'static str },
    /// A [`TrySeq`](crate::TrySeq) chain, flattened into its steps.
    Seq { steps: Vec<SeqStep> },
    /// A [`TrySeqIter`](crate::TrySeqIter) or [`TrySeqContainer`](crate::TrySeqContainer) fold.
    Fold {
        /// Elements handed to the step function so far.
        started: usize,
        /// The promise built for the current element, if one is in flight.
        polling: Option<Box<PromiseSnapshot>>,
    },
}

impl PromiseSnapshot {
    /// The steps of a sequence snapshot, or `None` for other shapes.
    pub fn steps(&self) -> Option<&[SeqStep]> {
        match self {
            PromiseSnapshot::Seq { steps } => Some(steps),
            _ => None,
        }
    }

    /// Index of the step currently being polled, if this is a sequence with an active step.
    pub fn active_step(&self) -> Option<usize> {
        self.steps()?.iter().position(SeqStep::is_active)
    }
}

/// One step of a flattened sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeqStep {
    /// Type of the promise (first step) or step function (later steps).
    pub type_name: &'static str,
    /// Snapshot of the step's promise while it is the active one.
    pub polling: Option<PromiseSnapshot>,
}

impl SeqStep {
    /// A step that is not being polled.
    pub fn idle(type_name: &'static str) -> Self {
        Self {
            type_name,
            polling: None,
        }
    }

    /// A step whose promise is being polled.
    pub fn active(type_name: &'static str, polling: PromiseSnapshot) -> Self {
        Self {
            type_name,
            polling: Some(polling),
        }
    }

    pub fn is_active(&self) -> bool {
        self.polling.is_some()
    }
}
