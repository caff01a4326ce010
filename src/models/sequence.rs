//! Candidate schedules: total orders over a problem's operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A (job, task) pair addressing one operation by dense zero-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationRef {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub task: usize,
}

impl OperationRef {
    pub fn new(job: usize, task: usize) -> Self {
        Self { job, task }
    }
}

impl From<(usize, usize)> for OperationRef {
    fn from((job, task): (usize, usize)) -> Self {
        Self::new(job, task)
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.job, self.task)
    }
}

/// An ordered sequence of operations covering a whole problem.
///
/// A sequence is only a *valid* candidate schedule when every operation
/// appears exactly once and each job's tasks appear in index order; see
/// [`validate_sequence`](crate::validation::validate_sequence). Sequences
/// produced by [`SolutionBuilder`](crate::aco::SolutionBuilder) always are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSchedule(Vec<OperationRef>);

impl CandidateSchedule {
    pub fn new(operations: Vec<OperationRef>) -> Self {
        Self(operations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationRef> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[OperationRef] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<OperationRef> {
        self.0
    }

    /// Position of `op` in the sequence.
    pub fn position(&self, op: OperationRef) -> Option<usize> {
        self.0.iter().position(|o| *o == op)
    }
}

impl From<Vec<OperationRef>> for CandidateSchedule {
    fn from(operations: Vec<OperationRef>) -> Self {
        Self(operations)
    }
}

impl From<Vec<(usize, usize)>> for CandidateSchedule {
    fn from(pairs: Vec<(usize, usize)>) -> Self {
        pairs.into_iter().map(OperationRef::from).collect()
    }
}

impl FromIterator<OperationRef> for CandidateSchedule {
    fn from_iter<I: IntoIterator<Item = OperationRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CandidateSchedule {
    type Item = &'a OperationRef;
    type IntoIter = std::slice::Iter<'a, OperationRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
