//! Optimizer error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while building a problem or running the colony.
///
/// Every variant is fatal for the call that produced it: no partial
/// schedule is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Malformed job/resource/duration data, or a sequence that is not a
    /// valid candidate schedule for the problem.
    #[error("invalid problem: {}", summarize(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// An algorithm parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The ready set ran dry (or every ready candidate was vetoed) while
    /// operations were still unplaced.
    #[error("construction stalled after placing {placed} of {total} operations")]
    ConstructionStalled { placed: usize, total: usize },

    /// Every selection weight in the ready set was non-positive.
    #[error("selection weights degenerate after placing {placed} operations")]
    DegenerateDistribution { placed: usize },
}

pub type AcoResult<T> = Result<T, AcoError>;

impl AcoError {
    pub(crate) fn parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
