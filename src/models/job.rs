//! Job model.
//!
//! A job is a strictly ordered sequence of operations: the operation at
//! position `k` may not start before the operation at position `k - 1`
//! of the same job has finished.

use serde::{Deserialize, Serialize};

use super::Operation;

/// A job to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Operations in precedence order.
    pub operations: Vec<Operation>,
}

impl Job {
    /// Creates a new job with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            operations: Vec::new(),
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an operation after the existing ones.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Total processing time across all operations.
    pub fn total_duration(&self) -> i64 {
        self.operations.iter().map(|op| op.duration).sum()
    }

    /// Whether this job has any operations.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::new("J1")
            .with_name("Warehouse")
            .with_operation(Operation::new("R1", 3))
            .with_operation(Operation::new("R2", 2));

        assert_eq!(job.id, "J1");
        assert_eq!(job.name, "Warehouse");
        assert_eq!(job.operation_count(), 2);
        assert_eq!(job.total_duration(), 5);
        assert!(job.has_operations());
    }

    #[test]
    fn test_job_empty() {
        let job = Job::new("empty");
        assert_eq!(job.total_duration(), 0);
        assert!(!job.has_operations());
    }
}
