//! Optional secondary ordering constraints consulted during construction.
//!
//! Index order within a job is always enforced. An [`OrderPolicy`] can veto
//! additional placements, e.g. when operations carry activity labels whose
//! canonical order must also hold.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::models::ProblemModel;

/// A veto on placing one operation of a job after another.
///
/// Policies are shared by every ant of a round, possibly across threads.
pub trait OrderPolicy: Send + Sync + Debug {
    /// Whether placing `task_b` of `job` after the already-placed `task_a`
    /// of the same job violates the ordering.
    fn is_order_violation(&self, job: usize, task_a: usize, task_b: usize) -> bool;
}

/// Ranks operations by their activity label against a canonical list.
///
/// Placing `task_b` after `task_a` is a violation when both labels appear in
/// the canonical list and `task_a`'s label ranks later than `task_b`'s.
/// Unlabeled operations and labels missing from the list are unconstrained.
///
/// # Example
/// ```
/// use aco_jssp::aco::{NamedActivityOrder, OrderPolicy};
/// use aco_jssp::models::{Job, Operation, ProblemModel};
///
/// let problem = ProblemModel::new(vec![Job::new("Site")
///     .with_operation(Operation::new("Crew", 2).with_label("Roof"))
///     .with_operation(Operation::new("Crew", 3).with_label("Foundation"))])
/// .unwrap();
/// let order = NamedActivityOrder::new(&problem, ["Foundation", "Walls", "Roof"]);
/// assert!(order.is_order_violation(0, 0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct NamedActivityOrder {
    ranks: Vec<Vec<Option<usize>>>,
}

impl NamedActivityOrder {
    /// Builds rank tables for every operation of `problem`.
    ///
    /// If a label appears more than once in `canonical`, its first position
    /// is used.
    pub fn new<I, S>(problem: &ProblemModel, canonical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_label: HashMap<String, usize> = HashMap::new();
        for (rank, label) in canonical.into_iter().enumerate() {
            by_label.entry(label.as_ref().to_string()).or_insert(rank);
        }

        let ranks = problem
            .jobs()
            .iter()
            .map(|job| {
                job.operations
                    .iter()
                    .map(|op| op.label.as_deref().and_then(|l| by_label.get(l).copied()))
                    .collect()
            })
            .collect();

        Self { ranks }
    }

    /// Canonical rank of an operation's label, if it has one.
    pub fn rank(&self, job: usize, task: usize) -> Option<usize> {
        self.ranks.get(job)?.get(task).copied().flatten()
    }
}

impl OrderPolicy for NamedActivityOrder {
    fn is_order_violation(&self, job: usize, task_a: usize, task_b: usize) -> bool {
        match (self.rank(job, task_a), self.rank(job, task_b)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation};

    fn site() -> ProblemModel {
        ProblemModel::new(vec![Job::new("Site")
            .with_operation(Operation::new("C1", 1).with_label("Foundation"))
            .with_operation(Operation::new("C2", 1))
            .with_operation(Operation::new("C1", 1).with_label("Roof"))
            .with_operation(Operation::new("C2", 1).with_label("Survey"))])
        .unwrap()
    }

    #[test]
    fn test_ranks() {
        let order = NamedActivityOrder::new(&site(), ["Survey", "Foundation", "Roof"]);
        assert_eq!(order.rank(0, 0), Some(1));
        assert_eq!(order.rank(0, 1), None);
        assert_eq!(order.rank(0, 3), Some(0));
        assert_eq!(order.rank(5, 0), None);
    }

    #[test]
    fn test_violation() {
        let order = NamedActivityOrder::new(&site(), ["Survey", "Foundation", "Roof"]);
        // Foundation then Roof: fine.
        assert!(!order.is_order_violation(0, 0, 2));
        // Foundation then Survey: Survey ranks earlier.
        assert!(order.is_order_violation(0, 0, 3));
        // Unlabeled operations never conflict.
        assert!(!order.is_order_violation(0, 1, 3));
    }

    #[test]
    fn test_duplicate_canonical_labels_use_first_rank() {
        let order = NamedActivityOrder::new(&site(), ["Foundation", "Roof", "Foundation"]);
        assert_eq!(order.rank(0, 0), Some(0));
    }
}
