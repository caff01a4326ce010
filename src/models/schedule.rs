//! Timeline model.
//!
//! A [`Schedule`] is the replayed form of a candidate schedule: one
//! [`Assignment`] per operation with concrete start and finish times, in
//! sequence order. It is what a Gantt-style renderer consumes, so nothing
//! downstream has to recompute the timeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CandidateSchedule, OperationRef};

/// A complete timeline for one candidate schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in the order the operations were placed.
    pub assignments: Vec<Assignment>,
}

/// An operation-resource-time assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job index.
    pub job: usize,
    /// Operation index within the job.
    pub task: usize,
    /// Job ID (denormalized for rendering).
    pub job_id: String,
    /// Resource ID.
    pub resource_id: String,
    /// Start time.
    pub start: i64,
    /// Finish time.
    pub end: i64,
    /// Activity label, if the operation has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        op: OperationRef,
        job_id: impl Into<String>,
        resource_id: impl Into<String>,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            job: op.job,
            task: op.task,
            job_id: job_id.into(),
            resource_id: resource_id.into(),
            start,
            end,
            label: None,
        }
    }

    /// Sets the activity label.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// The operation this assignment places.
    #[inline]
    pub fn operation(&self) -> OperationRef {
        OperationRef::new(self.job, self.task)
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether this assignment overlaps `other` in time.
    pub fn overlaps(&self, other: &Assignment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Makespan: latest end time across all assignments.
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// The placement order as a candidate schedule.
    pub fn sequence(&self) -> CandidateSchedule {
        self.assignments.iter().map(Assignment::operation).collect()
    }

    /// Finds the assignment for an operation.
    pub fn assignment_for(&self, op: OperationRef) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.operation() == op)
    }

    /// Returns all assignments for a job, in task order.
    pub fn assignments_for_job(&self, job: usize) -> Vec<&Assignment> {
        let mut found: Vec<&Assignment> =
            self.assignments.iter().filter(|a| a.job == job).collect();
        found.sort_by_key(|a| a.task);
        found
    }

    /// Returns all assignments for a resource, in start-time order.
    pub fn assignments_for_resource(&self, resource_id: &str) -> Vec<&Assignment> {
        let mut found: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.resource_id == resource_id)
            .collect();
        found.sort_by_key(|a| a.start);
        found
    }

    /// Computes resource utilization: busy_time / horizon.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn resource_utilization(&self, resource_id: &str, horizon: i64) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments_for_resource(resource_id)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Computes utilization for all resources that have assignments,
    /// using the makespan as horizon.
    pub fn all_utilizations(&self) -> HashMap<String, f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return HashMap::new();
        }

        let mut busy: HashMap<String, i64> = HashMap::new();
        for a in &self.assignments {
            *busy.entry(a.resource_id.clone()).or_insert(0) += a.duration();
        }

        busy.into_iter()
            .map(|(id, b)| (id, b as f64 / horizon as f64))
            .collect()
    }

    /// Completion time of a job (latest end of its assignments).
    pub fn job_completion_time(&self, job: usize) -> Option<i64> {
        self.assignments
            .iter()
            .filter(|a| a.job == job)
            .map(|a| a.end)
            .max()
    }

    /// Whether any two assignments on the same resource overlap.
    pub fn has_resource_conflict(&self) -> bool {
        let mut by_resource: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        for a in &self.assignments {
            by_resource.entry(a.resource_id.as_str()).or_default().push(a);
        }
        by_resource.values_mut().any(|list| {
            list.sort_by_key(|a| a.start);
            list.windows(2).any(|w| w[0].overlaps(w[1]))
        })
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(job: usize, task: usize) -> OperationRef {
        OperationRef::new(job, task)
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(op(0, 0), "A", "R1", 0, 3));
        s.add_assignment(Assignment::new(op(1, 0), "B", "R2", 0, 4));
        s.add_assignment(Assignment::new(op(0, 1), "A", "R2", 4, 6));
        s.add_assignment(Assignment::new(op(1, 1), "B", "R1", 4, 5));
        s
    }

    #[test]
    fn test_schedule_makespan() {
        assert_eq!(sample_schedule().makespan(), 6);
    }

    #[test]
    fn test_sequence() {
        let seq = sample_schedule().sequence();
        assert_eq!(seq, CandidateSchedule::from(vec![(0, 0), (1, 0), (0, 1), (1, 1)]));
    }

    #[test]
    fn test_assignment_for() {
        let s = sample_schedule();
        let a = s.assignment_for(op(0, 1)).unwrap();
        assert_eq!(a.resource_id, "R2");
        assert_eq!(a.duration(), 2);
        assert!(s.assignment_for(op(9, 0)).is_none());
    }

    #[test]
    fn test_assignments_for_job_and_resource() {
        let s = sample_schedule();
        let a = s.assignments_for_job(0);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].task, 0);

        let r1 = s.assignments_for_resource("R1");
        assert_eq!(r1.len(), 2);
        assert!(r1[0].start <= r1[1].start);
    }

    #[test]
    fn test_resource_utilization() {
        let s = sample_schedule();
        // R1: busy 3 + 1 = 4 over horizon 6
        let u = s.resource_utilization("R1", 6).unwrap();
        assert!((u - 4.0 / 6.0).abs() < 1e-10);
        assert!(s.resource_utilization("R1", 0).is_none());

        let all = s.all_utilizations();
        assert!((all["R2"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_job_completion_time() {
        let s = sample_schedule();
        assert_eq!(s.job_completion_time(0), Some(6));
        assert_eq!(s.job_completion_time(1), Some(5));
        assert_eq!(s.job_completion_time(2), None);
    }

    #[test]
    fn test_resource_conflict_detection() {
        let s = sample_schedule();
        assert!(!s.has_resource_conflict());

        let mut bad = sample_schedule();
        bad.add_assignment(Assignment::new(op(2, 0), "C", "R1", 2, 4));
        assert!(bad.has_resource_conflict());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert_eq!(s.makespan(), 0);
        assert_eq!(s.assignment_count(), 0);
        assert!(s.all_utilizations().is_empty());
    }
}
