//! Pheromone field: one desirability score per operation.
//!
//! Stored flat, job-major: the entry for `(job, task)` lives at
//! `offsets[job] + task`. Only per-operation scores exist; there is no
//! origin → destination transition space.
//!
//! # Update cycle
//!
//! One round's update is [`update`](PheromoneField::update): evaporate the
//! whole field once, then reinforce with every schedule of the round. Each
//! completed update bumps [`version`](PheromoneField::version).

use super::config::{check_evaporation_rate, check_initial_pheromone};
use crate::error::{AcoError, AcoResult};
use crate::models::{CandidateSchedule, OperationRef, ProblemModel};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Mutable desirability scores, one per (job, task).
///
/// # Invariants
/// - Every entry is ≥ 0.
/// - Entries change only through evaporation (multiplicative decay) and
///   reinforcement (additive `1 / makespan`).
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    offsets: Vec<usize>,
    task_counts: Vec<usize>,
    values: Vec<f64>,
    initial: f64,
    version: u64,
}

impl PheromoneField {
    /// Allocates one entry per operation of `problem`, all set to
    /// `initial_value`.
    ///
    /// # Errors
    /// `InvalidParameter` if `initial_value` is not finite and positive.
    pub fn new(problem: &ProblemModel, initial_value: f64) -> AcoResult<Self> {
        check_initial_pheromone(initial_value)?;

        let task_counts: Vec<usize> = (0..problem.job_count())
            .map(|job| problem.task_count(job))
            .collect();
        let mut offsets = Vec::with_capacity(task_counts.len());
        let mut next = 0;
        for &count in &task_counts {
            offsets.push(next);
            next += count;
        }

        Ok(Self {
            offsets,
            task_counts,
            values: vec![initial_value; next],
            initial: initial_value,
            version: 0,
        })
    }

    /// A field of the same shape with every entry back at the initial value.
    pub fn fresh(&self) -> Self {
        Self {
            offsets: self.offsets.clone(),
            task_counts: self.task_counts.clone(),
            values: vec![self.initial; self.values.len()],
            initial: self.initial,
            version: 0,
        }
    }

    /// Desirability of operation `(job, task)`.
    ///
    /// # Panics
    /// If the operation is outside the problem the field was built for.
    #[inline]
    pub fn desirability(&self, job: usize, task: usize) -> f64 {
        self.values[self.index(OperationRef::new(job, task))]
    }

    #[inline]
    pub fn get(&self, op: OperationRef) -> f64 {
        self.values[self.index(op)]
    }

    /// Multiplies every entry by `1 - rate`.
    ///
    /// # Errors
    /// `InvalidParameter` unless `rate` is in `[0, 1)`.
    pub fn evaporate(&mut self, rate: f64) -> AcoResult<()> {
        check_evaporation_rate(rate)?;
        if rate == 0.0 {
            return Ok(());
        }
        let keep = 1.0 - rate;
        self.values.iter_mut().for_each(|v| *v *= keep);
        Ok(())
    }

    /// Adds `1 / makespan` to every operation in `schedule`.
    ///
    /// # Errors
    /// `InvalidProblem` (kind `NonPositiveMakespan`) if `makespan <= 0`, or
    /// (kind `InvalidOperationRef`) if any operation lies outside the field.
    /// The field is left untouched on error.
    pub fn reinforce(&mut self, schedule: &CandidateSchedule, makespan: i64) -> AcoResult<()> {
        check_makespan(makespan)?;
        self.check_operations(schedule)?;
        let deposit = 1.0 / makespan as f64;
        for &op in schedule {
            let i = self.index(op);
            self.values[i] += deposit;
        }
        Ok(())
    }

    /// One full update cycle: evaporate the whole field, then reinforce with
    /// every `(schedule, makespan)` of the round.
    ///
    /// All inputs are checked before anything is written, so on error the
    /// field and its version are unchanged.
    pub fn update(&mut self, rate: f64, round: &[(CandidateSchedule, i64)]) -> AcoResult<()> {
        check_evaporation_rate(rate)?;
        for (schedule, makespan) in round {
            check_makespan(*makespan)?;
            self.check_operations(schedule)?;
        }

        self.evaporate(rate)?;
        for (schedule, makespan) in round {
            self.reinforce(schedule, *makespan)?;
        }
        self.version += 1;
        Ok(())
    }

    /// Number of completed update cycles.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn initial_value(&self) -> f64 {
        self.initial
    }

    /// Number of entries (one per operation).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in job-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether `op` has an entry in this field.
    pub fn contains(&self, op: OperationRef) -> bool {
        self.task_counts
            .get(op.job)
            .is_some_and(|&count| op.task < count)
    }

    fn check_operations(&self, schedule: &CandidateSchedule) -> AcoResult<()> {
        let errors: Vec<ValidationError> = schedule
            .iter()
            .filter(|&&op| !self.contains(op))
            .map(|op| {
                ValidationError::new(
                    ValidationErrorKind::InvalidOperationRef,
                    format!("Operation {op} is outside the pheromone field"),
                )
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AcoError::InvalidProblem(errors))
        }
    }

    #[inline]
    fn index(&self, op: OperationRef) -> usize {
        self.offsets[op.job] + op.task
    }
}

fn check_makespan(makespan: i64) -> AcoResult<()> {
    if makespan <= 0 {
        return Err(AcoError::InvalidProblem(vec![ValidationError::new(
            ValidationErrorKind::NonPositiveMakespan,
            format!("Cannot reinforce with makespan {makespan}"),
        )]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, Operation};

    fn problem() -> ProblemModel {
        ProblemModel::new(vec![
            Job::new("A")
                .with_operation(Operation::new("R1", 3))
                .with_operation(Operation::new("R2", 2)),
            Job::new("B").with_operation(Operation::new("R2", 4)),
        ])
        .unwrap()
    }

    #[test]
    fn test_initialize() {
        let field = PheromoneField::new(&problem(), 0.1).unwrap();
        assert_eq!(field.len(), 3);
        assert!(field.values().iter().all(|&v| (v - 0.1).abs() < 1e-12));
        assert!((field.desirability(1, 0) - 0.1).abs() < 1e-12);
        assert_eq!(field.version(), 0);
    }

    #[test]
    fn test_rejects_bad_initial_value() {
        assert!(PheromoneField::new(&problem(), 0.0).is_err());
        assert!(PheromoneField::new(&problem(), -1.0).is_err());
    }

    #[test]
    fn test_evaporate() {
        let mut field = PheromoneField::new(&problem(), 0.4).unwrap();
        field.evaporate(0.25).unwrap();
        assert!(field.values().iter().all(|&v| (v - 0.3).abs() < 1e-12));
    }

    #[test]
    fn test_evaporate_zero_is_identity() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        field
            .reinforce(&CandidateSchedule::from(vec![(0, 0), (0, 1), (1, 0)]), 7)
            .unwrap();
        let before = field.clone();
        field.evaporate(0.0).unwrap();
        assert_eq!(field, before);
    }

    #[test]
    fn test_evaporate_rejects_rate_of_one() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        assert!(matches!(field.evaporate(1.0), Err(AcoError::InvalidParameter(_))));
        assert!(field.evaporate(1.5).is_err());
    }

    #[test]
    fn test_reinforce() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        let seq = CandidateSchedule::from(vec![(0, 0), (1, 0), (0, 1)]);
        field.reinforce(&seq, 4).unwrap();
        assert!((field.desirability(0, 0) - 0.35).abs() < 1e-12);
        assert!((field.desirability(1, 0) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_reinforce_guards_zero_makespan() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        let before = field.clone();
        let err = field
            .reinforce(&CandidateSchedule::from(vec![(0, 0)]), 0)
            .unwrap_err();
        match err {
            AcoError::InvalidProblem(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::NonPositiveMakespan)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(field, before);
    }

    #[test]
    fn test_reinforce_rejects_out_of_range_operations() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        let before = field.clone();

        // (0, 2) would alias job B's first entry.
        for seq in [vec![(0, 0), (0, 2)], vec![(5, 0)]] {
            let err = field
                .reinforce(&CandidateSchedule::from(seq), 1)
                .unwrap_err();
            match err {
                AcoError::InvalidProblem(errors) => {
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].kind, ValidationErrorKind::InvalidOperationRef);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(field, before);
        assert!((field.desirability(1, 0) - 0.1).abs() < 1e-12);
        assert!(field.contains(OperationRef::new(0, 1)));
        assert!(!field.contains(OperationRef::new(0, 2)));
    }

    #[test]
    fn test_update_rejects_out_of_range_operations() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        let before = field.clone();
        let good = CandidateSchedule::from(vec![(0, 0), (0, 1), (1, 0)]);
        let bad = CandidateSchedule::from(vec![(1, 1)]);
        assert!(field.update(0.5, &[(good, 5), (bad, 5)]).is_err());
        assert_eq!(field, before);
        assert_eq!(field.version(), 0);
    }

    #[test]
    fn test_update_evaporates_before_reinforcing() {
        let mut field = PheromoneField::new(&problem(), 0.2).unwrap();
        let seq = CandidateSchedule::from(vec![(0, 0), (0, 1), (1, 0)]);
        field
            .update(0.5, &[(seq.clone(), 10), (seq, 5)])
            .unwrap();
        // 0.2 * 0.5 + 1/10 + 1/5
        assert!((field.desirability(0, 1) - 0.4).abs() < 1e-12);
        assert_eq!(field.version(), 1);
    }

    #[test]
    fn test_update_is_atomic_on_error() {
        let mut field = PheromoneField::new(&problem(), 0.2).unwrap();
        let seq = CandidateSchedule::from(vec![(0, 0), (0, 1), (1, 0)]);
        let before = field.clone();
        assert!(field.update(0.5, &[(seq.clone(), 10), (seq, 0)]).is_err());
        assert_eq!(field, before);
    }

    #[test]
    fn test_entries_stay_non_negative() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        for _ in 0..2000 {
            field.update(0.9, &[]).unwrap();
        }
        assert!(field.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_fresh() {
        let mut field = PheromoneField::new(&problem(), 0.1).unwrap();
        field.update(0.5, &[]).unwrap();
        let fresh = field.fresh();
        assert_eq!(fresh.version(), 0);
        assert!(fresh.values().iter().all(|&v| (v - 0.1).abs() < 1e-12));
    }
}
