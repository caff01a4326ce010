//! Makespan evaluation by timeline replay.
//!
//! # Algorithm
//!
//! Walk the sequence in order, keeping `resource_free_at` per resource slot
//! and `job_finished_at` per job. For operation `(job, task)`:
//!
//! ```text
//! start  = max(resource_free_at[resource], job_finished_at[job])
//! finish = start + duration
//! ```
//!
//! `job_finished_at[job]` is 0 until the job's first operation is placed, so
//! task 0 waits only on its resource. The makespan is the maximum
//! `job_finished_at` over all jobs.
//!
//! # Complexity
//! O(n) in the number of operations; state is rebuilt per call.

use crate::error::{AcoError, AcoResult};
use crate::models::{Assignment, CandidateSchedule, OperationRef, ProblemModel, Schedule};
use crate::validation::validate_sequence;

/// Replays candidate schedules against a problem.
///
/// Holds only a shared reference to the problem; each call allocates its own
/// timeline state, so one evaluator may be used from many threads at once.
///
/// # Example
///
/// ```
/// use aco_jssp::models::{CandidateSchedule, Job, Operation, ProblemModel};
/// use aco_jssp::scheduler::ScheduleEvaluator;
///
/// let problem = ProblemModel::new(vec![
///     Job::new("A").with_operation(Operation::new("R1", 3)),
///     Job::new("B").with_operation(Operation::new("R1", 4)),
/// ])
/// .unwrap();
/// let evaluator = ScheduleEvaluator::new(&problem);
/// let seq = CandidateSchedule::from(vec![(1, 0), (0, 0)]);
/// assert_eq!(evaluator.makespan(&seq).unwrap(), 7);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleEvaluator<'a> {
    problem: &'a ProblemModel,
}

impl<'a> ScheduleEvaluator<'a> {
    pub fn new(problem: &'a ProblemModel) -> Self {
        Self { problem }
    }

    /// Makespan of a sequence.
    ///
    /// # Errors
    /// `InvalidProblem` if `sequence` is not a valid candidate schedule for
    /// the problem.
    pub fn makespan(&self, sequence: &CandidateSchedule) -> AcoResult<i64> {
        validate_sequence(self.problem, sequence).map_err(AcoError::InvalidProblem)?;
        Ok(self.makespan_unchecked(sequence))
    }

    /// Full timeline of a sequence: one assignment per operation with
    /// concrete start and finish times, in sequence order.
    ///
    /// # Errors
    /// `InvalidProblem` if `sequence` is not a valid candidate schedule.
    pub fn timeline(&self, sequence: &CandidateSchedule) -> AcoResult<Schedule> {
        validate_sequence(self.problem, sequence).map_err(AcoError::InvalidProblem)?;

        let mut schedule = Schedule::new();
        self.replay(sequence, |op, start, end| {
            let job = &self.problem.jobs()[op.job];
            let operation = &job.operations[op.task];
            schedule.add_assignment(
                Assignment::new(op, &job.id, &operation.resource, start, end)
                    .with_label(operation.label.clone()),
            );
        });
        Ok(schedule)
    }

    /// Makespan of a sequence already known to be valid, such as one
    /// produced by a `SolutionBuilder` for the same problem.
    pub(crate) fn makespan_unchecked(&self, sequence: &CandidateSchedule) -> i64 {
        self.replay(sequence, |_, _, _| {})
    }

    fn replay(
        &self,
        sequence: &CandidateSchedule,
        mut visit: impl FnMut(OperationRef, i64, i64),
    ) -> i64 {
        let mut resource_free_at = vec![0i64; self.problem.resource_count()];
        let mut job_finished_at = vec![0i64; self.problem.job_count()];

        for &op in sequence {
            let slot = self.problem.slot(op);
            let start = resource_free_at[slot].max(job_finished_at[op.job]);
            let end = start + self.problem.duration(op);
            resource_free_at[slot] = end;
            job_finished_at[op.job] = end;
            visit(op, start, end);
        }

        job_finished_at.into_iter().max().unwrap_or(0)
    }
}
