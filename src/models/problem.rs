//! Problem model and builder.
//!
//! [`ProblemModel`] is the immutable description of a job-shop instance:
//! jobs, their ordered operations, and the distinct resource set with a
//! stable resource → slot mapping. It is validated once on construction
//! and read concurrently by every ant for the rest of the run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Job, Operation, OperationRef, Resource};
use crate::error::{AcoError, AcoResult};
use crate::validation::{validate_jobs, ValidationError, ValidationErrorKind};

/// Compact per-operation data for hot loops.
#[derive(Debug, Clone, Copy)]
struct OperationInfo {
    slot: usize,
    duration: i64,
}

/// Immutable job-shop problem.
///
/// # Invariants
/// - At least one job; every job has at least one operation.
/// - Every duration is positive.
/// - Every operation's resource belongs to [`resources`](Self::resources).
/// - Job and task indices are dense and zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProblemSpec", into = "ProblemSpec")]
pub struct ProblemModel {
    jobs: Vec<Job>,
    resources: Vec<Resource>,
    slots: HashMap<String, usize>,
    infos: Vec<Vec<OperationInfo>>,
    total: usize,
}

/// Serialized form of a problem: jobs plus an optional resource list.
///
/// When `resources` is omitted, the resource set is derived from the
/// operations in first-appearance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub jobs: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

impl ProblemModel {
    /// Builds a problem, deriving the resource set from the operations.
    ///
    /// Resources are assigned slots in order of first appearance
    /// (job-major, then task order).
    ///
    /// # Errors
    /// `InvalidProblem` if there are no jobs, any job is empty, any
    /// duration is not positive, the durations sum past `i64::MAX`, or any
    /// resource ID is blank.
    pub fn new(jobs: Vec<Job>) -> AcoResult<Self> {
        validate_jobs(&jobs, None).map_err(AcoError::InvalidProblem)?;

        let mut resources = Vec::new();
        let mut seen = HashMap::new();
        for op in jobs.iter().flat_map(|j| &j.operations) {
            if !seen.contains_key(op.resource.as_str()) {
                seen.insert(op.resource.clone(), resources.len());
                resources.push(Resource::new(op.resource.clone()));
            }
        }

        Ok(Self::assemble(jobs, resources))
    }

    /// Builds a problem against an explicitly declared resource set.
    ///
    /// Declared resources keep their declaration order as slot order and
    /// may include resources no operation uses.
    ///
    /// # Errors
    /// `InvalidProblem` on any job error (see [`new`](Self::new)), on
    /// duplicate or blank resource IDs, or on references to undeclared
    /// resources.
    pub fn with_resources(jobs: Vec<Job>, resources: Vec<Resource>) -> AcoResult<Self> {
        validate_jobs(&jobs, Some(&resources)).map_err(AcoError::InvalidProblem)?;
        Ok(Self::assemble(jobs, resources))
    }

    /// Builds a problem from integer team numbers: `jobs[j][t] = (team, duration)`.
    ///
    /// The resource set spans `0..=max team`, each named `Team k`. Job `j`
    /// gets ID `j` and name `Project j`.
    pub fn from_indexed(jobs: &[Vec<(usize, i64)>]) -> AcoResult<Self> {
        let team_count = jobs
            .iter()
            .flatten()
            .map(|&(team, _)| team + 1)
            .max()
            .unwrap_or(0);
        let resources = (0..team_count).map(Resource::indexed).collect();
        let jobs = jobs
            .iter()
            .enumerate()
            .map(|(j, ops)| {
                ops.iter().fold(
                    Job::new(j.to_string()).with_name(format!("Project {j}")),
                    |job, &(team, duration)| {
                        job.with_operation(Operation::new(team.to_string(), duration))
                    },
                )
            })
            .collect();
        Self::with_resources(jobs, resources)
    }

    fn assemble(jobs: Vec<Job>, resources: Vec<Resource>) -> Self {
        let slots: HashMap<String, usize> = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let infos: Vec<Vec<OperationInfo>> = jobs
            .iter()
            .map(|job| {
                job.operations
                    .iter()
                    .map(|op| OperationInfo {
                        slot: slots[op.resource.as_str()],
                        duration: op.duration,
                    })
                    .collect()
            })
            .collect();
        let total = infos.iter().map(Vec::len).sum();

        Self {
            jobs,
            resources,
            slots,
            infos,
            total,
        }
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of operations in `job` (0 if the job does not exist).
    pub fn task_count(&self, job: usize) -> usize {
        self.infos.get(job).map_or(0, Vec::len)
    }

    /// Number of operations across all jobs.
    pub fn total_operations(&self) -> usize {
        self.total
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job: usize) -> Option<&Job> {
        self.jobs.get(job)
    }

    pub fn operation(&self, op: OperationRef) -> Option<&Operation> {
        self.jobs.get(op.job)?.operations.get(op.task)
    }

    /// Distinct resources, indexed by slot.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Slot assigned to a resource ID.
    pub fn slot_of(&self, resource_id: &str) -> Option<usize> {
        self.slots.get(resource_id).copied()
    }

    /// Resource slot of an operation.
    ///
    /// # Panics
    /// If `op` is out of range.
    #[inline]
    pub fn slot(&self, op: OperationRef) -> usize {
        self.infos[op.job][op.task].slot
    }

    /// Duration of an operation.
    ///
    /// # Panics
    /// If `op` is out of range.
    #[inline]
    pub fn duration(&self, op: OperationRef) -> i64 {
        self.infos[op.job][op.task].duration
    }

    /// All operations in job-major, task-minor order.
    ///
    /// This order is itself a valid candidate schedule.
    pub fn operation_refs(&self) -> impl Iterator<Item = OperationRef> + '_ {
        self.infos
            .iter()
            .enumerate()
            .flat_map(|(job, ops)| (0..ops.len()).map(move |task| OperationRef::new(job, task)))
    }

    /// Total processing time bound to each resource slot.
    pub fn resource_loads(&self) -> Vec<i64> {
        let mut loads = vec![0; self.resources.len()];
        for info in self.infos.iter().flatten() {
            loads[info.slot] += info.duration;
        }
        loads
    }

    /// Makespan lower bound: the longer of the longest job and the busiest
    /// resource. No schedule can finish earlier.
    pub fn lower_bound(&self) -> i64 {
        let longest_job = self.jobs.iter().map(Job::total_duration).max().unwrap_or(0);
        let busiest = self.resource_loads().into_iter().max().unwrap_or(0);
        longest_job.max(busiest)
    }
}

impl TryFrom<ProblemSpec> for ProblemModel {
    type Error = AcoError;

    fn try_from(spec: ProblemSpec) -> AcoResult<Self> {
        match spec.resources {
            Some(resources) => Self::with_resources(spec.jobs, resources),
            None => Self::new(spec.jobs),
        }
    }
}

impl From<ProblemModel> for ProblemSpec {
    fn from(problem: ProblemModel) -> Self {
        Self {
            jobs: problem.jobs,
            resources: Some(problem.resources),
        }
    }
}

/// Incremental problem builder for form-style data entry.
///
/// Each operation is checked as it is added, so a caller collecting
/// rows one at a time gets the error for the offending row immediately.
/// [`build`](Self::build) freezes the accumulated data into a
/// [`ProblemModel`].
///
/// # Example
/// ```
/// use aco_jssp::models::ProblemBuilder;
///
/// let mut builder = ProblemBuilder::new();
/// let site = builder.add_job("Site A");
/// builder.add_operation(site, "Crew 1", Some("Foundation"), 3).unwrap();
/// builder.add_operation(site, "Crew 2", Some("Framing"), 2).unwrap();
/// assert!(builder.add_operation(site, "Crew 1", None, 0).is_err());
///
/// let problem = builder.build().unwrap();
/// assert_eq!(problem.total_operations(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    jobs: Vec<Job>,
    resources: Vec<Resource>,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a resource up front. Once any resource is declared, every
    /// operation must reference a declared one.
    pub fn declare_resource(&mut self, resource: Resource) -> AcoResult<()> {
        if !resource.is_well_formed() {
            return Err(single(
                ValidationErrorKind::MalformedResource,
                format!("Declared resource has a blank ID: {:?}", resource.id),
            ));
        }
        if self.resources.iter().any(|r| r.id == resource.id) {
            return Err(single(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", resource.id),
            ));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Starts a new job and returns its index.
    pub fn add_job(&mut self, id: impl Into<String>) -> usize {
        self.jobs.push(Job::new(id));
        self.jobs.len() - 1
    }

    /// Appends a (resource, label, duration) row to job `job`.
    pub fn add_operation(
        &mut self,
        job: usize,
        resource: &str,
        label: Option<&str>,
        duration: i64,
    ) -> AcoResult<()> {
        if job >= self.jobs.len() {
            return Err(single(
                ValidationErrorKind::InvalidOperationRef,
                format!("No job at index {job}"),
            ));
        }
        if resource.trim().is_empty() {
            return Err(single(
                ValidationErrorKind::MalformedResource,
                format!("Operation for job '{}' has a blank resource", self.jobs[job].id),
            ));
        }
        if duration <= 0 {
            return Err(single(
                ValidationErrorKind::NonPositiveDuration,
                format!(
                    "Operation for job '{}' has duration {duration}",
                    self.jobs[job].id
                ),
            ));
        }
        if !self.resources.is_empty() && !self.resources.iter().any(|r| r.id == resource) {
            return Err(single(
                ValidationErrorKind::UnknownResource,
                format!("Unknown resource '{resource}'"),
            ));
        }

        let mut op = Operation::new(resource, duration);
        op.label = label.map(str::to_string);
        self.jobs[job].operations.push(op);
        Ok(())
    }

    /// Number of jobs started so far.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Freezes the accumulated rows into a problem model.
    pub fn build(self) -> AcoResult<ProblemModel> {
        if self.resources.is_empty() {
            ProblemModel::new(self.jobs)
        } else {
            ProblemModel::with_resources(self.jobs, self.resources)
        }
    }
}

fn single(kind: ValidationErrorKind, message: String) -> AcoError {
    AcoError::InvalidProblem(vec![ValidationError::new(kind, message)])
}
