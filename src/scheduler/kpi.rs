//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Lower bound | max(longest job, busiest resource) |
//! | Gap | (makespan - lower bound) / lower bound |
//! | Utilization | Busy time / makespan, per resource |
//! | Idle time | Makespan - busy time, per resource |
//! | Avg completion | Mean job completion time |

use std::collections::HashMap;

use crate::models::{ProblemModel, Schedule};

/// Timeline performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: i64,
    /// Makespan lower bound of the problem.
    pub lower_bound: i64,
    /// Relative distance of the makespan above the lower bound (0.0 = optimal).
    pub gap_to_lower_bound: f64,
    /// Sum of all operation durations.
    pub total_processing: i64,
    /// Average resource utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-resource utilization, including unused declared resources.
    pub utilization_by_resource: HashMap<String, f64>,
    /// Per-resource idle time within the makespan.
    pub idle_by_resource: HashMap<String, i64>,
    /// Mean job completion time.
    pub avg_completion: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a timeline and its problem.
    pub fn calculate(schedule: &Schedule, problem: &ProblemModel) -> Self {
        let makespan = schedule.makespan();
        let lower_bound = problem.lower_bound();

        let mut busy: HashMap<&str, i64> = problem
            .resources()
            .iter()
            .map(|r| (r.id.as_str(), 0))
            .collect();
        for a in &schedule.assignments {
            *busy.entry(a.resource_id.as_str()).or_insert(0) += a.duration();
        }

        let total_processing: i64 = busy.values().sum();
        let utilization_by_resource: HashMap<String, f64> = busy
            .iter()
            .map(|(&id, &b)| {
                let u = if makespan > 0 {
                    b as f64 / makespan as f64
                } else {
                    0.0
                };
                (id.to_string(), u)
            })
            .collect();
        let idle_by_resource = busy
            .iter()
            .map(|(&id, &b)| (id.to_string(), (makespan - b).max(0)))
            .collect();

        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            utilization_by_resource.values().sum::<f64>() / utilization_by_resource.len() as f64
        };

        let completions: Vec<i64> = (0..problem.job_count())
            .filter_map(|job| schedule.job_completion_time(job))
            .collect();
        let avg_completion = if completions.is_empty() {
            0.0
        } else {
            completions.iter().sum::<i64>() as f64 / completions.len() as f64
        };

        let gap_to_lower_bound = if lower_bound > 0 {
            (makespan - lower_bound) as f64 / lower_bound as f64
        } else {
            0.0
        };

        Self {
            makespan,
            lower_bound,
            gap_to_lower_bound,
            total_processing,
            avg_utilization,
            utilization_by_resource,
            idle_by_resource,
            avg_completion,
        }
    }

    /// Whether the makespan meets the lower bound (provably optimal).
    pub fn is_optimal(&self) -> bool {
        self.makespan == self.lower_bound
    }
}
