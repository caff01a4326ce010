//! Schedule evaluation and KPI computation.
//!
//! # Evaluation
//!
//! `ScheduleEvaluator` replays a candidate schedule (a total order over
//! operations) into a timeline and computes its makespan. It is a pure
//! function of the problem and the sequence.
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes a timeline: makespan, gap to the problem's
//! lower bound, per-resource utilization and idle time.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod evaluator;
mod kpi;

pub use evaluator::ScheduleEvaluator;
pub use kpi::ScheduleKpi;
