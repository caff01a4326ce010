//! Job-shop domain models.
//!
//! Provides the data types for describing a job-shop instance and its
//! solutions.
//!
//! # Domain Mappings
//!
//! | aco-jssp | Manufacturing | Construction |
//! |----------|--------------|--------------|
//! | Job | Order | Project / Site |
//! | Operation | Routing step | Activity |
//! | Resource | Machine | Team / Crew |
//! | Schedule | Production plan | Site timeline |

mod job;
mod operation;
mod problem;
mod resource;
mod schedule;
mod sequence;

pub use job::Job;
pub use operation::Operation;
pub use problem::{ProblemBuilder, ProblemModel, ProblemSpec};
pub use resource::Resource;
pub use schedule::{Assignment, Schedule};
pub use sequence::{CandidateSchedule, OperationRef};
