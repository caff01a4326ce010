//! Ant colony optimization for job-shop scheduling.
//!
//! # Components
//!
//! - [`AcoConfig`]: run parameters
//! - [`PheromoneField`]: per-operation desirability, evaporated and
//!   reinforced once per round
//! - [`SolutionBuilder`]: one ant, building a precedence-feasible candidate
//!   schedule by weighted random choice
//! - [`OrderPolicy`]: optional extra ordering veto, with
//!   [`NamedActivityOrder`] as the label-based implementation
//! - [`ColonyOptimizer`]: the round loop and global best
//!
//! # Reference
//! Colorni, Dorigo, Maniezzo & Trubian (1994), "Ant system for job-shop
//! scheduling"

mod ant;
mod colony;
mod config;
mod pheromone;
mod policy;

pub use ant::SolutionBuilder;
pub use colony::{AcoSolution, ColonyOptimizer, ColonyState, RoundSummary};
pub use config::AcoConfig;
pub use pheromone::PheromoneField;
pub use policy::{NamedActivityOrder, OrderPolicy};

use crate::error::AcoResult;
use crate::models::ProblemModel;

/// Runs a full colony on `problem` and returns the best schedule found.
///
/// # Example
/// ```
/// use aco_jssp::aco::{solve, AcoConfig};
/// use aco_jssp::models::{Job, Operation, ProblemModel};
///
/// let problem = ProblemModel::new(vec![
///     Job::new("J1").with_operation(Operation::new("M1", 5)),
///     Job::new("J2").with_operation(Operation::new("M1", 8)),
/// ])
/// .unwrap();
///
/// let solution = solve(problem, AcoConfig::default().with_seed(7)).unwrap();
/// assert_eq!(solution.makespan, 13);
/// assert_eq!(solution.rounds, 100);
/// ```
pub fn solve(problem: ProblemModel, config: AcoConfig) -> AcoResult<AcoSolution> {
    ColonyOptimizer::new(problem, config)?.run()
}
