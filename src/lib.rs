//! Job-shop scheduling by ant colony optimization.
//!
//! Jobs are fixed sequences of operations, each needing one resource for a
//! fixed duration. A colony of ants repeatedly builds precedence-feasible
//! operation orders, guided by a per-operation pheromone field and a
//! shortest-finish heuristic, and the shortest makespan found is kept.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Operation`, `Resource`,
//!   `ProblemModel`, `CandidateSchedule`, `Schedule`
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   resources, non-positive durations, sequence feasibility)
//! - **`scheduler`**: Makespan evaluation, timeline replay and KPIs
//! - **`aco`**: Pheromone field, ant construction and the colony loop
//! - **`instance`**: JSON problem files
//!
//! # Example
//!
//! ```
//! use aco_jssp::aco::{solve, AcoConfig};
//! use aco_jssp::models::ProblemModel;
//!
//! let problem = ProblemModel::from_indexed(&[
//!     vec![(0, 3), (1, 2), (2, 2)],
//!     vec![(0, 2), (2, 1), (1, 4)],
//!     vec![(1, 4), (2, 3)],
//! ])
//! .unwrap();
//!
//! let config = AcoConfig::default().with_num_rounds(20).with_seed(42);
//! let solution = solve(problem.clone(), config).unwrap();
//! assert!(solution.makespan >= problem.lower_bound());
//! ```
//!
//! # References
//!
//! - Colorni et al. (1994), "Ant system for job-shop scheduling"
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod aco;
pub mod error;
pub mod instance;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{AcoError, AcoResult};
