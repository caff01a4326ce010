//! Colony optimizer: the round loop.
//!
//! # Round
//!
//! 1. Draw one seed per ant from the colony generator, in ant order.
//! 2. Build every ant's candidate schedule against the current pheromone
//!    snapshot (in parallel when configured) and evaluate its makespan.
//! 3. Evaporate the field once, then reinforce it with every schedule of
//!    the round.
//! 4. Replace the global best if the round's best is strictly better.
//!
//! The field is only read during step 2 and only written during step 3,
//! and step 3 starts after every ant of step 2 has finished.
//!
//! # Reference
//! Dorigo & Stützle (2004), "Ant Colony Optimization", Ch. 3

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ant::SolutionBuilder;
use super::config::AcoConfig;
use super::pheromone::PheromoneField;
use super::policy::OrderPolicy;
use crate::error::{AcoError, AcoResult};
use crate::models::{CandidateSchedule, ProblemModel, Schedule};
use crate::scheduler::ScheduleEvaluator;

/// Lifecycle of a colony run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyState {
    /// Constructed, no round run yet.
    Idle,
    /// `round` rounds completed (1-based).
    Running { round: usize },
    /// The round budget is spent; the global best is final.
    Converged,
}

/// Outcome of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round: usize,
    /// Best makespan among this round's ants.
    pub best_makespan: i64,
    /// Mean makespan of this round's ants.
    pub mean_makespan: f64,
    /// Global best after this round.
    pub global_best_makespan: i64,
    /// Whether this round replaced the global best.
    pub improved: bool,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcoSolution {
    /// Best candidate schedule found.
    pub sequence: CandidateSchedule,
    /// Its makespan.
    pub makespan: i64,
    /// Its replayed timeline, ready for rendering.
    pub schedule: Schedule,
    /// Rounds run.
    pub rounds: usize,
    /// Per-round summaries.
    pub history: Vec<RoundSummary>,
}

/// Ant colony optimizer for one problem.
///
/// Owns the problem and the only mutable [`PheromoneField`] of the run.
///
/// # Example
/// ```
/// use aco_jssp::aco::{AcoConfig, ColonyOptimizer, ColonyState};
/// use aco_jssp::models::ProblemModel;
///
/// let problem = ProblemModel::from_indexed(&[
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ])
/// .unwrap();
/// let config = AcoConfig::default()
///     .with_num_ants(5)
///     .with_num_rounds(10)
///     .with_seed(42);
///
/// let mut colony = ColonyOptimizer::new(problem, config).unwrap();
/// assert_eq!(colony.state(), ColonyState::Idle);
/// while colony.step().unwrap().is_some() {}
/// assert_eq!(colony.state(), ColonyState::Converged);
///
/// let solution = colony.into_solution().unwrap();
/// assert_eq!(solution.makespan, solution.schedule.makespan());
/// ```
#[derive(Debug)]
pub struct ColonyOptimizer {
    problem: ProblemModel,
    config: AcoConfig,
    pheromone: PheromoneField,
    rng: ChaCha8Rng,
    order_policy: Option<Arc<dyn OrderPolicy>>,
    state: ColonyState,
    best: Option<(CandidateSchedule, i64)>,
    history: Vec<RoundSummary>,
}

impl ColonyOptimizer {
    /// Creates an idle optimizer.
    ///
    /// # Errors
    /// `InvalidParameter` if any config value is out of range.
    pub fn new(problem: ProblemModel, config: AcoConfig) -> AcoResult<Self> {
        config.validate()?;
        let pheromone = PheromoneField::new(&problem, config.initial_pheromone)?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            problem,
            config,
            pheromone,
            rng,
            order_policy: None,
            state: ColonyState::Idle,
            best: None,
            history: Vec::new(),
        })
    }

    /// Installs a secondary ordering policy consulted by every ant.
    pub fn with_order_policy(mut self, policy: impl OrderPolicy + 'static) -> Self {
        self.order_policy = Some(Arc::new(policy));
        self
    }

    pub fn state(&self) -> ColonyState {
        self.state
    }

    pub fn problem(&self) -> &ProblemModel {
        &self.problem
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn pheromone(&self) -> &PheromoneField {
        &self.pheromone
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    pub fn best_makespan(&self) -> Option<i64> {
        self.best.as_ref().map(|(_, m)| *m)
    }

    pub fn best_sequence(&self) -> Option<&CandidateSchedule> {
        self.best.as_ref().map(|(s, _)| s)
    }

    /// Runs one round. Returns `None` once the round budget is spent.
    ///
    /// # Errors
    /// Any construction error from an ant fails the whole round. The state,
    /// history, best, generator and pheromone field are left as they were,
    /// so a later call replays the same round.
    pub fn step(&mut self) -> AcoResult<Option<RoundSummary>> {
        let round = match self.state {
            ColonyState::Converged => return Ok(None),
            ColonyState::Idle => {
                info!(
                    jobs = self.problem.job_count(),
                    operations = self.problem.total_operations(),
                    resources = self.problem.resource_count(),
                    ants = self.config.num_ants,
                    rounds = self.config.num_rounds,
                    "colony started"
                );
                1
            }
            ColonyState::Running { round } => round + 1,
        };

        let mut rng = self.rng.clone();
        let seeds: Vec<u64> = (0..self.config.num_ants).map(|_| rng.random()).collect();
        let this = &*self;
        let cohort: Vec<(CandidateSchedule, i64)> = if this.config.parallel {
            seeds
                .into_par_iter()
                .map(|seed| this.construct(seed))
                .collect::<AcoResult<_>>()?
        } else {
            seeds
                .into_iter()
                .map(|seed| this.construct(seed))
                .collect::<AcoResult<_>>()?
        };

        let (round_best_seq, round_best) = cohort
            .iter()
            .min_by_key(|(_, makespan)| *makespan)
            .map(|(seq, makespan)| (seq.clone(), *makespan))
            .ok_or_else(|| AcoError::parameter("num_ants must be at least 1"))?;
        let mean_makespan =
            cohort.iter().map(|(_, m)| *m as f64).sum::<f64>() / cohort.len() as f64;

        self.pheromone
            .update(self.config.evaporation_rate, &cohort)?;

        let improved = match &self.best {
            Some((_, best)) => round_best < *best,
            None => true,
        };
        if improved {
            self.best = Some((round_best_seq, round_best));
        }
        let global_best_makespan = self.best_makespan().unwrap_or(round_best);

        let summary = RoundSummary {
            round,
            best_makespan: round_best,
            mean_makespan,
            global_best_makespan,
            improved,
        };
        debug!(
            round,
            round_best,
            mean = mean_makespan,
            global_best = global_best_makespan,
            "round complete"
        );
        self.history.push(summary.clone());

        self.rng = rng;
        self.state = ColonyState::Running { round };
        if round >= self.config.num_rounds {
            self.state = ColonyState::Converged;
            info!(
                rounds = round,
                makespan = global_best_makespan,
                lower_bound = self.problem.lower_bound(),
                "colony converged"
            );
        }

        Ok(Some(summary))
    }

    /// Runs every remaining round and returns the global best.
    pub fn run(mut self) -> AcoResult<AcoSolution> {
        while self.step()?.is_some() {}
        self.into_solution()
    }

    /// Consumes the optimizer, returning the best schedule found so far with
    /// its timeline.
    ///
    /// # Errors
    /// `InvalidParameter` if no round has completed.
    pub fn into_solution(self) -> AcoResult<AcoSolution> {
        let (sequence, makespan) = self
            .best
            .ok_or_else(|| AcoError::parameter("no round has completed yet"))?;
        let schedule = ScheduleEvaluator::new(&self.problem).timeline(&sequence)?;

        Ok(AcoSolution {
            sequence,
            makespan,
            schedule,
            rounds: self.history.len(),
            history: self.history,
        })
    }

    /// Builds and scores one ant from its own seed.
    fn construct(&self, seed: u64) -> AcoResult<(CandidateSchedule, i64)> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let builder = SolutionBuilder::from_config(&self.problem, &self.pheromone, &self.config)
            .with_order_policy(self.order_policy.as_deref());

        let sequence = match builder.build(&mut rng) {
            Err(AcoError::DegenerateDistribution { placed })
                if self.config.construction_retries > 0 =>
            {
                warn!(placed, "selection weights degenerate, retrying with fresh pheromone");
                self.construct_fresh(&mut rng)?
            }
            result => result?,
        };

        let makespan = ScheduleEvaluator::new(&self.problem).makespan_unchecked(&sequence);
        Ok((sequence, makespan))
    }

    fn construct_fresh(&self, rng: &mut ChaCha8Rng) -> AcoResult<CandidateSchedule> {
        let fresh = self.pheromone.fresh();
        let builder = SolutionBuilder::from_config(&self.problem, &fresh, &self.config)
            .with_order_policy(self.order_policy.as_deref());

        let mut last = AcoError::DegenerateDistribution { placed: 0 };
        for _ in 0..self.config.construction_retries {
            match builder.build(rng) {
                Ok(sequence) => return Ok(sequence),
                Err(err @ AcoError::DegenerateDistribution { .. }) => last = err,
                Err(err) => return Err(err),
            }
        }
        Err(last)
    }
}
