//! Colony configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AcoError, AcoResult};

/// Parameters for a colony run.
///
/// # Example
///
/// ```
/// use aco_jssp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(20)
///     .with_num_rounds(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert!(config.with_evaporation_rate(1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Ants (candidate schedules) per round.
    pub num_ants: usize,
    /// Number of rounds. The only termination criterion.
    pub num_rounds: usize,
    /// Pheromone weight in the selection rule.
    pub alpha: f64,
    /// Heuristic weight in the selection rule.
    pub beta: f64,
    /// Fraction of pheromone removed each round, in `[0, 1)`.
    pub evaporation_rate: f64,
    /// Starting desirability of every operation.
    pub initial_pheromone: f64,
    /// Seed for the colony's generator. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Build each round's ants on the rayon thread pool.
    pub parallel: bool,
    /// How many times an ant whose selection weights degenerate is retried
    /// against fresh initial pheromone before the run fails.
    pub construction_retries: usize,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 10,
            num_rounds: 100,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            initial_pheromone: 0.1,
            seed: None,
            parallel: true,
            construction_retries: 1,
        }
    }
}

impl AcoConfig {
    pub fn with_num_ants(mut self, num_ants: usize) -> Self {
        self.num_ants = num_ants;
        self
    }

    pub fn with_num_rounds(mut self, num_rounds: usize) -> Self {
        self.num_rounds = num_rounds;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = value;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_construction_retries(mut self, retries: usize) -> Self {
        self.construction_retries = retries;
        self
    }

    /// Checks every parameter range.
    ///
    /// # Errors
    /// `InvalidParameter` naming the first offending parameter.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_ants == 0 {
            return Err(AcoError::parameter("num_ants must be at least 1"));
        }
        if self.num_rounds == 0 {
            return Err(AcoError::parameter("num_rounds must be at least 1"));
        }
        check_weight("alpha", self.alpha)?;
        check_weight("beta", self.beta)?;
        check_evaporation_rate(self.evaporation_rate)?;
        check_initial_pheromone(self.initial_pheromone)?;
        Ok(())
    }
}

fn check_weight(name: &str, value: f64) -> AcoResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AcoError::parameter(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn check_evaporation_rate(rate: f64) -> AcoResult<()> {
    if !(0.0..1.0).contains(&rate) {
        return Err(AcoError::parameter(format!(
            "evaporation_rate must be in [0, 1), got {rate}"
        )));
    }
    Ok(())
}

pub(crate) fn check_initial_pheromone(value: f64) -> AcoResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AcoError::parameter(format!(
            "initial_pheromone must be finite and positive, got {value}"
        )));
    }
    Ok(())
}
