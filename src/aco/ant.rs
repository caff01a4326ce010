//! Stochastic construction of one candidate schedule (one ant).
//!
//! # Algorithm
//!
//! 1. The ready set starts with every job's first operation.
//! 2. Each ready operation `o` gets weight
//!    `w(o) = τ(o)^α · (1 / (load[resource(o)] + duration(o)))^β`,
//!    where `τ` is the pheromone desirability and `load` is the processing
//!    time already placed on the resource in this pass.
//! 3. One operation is drawn with probability proportional to its weight.
//! 4. If an order policy vetoes the draw, that operation is excluded for
//!    this step and the draw is repeated over the rest.
//! 5. The chosen operation is appended, its resource load grows by its
//!    duration, and its job successor (if any) becomes ready.
//!
//! # Complexity
//! O(n · j) per schedule, n = operations, j = jobs (ready set size).

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use super::config::AcoConfig;
use super::pheromone::PheromoneField;
use super::policy::OrderPolicy;
use crate::error::{AcoError, AcoResult};
use crate::models::{CandidateSchedule, OperationRef, ProblemModel};

/// Builds candidate schedules from read-only problem and pheromone state.
///
/// Holds no mutable state of its own: all timeline state lives inside
/// [`build`](Self::build), so one builder can serve many ants in parallel
/// as long as each gets its own generator.
#[derive(Debug, Clone, Copy)]
pub struct SolutionBuilder<'a> {
    problem: &'a ProblemModel,
    pheromone: &'a PheromoneField,
    alpha: f64,
    beta: f64,
    order_policy: Option<&'a dyn OrderPolicy>,
}

impl<'a> SolutionBuilder<'a> {
    pub fn new(
        problem: &'a ProblemModel,
        pheromone: &'a PheromoneField,
        alpha: f64,
        beta: f64,
    ) -> Self {
        Self {
            problem,
            pheromone,
            alpha,
            beta,
            order_policy: None,
        }
    }

    /// Builder using `alpha` and `beta` from a config.
    pub fn from_config(
        problem: &'a ProblemModel,
        pheromone: &'a PheromoneField,
        config: &AcoConfig,
    ) -> Self {
        Self::new(problem, pheromone, config.alpha, config.beta)
    }

    /// Sets (or clears) the secondary ordering policy.
    pub fn with_order_policy(mut self, policy: Option<&'a dyn OrderPolicy>) -> Self {
        self.order_policy = policy;
        self
    }

    /// Selection weight of `op` given the current per-resource load.
    pub fn weight(&self, op: OperationRef, resource_load: &[i64]) -> f64 {
        let tau = self.pheromone.get(op).powf(self.alpha);
        let finish = resource_load[self.problem.slot(op)] + self.problem.duration(op);
        let eta = 1.0 / finish as f64;
        tau * eta.powf(self.beta)
    }

    /// Constructs one complete candidate schedule.
    ///
    /// # Errors
    /// - `ConstructionStalled` if operations remain but nothing can be
    ///   placed (empty ready set, or every ready operation vetoed).
    /// - `DegenerateDistribution` if the remaining weights are all zero, or
    ///   any of them is negative or not finite.
    pub fn build<R: Rng>(&self, rng: &mut R) -> AcoResult<CandidateSchedule> {
        let total = self.problem.total_operations();
        let mut ready: Vec<OperationRef> = (0..self.problem.job_count())
            .filter(|&job| self.problem.task_count(job) > 0)
            .map(|job| OperationRef::new(job, 0))
            .collect();
        let mut resource_load = vec![0i64; self.problem.resource_count()];
        let mut placed = Vec::with_capacity(total);

        while placed.len() < total {
            let chosen = self.select(&ready, &resource_load, placed.len(), rng)?;
            let op = ready[chosen];
            placed.push(op);
            resource_load[self.problem.slot(op)] += self.problem.duration(op);

            if op.task + 1 < self.problem.task_count(op.job) {
                ready[chosen] = OperationRef::new(op.job, op.task + 1);
            } else {
                ready.remove(chosen);
            }
        }

        Ok(CandidateSchedule::new(placed))
    }

    /// Draws an index into `ready`, skipping vetoed operations.
    fn select<R: Rng>(
        &self,
        ready: &[OperationRef],
        resource_load: &[i64],
        placed: usize,
        rng: &mut R,
    ) -> AcoResult<usize> {
        let mut candidates: Vec<usize> = (0..ready.len()).collect();

        while !candidates.is_empty() {
            let weights: Vec<f64> = candidates
                .iter()
                .map(|&i| self.weight(ready[i], resource_load))
                .collect();
            let pick = WeightedIndex::new(&weights)
                .map_err(|_| AcoError::DegenerateDistribution { placed })?
                .sample(rng);

            let index = candidates[pick];
            if !self.is_vetoed(ready[index]) {
                return Ok(index);
            }
            candidates.remove(pick);
        }

        Err(AcoError::ConstructionStalled {
            placed,
            total: self.problem.total_operations(),
        })
    }

    fn is_vetoed(&self, op: OperationRef) -> bool {
        self.order_policy.is_some_and(|policy| {
            (0..op.task).any(|earlier| policy.is_order_violation(op.job, earlier, op.task))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::NamedActivityOrder;
    use crate::models::{Job, Operation};
    use crate::validation::validate_sequence;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_by_two() -> ProblemModel {
        ProblemModel::new(vec![
            Job::new("A")
                .with_operation(Operation::new("R1", 3))
                .with_operation(Operation::new("R2", 2)),
            Job::new("B")
                .with_operation(Operation::new("R2", 4))
                .with_operation(Operation::new("R1", 1)),
        ])
        .unwrap()
    }

    fn three_by_three() -> ProblemModel {
        ProblemModel::from_indexed(&[
            vec![(0, 3), (1, 2), (2, 2)],
            vec![(0, 2), (2, 1), (1, 4)],
            vec![(1, 4), (2, 3), (0, 1)],
        ])
        .unwrap()
    }

    #[derive(Debug)]
    struct VetoEverything;

    impl OrderPolicy for VetoEverything {
        fn is_order_violation(&self, _job: usize, _a: usize, _b: usize) -> bool {
            true
        }
    }

    #[test]
    fn test_builds_valid_schedules() {
        let problem = three_by_three();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let seq = builder.build(&mut rng).unwrap();
            assert_eq!(seq.len(), problem.total_operations());
            assert!(validate_sequence(&problem, &seq).is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let problem = three_by_three();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);

        let a = builder.build(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = builder.build(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_selection_is_stochastic() {
        let problem = three_by_three();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);

        let distinct: std::collections::HashSet<CandidateSchedule> = (0..30)
            .map(|seed| builder.build(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap())
            .collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_weight_formula() {
        let problem = two_by_two();
        let field = PheromoneField::new(&problem, 0.5).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);
        // A0 on R1 (slot 0), duration 3, R1 load 1: 0.5 * (1/4)^2
        let w = builder.weight(OperationRef::new(0, 0), &[1, 0]);
        assert!((w - 0.5 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_heuristic_favors_short_operations() {
        let problem = ProblemModel::new(vec![
            Job::new("short").with_operation(Operation::new("R1", 1)),
            Job::new("long").with_operation(Operation::new("R2", 100)),
        ])
        .unwrap();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);

        let short_first = (0..200)
            .filter(|&seed| {
                let seq = builder.build(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
                seq.as_slice()[0].job == 0
            })
            .count();
        assert!(short_first >= 190, "short first {short_first}/200");
    }

    #[test]
    fn test_pheromone_biases_selection() {
        let problem = ProblemModel::new(vec![
            Job::new("J1").with_operation(Operation::new("R1", 5)),
            Job::new("J2").with_operation(Operation::new("R2", 5)),
        ])
        .unwrap();
        let mut field = PheromoneField::new(&problem, 0.01).unwrap();
        for _ in 0..10 {
            field
                .reinforce(&CandidateSchedule::from(vec![(1, 0)]), 1)
                .unwrap();
        }
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 0.0);

        let j2_first = (0..200)
            .filter(|&seed| {
                let seq = builder.build(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
                seq.as_slice()[0].job == 1
            })
            .count();
        assert!(j2_first >= 190, "j2 first {j2_first}/200");
    }

    #[test]
    fn test_degenerate_weights() {
        let problem = two_by_two();
        let field = PheromoneField::new(&problem, 1e-300).unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 2.0, 2.0);

        let err = builder.build(&mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, AcoError::DegenerateDistribution { placed: 0 });
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let problem = ProblemModel::new(vec![
            Job::new("J1").with_operation(Operation::new("R1", 2)),
            Job::new("J2").with_operation(Operation::new("R2", 2)),
        ])
        .unwrap();
        let mut field = PheromoneField::new(&problem, 0.1).unwrap();
        for _ in 0..100 {
            field.evaporate(0.999_999).unwrap();
        }
        field
            .reinforce(&CandidateSchedule::from(vec![(1, 0)]), 1)
            .unwrap();
        let builder = SolutionBuilder::new(&problem, &field, 1.0, 2.0);

        // J2 is always drawn first, then J1 is left with zero weight.
        for seed in 0..50 {
            let err = builder.build(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap_err();
            assert_eq!(err, AcoError::DegenerateDistribution { placed: 1 });
        }
    }

    #[test]
    fn test_veto_everything_stalls() {
        let problem = two_by_two();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let policy = VetoEverything;
        let builder =
            SolutionBuilder::new(&problem, &field, 1.0, 2.0).with_order_policy(Some(&policy));

        // First operations have no earlier task to conflict with.
        let err = builder.build(&mut ChaCha8Rng::seed_from_u64(3)).unwrap_err();
        assert_eq!(err, AcoError::ConstructionStalled { placed: 2, total: 4 });
    }

    #[test]
    fn test_named_order_consistent_labels() {
        let problem = ProblemModel::new(vec![
            Job::new("S1")
                .with_operation(Operation::new("C1", 2).with_label("Foundation"))
                .with_operation(Operation::new("C2", 3).with_label("Roof")),
            Job::new("S2")
                .with_operation(Operation::new("C2", 1).with_label("Foundation"))
                .with_operation(Operation::new("C1", 2).with_label("Roof")),
        ])
        .unwrap();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let order = NamedActivityOrder::new(&problem, ["Foundation", "Roof"]);
        let builder =
            SolutionBuilder::new(&problem, &field, 1.0, 2.0).with_order_policy(Some(&order));

        for seed in 0..20 {
            let seq = builder.build(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert!(validate_sequence(&problem, &seq).is_ok());
        }
    }

    #[test]
    fn test_named_order_conflict_stalls() {
        let problem = ProblemModel::new(vec![
            Job::new("S1")
                .with_operation(Operation::new("C1", 2).with_label("Roof"))
                .with_operation(Operation::new("C2", 3).with_label("Foundation")),
            Job::new("S2").with_operation(Operation::new("C2", 1)),
        ])
        .unwrap();
        let field = PheromoneField::new(&problem, 0.1).unwrap();
        let order = NamedActivityOrder::new(&problem, ["Foundation", "Roof"]);
        let builder =
            SolutionBuilder::new(&problem, &field, 1.0, 2.0).with_order_policy(Some(&order));

        let err = builder.build(&mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, AcoError::ConstructionStalled { placed: 2, total: 3 });
    }
}
