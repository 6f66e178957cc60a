//! Timetabling problem definition for an outer evolutionary search.
//!
//! Bridges the construction engine to a population-based optimizer.
//! The optimizer owns the population, selection and termination; this
//! module only creates, varies and scores timetables.
//!
//! # Reference
//! Deb et al. (2002), "A fast and elitist multiobjective genetic
//! algorithm: NSGA-II"

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::operators::{Crossover, GeneticOperators, Mutation};
use crate::config::EngineConfig;
use crate::error::InitializationError;
use crate::evaluation::ConstraintReport;
use crate::models::{Specification, Timetable};
use crate::scheduler::GreedyInitializer;

/// A variation operator taking `arity()` parents.
///
/// Offspring are always feasible. An empty result means the operator
/// found no feasible change.
pub trait Variation {
    /// Number of parents consumed per call.
    fn arity(&self) -> usize;

    /// Produces offspring from `parents`. Panics if fewer than
    /// `arity()` parents are given.
    fn evolve<R: Rng + ?Sized>(&self, parents: &[Timetable], rng: &mut R) -> Vec<Timetable>;
}

impl Variation for Crossover {
    fn arity(&self) -> usize {
        2
    }

    fn evolve<R: Rng + ?Sized>(&self, parents: &[Timetable], rng: &mut R) -> Vec<Timetable> {
        let (c1, c2) = self.apply(&parents[0], &parents[1], rng);
        vec![c1, c2]
    }
}

impl Variation for Mutation {
    fn arity(&self) -> usize {
        1
    }

    fn evolve<R: Rng + ?Sized>(&self, parents: &[Timetable], rng: &mut R) -> Vec<Timetable> {
        self.apply(&parents[0], rng).into_iter().collect()
    }
}

/// Timetabling problem for an outer search.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_timetable::ga::TimetableProblem;
/// use u_timetable::models::{Course, Room, Specification};
///
/// let spec = Specification::builder("Mini", 2, 2)
///     .course(Course::new("C1", "T1").with_lectures(2))
///     .course(Course::new("C2", "T2").with_lectures(2))
///     .room(Room::new("R1", 30))
///     .build_shared()
///     .unwrap();
///
/// let problem = TimetableProblem::new(spec);
/// let mut rng = SmallRng::seed_from_u64(7);
/// let population = problem.initialize(4, &mut rng).unwrap();
/// let (a, b) = problem.crossover(&population[0], &population[1], &mut rng);
/// assert!(problem.evaluate(&a).is_feasible());
/// assert!(problem.evaluate(&b).is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    spec: Arc<Specification>,
    config: EngineConfig,
    initializer: GreedyInitializer,
    operators: GeneticOperators,
}

impl TimetableProblem {
    /// Creates a problem with default configuration and operators.
    pub fn new(spec: Arc<Specification>) -> Self {
        Self {
            initializer: GreedyInitializer::new(Arc::clone(&spec)),
            spec,
            config: EngineConfig::default(),
            operators: GeneticOperators::default(),
        }
    }

    /// Sets the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.initializer = self.initializer.with_config(&config);
        self.config = config;
        self
    }

    /// Sets the operator selection.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    pub fn spec(&self) -> &Arc<Specification> {
        &self.spec
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// An RNG seeded from `config.seed`, or from the OS when unset.
    pub fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Builds the initial population.
    ///
    /// # Errors
    /// [`InitializationError`] if any member cannot be built.
    pub fn initialize<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Vec<Timetable>, InitializationError> {
        self.initializer.initialize(size, rng)
    }

    /// The configured crossover.
    pub fn crossover_op(&self) -> Crossover {
        self.operators.crossover_op(&self.config)
    }

    /// The configured mutation.
    pub fn mutation_op(&self) -> Mutation {
        self.operators.mutation_op(&self.config)
    }

    /// Crosses two parents into two feasible children.
    pub fn crossover<R: Rng + ?Sized>(&self, p1: &Timetable, p2: &Timetable, rng: &mut R) -> (Timetable, Timetable) {
        self.operators.crossover(p1, p2, &self.config, rng)
    }

    /// Mutates a parent; `None` when no feasible move was found.
    pub fn mutate<R: Rng + ?Sized>(&self, parent: &Timetable, rng: &mut R) -> Option<Timetable> {
        self.operators.mutate(parent, &self.config, rng)
    }

    /// Counts constraint violations.
    pub fn evaluate(&self, timetable: &Timetable) -> ConstraintReport {
        ConstraintReport::evaluate(timetable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::toy;
    use crate::ga::operators::{CrossoverType, MutationType};

    #[test]
    fn test_initialize_population() {
        let problem = TimetableProblem::new(toy());
        let mut rng = SmallRng::seed_from_u64(42);
        let population = problem.initialize(8, &mut rng).unwrap();
        assert_eq!(population.len(), 8);
        assert!(population.iter().all(|tt| problem.evaluate(tt).is_feasible()));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let problem = TimetableProblem::new(toy()).with_config(EngineConfig::default().with_seed(5));
        let a = problem.initialize(3, &mut problem.rng()).unwrap();
        let b = problem.initialize(3, &mut problem.rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_variation_arity_and_offspring() {
        let problem = TimetableProblem::new(toy()).with_operators(GeneticOperators {
            crossover_type: CrossoverType::Sector { size: 4 },
            mutation_type: MutationType::CourseExchange,
        });
        let mut rng = SmallRng::seed_from_u64(9);
        let parents = problem.initialize(2, &mut rng).unwrap();

        let crossover = problem.crossover_op();
        assert_eq!(crossover.arity(), 2);
        let children = crossover.evolve(&parents, &mut rng);
        assert_eq!(children.len(), 2);

        let mutation = problem.mutation_op();
        assert_eq!(mutation.arity(), 1);
        let children = mutation.evolve(&parents[..1], &mut rng);
        assert!(children.len() <= 1);
        for child in &children {
            assert!(problem.evaluate(child).is_feasible());
        }
    }

    #[test]
    fn test_evolution_loop_stays_feasible() {
        let problem = TimetableProblem::new(toy());
        let mut rng = SmallRng::seed_from_u64(1);
        let mut population = problem.initialize(6, &mut rng).unwrap();

        for _ in 0..5 {
            let i = rng.random_range(0..population.len());
            let j = rng.random_range(0..population.len());
            let (a, b) = problem.crossover(&population[i], &population[j], &mut rng);
            population.push(a);
            population.push(b);
            if let Some(m) = problem.mutate(&population[0], &mut rng) {
                population.push(m);
            }
        }
        for tt in &population {
            let report = problem.evaluate(tt);
            assert!(report.is_feasible(), "{report:?}");
        }
    }
}
