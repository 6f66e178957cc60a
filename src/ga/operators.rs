//! Configurable genetic operators for timetabling.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::Course);
//! assert_eq!(ops.mutation_type, MutationType::CourseExchange);
//! ```

use rand::Rng;

pub use super::crossover::{Crossover, CrossoverType};
pub use super::mutation::{Mutation, MutationType};
use crate::config::EngineConfig;
use crate::models::Timetable;

/// Runtime-selectable genetic operators.
///
/// Lets a caller switch operators via configuration without changing
/// the problem definition.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{CrossoverType, GeneticOperators, MutationType};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::Sector { size: 6 },
///     mutation_type: MutationType::Move,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Donation selection for crossover.
    pub crossover_type: CrossoverType,
    /// Mutation move.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::Course,
            mutation_type: MutationType::CourseExchange,
        }
    }
}

impl GeneticOperators {
    /// The configured crossover.
    pub fn crossover_op(&self, config: &EngineConfig) -> Crossover {
        Crossover::new(self.crossover_type).with_config(config)
    }

    /// The configured mutation.
    pub fn mutation_op(&self, config: &EngineConfig) -> Mutation {
        Mutation::new(self.mutation_type).with_config(config)
    }

    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        p1: &Timetable,
        p2: &Timetable,
        config: &EngineConfig,
        rng: &mut R,
    ) -> (Timetable, Timetable) {
        self.crossover_op(config).apply(p1, p2, rng)
    }

    /// Performs mutation using the configured strategy.
    pub fn mutate<R: Rng + ?Sized>(&self, parent: &Timetable, config: &EngineConfig, rng: &mut R) -> Option<Timetable> {
        self.mutation_op(config).apply(parent, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::evaluation::ConstraintReport;
    use crate::fixtures::toy;
    use crate::scheduler::GreedyInitializer;

    #[test]
    fn test_default_operators() {
        let ops = GeneticOperators::default();
        assert_eq!(ops.crossover_type, CrossoverType::Course);
        assert_eq!(ops.mutation_type, MutationType::CourseExchange);
    }

    #[test]
    fn test_config_reaches_operators() {
        let config = EngineConfig::default().with_max_mutation_attempts(7);
        let ops = GeneticOperators {
            crossover_type: CrossoverType::Curriculum,
            mutation_type: MutationType::Move,
        };
        assert_eq!(ops.crossover_op(&config).kind, CrossoverType::Curriculum);
        assert_eq!(ops.mutation_op(&config).kind, MutationType::Move);
    }

    #[test]
    fn test_every_crossover_type() {
        let init = GreedyInitializer::new(toy());
        let config = EngineConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = init.build(&mut rng).unwrap();
        let p2 = init.build(&mut rng).unwrap();

        for crossover_type in [
            CrossoverType::Course,
            CrossoverType::Curriculum,
            CrossoverType::Sector { size: 3 },
        ] {
            let ops = GeneticOperators {
                crossover_type,
                ..GeneticOperators::default()
            };
            let (c1, c2) = ops.crossover(&p1, &p2, &config, &mut rng);
            assert!(ConstraintReport::evaluate(&c1).is_feasible());
            assert!(ConstraintReport::evaluate(&c2).is_feasible());
        }
    }

    #[test]
    fn test_every_mutation_type() {
        let init = GreedyInitializer::new(toy());
        let config = EngineConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let parent = init.build(&mut rng).unwrap();

        for mutation_type in [MutationType::CourseExchange, MutationType::Move] {
            let ops = GeneticOperators {
                mutation_type,
                ..GeneticOperators::default()
            };
            let child = ops.mutate(&parent, &config, &mut rng).unwrap();
            assert_eq!(child.meeting_count(), parent.meeting_count());
        }
    }
}
