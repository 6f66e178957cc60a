//! Genetic variation of timetables.
//!
//! Every operator takes feasible timetables and returns feasible
//! timetables; infeasible intermediate states are repaired greedily or
//! discarded.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Lewis, Paechter (2005), "Application of the grouping genetic
//!   algorithm to university course timetabling"
//! - Burke, Newall, Weare (1996), "A memetic algorithm for university
//!   exam timetabling"

mod crossover;
mod mutation;
pub mod operators;
mod problem;

pub use crossover::transplant;
pub use operators::{Crossover, CrossoverType, GeneticOperators, Mutation, MutationType};
pub use problem::{TimetableProblem, Variation};
