//! Curriculum-based course timetabling for the U-Engine ecosystem.
//!
//! Builds and varies feasible weekly timetables: every lecture of every
//! course gets a (day, period, room) such that no curriculum, teacher or
//! room is double-booked, teachers are available and rooms are allowed.
//! The outer evolutionary loop (population, selection, archiving) lives
//! elsewhere; this crate supplies the problem-specific pieces.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Specification`, `Course`, `Room`,
//!   `Curriculum`, `Timetable`, `CourseTimetable`, `Meeting`
//! - **`scheduler`**: Greedy initializer and room assignment heuristic
//! - **`ga`**: Repair-based crossover and mutation, `TimetableProblem`
//! - **`evaluation`**: Hard and soft constraint counts
//! - **`io`**: `.ctt` instance reader and solution renderers
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling refs)
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_timetable::ga::TimetableProblem;
//! use u_timetable::io::{parse_ctt, render_solution};
//!
//! let spec = parse_ctt("\
//! Name: Tiny
//! Courses: 2
//! Rooms: 1
//! Days: 2
//! Periods_per_day: 2
//! Curricula: 1
//! Constraints: 0
//! COURSES:
//! c1 t1 2 2 20
//! c2 t2 1 1 10
//! ROOMS:
//! r1 30
//! CURRICULA:
//! q1 2 c1 c2
//! UNAVAILABILITY_CONSTRAINTS:
//! END.
//! ").unwrap();
//!
//! let problem = TimetableProblem::new(spec.into());
//! let mut rng = SmallRng::seed_from_u64(0);
//! let population = problem.initialize(2, &mut rng).unwrap();
//! assert!(problem.evaluate(&population[0]).is_feasible());
//! assert_eq!(render_solution(&population[0]).lines().count(), 3);
//! ```
//!
//! # References
//!
//! - Di Gaspero, McCollum, Schaerf (2007), "The Second International
//!   Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling (Track 3)"
//! - Lewis (2008), "A survey of metaheuristic-based techniques for
//!   university timetabling problems"

pub mod config;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use config::EngineConfig;
pub use error::{InfeasibleError, InitializationError, ParseError, RoomAssignmentError, SpecificationError};
pub use evaluation::ConstraintReport;
