//! Timetable construction.
//!
//! Provides the greedy randomized initializer and the room assignment
//! heuristic it (and every repair operator) finishes with.
//!
//! # Algorithm
//!
//! [`GreedyInitializer`] places lectures at the course level, hardest
//! teachers first, walking slots in a seeded pseudo-random order and
//! restarting with escalated hardness when a lecture fits nowhere.
//! [`assign_rooms`] then matches rooms slot by slot, most constrained
//! course first. Neither is optimal; both are fast enough to seed a
//! population.
//!
//! # References
//!
//! - Burke, Petrovic (2002), "Recent research directions in automated timetabling"
//! - Di Gaspero, McCollum, Schaerf (2007), "The Second International
//!   Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling (Track 3)"

mod greedy;
mod rooms;

pub use greedy::GreedyInitializer;
pub use rooms::{assign_rooms, assign_slot, can_place};
