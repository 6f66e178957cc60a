//! Error types.
//!
//! Expected-case failures during construction and repair are reported
//! through `bool`, `Option` or [`Replacement`](crate::models::Replacement)
//! values. The errors here are reserved for broken invariants and for
//! failures that abort a whole request.

use thiserror::Error;

use crate::models::{CourseIdx, CurriculumIdx, RoomIdx, Slot};
use crate::validation::ValidationError;

/// A direct mutation would double-book a slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfeasibleError {
    #[error("course {course} clashes with curriculum {curriculum} at slot {slot}")]
    CurriculumClash {
        course: CourseIdx,
        curriculum: CurriculumIdx,
        slot: Slot,
    },
    #[error("teacher of course {course} already lectures at slot {slot}")]
    TeacherClash { course: CourseIdx, slot: Slot },
    #[error("room {room} is already occupied at slot {slot}")]
    RoomOccupied { room: RoomIdx, slot: Slot },
    #[error("meeting of course {course} is outside the timetable grid")]
    OutOfRange { course: CourseIdx },
}

/// The room assignment heuristic found no admissible room.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomAssignmentError {
    #[error("no suitable room left for course {course} at slot {slot}")]
    NoSuitableRoom { course: CourseIdx, slot: Slot },
}

/// The greedy initializer could not build a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitializationError {
    #[error(
        "no feasible timetable after {attempts} attempts: course '{course}' (teacher '{teacher}') could not be placed"
    )]
    Exhausted {
        attempts: usize,
        course: String,
        teacher: String,
    },
    #[error("instance has {slots} slots and {rooms} rooms but {lectures} lectures to place")]
    EmptyGrid {
        slots: usize,
        rooms: usize,
        lectures: usize,
    },
}

/// Instance records failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecificationError {
    #[error("invalid specification ({} problems): {}", .0.len(), summarize(.0))]
    Invalid(Vec<ValidationError>),
}

/// A `.ctt` instance could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("missing section '{0}'")]
    MissingSection(&'static str),
    #[error("missing header field '{0}'")]
    MissingHeader(&'static str),
    #[error("header declares {expected} {section} but {found} were listed")]
    CountMismatch {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Specification(#[from] SpecificationError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
