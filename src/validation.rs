//! Input validation for timetabling instances.
//!
//! Checks structural integrity of raw instance records before a
//! [`Specification`](crate::models::Specification) is built. Detects:
//! - Duplicate course, room, and curriculum IDs
//! - References to unknown courses or rooms
//! - Unavailability entries outside the day/period grid
//! - An empty day/period grid

use std::collections::HashSet;

use thiserror::Error;

use crate::models::SpecificationBuilder;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A curriculum or constraint references a course that doesn't exist.
    UnknownCourse,
    /// A room constraint references a room that doesn't exist.
    UnknownRoom,
    /// An unavailability entry lies outside the timetable grid.
    SlotOutOfRange,
    /// The instance has no days or no periods.
    EmptyGrid,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates raw instance records.
///
/// Checks:
/// 1. At least one day and one period per day
/// 2. No duplicate course, room, or curriculum IDs
/// 3. Curricula only list known courses
/// 4. Unavailability entries reference known courses and valid slots
/// 5. Room constraints reference known courses and rooms
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_records(records: &SpecificationBuilder) -> ValidationResult {
    let mut errors = Vec::new();

    if records.days == 0 || records.periods_per_day == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            format!(
                "Grid of {} days x {} periods has no slots",
                records.days, records.periods_per_day
            ),
        ));
    }

    let mut course_ids = HashSet::new();
    for c in &records.courses {
        if !course_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", c.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in &records.rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut curriculum_ids = HashSet::new();
    for (id, members) in &records.curricula {
        if !curriculum_ids.insert(id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate curriculum ID: {id}"),
            ));
        }
        for course in members {
            if !course_ids.contains(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!("Curriculum '{id}' references unknown course '{course}'"),
                ));
            }
        }
    }

    for (course, day, period) in &records.unavailability {
        if !course_ids.contains(course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("Unavailability references unknown course '{course}'"),
            ));
        }
        if *day >= records.days || *period >= records.periods_per_day {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotOutOfRange,
                format!("Unavailability of '{course}' at day {day} period {period} is off the grid"),
            ));
        }
    }

    for (course, room) in &records.room_constraints {
        if !course_ids.contains(course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("Room constraint references unknown course '{course}'"),
            ));
        }
        if !room_ids.contains(room.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRoom,
                format!("Room constraint of '{course}' references unknown room '{room}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
