//! Course model.
//!
//! A course is taught by one teacher and requires a fixed number of
//! weekly lectures, spread over a minimum number of working days.
//!
//! # Reference
//! Di Gaspero, McCollum, Schaerf (2007), "The Second International
//! Timetabling Competition (ITC-2007): Curriculum-based Course Timetabling"

use serde::{Deserialize, Serialize};

/// Index of a course inside its [`Specification`](super::Specification).
pub type CourseIdx = usize;

/// Index of a teacher inside its [`Specification`](super::Specification).
pub type TeacherIdx = usize;

/// A course to be timetabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Teacher identifier (teachers are identified by name only).
    pub teacher: String,
    /// Number of lectures per week.
    pub lectures: usize,
    /// Minimum number of distinct days the lectures should spread over.
    pub min_working_days: usize,
    /// Number of enrolled students.
    pub students: u32,
    /// Whether consecutive double lectures are requested.
    pub double_lectures: bool,
    /// Curricula containing this course. Filled in by the specification.
    #[serde(default)]
    pub curricula: Vec<usize>,
    /// Dense teacher index. Filled in by the specification.
    #[serde(default)]
    pub teacher_idx: TeacherIdx,
}

impl Course {
    /// Creates a course with one lecture and no students.
    pub fn new(id: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            teacher: teacher.into(),
            lectures: 1,
            min_working_days: 1,
            students: 0,
            double_lectures: false,
            curricula: Vec::new(),
            teacher_idx: 0,
        }
    }

    /// Sets the number of weekly lectures.
    pub fn with_lectures(mut self, lectures: usize) -> Self {
        self.lectures = lectures;
        self
    }

    /// Sets the minimum number of working days.
    pub fn with_min_working_days(mut self, days: usize) -> Self {
        self.min_working_days = days;
        self
    }

    /// Sets the number of students.
    pub fn with_students(mut self, students: u32) -> Self {
        self.students = students;
        self
    }

    /// Requests double lectures.
    pub fn with_double_lectures(mut self, double: bool) -> Self {
        self.double_lectures = double;
        self
    }

    /// Whether the course belongs to the given curriculum.
    pub fn in_curriculum(&self, curriculum: usize) -> bool {
        self.curricula.contains(&curriculum)
    }
}
