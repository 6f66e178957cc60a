//! Curriculum model.
//!
//! A curriculum groups the courses attended by one cohort of students.
//! No two courses of the same curriculum may share a slot.

use serde::{Deserialize, Serialize};

use super::CourseIdx;

/// Index of a curriculum inside its [`Specification`](super::Specification).
pub type CurriculumIdx = usize;

/// A named group of courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Unique curriculum identifier.
    pub id: String,
    /// Member courses, in declaration order.
    pub courses: Vec<CourseIdx>,
}

impl Curriculum {
    /// Creates a curriculum.
    pub fn new(id: impl Into<String>, courses: Vec<CourseIdx>) -> Self {
        Self {
            id: id.into(),
            courses,
        }
    }

    /// Whether `course` is a member.
    pub fn contains(&self, course: CourseIdx) -> bool {
        self.courses.contains(&course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_members_only() {
        let q = Curriculum::new("Cur2", vec![2, 3]);
        assert!(q.contains(2));
        assert!(q.contains(3));
        assert!(!q.contains(0));
    }
}
