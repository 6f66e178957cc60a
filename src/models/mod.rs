//! Timetabling domain models.
//!
//! Provides the immutable instance description and the two mutable
//! timetable representations built from it.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | High school |
//! |-------------|------------|-------------|
//! | Course | Course unit | Subject for one class |
//! | Curriculum | Degree year / track | Class group |
//! | Room | Lecture hall | Classroom |
//! | Slot | Day x period | Day x lesson hour |
//!
//! # Variants
//!
//! - [`CourseTimetable`]: courses per slot, no rooms. Used while
//!   constructing and repairing.
//! - [`Timetable`]: courses per slot with rooms. The candidate solution.

mod course;
mod course_timetable;
mod curriculum;
mod meeting;
mod room;
mod specification;
mod timetable;

pub use course::{Course, CourseIdx, TeacherIdx};
pub use course_timetable::CourseTimetable;
pub use curriculum::{Curriculum, CurriculumIdx};
pub use meeting::{Meeting, MeetingWithRoom, Replacement};
pub use room::{Room, RoomIdx};
pub use specification::{Slot, Specification, SpecificationBuilder};
pub use timetable::Timetable;
