//! Problem instance.
//!
//! A [`Specification`] is the immutable description of a timetabling
//! instance: courses, rooms, curricula, the day/period grid, and the
//! unavailability and room constraints. It is built once, wrapped in an
//! `Arc`, and shared read-only by every timetable derived from it.
//!
//! # Slot addressing
//! A slot is the pair (day, period), flattened as
//! `day * periods_per_day + period`. Every grid in this crate is indexed
//! by that value.

use std::collections::HashMap;
use std::sync::Arc;

use fixedbitset::FixedBitSet;

use super::{Course, CourseIdx, Curriculum, CurriculumIdx, Room, RoomIdx, TeacherIdx};
use crate::error::SpecificationError;
use crate::validation::validate_records;

/// Flattened (day, period) index.
pub type Slot = usize;

/// Immutable timetabling instance.
#[derive(Debug, Clone)]
pub struct Specification {
    name: String,
    days: usize,
    periods_per_day: usize,
    min_daily_lectures: usize,
    max_daily_lectures: usize,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    curricula: Vec<Curriculum>,
    teachers: Vec<String>,
    /// course * slot_count + slot → unavailable
    unavailable: FixedBitSet,
    /// course * room_count + room → forbidden
    forbidden: FixedBitSet,
    course_index: HashMap<String, CourseIdx>,
    room_index: HashMap<String, RoomIdx>,
}

/// Raw instance records, resolved into a [`Specification`] by [`build`](Self::build).
///
/// Records reference courses and rooms by their string IDs.
#[derive(Debug, Clone, Default)]
pub struct SpecificationBuilder {
    pub(crate) name: String,
    pub(crate) days: usize,
    pub(crate) periods_per_day: usize,
    pub(crate) min_daily_lectures: usize,
    pub(crate) max_daily_lectures: usize,
    pub(crate) courses: Vec<Course>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) curricula: Vec<(String, Vec<String>)>,
    pub(crate) unavailability: Vec<(String, usize, usize)>,
    pub(crate) room_constraints: Vec<(String, String)>,
}

impl SpecificationBuilder {
    /// Sets the min/max daily lectures per curriculum.
    pub fn daily_lectures(mut self, min: usize, max: usize) -> Self {
        self.min_daily_lectures = min;
        self.max_daily_lectures = max;
        self
    }

    /// Adds a course.
    pub fn course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a room.
    pub fn room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a curriculum listing its member course IDs.
    pub fn curriculum<I, S>(mut self, id: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.curricula
            .push((id.into(), courses.into_iter().map(Into::into).collect()));
        self
    }

    /// Marks the teacher of `course` unavailable at (day, period).
    pub fn unavailable(mut self, course: impl Into<String>, day: usize, period: usize) -> Self {
        self.unavailability.push((course.into(), day, period));
        self
    }

    /// Forbids `room` for `course`.
    pub fn room_constraint(mut self, course: impl Into<String>, room: impl Into<String>) -> Self {
        self.room_constraints.push((course.into(), room.into()));
        self
    }

    /// Validates the records and resolves IDs into indices.
    pub fn build(self) -> Result<Specification, SpecificationError> {
        validate_records(&self).map_err(SpecificationError::Invalid)?;

        let slot_count = self.days * self.periods_per_day;
        let mut courses = self.courses;
        let rooms = self.rooms;

        let course_index: HashMap<String, CourseIdx> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let room_index: HashMap<String, RoomIdx> = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        // Teachers are numbered in order of first appearance.
        let mut teachers: Vec<String> = Vec::new();
        let mut teacher_index: HashMap<String, TeacherIdx> = HashMap::new();
        for course in &mut courses {
            let next = teachers.len();
            let idx = *teacher_index.entry(course.teacher.clone()).or_insert(next);
            if idx == next {
                teachers.push(course.teacher.clone());
            }
            course.teacher_idx = idx;
            course.curricula.clear();
        }

        let mut curricula = Vec::with_capacity(self.curricula.len());
        for (q, (id, members)) in self.curricula.into_iter().enumerate() {
            let mut member_idx = Vec::with_capacity(members.len());
            for m in &members {
                let c = course_index[m.as_str()];
                if !member_idx.contains(&c) {
                    member_idx.push(c);
                    courses[c].curricula.push(q);
                }
            }
            curricula.push(Curriculum::new(id, member_idx));
        }

        let mut unavailable = FixedBitSet::with_capacity(courses.len() * slot_count);
        for (course, day, period) in &self.unavailability {
            let c = course_index[course.as_str()];
            unavailable.insert(c * slot_count + day * self.periods_per_day + period);
        }

        let mut forbidden = FixedBitSet::with_capacity(courses.len() * rooms.len());
        for (course, room) in &self.room_constraints {
            let c = course_index[course.as_str()];
            let r = room_index[room.as_str()];
            forbidden.insert(c * rooms.len() + r);
        }

        Ok(Specification {
            name: self.name,
            days: self.days,
            periods_per_day: self.periods_per_day,
            min_daily_lectures: self.min_daily_lectures,
            max_daily_lectures: self.max_daily_lectures,
            courses,
            rooms,
            curricula,
            teachers,
            unavailable,
            forbidden,
            course_index,
            room_index,
        })
    }

    /// Builds and wraps the specification for sharing.
    pub fn build_shared(self) -> Result<Arc<Specification>, SpecificationError> {
        self.build().map(Arc::new)
    }
}

impl Specification {
    /// Starts a new instance with `days` x `periods_per_day` slots.
    pub fn builder(name: impl Into<String>, days: usize, periods_per_day: usize) -> SpecificationBuilder {
        SpecificationBuilder {
            name: name.into(),
            days,
            periods_per_day,
            ..SpecificationBuilder::default()
        }
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of teaching days.
    #[inline]
    pub fn days(&self) -> usize {
        self.days
    }

    /// Number of periods per day.
    #[inline]
    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    /// Total number of slots (`days * periods_per_day`).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.days * self.periods_per_day
    }

    /// Flattened slot index of (day, period).
    #[inline]
    pub fn slot(&self, day: usize, period: usize) -> Slot {
        day * self.periods_per_day + period
    }

    /// Day of a flattened slot.
    #[inline]
    pub fn day_of(&self, slot: Slot) -> usize {
        slot / self.periods_per_day
    }

    /// Period of a flattened slot.
    #[inline]
    pub fn period_of(&self, slot: Slot) -> usize {
        slot % self.periods_per_day
    }

    /// Min/max daily lectures per curriculum, as declared by the instance.
    pub fn daily_lectures(&self) -> (usize, usize) {
        (self.min_daily_lectures, self.max_daily_lectures)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    pub fn course(&self, idx: CourseIdx) -> &Course {
        &self.courses[idx]
    }

    pub fn room(&self, idx: RoomIdx) -> &Room {
        &self.rooms[idx]
    }

    pub fn curriculum(&self, idx: CurriculumIdx) -> &Curriculum {
        &self.curricula[idx]
    }

    /// Teacher names, indexed by [`TeacherIdx`].
    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    /// Teacher of a course.
    #[inline]
    pub fn teacher_of(&self, course: CourseIdx) -> TeacherIdx {
        self.courses[course].teacher_idx
    }

    /// Looks up a course by ID.
    pub fn course_index(&self, id: &str) -> Option<CourseIdx> {
        self.course_index.get(id).copied()
    }

    /// Looks up a room by ID.
    pub fn room_index(&self, id: &str) -> Option<RoomIdx> {
        self.room_index.get(id).copied()
    }

    /// Courses taught by `teacher`.
    pub fn courses_of_teacher(&self, teacher: TeacherIdx) -> impl Iterator<Item = CourseIdx> + '_ {
        self.courses
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.teacher_idx == teacher)
            .map(|(i, _)| i)
    }

    /// Whether two courses share at least one curriculum.
    pub fn share_curriculum(&self, a: CourseIdx, b: CourseIdx) -> bool {
        let cb = &self.courses[b];
        self.courses[a].curricula.iter().any(|&q| cb.in_curriculum(q))
    }

    /// Whether the teacher of `course` is available at `slot`.
    #[inline]
    pub fn is_available(&self, course: CourseIdx, slot: Slot) -> bool {
        !self.unavailable.contains(course * self.slot_count() + slot)
    }

    /// Number of slots at which `course` cannot be taught.
    pub fn unavailable_slot_count(&self, course: CourseIdx) -> usize {
        let n = self.slot_count();
        self.unavailable.count_ones(course * n..(course + 1) * n)
    }

    /// Whether `room` is allowed for `course`.
    #[inline]
    pub fn is_suitable(&self, course: CourseIdx, room: RoomIdx) -> bool {
        !self.forbidden.contains(course * self.rooms.len() + room)
    }

    /// Total number of lectures to schedule.
    pub fn total_lectures(&self) -> usize {
        self.courses.iter().map(|c| c.lectures).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{toy, ARC_TEC, SCE_COS_C, TEC_COS};

    #[test]
    fn test_slot_addressing() {
        let spec = toy();
        assert_eq!(spec.slot_count(), 20);
        assert_eq!(spec.slot(2, 1), 9);
        assert_eq!(spec.day_of(9), 2);
        assert_eq!(spec.period_of(9), 1);
    }

    #[test]
    fn test_index_resolution() {
        let spec = toy();
        let tec = spec.course_index("TecCos").unwrap();
        assert_eq!(tec, TEC_COS);
        assert_eq!(spec.course(tec).curricula, vec![0, 1]);
        assert_eq!(spec.curriculum(1).courses, vec![2, 3]);
        assert_eq!(spec.teachers().len(), 4);
        assert_eq!(spec.teacher_of(tec), 2);
        assert!(spec.share_curriculum(0, 2));
        assert!(!spec.share_curriculum(0, 3));
    }

    #[test]
    fn test_constraint_tables() {
        let spec = toy();
        assert!(!spec.is_available(TEC_COS, spec.slot(2, 0)));
        assert!(!spec.is_available(TEC_COS, spec.slot(2, 1)));
        assert!(spec.is_available(TEC_COS, spec.slot(2, 2)));
        assert_eq!(spec.unavailable_slot_count(TEC_COS), 4);
        assert_eq!(spec.unavailable_slot_count(SCE_COS_C), 0);

        let ra = spec.room_index("rA").unwrap();
        assert!(!spec.is_suitable(SCE_COS_C, ra));
        assert!(spec.is_suitable(ARC_TEC, ra));
    }

    #[test]
    fn test_total_lectures() {
        assert_eq!(toy().total_lectures(), 16);
    }

    #[test]
    fn test_invalid_records_rejected() {
        let result = Specification::builder("Bad", 5, 4)
            .course(Course::new("C1", "T1"))
            .curriculum("Q", ["C2"])
            .build();
        assert!(matches!(result, Err(SpecificationError::Invalid(_))));
    }

    #[test]
    fn test_shared_teacher() {
        let spec = Specification::builder("T", 1, 2)
            .course(Course::new("C1", "Same"))
            .course(Course::new("C2", "Other"))
            .course(Course::new("C3", "Same"))
            .room(Room::new("R", 10))
            .build()
            .unwrap();
        assert_eq!(spec.teacher_of(0), spec.teacher_of(2));
        assert_eq!(spec.courses_of_teacher(0).collect::<Vec<_>>(), vec![0, 2]);
    }
}
