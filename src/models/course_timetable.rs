//! Course-level timetable.
//!
//! Used during construction and repair, before rooms are assigned. Each
//! slot holds a multiset of courses whose size is capped by the number
//! of rooms; the room assignment heuristic later turns it into a
//! room-level [`Timetable`](super::Timetable).

use std::sync::Arc;

use super::{CourseIdx, Meeting, Replacement, Slot, Specification};

/// Course placements per slot, without rooms.
///
/// # Invariants
/// - A course occupies the same slot in every curriculum it belongs to.
/// - At most one course per curriculum and per teacher occupies a slot.
/// - At most `rooms.len()` courses occupy a slot.
#[derive(Debug, Clone)]
pub struct CourseTimetable {
    spec: Arc<Specification>,
    /// curriculum → slot → course
    curricula: Vec<Vec<Option<CourseIdx>>>,
    /// slot → courses, kept sorted
    slots: Vec<Vec<CourseIdx>>,
    /// course → slots, kept sorted
    by_course: Vec<Vec<Slot>>,
}

impl PartialEq for CourseTimetable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.spec, &other.spec)
            && self.curricula == other.curricula
            && self.slots == other.slots
            && self.by_course == other.by_course
    }
}

impl CourseTimetable {
    /// Creates an empty timetable.
    pub fn new(spec: Arc<Specification>) -> Self {
        let slot_count = spec.slot_count();
        Self {
            curricula: vec![vec![None; slot_count]; spec.curricula().len()],
            slots: vec![Vec::new(); slot_count],
            by_course: vec![Vec::new(); spec.courses().len()],
            spec,
        }
    }

    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    pub fn shared_spec(&self) -> &Arc<Specification> {
        &self.spec
    }

    fn slot_checked(&self, course: CourseIdx, day: usize, period: usize) -> Option<Slot> {
        (course < self.spec.courses().len()
            && day < self.spec.days()
            && period < self.spec.periods_per_day())
            .then(|| self.spec.slot(day, period))
    }

    /// Whether `course` could be added at (day, period) right now.
    ///
    /// Checks slot capacity, teacher availability, and curriculum and
    /// teacher clashes. Room suitability is checked by the room
    /// assignment heuristic.
    pub fn can_add(&self, course: CourseIdx, day: usize, period: usize) -> bool {
        let Some(slot) = self.slot_checked(course, day, period) else {
            return false;
        };
        self.slots[slot].len() < self.spec.rooms().len()
            && self.spec.is_available(course, slot)
            && !self.curriculum_taken(course, slot)
            && !self.teacher_taken(course, slot)
    }

    /// Adds a meeting. Returns `false`, leaving the timetable unchanged,
    /// if [`can_add`](Self::can_add) does not hold.
    pub fn add_meeting(&mut self, course: CourseIdx, day: usize, period: usize) -> bool {
        if !self.can_add(course, day, period) {
            return false;
        }
        self.insert(course, self.spec.slot(day, period));
        true
    }

    fn insert(&mut self, course: CourseIdx, slot: Slot) {
        for &q in &self.spec.course(course).curricula {
            self.curricula[q][slot] = Some(course);
        }
        let at = &mut self.slots[slot];
        let pos = at.partition_point(|&c| c < course);
        at.insert(pos, course);
        let own = &mut self.by_course[course];
        let pos = own.partition_point(|&s| s < slot);
        own.insert(pos, slot);
    }

    /// Removes a meeting. Returns whether it was present.
    pub fn remove_meeting(&mut self, meeting: &Meeting) -> bool {
        let Some(slot) = self.slot_checked(meeting.course, meeting.day, meeting.period) else {
            return false;
        };
        let Ok(pos) = self.by_course[meeting.course].binary_search(&slot) else {
            return false;
        };
        self.by_course[meeting.course].remove(pos);
        if let Ok(pos) = self.slots[slot].binary_search(&meeting.course) {
            self.slots[slot].remove(pos);
        }
        for &q in &self.spec.course(meeting.course).curricula {
            if self.curricula[q][slot] == Some(meeting.course) {
                self.curricula[q][slot] = None;
            }
        }
        true
    }

    /// Puts `meeting` at its slot, displacing the single course in its way.
    ///
    /// Blocked when the teacher is unavailable, when more than one course
    /// clashes with it, or when the slot is full and nothing clashes.
    pub fn replace_meeting(&mut self, meeting: Meeting) -> Replacement<Meeting> {
        let Meeting { course, day, period } = meeting;
        let Some(slot) = self.slot_checked(course, day, period) else {
            return Replacement::Blocked;
        };
        if !self.spec.is_available(course, slot) {
            return Replacement::Blocked;
        }

        let teacher = self.spec.teacher_of(course);
        let mut blockers = self.slots[slot].iter().copied().filter(|&other| {
            self.spec.teacher_of(other) == teacher || self.spec.share_curriculum(course, other)
        });
        let first = blockers.next();
        if blockers.next().is_some() {
            return Replacement::Blocked;
        }

        match first {
            None if self.add_meeting(course, day, period) => Replacement::Inserted,
            None => Replacement::Blocked,
            Some(old) => {
                let displaced = Meeting::new(old, day, period);
                self.remove_meeting(&displaced);
                if self.add_meeting(course, day, period) {
                    Replacement::Displaced(displaced)
                } else {
                    self.insert(old, slot);
                    Replacement::Blocked
                }
            }
        }
    }

    /// The meeting of `course` at (day, period), if scheduled there.
    pub fn get_meeting(&self, course: CourseIdx, day: usize, period: usize) -> Option<Meeting> {
        let slot = self.slot_checked(course, day, period)?;
        self.by_course[course]
            .binary_search(&slot)
            .ok()
            .map(|_| Meeting::new(course, day, period))
    }

    /// All meetings of `course`, in slot order.
    pub fn meetings_by_course(&self, course: CourseIdx) -> impl Iterator<Item = Meeting> + '_ {
        self.by_course[course].iter().map(move |&slot| {
            Meeting::new(course, self.spec.day_of(slot), self.spec.period_of(slot))
        })
    }

    /// Slots used by `course`, ascending.
    pub fn slots_of(&self, course: CourseIdx) -> &[Slot] {
        &self.by_course[course]
    }

    /// Courses placed at `slot`, ascending.
    pub fn courses_at(&self, slot: Slot) -> &[CourseIdx] {
        &self.slots[slot]
    }

    /// Every meeting, in slot order.
    pub fn meetings(&self) -> impl Iterator<Item = Meeting> + '_ {
        self.slots.iter().enumerate().flat_map(move |(slot, courses)| {
            let (day, period) = (self.spec.day_of(slot), self.spec.period_of(slot));
            courses.iter().map(move |&c| Meeting::new(c, day, period))
        })
    }

    /// Number of scheduled meetings.
    pub fn meeting_count(&self) -> usize {
        self.by_course.iter().map(Vec::len).sum()
    }

    /// Whether a course sharing a curriculum with `course` sits at (day, period).
    pub fn has_lecture_of_same_curriculum(&self, course: CourseIdx, day: usize, period: usize) -> bool {
        self.slot_checked(course, day, period)
            .is_some_and(|slot| self.curriculum_taken(course, slot))
    }

    /// Whether a course taught by the teacher of `course` sits at (day, period).
    pub fn has_lecture_with_same_teacher(&self, course: CourseIdx, day: usize, period: usize) -> bool {
        self.slot_checked(course, day, period)
            .is_some_and(|slot| self.teacher_taken(course, slot))
    }

    fn curriculum_taken(&self, course: CourseIdx, slot: Slot) -> bool {
        self.spec
            .course(course)
            .curricula
            .iter()
            .any(|&q| self.curricula[q][slot].is_some())
    }

    fn teacher_taken(&self, course: CourseIdx, slot: Slot) -> bool {
        let teacher = self.spec.teacher_of(course);
        self.slots[slot]
            .iter()
            .any(|&c| self.spec.teacher_of(c) == teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{toy, ARC_TEC, GEOTEC, SCE_COS_C, TEC_COS};

    #[test]
    fn test_add_and_query() {
        let mut ct = CourseTimetable::new(toy());
        assert!(ct.add_meeting(SCE_COS_C, 0, 0));
        assert!(ct.add_meeting(GEOTEC, 0, 0));

        assert_eq!(ct.courses_at(0), &[SCE_COS_C, GEOTEC]);
        assert_eq!(ct.get_meeting(SCE_COS_C, 0, 0), Some(Meeting::new(SCE_COS_C, 0, 0)));
        assert_eq!(ct.get_meeting(SCE_COS_C, 0, 1), None);
        assert!(ct.has_lecture_of_same_curriculum(ARC_TEC, 0, 0));
        assert!(!ct.has_lecture_of_same_curriculum(ARC_TEC, 0, 1));
        assert_eq!(ct.meeting_count(), 2);
    }

    #[test]
    fn test_curriculum_clash_rejected() {
        let mut ct = CourseTimetable::new(toy());
        assert!(ct.add_meeting(TEC_COS, 1, 1));
        // TecCos is in both curricula
        assert!(!ct.add_meeting(SCE_COS_C, 1, 1));
        assert!(!ct.add_meeting(GEOTEC, 1, 1));
        assert_eq!(ct.meeting_count(), 1);
    }

    #[test]
    fn test_unavailable_rejected() {
        let mut ct = CourseTimetable::new(toy());
        assert!(!ct.add_meeting(TEC_COS, 2, 0));
        assert!(!ct.add_meeting(ARC_TEC, 4, 3));
        assert!(ct.add_meeting(ARC_TEC, 3, 3));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut ct = CourseTimetable::new(toy());
        assert!(!ct.add_meeting(SCE_COS_C, 5, 0));
        assert!(!ct.add_meeting(SCE_COS_C, 0, 4));
        assert!(!ct.add_meeting(42, 0, 0));
        assert!(!ct.remove_meeting(&Meeting::new(SCE_COS_C, 9, 9)));
    }

    #[test]
    fn test_slot_capacity() {
        let spec = Specification::builder("Cap", 1, 1)
            .course(crate::models::Course::new("A", "T1"))
            .course(crate::models::Course::new("B", "T2"))
            .room(crate::models::Room::new("R", 10))
            .build_shared()
            .unwrap();
        let mut ct = CourseTimetable::new(spec);
        assert!(ct.add_meeting(0, 0, 0));
        assert!(!ct.add_meeting(1, 0, 0));
    }

    #[test]
    fn test_same_teacher_rejected() {
        let spec = Specification::builder("Teach", 1, 2)
            .course(crate::models::Course::new("A", "T1"))
            .course(crate::models::Course::new("B", "T1"))
            .room(crate::models::Room::new("R1", 10))
            .room(crate::models::Room::new("R2", 10))
            .build_shared()
            .unwrap();
        let mut ct = CourseTimetable::new(spec);
        assert!(ct.add_meeting(0, 0, 0));
        assert!(ct.has_lecture_with_same_teacher(1, 0, 0));
        assert!(!ct.add_meeting(1, 0, 0));
        assert!(ct.add_meeting(1, 0, 1));
    }

    #[test]
    fn test_remove_restores_state() {
        let mut ct = CourseTimetable::new(toy());
        ct.add_meeting(TEC_COS, 0, 1);
        ct.add_meeting(ARC_TEC, 1, 1);
        let before = ct.clone();

        let m = Meeting::new(TEC_COS, 0, 1);
        assert!(ct.remove_meeting(&m));
        assert!(!ct.remove_meeting(&m));
        assert!(!ct.has_lecture_of_same_curriculum(GEOTEC, 0, 1));
        assert!(ct.add_meeting(TEC_COS, 0, 1));
        assert_eq!(ct, before);
    }

    #[test]
    fn test_replace_inserted() {
        let mut ct = CourseTimetable::new(toy());
        assert_eq!(ct.replace_meeting(Meeting::new(GEOTEC, 0, 0)), Replacement::Inserted);
        assert!(ct.get_meeting(GEOTEC, 0, 0).is_some());
    }

    #[test]
    fn test_replace_displaces_single_clash() {
        let mut ct = CourseTimetable::new(toy());
        ct.add_meeting(SCE_COS_C, 0, 0);
        let r = ct.replace_meeting(Meeting::new(ARC_TEC, 0, 0));
        assert_eq!(r, Replacement::Displaced(Meeting::new(SCE_COS_C, 0, 0)));
        assert!(ct.get_meeting(ARC_TEC, 0, 0).is_some());
        assert!(ct.get_meeting(SCE_COS_C, 0, 0).is_none());
    }

    #[test]
    fn test_replace_blocked_by_two_clashes() {
        let mut ct = CourseTimetable::new(toy());
        ct.add_meeting(SCE_COS_C, 0, 0);
        ct.add_meeting(GEOTEC, 0, 0);
        let before = ct.clone();
        // TecCos clashes with both curricula
        assert_eq!(ct.replace_meeting(Meeting::new(TEC_COS, 0, 0)), Replacement::Blocked);
        assert_eq!(ct, before);
    }

    #[test]
    fn test_replace_blocked_when_unavailable() {
        let mut ct = CourseTimetable::new(toy());
        ct.add_meeting(GEOTEC, 2, 0);
        assert_eq!(ct.replace_meeting(Meeting::new(TEC_COS, 2, 0)), Replacement::Blocked);
        assert!(ct.get_meeting(GEOTEC, 2, 0).is_some());
    }

    #[test]
    fn test_meetings_by_course_sorted() {
        let mut ct = CourseTimetable::new(toy());
        ct.add_meeting(GEOTEC, 3, 1);
        ct.add_meeting(GEOTEC, 0, 2);
        let ms: Vec<Meeting> = ct.meetings_by_course(GEOTEC).collect();
        assert_eq!(ms, vec![Meeting::new(GEOTEC, 0, 2), Meeting::new(GEOTEC, 3, 1)]);
        assert_eq!(ct.meetings().count(), 2);
    }
}
