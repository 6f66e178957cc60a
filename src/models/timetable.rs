//! Room-level timetable.
//!
//! The candidate solution exchanged with the outer search. Every meeting
//! carries a room; per-room occupancy is tracked with a bitset over
//! slots.
//!
//! Once handed out as a candidate, a timetable is not mutated again:
//! operators clone it (deep copy of every grid, the specification is
//! shared through `Arc`) and work on the copy.

use std::sync::Arc;

use fixedbitset::FixedBitSet;

use super::{
    CourseIdx, CourseTimetable, CurriculumIdx, MeetingWithRoom, Replacement, RoomIdx, Slot,
    Specification, TeacherIdx,
};
use crate::error::InfeasibleError;

/// Meetings with rooms, indexed by curriculum, room, slot, and course.
///
/// # Invariants
/// - A course occupies the same slot in every curriculum it belongs to.
/// - At most one meeting per curriculum, per teacher, and per room
///   occupies a slot.
/// - `rooms[r]` has bit `s` set iff some meeting uses room `r` at slot `s`.
#[derive(Debug, Clone)]
pub struct Timetable {
    spec: Arc<Specification>,
    /// curriculum → slot → meeting
    curricula: Vec<Vec<Option<MeetingWithRoom>>>,
    /// room → occupied slots
    rooms: Vec<FixedBitSet>,
    /// slot → meetings, kept sorted
    slots: Vec<Vec<MeetingWithRoom>>,
    /// course → meetings, kept sorted
    by_course: Vec<Vec<MeetingWithRoom>>,
}

impl PartialEq for Timetable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.spec, &other.spec)
            && self.curricula == other.curricula
            && self.rooms == other.rooms
            && self.slots == other.slots
            && self.by_course == other.by_course
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new(spec: Arc<Specification>) -> Self {
        let slot_count = spec.slot_count();
        Self {
            curricula: vec![vec![None; slot_count]; spec.curricula().len()],
            rooms: vec![FixedBitSet::with_capacity(slot_count); spec.rooms().len()],
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

    fn slot_checked(&self, m: &MeetingWithRoom) -> Result<Slot, InfeasibleError> {
        if m.course < self.spec.courses().len()
            && m.room < self.spec.rooms().len()
            && m.day < self.spec.days()
            && m.period < self.spec.periods_per_day()
        {
            Ok(self.spec.slot(m.day, m.period))
        } else {
            Err(InfeasibleError::OutOfRange { course: m.course })
        }
    }

    /// Checks that `m` would not double-book anything.
    fn check_free(&self, m: &MeetingWithRoom) -> Result<Slot, InfeasibleError> {
        let slot = self.slot_checked(m)?;
        for &q in &self.spec.course(m.course).curricula {
            if self.curricula[q][slot].is_some() {
                return Err(InfeasibleError::CurriculumClash {
                    course: m.course,
                    curriculum: q,
                    slot,
                });
            }
        }
        if self.teacher_taken(m.course, slot) {
            return Err(InfeasibleError::TeacherClash {
                course: m.course,
                slot,
            });
        }
        if self.rooms[m.room].contains(slot) {
            return Err(InfeasibleError::RoomOccupied { room: m.room, slot });
        }
        Ok(slot)
    }

    /// Adds a meeting.
    ///
    /// # Errors
    /// [`InfeasibleError`] if the slot is taken in any curriculum of the
    /// course, by the same teacher, or in the target room. The timetable
    /// is unchanged on error.
    pub fn add_meeting(&mut self, m: MeetingWithRoom) -> Result<(), InfeasibleError> {
        let slot = self.check_free(&m)?;
        self.insert(m, slot);
        Ok(())
    }

    fn insert(&mut self, m: MeetingWithRoom, slot: Slot) {
        for &q in &self.spec.course(m.course).curricula {
            self.curricula[q][slot] = Some(m);
        }
        self.rooms[m.room].insert(slot);
        let at = &mut self.slots[slot];
        let pos = at.partition_point(|x| x < &m);
        at.insert(pos, m);
        let own = &mut self.by_course[m.course];
        let pos = own.partition_point(|x| x < &m);
        own.insert(pos, m);
    }

    /// Full feasibility probe: no double booking, teacher available,
    /// room allowed for the course.
    pub fn admits(&self, m: &MeetingWithRoom) -> bool {
        match self.check_free(m) {
            Ok(slot) => self.spec.is_available(m.course, slot) && self.spec.is_suitable(m.course, m.room),
            Err(_) => false,
        }
    }

    /// Removes a meeting. Returns whether it was present.
    pub fn remove_meeting(&mut self, m: &MeetingWithRoom) -> bool {
        let Ok(slot) = self.slot_checked(m) else {
            return false;
        };
        let Ok(pos) = self.by_course[m.course].binary_search(m) else {
            return false;
        };
        self.by_course[m.course].remove(pos);
        if let Ok(pos) = self.slots[slot].binary_search(m) {
            self.slots[slot].remove(pos);
        }
        self.rooms[m.room].set(slot, false);
        for &q in &self.spec.course(m.course).curricula {
            if self.curricula[q][slot] == Some(*m) {
                self.curricula[q][slot] = None;
            }
        }
        true
    }

    /// Puts `m` at its slot, displacing the single meeting in its way
    /// (same curriculum, same teacher, or same room).
    ///
    /// Blocked, with no change, when more than one meeting is in the way
    /// or `m` is not admissible even after the displacement.
    pub fn replace_meeting(&mut self, m: MeetingWithRoom) -> Replacement<MeetingWithRoom> {
        let Ok(slot) = self.slot_checked(&m) else {
            return Replacement::Blocked;
        };
        let teacher = self.spec.teacher_of(m.course);
        let mut blockers = self.slots[slot].iter().copied().filter(|other| {
            other.room == m.room
                || self.spec.teacher_of(other.course) == teacher
                || self.spec.share_curriculum(m.course, other.course)
        });
        let first = blockers.next();
        if blockers.next().is_some() {
            return Replacement::Blocked;
        }

        match first {
            None if self.admits(&m) => {
                self.insert(m, slot);
                Replacement::Inserted
            }
            None => Replacement::Blocked,
            Some(old) => {
                self.remove_meeting(&old);
                if self.admits(&m) {
                    self.insert(m, slot);
                    Replacement::Displaced(old)
                } else {
                    self.insert(old, slot);
                    Replacement::Blocked
                }
            }
        }
    }

    /// The meeting of `course` at (day, period), if scheduled there.
    pub fn get_meeting(&self, course: CourseIdx, day: usize, period: usize) -> Option<MeetingWithRoom> {
        self.by_course
            .get(course)?
            .iter()
            .find(|m| m.day == day && m.period == period)
            .copied()
    }

    /// All meetings of `course`, chronologically.
    pub fn meetings_by_course(&self, course: CourseIdx) -> &[MeetingWithRoom] {
        &self.by_course[course]
    }

    /// All meetings taught by `teacher`.
    pub fn meetings_by_teacher(&self, teacher: TeacherIdx) -> impl Iterator<Item = &MeetingWithRoom> + '_ {
        self.spec
            .courses_of_teacher(teacher)
            .flat_map(move |c| self.by_course[c].iter())
    }

    /// Meetings of a curriculum, chronologically.
    pub fn meetings_of_curriculum(&self, curriculum: CurriculumIdx) -> impl Iterator<Item = &MeetingWithRoom> + '_ {
        self.curricula[curriculum].iter().flatten()
    }

    /// Meetings at `slot`.
    pub fn meetings_at(&self, slot: Slot) -> &[MeetingWithRoom] {
        &self.slots[slot]
    }

    /// Every meeting, in slot order.
    pub fn meetings(&self) -> impl Iterator<Item = &MeetingWithRoom> + '_ {
        self.slots.iter().flatten()
    }

    /// Number of scheduled meetings.
    pub fn meeting_count(&self) -> usize {
        self.by_course.iter().map(Vec::len).sum()
    }

    /// Slots at which `room` is in use.
    pub fn room_occupancy(&self, room: RoomIdx) -> &FixedBitSet {
        &self.rooms[room]
    }

    /// Whether `room` is in use at `slot`.
    pub fn is_room_occupied(&self, room: RoomIdx, slot: Slot) -> bool {
        self.rooms[room].contains(slot)
    }

    /// Whether a course sharing a curriculum with `course` sits at (day, period).
    pub fn has_lecture_of_same_curriculum(&self, course: CourseIdx, day: usize, period: usize) -> bool {
        if day >= self.spec.days() || period >= self.spec.periods_per_day() {
            return false;
        }
        let slot = self.spec.slot(day, period);
        self.spec
            .course(course)
            .curricula
            .iter()
            .any(|&q| self.curricula[q][slot].is_some())
    }

    /// Whether a course taught by the teacher of `course` sits at (day, period).
    pub fn has_lecture_with_same_teacher(&self, course: CourseIdx, day: usize, period: usize) -> bool {
        if day >= self.spec.days() || period >= self.spec.periods_per_day() {
            return false;
        }
        self.teacher_taken(course, self.spec.slot(day, period))
    }

    fn teacher_taken(&self, course: CourseIdx, slot: Slot) -> bool {
        let teacher = self.spec.teacher_of(course);
        self.slots[slot]
            .iter()
            .any(|m| self.spec.teacher_of(m.course) == teacher)
    }

    /// Drops the rooms, keeping every course at its slot.
    pub fn new_child(&self) -> CourseTimetable {
        let mut child = CourseTimetable::new(Arc::clone(&self.spec));
        for m in self.meetings() {
            // The room-level invariants imply the course-level ones.
            child.add_meeting(m.course, m.day, m.period);
        }
        child
    }
}
