//! Constraint violation counts.
//!
//! Counts hard and soft constraint violations of a finished
//! [`Timetable`]. Counts are raw; weighting them into an objective is
//! left to the caller.
//!
//! # Constraints
//!
//! | Constraint | Kind | Unit |
//! |------------|------|------|
//! | Lectures | Hard | missing or extra lectures per course |
//! | Curriculum conflicts | Hard | extra meetings of one curriculum per slot |
//! | Teacher conflicts | Hard | extra meetings of one teacher per slot |
//! | Room occupancy | Hard | extra meetings in one room per slot |
//! | Availability | Hard | meetings at unavailable slots |
//! | Room constraints | Hard | meetings in forbidden rooms |
//! | Room capacity | Soft | students above capacity |
//! | Minimum working days | Soft | days short of the minimum |
//! | Isolated lectures | Soft | curriculum lectures without an adjacent one |
//! | Room stability | Soft | rooms beyond the first per course |
//!
//! # Reference
//! Di Gaspero, McCollum, Schaerf (2007), "The Second International
//! Timetabling Competition (ITC-2007): Curriculum-based Course
//! Timetabling (Track 3)", Sec. 2

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::Timetable;

/// Violation counts of one timetable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintReport {
    /// Lectures required but not scheduled.
    pub missing_lectures: usize,
    /// Lectures scheduled beyond the requirement.
    pub extra_lectures: usize,
    pub curriculum_conflicts: usize,
    pub teacher_conflicts: usize,
    /// Meetings sharing a room at a slot, beyond the first.
    pub room_occupancy: usize,
    /// Meetings at a slot the course's teacher is unavailable.
    pub availability: usize,
    /// Meetings in a room forbidden for the course.
    pub room_constraints: usize,
    /// Total students above room capacity.
    pub room_capacity: usize,
    pub min_working_days: usize,
    pub isolated_lectures: usize,
    pub room_stability: usize,
}

impl ConstraintReport {
    /// Counts every violation of `timetable`.
    pub fn evaluate(timetable: &Timetable) -> Self {
        let spec = timetable.spec();
        let mut report = Self::default();

        for (c, course) in spec.courses().iter().enumerate() {
            let meetings = timetable.meetings_by_course(c);
            report.missing_lectures += course.lectures.saturating_sub(meetings.len());
            report.extra_lectures += meetings.len().saturating_sub(course.lectures);

            let days: BTreeSet<usize> = meetings.iter().map(|m| m.day).collect();
            report.min_working_days += course.min_working_days.saturating_sub(days.len());

            let rooms: BTreeSet<usize> = meetings.iter().map(|m| m.room).collect();
            report.room_stability += rooms.len().saturating_sub(1);

            for m in meetings {
                if !spec.is_available(c, spec.slot(m.day, m.period)) {
                    report.availability += 1;
                }
                if !spec.is_suitable(c, m.room) {
                    report.room_constraints += 1;
                }
                let overflow = spec.room(m.room).overflow(course.students);
                report.room_capacity += overflow.max(0) as usize;
            }
        }

        for slot in 0..spec.slot_count() {
            let at = timetable.meetings_at(slot);
            report.room_occupancy += excess(at.iter().map(|m| m.room));
            report.teacher_conflicts += excess(at.iter().map(|m| spec.teacher_of(m.course)));
            for curriculum in spec.curricula() {
                let members = at.iter().filter(|m| curriculum.contains(m.course)).count();
                report.curriculum_conflicts += members.saturating_sub(1);
            }
        }

        report.isolated_lectures = isolated_lectures(timetable);
        report
    }

    /// Sum of the hard counts.
    pub fn hard_violations(&self) -> usize {
        self.missing_lectures
            + self.extra_lectures
            + self.curriculum_conflicts
            + self.teacher_conflicts
            + self.room_occupancy
            + self.availability
            + self.room_constraints
    }

    /// Sum of the soft counts, unweighted.
    pub fn soft_penalties(&self) -> usize {
        self.room_capacity + self.min_working_days + self.isolated_lectures + self.room_stability
    }

    /// No hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations() == 0
    }
}

/// Occurrences beyond the first of each distinct key.
fn excess(keys: impl Iterator<Item = usize>) -> usize {
    let mut seen = BTreeSet::new();
    keys.filter(|&k| !seen.insert(k)).count()
}

fn isolated_lectures(timetable: &Timetable) -> usize {
    let spec = timetable.spec();
    let ppd = spec.periods_per_day();
    let mut isolated = 0;

    for q in 0..spec.curricula().len() {
        let mut busy = vec![false; spec.slot_count()];
        for m in timetable.meetings_of_curriculum(q) {
            busy[spec.slot(m.day, m.period)] = true;
        }
        for m in timetable.meetings_of_curriculum(q) {
            let slot = spec.slot(m.day, m.period);
            let before = m.period > 0 && busy[slot - 1];
            let after = m.period + 1 < ppd && busy[slot + 1];
            if !before && !after {
                isolated += 1;
            }
        }
    }
    isolated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::toy;
    use crate::models::{Course, MeetingWithRoom, Room, Specification};

    fn small() -> Timetable {
        let spec = Specification::builder("Small", 2, 3)
            .course(
                Course::new("A", "T1")
                    .with_lectures(2)
                    .with_min_working_days(2)
                    .with_students(30),
            )
            .course(Course::new("B", "T2").with_lectures(1).with_students(50))
            .room(Room::new("R1", 40))
            .room(Room::new("R2", 20))
            .curriculum("Q", ["A", "B"])
            .unavailable("A", 1, 2)
            .room_constraint("B", "R2")
            .build_shared()
            .unwrap();
        let mut tt = Timetable::new(spec);
        tt.add_meeting(MeetingWithRoom::new(0, 0, 0, 0)).unwrap();
        tt.add_meeting(MeetingWithRoom::new(0, 0, 1, 1)).unwrap();
        tt.add_meeting(MeetingWithRoom::new(1, 1, 0, 1)).unwrap();
        tt
    }

    #[test]
    fn test_empty_timetable_misses_everything() {
        let spec = toy();
        let report = ConstraintReport::evaluate(&Timetable::new(spec.clone()));
        assert_eq!(report.missing_lectures, spec.total_lectures());
        assert!(!report.is_feasible());
        assert_eq!(report.soft_penalties(), 3 + 2 + 4 + 4);
    }

    #[test]
    fn test_counts_on_small_instance() {
        let report = ConstraintReport::evaluate(&small());
        assert_eq!(report.missing_lectures, 0);
        assert_eq!(report.curriculum_conflicts, 0);
        assert_eq!(report.room_constraints, 1);
        assert_eq!(report.availability, 0);
        assert_eq!(report.room_capacity, 10 + 30);
        assert_eq!(report.min_working_days, 1);
        assert_eq!(report.isolated_lectures, 1);
        assert_eq!(report.room_stability, 1);
        assert_eq!(report.hard_violations(), 1);
        assert_eq!(report.soft_penalties(), 43);
    }

    #[test]
    fn test_unavailable_and_extra_lecture() {
        let mut tt = small();
        tt.add_meeting(MeetingWithRoom::new(0, 1, 2, 0)).unwrap();
        let report = ConstraintReport::evaluate(&tt);
        assert_eq!(report.availability, 1);
        assert_eq!(report.extra_lectures, 1);
        assert_eq!(report.hard_violations(), 3);
    }

    #[test]
    fn test_excess() {
        assert_eq!(excess([1, 2, 1, 1, 3].into_iter()), 2);
        assert_eq!(excess(std::iter::empty()), 0);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(ConstraintReport::evaluate(&small())).unwrap();
        assert_eq!(json["room_constraints"], 1);
        assert_eq!(json["isolated_lectures"], 1);
    }
}
