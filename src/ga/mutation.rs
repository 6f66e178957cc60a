//! Feasibility-preserving mutations.
//!
//! Every attempt works on a fresh course-level copy of the parent, so an
//! infeasible move is reverted by dropping the copy. After
//! `max_mutation_attempts` failures the mutation yields no offspring.

use rand::Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{CourseTimetable, Meeting, Timetable};
use crate::scheduler::{assign_rooms, can_place};

/// Mutation move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    /// Swap the slots of two meetings of different courses.
    CourseExchange,
    /// Move one meeting to a random other slot.
    Move,
}

/// Single-parent mutation.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub kind: MutationType,
    max_attempts: usize,
    random_placements: usize,
}

impl Mutation {
    pub fn new(kind: MutationType) -> Self {
        let config = EngineConfig::default();
        Self {
            kind,
            max_attempts: config.max_mutation_attempts,
            random_placements: config.random_placements,
        }
    }

    /// Applies the attempt caps from `config`.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.max_attempts = config.max_mutation_attempts.max(1);
        self.random_placements = config.random_placements;
        self
    }

    /// Mutates `parent`, or returns `None` when no feasible move was found.
    pub fn apply<R: Rng + ?Sized>(&self, parent: &Timetable, rng: &mut R) -> Option<Timetable> {
        let base = parent.new_child();
        let meetings: Vec<Meeting> = base.meetings().collect();
        if meetings.is_empty() || (self.kind == MutationType::CourseExchange && meetings.len() < 2) {
            return None;
        }

        for _ in 0..self.max_attempts {
            let moved = match self.kind {
                MutationType::CourseExchange => exchange(&base, &meetings, rng),
                MutationType::Move => relocate(&base, &meetings, self.random_placements, rng),
            };
            if let Some(child) = moved.and_then(|ct| assign_rooms(&ct).ok()) {
                return Some(child);
            }
        }
        debug!(kind = ?self.kind, attempts = self.max_attempts, "mutation found no feasible move");
        None
    }
}

fn exchange<R: Rng + ?Sized>(base: &CourseTimetable, meetings: &[Meeting], rng: &mut R) -> Option<CourseTimetable> {
    let a = meetings[rng.random_range(0..meetings.len())];
    let b = meetings[rng.random_range(0..meetings.len())];
    if a.course == b.course || (a.day, a.period) == (b.day, b.period) {
        return None;
    }

    let mut ct = base.clone();
    ct.remove_meeting(&a);
    ct.remove_meeting(&b);
    if !can_place(&ct, a.course, b.day, b.period) {
        return None;
    }
    ct.add_meeting(a.course, b.day, b.period);
    if !can_place(&ct, b.course, a.day, a.period) {
        return None;
    }
    ct.add_meeting(b.course, a.day, a.period);
    Some(ct)
}

fn relocate<R: Rng + ?Sized>(
    base: &CourseTimetable,
    meetings: &[Meeting],
    tries: usize,
    rng: &mut R,
) -> Option<CourseTimetable> {
    let m = meetings[rng.random_range(0..meetings.len())];
    let (days, periods) = (base.spec().days(), base.spec().periods_per_day());

    let mut ct = base.clone();
    ct.remove_meeting(&m);
    for _ in 0..tries {
        let (day, period) = (rng.random_range(0..days), rng.random_range(0..periods));
        if (day, period) != (m.day, m.period) && can_place(&ct, m.course, day, period) {
            ct.add_meeting(m.course, day, period);
            return Some(ct);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::evaluation::ConstraintReport;
    use crate::fixtures::{crowded, toy};
    use crate::models::{Course, MeetingWithRoom, Room, Specification};
    use crate::scheduler::GreedyInitializer;

    fn placements(tt: &Timetable) -> Vec<Meeting> {
        tt.meetings().map(|m| m.meeting()).collect()
    }

    #[test]
    fn test_exchange_keeps_feasibility() {
        let init = GreedyInitializer::new(toy());
        let mutation = Mutation::new(MutationType::CourseExchange);
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let parent = init.build(&mut rng).unwrap();
            let child = mutation.apply(&parent, &mut rng).unwrap();
            let report = ConstraintReport::evaluate(&child);
            assert!(report.is_feasible(), "{report:?}");
            assert_ne!(placements(&child), placements(&parent));
        }
    }

    #[test]
    fn test_move_keeps_lecture_counts() {
        let spec = crowded();
        let init = GreedyInitializer::new(spec.clone());
        let mutation = Mutation::new(MutationType::Move);
        let mut rng = SmallRng::seed_from_u64(21);
        let parent = init.build(&mut rng).unwrap();
        if let Some(child) = mutation.apply(&parent, &mut rng) {
            assert!(ConstraintReport::evaluate(&child).is_feasible());
            for c in 0..spec.courses().len() {
                assert_eq!(child.meetings_by_course(c).len(), spec.course(c).lectures);
            }
        }
    }

    #[test]
    fn test_single_meeting_yields_nothing() {
        let spec = Specification::builder("One", 2, 2)
            .course(Course::new("A", "T"))
            .room(Room::new("R", 10))
            .build_shared()
            .unwrap();
        let mut tt = Timetable::new(spec);
        tt.add_meeting(MeetingWithRoom::new(0, 0, 0, 0)).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(Mutation::new(MutationType::CourseExchange).apply(&tt, &mut rng).is_none());
        assert!(Mutation::new(MutationType::Move).apply(&tt, &mut rng).is_some());
    }

    #[test]
    fn test_no_feasible_exchange_is_none() {
        // A cannot take period 1, so the only exchange is illegal.
        let spec = Specification::builder("Pinned", 1, 2)
            .course(Course::new("A", "T1"))
            .course(Course::new("B", "T2"))
            .room(Room::new("R", 10))
            .unavailable("A", 0, 1)
            .build_shared()
            .unwrap();
        let mut tt = Timetable::new(spec);
        tt.add_meeting(MeetingWithRoom::new(0, 0, 0, 0)).unwrap();
        tt.add_meeting(MeetingWithRoom::new(1, 0, 1, 0)).unwrap();
        let mutation = Mutation::new(MutationType::CourseExchange)
            .with_config(&EngineConfig::default().with_max_mutation_attempts(20));
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(mutation.apply(&tt, &mut rng).is_none());
    }
}
