//! Lesson-based crossover with greedy repair.
//!
//! Each child starts as a copy of one parent (the recipient) and receives
//! a subset of the other parent's meetings (the donation). The variants
//! differ only in how the donation is selected:
//!
//! - **Course**: every meeting of one random course.
//! - **Curriculum**: every meeting of one random curriculum.
//! - **Sector**: a chronological run of `size` meetings of one random
//!   curriculum (the whole curriculum if it has fewer).
//!
//! # Repair
//!
//! 1. For each donated meeting the recipient does not already have,
//!    unschedule one other meeting of the same course and remember its
//!    slot as a preferred slot.
//! 2. Place each donated meeting at its donor slot; if something is in
//!    the way, displace it (the displaced course becomes a leftover);
//!    if that fails too, the donated course becomes a leftover.
//! 3. Place each leftover at a preferred slot, else at one of
//!    `random_placements` random slots.
//! 4. Assign rooms.
//!
//! A failed attempt is retried from step 1 on a fresh copy; after
//! `max_repair_attempts` failures the child is the unchanged recipient.
//!
//! # Reference
//! Lewis, Paechter (2005), "Application of the grouping genetic
//! algorithm to university course timetabling"

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::{trace, warn};

use crate::config::EngineConfig;
use crate::models::{CourseIdx, CourseTimetable, Meeting, MeetingWithRoom, Replacement, Slot, Timetable};
use crate::scheduler::{assign_rooms, assign_slot, can_place};

/// Donation selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverType {
    /// All meetings of one course.
    Course,
    /// All meetings of one curriculum.
    Curriculum,
    /// A contiguous chronological run of one curriculum's meetings.
    Sector { size: usize },
}

impl CrossoverType {
    /// Sector crossover sized by `config.sector_size`.
    pub fn sector(config: &EngineConfig) -> Self {
        CrossoverType::Sector {
            size: config.sector_size,
        }
    }

    /// Picks the meetings of `donor` to transplant.
    pub fn select<R: Rng + ?Sized>(&self, donor: &Timetable, rng: &mut R) -> Vec<MeetingWithRoom> {
        let spec = donor.spec();
        match *self {
            CrossoverType::Course => {
                if spec.courses().is_empty() {
                    return Vec::new();
                }
                let course = rng.random_range(0..spec.courses().len());
                donor.meetings_by_course(course).to_vec()
            }
            CrossoverType::Curriculum => {
                if spec.curricula().is_empty() {
                    return Vec::new();
                }
                let q = rng.random_range(0..spec.curricula().len());
                donor.meetings_of_curriculum(q).copied().collect()
            }
            CrossoverType::Sector { size } => {
                if spec.curricula().is_empty() {
                    return Vec::new();
                }
                let q = rng.random_range(0..spec.curricula().len());
                let meetings: Vec<MeetingWithRoom> = donor.meetings_of_curriculum(q).copied().collect();
                if meetings.len() <= size {
                    return meetings;
                }
                let start = rng.random_range(0..=meetings.len() - size);
                meetings[start..start + size].to_vec()
            }
        }
    }
}

/// Two-parent crossover producing two repaired children.
#[derive(Debug, Clone)]
pub struct Crossover {
    pub kind: CrossoverType,
    config: EngineConfig,
}

impl Crossover {
    pub fn new(kind: CrossoverType) -> Self {
        Self {
            kind,
            config: EngineConfig::default(),
        }
    }

    /// Applies the repair caps from `config`.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.config = EngineConfig {
            max_repair_attempts: config.max_repair_attempts.max(1),
            ..config.clone()
        };
        self
    }

    /// Crosses `p1` and `p2`.
    ///
    /// The first child is `p1` receiving from `p2`, the second is `p2`
    /// receiving from `p1`. Both are always feasible.
    pub fn apply<R: Rng + ?Sized>(&self, p1: &Timetable, p2: &Timetable, rng: &mut R) -> (Timetable, Timetable) {
        let from_p2 = self.kind.select(p2, rng);
        let c1 = transplant(p1, &from_p2, &self.config, rng);
        let from_p1 = self.kind.select(p1, rng);
        let c2 = transplant(p2, &from_p1, &self.config, rng);
        (c1, c2)
    }
}

/// Moves `donated` into a copy of `recipient` and repairs the result.
///
/// Falls back to a copy of `recipient` when every attempt fails.
pub fn transplant<R: Rng + ?Sized>(
    recipient: &Timetable,
    donated: &[MeetingWithRoom],
    config: &EngineConfig,
    rng: &mut R,
) -> Timetable {
    if donated.is_empty() {
        return recipient.clone();
    }
    let attempts = config.max_repair_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(child) = repair_once(recipient, donated, config, rng) {
            trace!(attempt, donated = donated.len(), "crossover repaired");
            return child;
        }
    }
    warn!(
        attempts,
        donated = donated.len(),
        "crossover repair exhausted, keeping parent"
    );
    recipient.clone()
}

fn repair_once<R: Rng + ?Sized>(
    recipient: &Timetable,
    donated: &[MeetingWithRoom],
    config: &EngineConfig,
    rng: &mut R,
) -> Option<Timetable> {
    let mut ct = recipient.new_child();
    let spec = recipient.spec();
    let donated_at = |course: CourseIdx, slot: Slot| {
        donated
            .iter()
            .any(|d| d.course == course && spec.slot(d.day, d.period) == slot)
    };

    // 1. vacate
    let mut preferred: Vec<Slot> = Vec::new();
    let mut incoming: Vec<Meeting> = Vec::new();
    for m in donated {
        if ct.get_meeting(m.course, m.day, m.period).is_some() {
            continue;
        }
        let candidates: Vec<Slot> = ct
            .slots_of(m.course)
            .iter()
            .copied()
            .filter(|&s| !donated_at(m.course, s))
            .collect();
        if let Some(&slot) = candidates.choose(rng) {
            ct.remove_meeting(&Meeting::new(m.course, spec.day_of(slot), spec.period_of(slot)));
            preferred.push(slot);
        }
        incoming.push(m.meeting());
    }

    // 2. direct placement
    let mut leftovers: Vec<CourseIdx> = Vec::new();
    for m in incoming {
        if can_place(&ct, m.course, m.day, m.period) {
            ct.add_meeting(m.course, m.day, m.period);
            continue;
        }
        match displace(&mut ct, m) {
            Some(old) => leftovers.push(old.course),
            None => leftovers.push(m.course),
        }
    }

    // 3. greedy leftover placement
    for course in leftovers {
        if !place_leftover(&mut ct, course, &preferred, config.random_placements, rng) {
            return None;
        }
    }

    // 4. rooms
    assign_rooms(&ct).ok()
}

/// Puts `m` in place of the single meeting blocking it, provided the slot
/// still admits a room for everyone. Returns the displaced meeting.
fn displace(ct: &mut CourseTimetable, m: Meeting) -> Option<Meeting> {
    let displaced = match ct.replace_meeting(m) {
        Replacement::Displaced(old) => old,
        // room matching already rejected this slot
        Replacement::Inserted => {
            ct.remove_meeting(&m);
            return None;
        }
        Replacement::Blocked => return None,
    };
    let slot = ct.spec().slot(m.day, m.period);
    if assign_slot(ct.spec(), ct.courses_at(slot)).is_ok() {
        return Some(displaced);
    }
    ct.remove_meeting(&m);
    ct.add_meeting(displaced.course, displaced.day, displaced.period);
    None
}

/// Preferred slots first, then `tries` random ones.
fn place_leftover<R: Rng + ?Sized>(
    ct: &mut CourseTimetable,
    course: CourseIdx,
    preferred: &[Slot],
    tries: usize,
    rng: &mut R,
) -> bool {
    let (days, periods) = (ct.spec().days(), ct.spec().periods_per_day());
    let preferred = preferred
        .iter()
        .map(|&s| (ct.spec().day_of(s), ct.spec().period_of(s)))
        .collect::<Vec<_>>();
    let random = (0..tries).map(|_| (rng.random_range(0..days), rng.random_range(0..periods)));

    for (day, period) in preferred.into_iter().chain(random) {
        if can_place(ct, course, day, period) {
            ct.add_meeting(course, day, period);
            return true;
        }
    }
    false
}
