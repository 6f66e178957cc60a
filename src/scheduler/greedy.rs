//! Greedy randomized initializer.
//!
//! # Algorithm
//!
//! 1. Expand every course into one token per lecture, each carrying the
//!    hardness of the course's teacher (lectures taught + unavailable
//!    slots).
//! 2. Sort tokens by hardness, descending (stable: declaration order on ties).
//! 3. Walk the slots with a cursor advanced by a fixed additive step
//!    modulo the slot count. Start and step are drawn from the caller's
//!    RNG, so every timetable differs while each run stays reproducible.
//! 4. At the cursor, place the head token if it fits; otherwise look for
//!    another slot along the same stepping sequence. Then co-place every
//!    further pending token that fits at the cursor, in hardness order.
//! 5. If the head fits nowhere, raise its teacher's hardness by
//!    `max(2, hardness / 10)` and restart from an empty timetable.
//! 6. Once every token is placed, assign rooms slot by slot.
//!
//! Hardness escalations persist across the restarts of one build and are
//! discarded afterwards. The shared specification is never modified.
//!
//! # Reference
//! Burke, Petrovic (2002), "Recent research directions in automated
//! timetabling", Sec. 2 (graph colouring heuristics, saturation ordering)

use std::cmp::Reverse;
use std::iter;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, instrument, Level};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::rooms::{assign_rooms, can_place};
use crate::config::EngineConfig;
use crate::error::{InitializationError, RoomAssignmentError};
use crate::models::{CourseIdx, CourseTimetable, Slot, Specification, Timetable};

/// Slot cursor advancing by a fixed step modulo the slot count.
///
/// The step is coprime with the slot count, so the cursor visits every
/// slot once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    position: Slot,
    step: usize,
    slots: usize,
}

impl Cursor {
    fn random<R: Rng + ?Sized>(slots: usize, rng: &mut R) -> Self {
        let steps: Vec<usize> = (1..slots.max(2)).filter(|&s| gcd(s, slots) == 1).collect();
        let step = steps[rng.random_range(0..steps.len())];
        Self {
            position: rng.random_range(0..slots),
            step,
            slots,
        }
    }

    fn advance(&mut self) {
        self.position = self.ahead(1);
    }

    fn ahead(&self, k: usize) -> Slot {
        (self.position + k * self.step) % self.slots
    }
}

/// Raises a hardness value by `max(2, hardness / 10)`, saturating.
fn escalate(hardness: u64) -> u64 {
    hardness.saturating_add((hardness / 10).max(2))
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Greedy randomized timetable builder.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_timetable::models::{Course, Room, Specification};
/// use u_timetable::scheduler::GreedyInitializer;
///
/// let spec = Specification::builder("Mini", 2, 2)
///     .course(Course::new("C1", "T1").with_lectures(2))
///     .room(Room::new("R1", 30))
///     .build_shared()
///     .unwrap();
///
/// let init = GreedyInitializer::new(spec);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let timetable = init.build(&mut rng).unwrap();
/// assert_eq!(timetable.meeting_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyInitializer {
    spec: Arc<Specification>,
    max_attempts: usize,
}

impl GreedyInitializer {
    /// Creates an initializer with the default restart cap (300).
    pub fn new(spec: Arc<Specification>) -> Self {
        Self {
            spec,
            max_attempts: EngineConfig::default().max_init_attempts,
        }
    }

    /// Applies the restart cap from `config`.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.max_attempts = config.max_init_attempts.max(1);
        self
    }

    /// Sets the restart cap.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn spec(&self) -> &Arc<Specification> {
        &self.spec
    }

    /// Builds `population_size` timetables, each from its own RNG stream.
    ///
    /// With the `parallel` feature the builds run on the rayon pool; the
    /// result is identical either way since every stream is seeded up front.
    ///
    /// # Errors
    /// The first [`InitializationError`] encountered.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Timetable>, InitializationError> {
        let seeds: Vec<u64> = (0..population_size).map(|_| rng.random()).collect();
        let build = |&seed: &u64| self.build(&mut SmallRng::seed_from_u64(seed));

        #[cfg(feature = "parallel")]
        let population = seeds.par_iter().map(build).collect();
        #[cfg(not(feature = "parallel"))]
        let population = seeds.iter().map(build).collect();

        population
    }

    /// Builds one feasible timetable.
    ///
    /// # Errors
    /// - [`InitializationError::EmptyGrid`] if lectures exist but there are
    ///   no slots or no rooms.
    /// - [`InitializationError::Exhausted`] after the restart cap; the
    ///   error names the course placed last unsuccessfully.
    #[instrument(skip_all, level = Level::DEBUG, fields(instance = %self.spec.name()))]
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Timetable, InitializationError> {
        let spec = &self.spec;
        let lectures = spec.total_lectures();
        if lectures == 0 {
            return Ok(Timetable::new(Arc::clone(spec)));
        }
        if spec.slot_count() == 0 || spec.rooms().is_empty() {
            return Err(InitializationError::EmptyGrid {
                slots: spec.slot_count(),
                rooms: spec.rooms().len(),
                lectures,
            });
        }

        let mut hardness = self.base_hardness();
        let mut stuck: CourseIdx = 0;

        for attempt in 1..=self.max_attempts {
            let mut cursor = Cursor::random(spec.slot_count(), rng);
            match self.attempt(&hardness, &mut cursor) {
                Ok(timetable) => {
                    debug!(attempt, "initial timetable built");
                    return Ok(timetable);
                }
                Err(course) => {
                    let teacher = spec.teacher_of(course);
                    hardness[teacher] = escalate(hardness[teacher]);
                    debug!(
                        attempt,
                        course = %spec.course(course).id,
                        hardness = hardness[teacher],
                        "lecture could not be placed, restarting"
                    );
                    stuck = course;
                }
            }
        }

        let course = spec.course(stuck);
        error!(
            attempts = self.max_attempts,
            course = %course.id,
            teacher = %course.teacher,
            "greedy initialization exhausted"
        );
        Err(InitializationError::Exhausted {
            attempts: self.max_attempts,
            course: course.id.clone(),
            teacher: course.teacher.clone(),
        })
    }

    /// Initial hardness per teacher: lectures taught plus unavailable slots.
    fn base_hardness(&self) -> Vec<u64> {
        let mut hardness = vec![0u64; self.spec.teachers().len()];
        for (c, course) in self.spec.courses().iter().enumerate() {
            let load = course.lectures.saturating_add(self.spec.unavailable_slot_count(c));
            let load = u64::try_from(load).unwrap_or(u64::MAX);
            hardness[course.teacher_idx] = hardness[course.teacher_idx].saturating_add(load);
        }
        hardness
    }

    /// One pass over all lecture tokens. Returns the course that could
    /// not be placed on failure.
    fn attempt(&self, hardness: &[u64], cursor: &mut Cursor) -> Result<Timetable, CourseIdx> {
        let spec = &self.spec;
        let mut pending: Vec<CourseIdx> = spec
            .courses()
            .iter()
            .enumerate()
            .flat_map(|(c, course)| iter::repeat(c).take(course.lectures))
            .collect();
        pending.sort_by_key(|&c| Reverse(hardness[spec.teacher_of(c)]));

        let mut ct = CourseTimetable::new(Arc::clone(spec));
        let at = |slot: Slot| (spec.day_of(slot), spec.period_of(slot));

        while let Some(&head) = pending.first() {
            let target = (0..cursor.slots)
                .map(|k| cursor.ahead(k))
                .find(|&slot| {
                    let (day, period) = at(slot);
                    can_place(&ct, head, day, period)
                })
                .ok_or(head)?;
            let (day, period) = at(target);
            ct.add_meeting(head, day, period);
            pending.remove(0);

            let (day, period) = at(cursor.position);
            let mut i = 0;
            while i < pending.len() {
                if can_place(&ct, pending[i], day, period) {
                    ct.add_meeting(pending[i], day, period);
                    pending.remove(i);
                } else {
                    i += 1;
                }
            }

            cursor.advance();
        }

        assign_rooms(&ct).map_err(|RoomAssignmentError::NoSuitableRoom { course, .. }| course)
    }
}
