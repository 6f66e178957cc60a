//! Room assignment heuristic.
//!
//! # Algorithm
//!
//! Run independently for every slot of a [`CourseTimetable`]:
//!
//! 1. For each course at the slot, build a row of room scores:
//!    `None` if the room is forbidden for the course, else
//!    `students - capacity` (negative = seats to spare, positive = overflow).
//! 2. Pick the unassigned course with the fewest remaining admissible
//!    rooms (most constrained first; the first such course on ties).
//! 3. Give it its best room: `0`, then negatives closest to zero, then
//!    positives ascending.
//! 4. Strike that room from every other row and repeat.
//!
//! Fails as soon as the picked course has no admissible room left. Not
//! optimal, but deterministic for a given course order and cheap enough
//! to run once per slot per candidate.
//!
//! # Complexity
//! O(k² · r) per slot where k = courses at the slot, r = rooms.
//!
//! # Reference
//! Lewis (2008), "A survey of metaheuristic-based techniques for
//! university timetabling problems", Sec. 3 (room matching)

use std::sync::Arc;

use tracing::trace;

use crate::error::RoomAssignmentError;
use crate::models::{CourseIdx, CourseTimetable, MeetingWithRoom, RoomIdx, Specification, Timetable};

/// Ranking key for a room score: exact fit, then spare seats (fewest
/// first), then overflow (smallest first).
#[inline]
fn rank(score: i64) -> (bool, i64) {
    (score > 0, score.abs())
}

/// Assigns a distinct room to each course sharing one slot.
///
/// Returns the rooms parallel to `courses`, or the first course left
/// without an admissible room.
pub fn assign_slot(spec: &Specification, courses: &[CourseIdx]) -> Result<Vec<RoomIdx>, CourseIdx> {
    let room_count = spec.rooms().len();
    let mut rows: Vec<Vec<Option<i64>>> = courses
        .iter()
        .map(|&c| {
            let students = spec.course(c).students;
            (0..room_count)
                .map(|r| spec.is_suitable(c, r).then(|| spec.room(r).overflow(students)))
                .collect()
        })
        .collect();
    let mut remaining: Vec<usize> = rows.iter().map(|row| row.iter().flatten().count()).collect();
    let mut assigned: Vec<Option<RoomIdx>> = vec![None; courses.len()];

    for _ in 0..courses.len() {
        let Some(pick) = (0..courses.len())
            .filter(|&i| assigned[i].is_none())
            .min_by_key(|&i| remaining[i])
        else {
            break;
        };

        let best = rows[pick]
            .iter()
            .enumerate()
            .filter_map(|(r, score)| score.map(|s| (r, s)))
            .min_by_key(|&(_, s)| rank(s));
        let Some((room, _)) = best else {
            return Err(courses[pick]);
        };

        assigned[pick] = Some(room);
        for (i, row) in rows.iter_mut().enumerate() {
            if assigned[i].is_none() && row[room].take().is_some() {
                remaining[i] -= 1;
            }
        }
    }

    Ok(assigned.into_iter().flatten().collect())
}

/// Whether `course` can join (day, period) of `ct` and the slot still
/// admits a room for every course in it.
pub fn can_place(ct: &CourseTimetable, course: CourseIdx, day: usize, period: usize) -> bool {
    if !ct.can_add(course, day, period) {
        return false;
    }
    let slot = ct.spec().slot(day, period);
    let mut courses = ct.courses_at(slot).to_vec();
    let pos = courses.partition_point(|&c| c < course);
    courses.insert(pos, course);
    assign_slot(ct.spec(), &courses).is_ok()
}

/// Turns a course-level timetable into a room-level one.
///
/// # Errors
/// [`RoomAssignmentError::NoSuitableRoom`] naming the first slot where
/// the heuristic runs out of rooms.
pub fn assign_rooms(ct: &CourseTimetable) -> Result<Timetable, RoomAssignmentError> {
    let spec: &Arc<Specification> = ct.shared_spec();
    let mut timetable = Timetable::new(Arc::clone(spec));

    for slot in 0..spec.slot_count() {
        let courses = ct.courses_at(slot);
        if courses.is_empty() {
            continue;
        }
        let rooms = assign_slot(spec, courses).map_err(|course| {
            trace!(course, slot, "room assignment failed");
            RoomAssignmentError::NoSuitableRoom { course, slot }
        })?;
        let (day, period) = (spec.day_of(slot), spec.period_of(slot));
        for (&course, room) in courses.iter().zip(rooms) {
            // Course-level invariants and distinct rooms make this infallible.
            if timetable
                .add_meeting(MeetingWithRoom::new(course, day, period, room))
                .is_err()
            {
                return Err(RoomAssignmentError::NoSuitableRoom { course, slot });
            }
        }
    }

    Ok(timetable)
}
