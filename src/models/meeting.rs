//! Meetings: one scheduled lecture of a course.
//!
//! A meeting has no identity of its own. It exists while it sits in a
//! timetable and is gone once removed.

use serde::{Deserialize, Serialize};

use super::{CourseIdx, RoomIdx};

/// A lecture placed at (day, period), without a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Meeting {
    pub course: CourseIdx,
    pub day: usize,
    pub period: usize,
}

/// A lecture placed at (day, period) in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeetingWithRoom {
    pub course: CourseIdx,
    pub day: usize,
    pub period: usize,
    pub room: RoomIdx,
}

impl Meeting {
    pub fn new(course: CourseIdx, day: usize, period: usize) -> Self {
        Self {
            course,
            day,
            period,
        }
    }

    /// Attaches a room.
    pub fn with_room(self, room: RoomIdx) -> MeetingWithRoom {
        MeetingWithRoom {
            course: self.course,
            day: self.day,
            period: self.period,
            room,
        }
    }
}

impl MeetingWithRoom {
    pub fn new(course: CourseIdx, day: usize, period: usize, room: RoomIdx) -> Self {
        Self {
            course,
            day,
            period,
            room,
        }
    }

    /// Drops the room.
    pub fn meeting(&self) -> Meeting {
        Meeting::new(self.course, self.day, self.period)
    }
}

/// Outcome of a `replace_meeting` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement<M> {
    /// Nothing was in the way; the new meeting was simply added.
    Inserted,
    /// The new meeting took the place of the returned one.
    Displaced(M),
    /// The new meeting cannot go there; the timetable is unchanged.
    Blocked,
}

impl<M> Replacement<M> {
    /// Whether the new meeting is now in the timetable.
    pub fn is_placed(&self) -> bool {
        !matches!(self, Replacement::Blocked)
    }
}
