//! Room model.

use serde::{Deserialize, Serialize};

/// Index of a room inside its [`Specification`](super::Specification).
pub type RoomIdx = usize;

/// A lecture room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Number of seats.
    pub capacity: u32,
    /// Building / site number (used only by extended formulations).
    pub site: u32,
}

impl Room {
    /// Creates a room on site 0.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            site: 0,
        }
    }

    /// Sets the site.
    pub fn with_site(mut self, site: u32) -> Self {
        self.site = site;
        self
    }

    /// Seat overflow when hosting `students`: positive when the room is
    /// too small, negative when seats are left empty.
    #[inline]
    pub fn overflow(&self, students: u32) -> i64 {
        students as i64 - self.capacity as i64
    }
}
