//! Fixed pool of meeting rooms.
//!
//! The pool is sorted by `(capacity, id)` once, when it is built, and never
//! reordered afterwards. Best-fit selection depends on that order: a binary
//! search finds the first room large enough and a forward scan skips rooms
//! that are not available.

use tracing::debug;

use plansync_types::{Room, RoomId};

/// Rooms ordered by capacity, then id.
#[derive(Debug, Clone, Default)]
pub struct RoomPool {
    rooms: Vec<Room>,
}

impl RoomPool {
    pub fn new(rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut rooms: Vec<Room> = rooms.into_iter().collect();
        rooms.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));
        Self { rooms }
    }

    /// The available room with the smallest capacity that still seats
    /// `required` people. Among equal capacities the lowest id wins.
    pub fn select_best_fit(&self, required: u32) -> Option<&Room> {
        let start = self.rooms.partition_point(|room| room.capacity < required);
        let selected = self.rooms[start..].iter().find(|room| room.fits(required));
        debug!(
            required,
            room_id = selected.map(|r| r.id.as_str()),
            "best-fit selection"
        );
        selected
    }

    /// Identifier of the best-fit room, if any.
    pub fn best_fit_id(&self, required: u32) -> Option<RoomId> {
        self.select_best_fit(required).map(|room| room.id.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id.as_str() == id)
    }

    /// Rooms in pool order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl FromIterator<Room> for RoomPool {
    fn from_iter<I: IntoIterator<Item = Room>>(iter: I) -> Self {
        RoomPool::new(iter)
    }
}
