use crate::RoomId;

/// A bookable meeting room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub capacity: u32,
    pub available: bool,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, capacity: u32, available: bool) -> Self {
        Self {
            id: id.into(),
            capacity,
            available,
        }
    }

    /// Available and large enough for `required` people.
    pub fn fits(&self, required: u32) -> bool {
        self.available && self.capacity >= required
    }
}
