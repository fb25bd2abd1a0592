// Meeting room selection
//
// A fixed pool of rooms and the best-fit query over it.

pub mod pool;

pub use pool::RoomPool;
