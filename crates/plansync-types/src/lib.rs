// plansync core types
//
// Identifiers, priorities, timestamps, and the record/user/room structures
// shared by every other crate in the workspace.

pub mod ids;
pub mod priority;
pub mod record;
pub mod room;
pub mod time;
pub mod user;

pub use ids::{RecordId, RoomId, UserId};
pub use priority::Priority;
pub use record::{Record, WriteOutcome};
pub use room::Room;
pub use time::Timestamp;
pub use user::User;
