// plansync runtime
//
// Loads configuration, installs the tracing subscriber and wires the
// directory, record store and room pool into a running service.

pub mod config;
pub mod service;
pub mod telemetry;

pub use config::{PlansyncConfig, RoomConfig, StorageConfig, UserConfig};
pub use service::{Service, Session};
pub use telemetry::{init_tracing, DEFAULT_FILTER};
