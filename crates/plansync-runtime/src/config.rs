//! Service configuration
//!
//! Read from TOML. Every section is optional; a missing section falls back
//! to the defaults below, which reproduce the stock two-user roster and
//! three-room pool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use plansync_error::{ConfigError, ConfigResult};
use plansync_types::{Priority, Room, RoomId, User, UserId};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlansyncConfig {
    pub storage: StorageConfig,
    pub users: Vec<UserConfig>,
    pub rooms: Vec<RoomConfig>,
}

/// Where the record store is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File loaded at startup and written by explicit saves
    pub primary_path: PathBuf,
    /// File rewritten whenever a new record is created
    pub backup_path: PathBuf,
    pub backup_on_create: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: UserId,
    pub secret: String,
    /// Lower is more authoritative
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub id: RoomId,
    pub capacity: u32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            primary_path: PathBuf::from("floor_plans.txt"),
            backup_path: PathBuf::from("backup_floor_plans.txt"),
            backup_on_create: true,
        }
    }
}

impl Default for PlansyncConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            users: vec![
                UserConfig {
                    name: UserId::new("admin"),
                    secret: "password".to_string(),
                    priority: Priority::new(1),
                },
                UserConfig {
                    name: UserId::new("manager"),
                    secret: "manage".to_string(),
                    priority: Priority::new(2),
                },
            ],
            rooms: vec![
                RoomConfig { id: RoomId::new("1"), capacity: 10, available: true },
                RoomConfig { id: RoomId::new("2"), capacity: 15, available: true },
                RoomConfig { id: RoomId::new("3"), capacity: 20, available: true },
            ],
        }
    }
}

impl PlansyncConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: PlansyncConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.backup_on_create && self.storage.primary_path == self.storage.backup_path {
            return Err(ConfigError::Invalid(format!(
                "backup path must differ from primary path {}",
                self.storage.primary_path.display()
            )));
        }

        let mut names = HashSet::new();
        for user in &self.users {
            if user.name.as_str().is_empty() {
                return Err(ConfigError::Invalid("user name must not be empty".into()));
            }
            if !names.insert(&user.name) {
                return Err(ConfigError::Invalid(format!("duplicate user {}", user.name)));
            }
        }

        let mut ids = HashSet::new();
        for room in &self.rooms {
            if room.id.as_str().is_empty() {
                return Err(ConfigError::Invalid("room id must not be empty".into()));
            }
            if !ids.insert(&room.id) {
                return Err(ConfigError::Invalid(format!("duplicate room {}", room.id)));
            }
        }
        Ok(())
    }

    pub fn roster(&self) -> Vec<User> {
        self.users
            .iter()
            .map(|u| User::new(u.name.clone(), u.secret.as_str(), u.priority))
            .collect()
    }

    pub fn room_pool(&self) -> Vec<Room> {
        self.rooms
            .iter()
            .map(|r| Room::new(r.id.clone(), r.capacity, r.available))
            .collect()
    }
}
