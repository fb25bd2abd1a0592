use crate::{Priority, UserId};

/// A registered user of the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub secret: String,
    pub priority: Priority,
}

impl User {
    pub fn new(id: impl Into<UserId>, secret: impl Into<String>, priority: impl Into<Priority>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            priority: priority.into(),
        }
    }
}
