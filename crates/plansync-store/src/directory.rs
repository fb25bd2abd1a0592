//! Fixed roster of users and their priority ranks.

use std::collections::HashMap;

use plansync_types::{Priority, User, UserId};

/// Priority lookup consulted by the record store when resolving conflicts.
pub trait PriorityLookup: Send + Sync {
    /// Rank of `identifier`, or [`Priority::LOWEST`] when it is unknown.
    fn priority_of(&self, identifier: &str) -> Priority;
}

/// Read-only directory of registered users.
///
/// Lockout and retry limits belong to the caller; the directory only
/// answers whether a credential pair matches.
#[derive(Debug, Clone, Default)]
pub struct PriorityDirectory {
    users: HashMap<UserId, User>,
}

impl PriorityDirectory {
    /// Build a directory from a roster. A later entry with the same
    /// identifier replaces an earlier one.
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self { users }
    }

    /// True iff a registered user has this identifier and secret.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> bool {
        self.users
            .get(identifier)
            .map_or(false, |user| user.secret == secret)
    }

    pub fn priority_of(&self, identifier: &str) -> Priority {
        self.users
            .get(identifier)
            .map_or(Priority::LOWEST, |user| user.priority)
    }

    pub fn user(&self, identifier: &str) -> Option<&User> {
        self.users.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl PriorityLookup for PriorityDirectory {
    fn priority_of(&self, identifier: &str) -> Priority {
        PriorityDirectory::priority_of(self, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> PriorityDirectory {
        PriorityDirectory::new(vec![
            User::new("admin", "password", 1),
            User::new("manager", "manage", 2),
        ])
    }

    #[test]
    fn test_authenticate() {
        let dir = roster();
        assert!(dir.authenticate("admin", "password"));
        assert!(dir.authenticate("manager", "manage"));
        assert!(!dir.authenticate("admin", "manage"));
        assert!(!dir.authenticate("guest", "password"));
        assert!(!dir.authenticate("", ""));
    }

    #[test]
    fn test_unknown_identifier_is_lowest() {
        let dir = roster();
        assert_eq!(dir.priority_of("admin"), Priority::new(1));
        assert_eq!(dir.priority_of("manager"), Priority::new(2));
        assert_eq!(dir.priority_of("nobody"), Priority::LOWEST);
        assert_eq!(Priority::LOWEST.rank(), i32::MAX);
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let dir = PriorityDirectory::new(vec![
            User::new("admin", "old", 5),
            User::new("admin", "new", 1),
        ]);
        assert_eq!(dir.len(), 1);
        assert!(dir.authenticate("admin", "new"));
        assert_eq!(dir.priority_of("admin"), Priority::new(1));
    }
}
