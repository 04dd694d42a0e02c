//! Waiting-pool directory
//!
//! Ordered list of users not currently paired. Membership is by name.
//! `list` and `chat <index>` address users by 1-based position in this
//! order, so indices shift whenever an earlier user leaves.

use crate::user::User;

#[derive(Debug, Default)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `user` if its name is unseen, otherwise refresh the stored address
    ///
    /// Returns true if a new entry was created.
    pub fn ensure(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|u| **u == user) {
            Some(existing) => {
                existing.addr = user.addr;
                false
            }
            None => {
                self.users.push(user);
                true
            }
        }
    }

    /// Remove a user by name, `None` if absent
    pub fn remove(&mut self, name: &str) -> Option<User> {
        let index = self.users.iter().position(|u| u.name == name)?;
        Some(self.users.remove(index))
    }

    /// Look up a user by 1-based position
    pub fn get_by_index(&self, index: usize) -> Option<&User> {
        index.checked_sub(1).and_then(|i| self.users.get(i))
    }

    /// Numbered listing, one `N) name` line per user
    pub fn listing(&self) -> String {
        self.users
            .iter()
            .enumerate()
            .map(|(i, u)| format!("{}) {}", i + 1, u.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
