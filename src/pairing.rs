//! Pairing struct definition
//!
//! Two users taken out of the waiting pool to chat with each other.
//! Relaying their traffic is not implemented yet, so every pairing stays in
//! `PairingState::AwaitingRelay` until it is torn down.

use std::net::SocketAddr;
use std::time::Instant;

use crate::types::PairingId;
use crate::user::User;

/// Lifecycle of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// Users are bound together but no relay endpoint exists
    AwaitingRelay,
}

/// 1:1 chat pairing
#[derive(Debug)]
pub struct Pairing {
    pub id: PairingId,
    /// (initiator, target)
    pub users: (User, User),
    pub state: PairingState,
    pub created_at: Instant,
}

impl Pairing {
    pub fn new(initiator: User, target: User) -> Self {
        Self {
            id: PairingId::new(),
            users: (initiator, target),
            state: PairingState::AwaitingRelay,
            created_at: Instant::now(),
        }
    }

    /// Get the other user of the pairing
    ///
    /// Returns None if `name` is not in the pairing.
    pub fn partner_of(&self, name: &str) -> Option<&User> {
        if self.users.0.name == name {
            Some(&self.users.1)
        } else if self.users.1.name == name {
            Some(&self.users.0)
        } else {
            None
        }
    }

    /// Record a new address for `name`
    ///
    /// Returns true if the user is in the pairing and the address changed.
    pub fn refresh_addr(&mut self, name: &str, addr: SocketAddr) -> bool {
        let user = if self.users.0.name == name {
            &mut self.users.0
        } else if self.users.1.name == name {
            &mut self.users.1
        } else {
            return false;
        };
        let changed = user.addr != addr;
        user.addr = addr;
        changed
    }

    /// Dissolve the pairing, handing both users back
    pub fn into_users(self) -> (User, User) {
        self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, port: u16) -> User {
        User::new(name, SocketAddr::from(([127, 0, 0, 1], port)))
    }

    #[test]
    fn test_pairing_creation() {
        let pairing = Pairing::new(user("alice", 4000), user("bob", 4001));

        assert_eq!(pairing.state, PairingState::AwaitingRelay);
        assert_eq!(pairing.users.0.name, "alice");
        assert_eq!(pairing.users.1.name, "bob");
    }

    #[test]
    fn test_partner_of() {
        let pairing = Pairing::new(user("alice", 4000), user("bob", 4001));

        assert_eq!(pairing.partner_of("alice").map(|u| u.name.as_str()), Some("bob"));
        assert_eq!(pairing.partner_of("bob").map(|u| u.name.as_str()), Some("alice"));
        assert!(pairing.partner_of("carol").is_none());
    }

    #[test]
    fn test_refresh_addr() {
        let mut pairing = Pairing::new(user("alice", 4000), user("bob", 4001));
        let moved = SocketAddr::from(([127, 0, 0, 1], 6001));

        assert!(pairing.refresh_addr("bob", moved));
        assert!(!pairing.refresh_addr("bob", moved));
        assert!(!pairing.refresh_addr("carol", moved));
        assert_eq!(pairing.partner_of("alice").map(|u| u.addr), Some(moved));
    }

    #[test]
    fn test_into_users() {
        let pairing = Pairing::new(user("alice", 4000), user("bob", 4001));
        let (a, b) = pairing.into_users();

        assert_eq!(a.name, "alice");
        assert_eq!(b.name, "bob");
    }
}
