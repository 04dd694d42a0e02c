//! User struct definition
//!
//! A user is identified by name alone; the address is transport metadata.

use std::net::SocketAddr;

/// A user known to the coordinator
#[derive(Debug, Clone)]
pub struct User {
    /// Name from the header's user field
    pub name: String,
    /// Address the user's last datagram came from
    pub addr: SocketAddr,
}

impl User {
    pub fn new(name: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for User {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_address() {
        let a = User::new("alice", "127.0.0.1:4000".parse().unwrap());
        let b = User::new("alice", "10.0.0.2:9000".parse().unwrap());
        let c = User::new("bob", "127.0.0.1:4000".parse().unwrap());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
