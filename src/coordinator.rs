//! Session coordinator
//!
//! Owns the waiting pool and the active pairings, and turns each decoded
//! message into a reply text. All state changes go through
//! [`Coordinator::handle_message`].

use std::collections::HashMap;
use std::net::SocketAddr;

use tracing::{debug, info};

use crate::command::{self, Request, USAGE};
use crate::directory::Directory;
use crate::error::CommandError;
use crate::message::Message;
use crate::pairing::Pairing;
use crate::types::{MessageType, Operation, PairingId};
use crate::user::User;

/// Directory of known users plus chat pairings
#[derive(Debug, Default)]
pub struct Coordinator {
    /// Users waiting to be paired, in arrival order
    directory: Directory,
    /// Active pairings: PairingId -> Pairing
    pairings: HashMap<PairingId, Pairing>,
    /// Paired user name -> PairingId
    user_pairings: HashMap<String, PairingId>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one message from `addr` and produce the reply text
    pub fn handle_message(&mut self, addr: SocketAddr, message: &Message) -> String {
        let user = User::new(message.user(), addr);
        self.ensure_user(user.clone());

        match message.message_type() {
            MessageType::Control => self.handle_control(&user, message.operation()),
            MessageType::Chat => self.handle_chat(&user, message.data()),
        }
    }

    /// Waiting users, in listing order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.directory.iter()
    }

    /// Active pairings, in no particular order
    pub fn pairings(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.values()
    }

    /// Pairing a user belongs to, if any
    pub fn pairing_of(&self, name: &str) -> Option<&Pairing> {
        self.user_pairings
            .get(name)
            .and_then(|id| self.pairings.get(id))
    }

    /// Add a first-contact user to the waiting pool, or refresh a known user's address
    ///
    /// Paired users are already known and stay in their pairing.
    fn ensure_user(&mut self, user: User) {
        if let Some(pairing_id) = self.user_pairings.get(&user.name) {
            if let Some(pairing) = self.pairings.get_mut(pairing_id) {
                if pairing.refresh_addr(&user.name, user.addr) {
                    debug!("Paired user '{}' moved to {}", user.name, user.addr);
                }
            }
            return;
        }

        let name = user.name.clone();
        let addr = user.addr;
        if self.directory.ensure(user) {
            info!("User '{}' joined from {}", name, addr);
            debug!(
                "Waiting users: {}, Active pairings: {}",
                self.directory.len(),
                self.pairings.len()
            );
        }
    }

    fn handle_control(&mut self, user: &User, operation: Operation) -> String {
        match operation {
            Operation::Fin => {
                self.disconnect(&user.name);
                format!("User {} has disconnected", user.name)
            }
            op => {
                debug!("Unsupported control operation {} from '{}'", op, user.name);
                format!("Invalid control operation, {}", op)
            }
        }
    }

    /// Remove a user entirely; a no-op if the user is unknown
    ///
    /// If the user was paired, the pairing is dissolved and the partner goes
    /// back to the waiting pool.
    fn disconnect(&mut self, name: &str) {
        let mut removed = self.directory.remove(name).is_some();

        if let Some(pairing_id) = self.user_pairings.remove(name) {
            removed = true;
            if let Some(pairing) = self.pairings.remove(&pairing_id) {
                debug!(
                    "Pairing {} lasted {:?}",
                    pairing_id,
                    pairing.created_at.elapsed()
                );
                let (first, second) = pairing.into_users();
                let partner = if first.name == name { second } else { first };
                self.user_pairings.remove(&partner.name);
                info!(
                    "Pairing {} dissolved, '{}' returned to waiting pool",
                    pairing_id, partner.name
                );
                self.directory.ensure(partner);
            }
        }

        if removed {
            info!("User '{}' disconnected", name);
        } else {
            debug!("Disconnect for unknown user '{}' ignored", name);
        }
    }

    fn handle_chat(&mut self, user: &User, data: &str) -> String {
        let result = match command::parse(data) {
            Ok(Request::Help) => Ok(USAGE.to_string()),
            Ok(Request::List) => Ok(format!("Users:\n{}", self.directory.listing())),
            Ok(Request::Chat { target }) => self.start_chat(user, &target),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            debug!("Command '{}' from '{}' rejected: {:?}", data.trim(), user.name, e);
            e.to_string()
        })
    }

    /// Pair `sender` with the waiting user at 1-based position `target`
    fn start_chat(&mut self, sender: &User, target: &str) -> Result<String, CommandError> {
        if self.user_pairings.contains_key(&sender.name) {
            return Err(CommandError::AlreadyPaired);
        }

        let selected = target
            .parse::<usize>()
            .ok()
            .and_then(|index| self.directory.get_by_index(index))
            .ok_or_else(|| CommandError::UnknownUserReference(target.to_string()))?
            .clone();

        if selected == *sender {
            return Err(CommandError::SelfChat);
        }

        // Both leave the waiting pool
        let initiator = self
            .directory
            .remove(&sender.name)
            .unwrap_or_else(|| sender.clone());
        self.directory.remove(&selected.name);

        let target_name = selected.name.clone();
        let pairing = Pairing::new(initiator, selected);
        let pairing_id = pairing.id;

        self.user_pairings.insert(sender.name.clone(), pairing_id);
        self.user_pairings.insert(target_name.clone(), pairing_id);
        self.pairings.insert(pairing_id, pairing);

        info!(
            "Pairing {} created: '{}' <-> '{}'",
            pairing_id, sender.name, target_name
        );

        Ok(format!("Connecting with user {}", target_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::PairingState;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn chat(coordinator: &mut Coordinator, user: &str, port: u16, text: &str) -> String {
        let msg = Message::chat(text, user, false).unwrap();
        coordinator.handle_message(addr(port), &msg)
    }

    fn control(coordinator: &mut Coordinator, user: &str, port: u16, op: Operation) -> String {
        let msg = Message::control(user, op, None).unwrap();
        coordinator.handle_message(addr(port), &msg)
    }

    fn names(coordinator: &Coordinator) -> Vec<String> {
        coordinator.users().map(|u| u.name.clone()).collect()
    }

    #[test]
    fn test_help() {
        let mut c = Coordinator::new();
        assert_eq!(chat(&mut c, "alice", 4000, "help"), USAGE);
        assert_eq!(names(&c), vec!["alice"]);
    }

    #[test]
    fn test_list() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");

        assert_eq!(chat(&mut c, "alice", 4000, "list"), "Users:\n1) bob\n2) alice");
    }

    #[test]
    fn test_same_name_new_address_not_duplicated() {
        let mut c = Coordinator::new();
        chat(&mut c, "alice", 4000, "help");
        chat(&mut c, "alice", 5000, "help");

        let users: Vec<&User> = c.users().collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].addr, addr(5000));
    }

    #[test]
    fn test_chat_pairs_users() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");

        assert_eq!(chat(&mut c, "alice", 4000, "chat 1"), "Connecting with user bob");
        assert_eq!(c.users().count(), 0);
        assert_eq!(c.pairings().count(), 1);

        let pairing = c.pairing_of("alice").unwrap();
        assert_eq!(pairing.state, PairingState::AwaitingRelay);
        assert_eq!(pairing.partner_of("alice").map(|u| u.name.as_str()), Some("bob"));
        assert_eq!(c.pairing_of("bob").map(|p| p.id), Some(pairing.id));
    }

    #[test]
    fn test_paired_user_address_refreshed() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");
        chat(&mut c, "alice", 4000, "chat 1");

        chat(&mut c, "bob", 6001, "list");

        let partner = c.pairing_of("alice").and_then(|p| p.partner_of("alice"));
        assert_eq!(partner.map(|u| u.addr), Some(addr(6001)));
        assert_eq!(c.users().count(), 0);
    }

    #[test]
    fn test_chat_with_self_rejected() {
        let mut c = Coordinator::new();
        chat(&mut c, "alice", 4000, "help");
        chat(&mut c, "bob", 4001, "help");

        assert_eq!(
            chat(&mut c, "alice", 4000, "chat 1"),
            "You cannot chat with yourself"
        );
        assert_eq!(names(&c), vec!["alice", "bob"]);
        assert_eq!(c.pairings().count(), 0);
    }

    #[test]
    fn test_chat_bad_index() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");

        for target in ["0", "3", "-1", "bob", "1.5"] {
            let reply = chat(&mut c, "alice", 4000, &format!("chat {}", target));
            assert_eq!(
                reply,
                CommandError::UnknownUserReference(target.to_string()).to_string()
            );
        }
        assert_eq!(names(&c), vec!["bob", "alice"]);
    }

    #[test]
    fn test_chat_without_argument() {
        let mut c = Coordinator::new();
        let reply = chat(&mut c, "alice", 4000, "chat");

        assert_eq!(
            reply,
            CommandError::InvalidArguments {
                command: "chat",
                expected: 1,
                actual: 0
            }
            .to_string()
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut c = Coordinator::new();
        let reply = chat(&mut c, "alice", 4000, "dance");
        assert!(reply.contains("`help`"));
    }

    #[test]
    fn test_already_paired() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");
        chat(&mut c, "carol", 4002, "help");
        chat(&mut c, "alice", 4000, "chat 1");

        assert_eq!(chat(&mut c, "alice", 4000, "chat 1"), "You are already in a chat");
        // Paired users are not put back into the pool by new messages
        assert_eq!(names(&c), vec!["carol"]);
    }

    #[test]
    fn test_fin_removes_user() {
        let mut c = Coordinator::new();
        chat(&mut c, "alice", 4000, "help");
        chat(&mut c, "bob", 4001, "help");

        assert_eq!(
            control(&mut c, "alice", 4000, Operation::Fin),
            "User alice has disconnected"
        );
        assert_eq!(names(&c), vec!["bob"]);

        // Repeating is graceful
        assert_eq!(
            control(&mut c, "alice", 4000, Operation::Fin),
            "User alice has disconnected"
        );
        assert_eq!(names(&c), vec!["bob"]);
    }

    #[test]
    fn test_fin_from_paired_user_dissolves_pairing() {
        let mut c = Coordinator::new();
        chat(&mut c, "bob", 4001, "help");
        chat(&mut c, "alice", 4000, "chat 1");

        control(&mut c, "alice", 4000, Operation::Fin);

        assert_eq!(c.pairings().count(), 0);
        assert!(c.pairing_of("bob").is_none());
        assert_eq!(names(&c), vec!["bob"]);
    }

    #[test]
    fn test_other_control_operations_reported() {
        let mut c = Coordinator::new();

        assert_eq!(
            control(&mut c, "alice", 4000, Operation::Syn),
            "Invalid control operation, SYN"
        );
        assert_eq!(
            control(&mut c, "alice", 4000, Operation::Ack),
            "Invalid control operation, ACK"
        );
        assert_eq!(
            control(&mut c, "alice", 4000, Operation::Err),
            "Invalid control operation, ERR"
        );
        assert_eq!(names(&c), vec!["alice"]);
    }
}
