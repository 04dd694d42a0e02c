//! SessionServer actor implementation
//!
//! Owns the [`Coordinator`] and applies requests one at a time, so the user
//! directory has exactly one writer no matter how many transport tasks feed it.

use std::net::SocketAddr;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::coordinator::Coordinator;
use crate::error::AppError;
use crate::message::Message;

/// Commands sent from the transport to the SessionServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// A decoded message arrived from `addr`
    Handle {
        addr: SocketAddr,
        message: Message,
        reply: oneshot::Sender<String>,
    },
    /// Snapshot of waiting user names, in listing order
    ListUsers { reply: oneshot::Sender<Vec<String>> },
}

/// The coordinator actor
pub struct SessionServer {
    coordinator: Coordinator,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl SessionServer {
    /// Create a new SessionServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            coordinator: Coordinator::new(),
            receiver,
        }
    }

    /// Run the event loop until all senders are dropped
    pub async fn run(mut self) {
        info!("SessionServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("SessionServer shutting down");
    }

    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Handle {
                addr,
                message,
                reply,
            } => {
                let response = self.coordinator.handle_message(addr, &message);
                if reply.send(response).is_err() {
                    debug!("Reply receiver for {} dropped", addr);
                }
            }
            ServerCommand::ListUsers { reply } => {
                let names = self
                    .coordinator
                    .users()
                    .map(|u| u.name.clone())
                    .collect();
                let _ = reply.send(names);
            }
        }
    }
}

/// Cloneable handle for talking to a running SessionServer
#[derive(Debug, Clone)]
pub struct ServerHandle {
    sender: mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    pub fn new(sender: mpsc::Sender<ServerCommand>) -> Self {
        Self { sender }
    }

    /// Hand a message to the coordinator and wait for the reply text
    pub async fn handle(&self, addr: SocketAddr, message: Message) -> Result<String, AppError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(ServerCommand::Handle {
                addr,
                message,
                reply,
            })
            .await
            .map_err(|_| AppError::ChannelSend)?;
        response.await.map_err(|_| AppError::ReplyDropped)
    }

    /// Names of users in the waiting pool
    pub async fn list_users(&self) -> Result<Vec<String>, AppError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(ServerCommand::ListUsers { reply })
            .await
            .map_err(|_| AppError::ChannelSend)?;
        response.await.map_err(|_| AppError::ReplyDropped)
    }
}

/// Spawn a SessionServer on the current runtime and return its handle
pub fn spawn(buffer: usize) -> ServerHandle {
    let (tx, rx) = mpsc::channel(buffer);
    tokio::spawn(SessionServer::new(rx).run());
    ServerHandle::new(tx)
}
