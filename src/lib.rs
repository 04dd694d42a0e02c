//! SIMP: Simple Instant Messaging Protocol over UDP
//!
//! A fixed 39-byte binary header carrying a UTF-8 text payload, plus a
//! server-side coordinator that tracks users and pairs them into chats.
//!
//! # Features
//! - Header and message codec with strict decode errors
//! - `help`, `list` and `chat <index>` server commands
//! - `FIN` disconnects
//! - Waiting pool to pairing transitions
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `SessionServer` owns the `Coordinator` and is the only writer of its state
//! - The UDP `handler` decodes datagrams and asks the actor for a reply
//! - `client::request` is the matching send-and-wait for clients
//!
//! # Example
//! ```ignore
//! use tokio::net::UdpSocket;
//! use simp::{handler, server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let socket = UdpSocket::bind("127.0.0.1:5000").await.unwrap();
//!     let handle = server::spawn(256);
//!     handler::serve(socket, handle).await.unwrap();
//! }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod handler;
pub mod header;
pub mod message;
pub mod pairing;
pub mod server;
pub mod types;
pub mod user;

// Re-export main types for convenience
pub use command::{Command, Request};
pub use config::{CliArgs, Config};
pub use coordinator::Coordinator;
pub use error::{AppError, CodecError, CommandError};
pub use handler::serve;
pub use header::{Header, HEADER_SIZE};
pub use message::Message;
pub use pairing::{Pairing, PairingState};
pub use server::{ServerCommand, ServerHandle, SessionServer};
pub use types::{MessageType, Operation, PairingId, SequenceFlag};
pub use user::User;
