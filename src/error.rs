//! Error types for the SIMP server and client
//!
//! Three layers:
//! - `CodecError`: a datagram could not be decoded, or a message could not be built
//! - `CommandError`: a chat command was rejected; its text is sent back to the user
//! - `AppError`: process-level failures (socket, config, internal channels)

use std::str::Utf8Error;

use thiserror::Error;

use crate::types::Operation;

/// Wire codec errors
///
/// Decode errors are contained to the offending datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer than 39 header bytes, or a header field with an invalid value
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Payload shorter than the header's declared length
    #[error("truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    /// Payload is not valid UTF-8
    #[error("invalid payload encoding: {0}")]
    InvalidEncoding(#[from] Utf8Error),

    /// Non-empty message attached to a control operation other than ERR
    #[error("control operation {0} cannot carry a message")]
    InvalidControlMessage(Operation),

    /// User name containing a NUL byte, which the null-padded field cannot carry
    #[error("invalid user name {0:?}: contains a NUL byte")]
    InvalidUser(String),

    /// Payload length does not fit in the 4-byte length field
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
}

/// Command errors
///
/// Always turned into a reply for the user, never propagated as a fault.
/// The `Display` text is exactly what the user receives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown (or empty) command token
    #[error("Unknown command, try running `help` for more information")]
    UnrecognizedCommand,

    /// Known command with the wrong number of arguments
    #[error(
        "Invalid arguments for `{command}`: expected {expected}, got {actual}. Try running `help` for more information"
    )]
    InvalidArguments {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `chat` index that is not a number or is out of range
    #[error("No user at index '{0}', try running `list` to see who is online")]
    UnknownUserReference(String),

    /// `chat` index that resolves to the sender
    #[error("You cannot chat with yourself")]
    SelfChat,

    /// Sender is already part of a pairing
    #[error("You are already in a chat")]
    AlreadyPaired,
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Socket error (fatal at bind time, logged otherwise)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file, environment variable or flag
    #[error("Configuration error: {0}")]
    Config(String),

    /// Channel send error (fatal - coordinator actor is gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Coordinator dropped the reply channel without answering
    #[error("Reply dropped")]
    ReplyDropped,

    /// No reply from the server in time
    #[error("Timed out waiting for reply")]
    Timeout,
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
