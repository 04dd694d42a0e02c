//! Basic type definitions for SIMP
//!
//! - `MessageType`, `Operation`, `SequenceFlag`: the three one-byte header flags
//! - `PairingId`: UUID-based identifier for a chat pairing
//!
//! Each flag is a closed enum with an explicit byte table. Only single values
//! are ever sent, so no bitwise combination is supported.

use std::fmt;

use uuid::Uuid;

/// Message type flag (header byte 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Protocol management: handshake, disconnect, errors
    Control,
    /// Chat text, interpreted as a server command
    Chat,
}

impl MessageType {
    pub const fn as_byte(self) -> u8 {
        match self {
            MessageType::Control => 0x01,
            MessageType::Chat => 0x02,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(MessageType::Control),
            0x02 => Ok(MessageType::Chat),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Control => write!(f, "CONTROL"),
            MessageType::Chat => write!(f, "CHAT"),
        }
    }
}

/// Operation flag (header byte 1)
///
/// `ERR` is encoded as 0x01 so an all-zero header never decodes as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Error or default; the only operation allowed to carry a message
    Err,
    /// Handshake request (reserved)
    Syn,
    /// Handshake acknowledgement (reserved)
    Ack,
    /// Voluntary disconnect
    Fin,
}

impl Operation {
    pub const fn as_byte(self) -> u8 {
        match self {
            Operation::Err => 0x01,
            Operation::Syn => 0x02,
            Operation::Ack => 0x04,
            Operation::Fin => 0x08,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(Operation::Err),
            0x02 => Ok(Operation::Syn),
            0x04 => Ok(Operation::Ack),
            0x08 => Ok(Operation::Fin),
            other => Err(other),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Err => write!(f, "ERR"),
            Operation::Syn => write!(f, "SYN"),
            Operation::Ack => write!(f, "ACK"),
            Operation::Fin => write!(f, "FIN"),
        }
    }
}

/// Sequence flag (header byte 2)
///
/// Set by senders, not acted upon by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceFlag {
    /// Retransmission of an earlier message
    Resend,
    /// First transmission
    NoResend,
}

impl SequenceFlag {
    pub const fn as_byte(self) -> u8 {
        match self {
            SequenceFlag::Resend => 0x01,
            SequenceFlag::NoResend => 0x02,
        }
    }

    pub const fn from_resend(resend: bool) -> Self {
        if resend {
            SequenceFlag::Resend
        } else {
            SequenceFlag::NoResend
        }
    }
}

impl TryFrom<u8> for SequenceFlag {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(SequenceFlag::Resend),
            0x02 => Ok(SequenceFlag::NoResend),
            other => Err(other),
        }
    }
}

impl fmt::Display for SequenceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceFlag::Resend => write!(f, "RE"),
            SequenceFlag::NoResend => write!(f, "NORE"),
        }
    }
}

/// Unique pairing identifier (newtype pattern)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairingId(pub Uuid);

impl PairingId {
    /// Create a new random pairing ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PairingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
