//! SIMP message codec
//!
//! A message is a 39-byte header followed by a UTF-8 payload whose byte
//! length equals the header's `length` field. The fields are private so the
//! length invariant holds for every constructed `Message`.

use crate::error::CodecError;
use crate::header::{Header, HEADER_SIZE};
use crate::types::{MessageType, Operation, SequenceFlag};

/// A complete SIMP message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: Header,
    data: String,
}

impl Message {
    /// Build a chat message
    ///
    /// Chat messages carry no operation semantics, so the operation is `ERR`.
    pub fn chat(content: &str, user: &str, resend: bool) -> Result<Self, CodecError> {
        Self::build(
            MessageType::Chat,
            Operation::Err,
            SequenceFlag::from_resend(resend),
            user,
            content.to_string(),
        )
    }

    /// Build a control message
    ///
    /// Only `ERR` may carry a message; any other operation with a non-empty
    /// message fails with `InvalidControlMessage`.
    pub fn control(
        user: &str,
        operation: Operation,
        message: Option<&str>,
    ) -> Result<Self, CodecError> {
        let data = message.unwrap_or_default();
        if operation != Operation::Err && !data.is_empty() {
            return Err(CodecError::InvalidControlMessage(operation));
        }

        Self::build(
            MessageType::Control,
            operation,
            SequenceFlag::NoResend,
            user,
            data.to_string(),
        )
    }

    fn build(
        message_type: MessageType,
        operation: Operation,
        sequence: SequenceFlag,
        user: &str,
        data: String,
    ) -> Result<Self, CodecError> {
        if user.contains('\0') {
            return Err(CodecError::InvalidUser(user.to_string()));
        }
        let length = u32::try_from(data.len()).map_err(|_| CodecError::PayloadTooLarge(data.len()))?;
        Ok(Self {
            header: Header {
                message_type,
                operation,
                sequence,
                user: user.to_string(),
                length,
            },
            data,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn message_type(&self) -> MessageType {
        self.header.message_type
    }

    pub fn operation(&self) -> Operation {
        self.header.operation
    }

    pub fn user(&self) -> &str {
        &self.header.user
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Encode to wire format: header bytes followed by the UTF-8 payload
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.data.len());
        buf.extend_from_slice(&self.header.encode());
        buf.extend_from_slice(self.data.as_bytes());
        buf
    }

    /// Decode from wire format
    ///
    /// Reads exactly `header.length` payload bytes; anything after that is ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let header = Header::decode(buf)?;
        let payload = &buf[HEADER_SIZE..];
        let expected = header.length as usize;

        if payload.len() < expected {
            return Err(CodecError::TruncatedPayload {
                expected,
                actual: payload.len(),
            });
        }

        let data = std::str::from_utf8(&payload[..expected])?.to_string();
        Ok(Self { header, data })
    }
}
