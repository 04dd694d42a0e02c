//! SIMP header codec
//!
//! Fixed 39-byte layout, big-endian:
//!
//! | offset | size | field            |
//! |--------|------|------------------|
//! | 0      | 1    | message type     |
//! | 1      | 1    | operation        |
//! | 2      | 1    | sequence         |
//! | 3      | 32   | user (null-padded) |
//! | 35     | 4    | payload length   |

use crate::error::CodecError;
use crate::types::{MessageType, Operation, SequenceFlag};

/// Size of the user identifier field
pub const USER_FIELD_SIZE: usize = 32;

/// Size of an encoded header
pub const HEADER_SIZE: usize = 3 + USER_FIELD_SIZE + 4;

const USER_OFFSET: usize = 3;
const LENGTH_OFFSET: usize = USER_OFFSET + USER_FIELD_SIZE;

/// Message header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub message_type: MessageType,
    pub operation: Operation,
    pub sequence: SequenceFlag,
    /// Sender name; written as exactly 32 bytes on the wire
    pub user: String,
    /// Byte length of the payload that follows
    pub length: u32,
}

impl Header {
    /// Encode into the fixed 39-byte wire form
    ///
    /// Names longer than 32 bytes are cut at the last character boundary
    /// that fits; the rest of the field is null-padded.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0] = self.message_type.as_byte();
        buf[1] = self.operation.as_byte();
        buf[2] = self.sequence.as_byte();

        let user = truncate_user(&self.user);
        buf[USER_OFFSET..USER_OFFSET + user.len()].copy_from_slice(user.as_bytes());

        buf[LENGTH_OFFSET..HEADER_SIZE].copy_from_slice(&self.length.to_be_bytes());
        buf
    }

    /// Decode a header from the first 39 bytes of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < HEADER_SIZE {
            return Err(CodecError::MalformedHeader(format!(
                "need {} bytes, got {}",
                HEADER_SIZE,
                buf.len()
            )));
        }

        let message_type = MessageType::try_from(buf[0]).map_err(|b| {
            CodecError::MalformedHeader(format!("invalid message type 0x{:02x}", b))
        })?;
        let operation = Operation::try_from(buf[1])
            .map_err(|b| CodecError::MalformedHeader(format!("invalid operation 0x{:02x}", b)))?;
        let sequence = SequenceFlag::try_from(buf[2])
            .map_err(|b| CodecError::MalformedHeader(format!("invalid sequence 0x{:02x}", b)))?;

        let field = &buf[USER_OFFSET..LENGTH_OFFSET];
        let end = field
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let user = std::str::from_utf8(&field[..end])
            .map_err(|e| CodecError::MalformedHeader(format!("user field is not UTF-8: {}", e)))?
            .to_string();

        let length = u32::from_be_bytes([
            buf[LENGTH_OFFSET],
            buf[LENGTH_OFFSET + 1],
            buf[LENGTH_OFFSET + 2],
            buf[LENGTH_OFFSET + 3],
        ]);

        Ok(Self {
            message_type,
            operation,
            sequence,
            user,
            length,
        })
    }
}

/// Longest prefix of `user` that fits the user field without splitting a character
fn truncate_user(user: &str) -> &str {
    if user.len() <= USER_FIELD_SIZE {
        return user;
    }
    let mut end = USER_FIELD_SIZE;
    while !user.is_char_boundary(end) {
        end -= 1;
    }
    &user[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(user: &str) -> Header {
        Header {
            message_type: MessageType::Chat,
            operation: Operation::Err,
            sequence: SequenceFlag::NoResend,
            user: user.to_string(),
            length: 0x0102_0304,
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample("alice").encode();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[..3], &[0x02, 0x01, 0x02]);
        assert_eq!(&bytes[3..8], b"alice");
        assert!(bytes[8..35].iter().all(|&b| b == 0));
        assert_eq!(&bytes[35..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_header_round_trip() {
        for header in [
            sample("bob"),
            sample(""),
            sample(&"x".repeat(USER_FIELD_SIZE)),
            Header {
                message_type: MessageType::Control,
                operation: Operation::Fin,
                sequence: SequenceFlag::Resend,
                user: "carol".to_string(),
                length: 0,
            },
        ] {
            assert_eq!(Header::decode(&header.encode()), Ok(header));
        }
    }

    #[test]
    fn test_round_trip_every_user_length() {
        for unit in ["a", "é", "✓"] {
            let mut user = String::new();
            while user.len() <= USER_FIELD_SIZE {
                for length in [0, 1, u32::MAX] {
                    let header = Header {
                        length,
                        ..sample(&user)
                    };
                    assert_eq!(Header::decode(&header.encode()), Ok(header));
                }
                user.push_str(unit);
            }
        }
    }

    #[test]
    fn test_long_user_truncated() {
        let bytes = sample(&"a".repeat(40)).encode();
        let decoded = Header::decode(&bytes).unwrap();
        assert_eq!(decoded.user, "a".repeat(USER_FIELD_SIZE));
    }

    #[test]
    fn test_truncation_keeps_char_boundary() {
        // 31 ASCII bytes followed by a 2-byte character
        let name = format!("{}é", "a".repeat(31));
        let bytes = sample(&name).encode();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(bytes[34], 0);
        assert_eq!(Header::decode(&bytes).unwrap().user, "a".repeat(31));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let bytes = sample("alice").encode();
        assert!(matches!(
            Header::decode(&bytes[..HEADER_SIZE - 1]),
            Err(CodecError::MalformedHeader(_))
        ));
        assert!(matches!(
            Header::decode(&[]),
            Err(CodecError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_invalid_flags_rejected() {
        for index in 0..3 {
            let mut bytes = sample("alice").encode();
            bytes[index] = 0x00;
            assert!(matches!(
                Header::decode(&bytes),
                Err(CodecError::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn test_invalid_user_field_rejected() {
        let mut bytes = sample("alice").encode();
        bytes[3] = 0xFF;
        assert!(matches!(
            Header::decode(&bytes),
            Err(CodecError::MalformedHeader(_))
        ));
    }
}
