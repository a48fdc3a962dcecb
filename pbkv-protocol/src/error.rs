//! Protocol error types.

use crate::code::MessageCode;
use thiserror::Error;

/// Protocol-level errors that can occur during framing or payload decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame too large: {size} bytes payload")]
    FrameTooLarge { size: usize },

    #[error("invalid frame length: {0} (length must cover the code byte)")]
    InvalidLength(u32),

    #[error("unknown message code: {0}")]
    UnknownCode(u8),

    #[error("unexpected message: expected {expected:?}, got {actual:?}")]
    UnexpectedMessage {
        expected: MessageCode,
        actual: MessageCode,
    },

    #[error("truncated {message} payload")]
    Truncated { message: &'static str },

    #[error("missing required field {field} in {message}")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::InvalidLength(0);
        assert!(err.to_string().contains("0"));

        let err = ProtocolError::UnknownCode(99);
        assert!(err.to_string().contains("99"));

        let err = ProtocolError::UnexpectedMessage {
            expected: MessageCode::ListKeysResp,
            actual: MessageCode::PingResp,
        };
        let msg = err.to_string();
        assert!(msg.contains("ListKeysResp"));
        assert!(msg.contains("PingResp"));

        let err = ProtocolError::MissingField {
            message: "GetResp",
            field: "value",
        };
        assert!(err.to_string().contains("GetResp"));
        assert!(err.to_string().contains("value"));
    }
}
