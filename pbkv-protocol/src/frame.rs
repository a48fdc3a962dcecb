//! Binary frame format.
//!
//! Frame layout (5-byte header + payload):
//!
//! ```text
//! +-----------+--------+---------------------+
//! |  length   |  code  | payload             |
//! |  4 bytes  | 1 byte | length - 1 bytes    |
//! +-----------+--------+---------------------+
//! ```
//!
//! The big-endian length counts the code byte, so a code-only frame has
//! length 1 and no payload bytes. A length of 0 cannot cover the code byte
//! and is rejected.

use crate::code::MessageCode;
use crate::error::ProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Size of the fixed frame header in bytes (4-byte length + code byte).
pub const HEADER_SIZE: usize = 5;

/// A parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message code identifying the payload schema.
    pub code: MessageCode,
    /// Payload bytes; empty for code-only frames.
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame with the given payload.
    pub fn new(code: MessageCode, payload: impl Into<Bytes>) -> Self {
        Self {
            code,
            payload: payload.into(),
        }
    }

    /// Creates a code-only frame (wire length 1, no payload bytes).
    pub fn empty(code: MessageCode) -> Self {
        Self {
            code,
            payload: Bytes::new(),
        }
    }

    /// Encodes the frame into bytes: exactly `5 + payload.len()` of them.
    pub fn encode(&self) -> Result<BytesMut, ProtocolError> {
        let payload_len = self.payload.len();
        if payload_len > (u32::MAX - 1) as usize {
            return Err(ProtocolError::FrameTooLarge { size: payload_len });
        }

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload_len);
        buf.put_u32(payload_len as u32 + 1);
        buf.put_u8(self.code as u8);
        buf.put_slice(&self.payload);
        Ok(buf)
    }

    /// Parses the fixed 5-byte header, returning the message code and the
    /// number of payload bytes that follow.
    pub fn parse_header(header: &[u8; HEADER_SIZE]) -> Result<(MessageCode, usize), ProtocolError> {
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        if length == 0 {
            return Err(ProtocolError::InvalidLength(0));
        }
        let code =
            MessageCode::from_u8(header[4]).ok_or(ProtocolError::UnknownCode(header[4]))?;
        Ok((code, (length - 1) as usize))
    }

    /// Decodes a frame from a buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol errors.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        if buf.len() < HEADER_SIZE {
            return Ok(None);
        }

        let header: [u8; HEADER_SIZE] = buf[..HEADER_SIZE].try_into().unwrap();
        let (code, payload_len) = Self::parse_header(&header)?;

        if buf.len() < HEADER_SIZE + payload_len {
            return Ok(None);
        }

        buf.advance(HEADER_SIZE);
        let payload = buf.split_to(payload_len).freeze();

        Ok(Some(Self { code, payload }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() {
        let frame = Frame::new(MessageCode::GetReq, &b"\x0a\x03foo"[..]);

        let mut buf = frame.encode().unwrap();
        let decoded = Frame::decode(&mut buf).unwrap().unwrap();

        assert_eq!(decoded.code, MessageCode::GetReq);
        assert_eq!(decoded.payload.as_ref(), b"\x0a\x03foo");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_exact_bytes() {
        let frame = Frame::empty(MessageCode::PingReq);
        let encoded = frame.encode().unwrap();
        assert_eq!(encoded.as_ref(), &[0, 0, 0, 1, 1]);

        let frame = Frame::new(MessageCode::SetClientIdReq, &b"abc"[..]);
        let encoded = frame.encode().unwrap();
        assert_eq!(encoded.len(), HEADER_SIZE + 3);
        assert_eq!(&encoded[..4], &[0, 0, 0, 4]);
        assert_eq!(encoded[4], 5);
        assert_eq!(&encoded[5..], b"abc");
    }

    #[test]
    fn test_code_only_frame_decodes_with_empty_payload() {
        let mut buf = BytesMut::from(&[0u8, 0, 0, 1, 2][..]);
        let frame = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.code, MessageCode::PingResp);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_incomplete_header() {
        let mut buf = BytesMut::from(&[0u8, 0, 0][..]);
        assert!(Frame::decode(&mut buf).unwrap().is_none());
        // nothing consumed
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_incomplete_payload() {
        // length 4 promises 3 payload bytes, only 1 present
        let mut buf = BytesMut::from(&[0u8, 0, 0, 4, 9, 0xAA][..]);
        assert!(Frame::decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut buf = BytesMut::from(&[0u8, 0, 0, 0, 1][..]);
        let result = Frame::decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::InvalidLength(0))));
    }

    #[test]
    fn test_unknown_code_rejected() {
        let mut buf = BytesMut::from(&[0u8, 0, 0, 1, 99][..]);
        let result = Frame::decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::UnknownCode(99))));
    }

    #[test]
    fn test_multiple_frames_in_buffer() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&Frame::empty(MessageCode::PingReq).encode().unwrap());
        buf.extend_from_slice(&Frame::new(MessageCode::ListKeysReq, &b"\x0a\x01b"[..])
            .encode()
            .unwrap());

        let first = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.code, MessageCode::PingReq);

        let second = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.code, MessageCode::ListKeysReq);
        assert_eq!(second.payload.as_ref(), b"\x0a\x01b");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_header() {
        let (code, payload_len) = Frame::parse_header(&[0, 0, 0, 16, 10]).unwrap();
        assert_eq!(code, MessageCode::GetResp);
        assert_eq!(payload_len, 15);
    }
}
