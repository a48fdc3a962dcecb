//! Message codes and the response registry.
//!
//! Every frame on the wire is tagged with a single code byte identifying the
//! schema of its payload. The numeric values are part of the protocol
//! contract and must remain stable.

/// The closed enumeration of wire message codes.
///
/// Requests and responses interleave: each operation's request code is
/// immediately followed by its response code, with `ErrorResp` reserved at 0
/// for server-reported failures on any operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageCode {
    ErrorResp = 0,
    PingReq = 1,
    PingResp = 2,
    GetClientIdReq = 3,
    GetClientIdResp = 4,
    SetClientIdReq = 5,
    SetClientIdResp = 6,
    GetServerInfoReq = 7,
    GetServerInfoResp = 8,
    GetReq = 9,
    GetResp = 10,
    PutReq = 11,
    PutResp = 12,
    DelReq = 13,
    DelResp = 14,
    ListBucketsReq = 15,
    ListBucketsResp = 16,
    ListKeysReq = 17,
    ListKeysResp = 18,
    GetBucketReq = 19,
    GetBucketResp = 20,
    SetBucketReq = 21,
    SetBucketResp = 22,
    MapRedReq = 23,
    MapRedResp = 24,
}

/// Decoded meaning of a response frame that carries no payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResponse {
    /// Boolean success acknowledgement.
    Ack,
    /// An empty collection (no buckets, no keys).
    EmptyList,
    /// The requested object does not exist.
    NotFound,
}

impl MessageCode {
    /// Resolves a wire byte to a message code.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MessageCode::ErrorResp),
            1 => Some(MessageCode::PingReq),
            2 => Some(MessageCode::PingResp),
            3 => Some(MessageCode::GetClientIdReq),
            4 => Some(MessageCode::GetClientIdResp),
            5 => Some(MessageCode::SetClientIdReq),
            6 => Some(MessageCode::SetClientIdResp),
            7 => Some(MessageCode::GetServerInfoReq),
            8 => Some(MessageCode::GetServerInfoResp),
            9 => Some(MessageCode::GetReq),
            10 => Some(MessageCode::GetResp),
            11 => Some(MessageCode::PutReq),
            12 => Some(MessageCode::PutResp),
            13 => Some(MessageCode::DelReq),
            14 => Some(MessageCode::DelResp),
            15 => Some(MessageCode::ListBucketsReq),
            16 => Some(MessageCode::ListBucketsResp),
            17 => Some(MessageCode::ListKeysReq),
            18 => Some(MessageCode::ListKeysResp),
            19 => Some(MessageCode::GetBucketReq),
            20 => Some(MessageCode::GetBucketResp),
            21 => Some(MessageCode::SetBucketReq),
            22 => Some(MessageCode::SetBucketResp),
            23 => Some(MessageCode::MapRedReq),
            24 => Some(MessageCode::MapRedResp),
            _ => None,
        }
    }

    /// Returns whether this code tags a client-to-server request.
    pub fn is_request(self) -> bool {
        matches!(
            self,
            MessageCode::PingReq
                | MessageCode::GetClientIdReq
                | MessageCode::SetClientIdReq
                | MessageCode::GetServerInfoReq
                | MessageCode::GetReq
                | MessageCode::PutReq
                | MessageCode::DelReq
                | MessageCode::ListBucketsReq
                | MessageCode::ListKeysReq
                | MessageCode::GetBucketReq
                | MessageCode::SetBucketReq
                | MessageCode::MapRedReq
        )
    }

    /// Returns whether this code tags a server-to-client response.
    pub fn is_response(self) -> bool {
        !self.is_request()
    }

    /// What a payload-less frame with this code means, if anything.
    ///
    /// Acknowledgement-style responses arrive as bare code bytes; enumeration
    /// responses with no payload are empty collections; a bare `GetResp` is
    /// the not-found signal. For every other code a zero-length payload is a
    /// protocol violation and callers must reject it.
    pub fn empty_response(self) -> Option<EmptyResponse> {
        match self {
            MessageCode::PingResp
            | MessageCode::SetClientIdResp
            | MessageCode::PutResp
            | MessageCode::DelResp
            | MessageCode::SetBucketResp => Some(EmptyResponse::Ack),
            MessageCode::ListBucketsResp | MessageCode::ListKeysResp => {
                Some(EmptyResponse::EmptyList)
            }
            MessageCode::GetResp => Some(EmptyResponse::NotFound),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_are_stable() {
        assert_eq!(MessageCode::ErrorResp as u8, 0);
        assert_eq!(MessageCode::PingReq as u8, 1);
        assert_eq!(MessageCode::GetReq as u8, 9);
        assert_eq!(MessageCode::GetResp as u8, 10);
        assert_eq!(MessageCode::PutReq as u8, 11);
        assert_eq!(MessageCode::ListKeysReq as u8, 17);
        assert_eq!(MessageCode::ListKeysResp as u8, 18);
        assert_eq!(MessageCode::MapRedResp as u8, 24);
    }

    #[test]
    fn test_from_u8_roundtrip() {
        for value in 0u8..=24 {
            let code = MessageCode::from_u8(value).unwrap();
            assert_eq!(code as u8, value);
        }
    }

    #[test]
    fn test_from_u8_rejects_unknown() {
        assert!(MessageCode::from_u8(25).is_none());
        assert!(MessageCode::from_u8(255).is_none());
    }

    #[test]
    fn test_direction() {
        assert!(MessageCode::PingReq.is_request());
        assert!(MessageCode::MapRedReq.is_request());
        assert!(MessageCode::PingResp.is_response());
        assert!(MessageCode::ErrorResp.is_response());
        assert!(!MessageCode::GetResp.is_request());
    }

    #[test]
    fn test_empty_response_registry() {
        assert_eq!(
            MessageCode::PingResp.empty_response(),
            Some(EmptyResponse::Ack)
        );
        assert_eq!(
            MessageCode::SetBucketResp.empty_response(),
            Some(EmptyResponse::Ack)
        );
        assert_eq!(
            MessageCode::ListBucketsResp.empty_response(),
            Some(EmptyResponse::EmptyList)
        );
        assert_eq!(
            MessageCode::ListKeysResp.empty_response(),
            Some(EmptyResponse::EmptyList)
        );
        assert_eq!(
            MessageCode::GetResp.empty_response(),
            Some(EmptyResponse::NotFound)
        );
        assert_eq!(MessageCode::GetServerInfoResp.empty_response(), None);
        assert_eq!(MessageCode::MapRedResp.empty_response(), None);
        assert_eq!(MessageCode::ErrorResp.empty_response(), None);
    }
}
