//! # pbkv-protocol
//!
//! Wire protocol implementation for pbkv.
//!
//! This crate provides:
//! - Binary framing with a 4-byte length prefix and message-code byte
//! - The closed message-code enumeration and zero-payload response registry
//! - Typed request/response records with protobuf payload codecs
//! - Quorum sentinel values and parsing
//!
//! The crate performs no I/O; the transport-owning layer lives in
//! `pbkv-client`.

pub mod code;
pub mod error;
pub mod frame;
pub mod message;
pub mod quorum;
pub mod wire;

pub use code::{EmptyResponse, MessageCode};
pub use error::ProtocolError;
pub use frame::{Frame, HEADER_SIZE};
pub use quorum::{InvalidQuorum, Quorum};

/// Default port for a pbkv server.
pub const DEFAULT_PORT: u16 = 8087;
