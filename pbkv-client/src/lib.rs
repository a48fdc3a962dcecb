//! # pbkv-client
//!
//! Client library for pbkv.
//!
//! This crate provides:
//! - Async TCP client speaking the framed binary protocol
//! - Typed operations for every message in the protocol
//! - Streaming consumption of multi-frame enumeration responses
//!
//! One request is outstanding per connection at a time; operations take
//! `&mut self` so the contract holds at compile time. There is no
//! operation-level timeout, retry, or multiplexing in this layer.

pub mod client;
pub mod connection;
pub mod error;
pub mod stream;

pub use client::Client;
pub use connection::{Connection, ConnectionConfig};
pub use error::{ClientError, ServerError};
pub use stream::{KeyBatches, MapRedBatches};
