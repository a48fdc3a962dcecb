//! Multi-frame streaming responses.
//!
//! Enumeration operations answer with a sequence of frames terminated by an
//! explicit completion flag. Each producer here is lazy, finite, and
//! non-restartable: the caller either consumes batches incrementally or
//! drains them into one collection. Both shapes run through the same read
//! loop.

use crate::connection::Connection;
use crate::error::{ClientError, ServerError};
use pbkv_protocol::message::{ErrorResponse, ListKeysResponse, MapRedResponse};
use pbkv_protocol::{MessageCode, ProtocolError};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::io::{AsyncRead, AsyncWrite};

/// Lazy sequence of key batches from a list-keys exchange.
///
/// Every batch the server sends is yielded, the terminal frame's (possibly
/// empty) batch included; afterwards `next_batch` returns `None` without
/// touching the transport. An Error frame decodes and raises, and any other
/// message code is a protocol-sequencing fault; both end the exchange.
pub struct KeyBatches<'a, S> {
    conn: &'a mut Connection<S>,
    operation: &'static str,
    done: bool,
}

impl<'a, S: AsyncRead + AsyncWrite + Unpin> KeyBatches<'a, S> {
    pub(crate) fn new(conn: &'a mut Connection<S>, operation: &'static str) -> Self {
        Self {
            conn,
            operation,
            done: false,
        }
    }

    /// Reads the next batch of keys, in wire order.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<String>>, ClientError> {
        if self.done {
            return Ok(None);
        }
        match self.step().await {
            Ok(batch) => Ok(Some(batch)),
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    async fn step(&mut self) -> Result<Vec<String>, ClientError> {
        let frame = self.conn.recv().await?;
        match frame.code {
            MessageCode::ListKeysResp => {
                let resp = ListKeysResponse::decode(&frame.payload)?;
                if resp.is_done() {
                    self.done = true;
                }
                Ok(resp.keys)
            }
            MessageCode::ErrorResp => {
                let resp = ErrorResponse::decode(&frame.payload)?;
                Err(ServerError::from_response(self.operation, resp).into())
            }
            other => Err(ProtocolError::UnexpectedMessage {
                expected: MessageCode::ListKeysResp,
                actual: other,
            }
            .into()),
        }
    }

    /// Drains the remaining batches into one key list.
    pub async fn collect(mut self) -> Result<Vec<String>, ClientError> {
        let mut keys = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            keys.extend(batch);
        }
        Ok(keys)
    }
}

/// Lazy sequence of map-reduce result frames.
///
/// Terminates after the frame carrying the completion flag, with the same
/// error and sequencing rules as [`KeyBatches`].
pub struct MapRedBatches<'a, S> {
    conn: &'a mut Connection<S>,
    operation: &'static str,
    done: bool,
}

impl<'a, S: AsyncRead + AsyncWrite + Unpin> MapRedBatches<'a, S> {
    pub(crate) fn new(conn: &'a mut Connection<S>, operation: &'static str) -> Self {
        Self {
            conn,
            operation,
            done: false,
        }
    }

    /// Reads the next result frame.
    pub async fn next_response(&mut self) -> Result<Option<MapRedResponse>, ClientError> {
        if self.done {
            return Ok(None);
        }
        match self.step().await {
            Ok(resp) => Ok(Some(resp)),
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }

    async fn step(&mut self) -> Result<MapRedResponse, ClientError> {
        let frame = self.conn.recv().await?;
        match frame.code {
            MessageCode::MapRedResp => {
                let resp = MapRedResponse::decode(&frame.payload)?;
                if resp.is_done() {
                    self.done = true;
                }
                Ok(resp)
            }
            MessageCode::ErrorResp => {
                let resp = ErrorResponse::decode(&frame.payload)?;
                Err(ServerError::from_response(self.operation, resp).into())
            }
            other => Err(ProtocolError::UnexpectedMessage {
                expected: MessageCode::MapRedResp,
                actual: other,
            }
            .into()),
        }
    }

    /// Drains the stream, parsing each frame's JSON results and grouping
    /// them by phase index. Array results extend the phase's collection;
    /// anything else is appended as a single entry.
    pub async fn collect(mut self) -> Result<BTreeMap<u32, Vec<Value>>, ClientError> {
        let mut phases: BTreeMap<u32, Vec<Value>> = BTreeMap::new();
        while let Some(resp) = self.next_response().await? {
            let Some(bytes) = resp.response else { continue };
            let value: Value = serde_json::from_slice(&bytes)?;
            let slot = phases.entry(resp.phase.unwrap_or(0)).or_default();
            match value {
                Value::Array(items) => slot.extend(items),
                other => slot.push(other),
            }
        }
        Ok(phases)
    }
}
