//! Typed request and response records with payload codecs.
//!
//! One record per message schema. Field numbers and wire types match the
//! reference schema exactly; optional fields use proto2 presence semantics,
//! so an unset `Option` writes nothing and an absent wire field decodes to
//! `None`. Unknown fields are skipped on decode.

use crate::error::ProtocolError;
use crate::quorum::Quorum;
use crate::wire;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Content type sent with map-reduce requests.
pub const MAPRED_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// Decode helpers
// ============================================================================

fn truncated(message: &'static str) -> ProtocolError {
    ProtocolError::Truncated { message }
}

fn read_string(buf: &mut &[u8], msg: &'static str) -> Result<String, ProtocolError> {
    let bytes = wire::read_len_delimited(buf).ok_or_else(|| truncated(msg))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn read_bytes(buf: &mut &[u8], msg: &'static str) -> Result<Bytes, ProtocolError> {
    let bytes = wire::read_len_delimited(buf).ok_or_else(|| truncated(msg))?;
    Ok(Bytes::copy_from_slice(bytes))
}

fn read_u32(buf: &mut &[u8], msg: &'static str) -> Result<u32, ProtocolError> {
    Ok(wire::read_varint(buf).ok_or_else(|| truncated(msg))? as u32)
}

fn read_bool(buf: &mut &[u8], msg: &'static str) -> Result<bool, ProtocolError> {
    Ok(wire::read_varint(buf).ok_or_else(|| truncated(msg))? != 0)
}

fn read_embedded<'a>(buf: &mut &'a [u8], msg: &'static str) -> Result<&'a [u8], ProtocolError> {
    wire::read_len_delimited(buf).ok_or_else(|| truncated(msg))
}

fn skip(wire_type: u8, buf: &mut &[u8], msg: &'static str) -> Result<(), ProtocolError> {
    wire::skip_field(wire_type, buf).ok_or_else(|| truncated(msg))
}

// ============================================================================
// Embedded records
// ============================================================================

/// A user-metadata pair. A value-less pair is distinct from a pair with an
/// empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: Option<String>,
}

impl Pair {
    const NAME: &'static str = "Pair";

    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::write_string(1, &self.key, buf);
        if let Some(ref value) = self.value {
            wire::write_string(2, value, buf);
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut key = None;
        let mut value = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => key = Some(read_string(&mut buf, Self::NAME)?),
                2 => value = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            key: key.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "key",
            })?,
            value,
        })
    }
}

/// A typed reference from one stored object to another.
///
/// All three fields are independently optional. A link with no key points
/// nowhere and is skipped when encoding outbound content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub tag: Option<String>,
}

impl Link {
    const NAME: &'static str = "Link";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// A link without a key is semantically void.
    pub fn is_void(&self) -> bool {
        self.key.is_none()
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        if let Some(ref bucket) = self.bucket {
            wire::write_string(1, bucket, buf);
        }
        if let Some(ref key) = self.key {
            wire::write_string(2, key, buf);
        }
        if let Some(ref tag) = self.tag {
            wire::write_string(3, tag, buf);
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut link = Link::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => link.bucket = Some(read_string(&mut buf, Self::NAME)?),
                2 => link.key = Some(read_string(&mut buf, Self::NAME)?),
                3 => link.tag = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(link)
    }
}

/// Bucket configuration carried by get-bucket and set-bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketProps {
    pub n_val: Option<u32>,
    pub allow_mult: Option<bool>,
}

impl BucketProps {
    const NAME: &'static str = "BucketProps";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_val(mut self, n_val: u32) -> Self {
        self.n_val = Some(n_val);
        self
    }

    pub fn with_allow_mult(mut self, allow_mult: bool) -> Self {
        self.allow_mult = Some(allow_mult);
        self
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        if let Some(n_val) = self.n_val {
            wire::write_uint32(1, n_val, buf);
        }
        if let Some(allow_mult) = self.allow_mult {
            wire::write_bool(2, allow_mult, buf);
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut props = BucketProps::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => props.n_val = Some(read_u32(&mut buf, Self::NAME)?),
                2 => props.allow_mult = Some(read_bool(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(props)
    }
}

/// One version of a stored object's content.
///
/// Only `value` is guaranteed present. The last-modified seconds and
/// sub-second components are independently optional; user metadata tracks
/// value presence per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub value: Bytes,
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub content_encoding: Option<String>,
    pub vtag: Option<String>,
    pub links: Vec<Link>,
    pub last_mod: Option<u32>,
    pub last_mod_usecs: Option<u32>,
    pub usermeta: BTreeMap<String, Option<String>>,
}

impl Content {
    const NAME: &'static str = "Content";

    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            content_type: None,
            charset: None,
            content_encoding: None,
            vtag: None,
            links: Vec::new(),
            last_mod: None,
            last_mod_usecs: None,
            usermeta: BTreeMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.usermeta.insert(key.into(), value);
        self
    }

    /// Combines the seconds and sub-second wire fields into a timestamp.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        let secs = self.last_mod?;
        let nanos = self.last_mod_usecs.unwrap_or(0).saturating_mul(1000);
        DateTime::from_timestamp(secs as i64, nanos)
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        wire::write_bytes(1, &self.value, buf);
        if let Some(ref content_type) = self.content_type {
            wire::write_string(2, content_type, buf);
        }
        if let Some(ref charset) = self.charset {
            wire::write_string(3, charset, buf);
        }
        if let Some(ref content_encoding) = self.content_encoding {
            wire::write_string(4, content_encoding, buf);
        }
        if let Some(ref vtag) = self.vtag {
            wire::write_string(5, vtag, buf);
        }
        // Void links point nowhere and are dropped from the wire entirely.
        for link in self.links.iter().filter(|l| !l.is_void()) {
            let mut inner = Vec::new();
            link.encode(&mut inner);
            wire::write_message(6, &inner, buf);
        }
        if let Some(last_mod) = self.last_mod {
            wire::write_uint32(7, last_mod, buf);
        }
        if let Some(last_mod_usecs) = self.last_mod_usecs {
            wire::write_uint32(8, last_mod_usecs, buf);
        }
        for (key, value) in &self.usermeta {
            let pair = Pair {
                key: key.clone(),
                value: value.clone(),
            };
            let mut inner = Vec::new();
            pair.encode(&mut inner);
            wire::write_message(9, &inner, buf);
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut value = None;
        let mut content = Content::new(Bytes::new());

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => value = Some(read_bytes(&mut buf, Self::NAME)?),
                2 => content.content_type = Some(read_string(&mut buf, Self::NAME)?),
                3 => content.charset = Some(read_string(&mut buf, Self::NAME)?),
                4 => content.content_encoding = Some(read_string(&mut buf, Self::NAME)?),
                5 => content.vtag = Some(read_string(&mut buf, Self::NAME)?),
                6 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    content.links.push(Link::decode(inner)?);
                }
                7 => content.last_mod = Some(read_u32(&mut buf, Self::NAME)?),
                8 => content.last_mod_usecs = Some(read_u32(&mut buf, Self::NAME)?),
                9 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    let pair = Pair::decode(inner)?;
                    content.usermeta.insert(pair.key, pair.value);
                }
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        content.value = value.ok_or(ProtocolError::MissingField {
            message: Self::NAME,
            field: "value",
        })?;
        Ok(content)
    }
}

// ============================================================================
// Primary messages
// ============================================================================

/// Server-reported failure payload.
///
/// Both fields are decoded leniently: a server that omits them yields a code
/// of `None` and no message, and the client layer substitutes its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    pub errmsg: Option<String>,
    pub errcode: Option<u32>,
}

impl ErrorResponse {
    const NAME: &'static str = "ErrorResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(ref errmsg) = self.errmsg {
            wire::write_string(1, errmsg, &mut buf);
        }
        if let Some(errcode) = self.errcode {
            wire::write_uint32(2, errcode, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = ErrorResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => resp.errmsg = Some(read_string(&mut buf, Self::NAME)?),
                2 => resp.errcode = Some(read_u32(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }
}

/// Sets the client identifier used for conflict attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClientIdRequest {
    pub client_id: Bytes,
}

impl SetClientIdRequest {
    const NAME: &'static str = "SetClientIdReq";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_bytes(1, &self.client_id, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut client_id = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => client_id = Some(read_bytes(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            client_id: client_id.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "client_id",
            })?,
        })
    }
}

/// The server's view of this connection's client identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetClientIdResponse {
    /// `None` when the response carries no identifier.
    pub client_id: Option<Bytes>,
}

impl GetClientIdResponse {
    const NAME: &'static str = "GetClientIdResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(ref client_id) = self.client_id {
            wire::write_bytes(1, client_id, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = GetClientIdResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => resp.client_id = Some(read_bytes(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }
}

/// Node name and software version reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub node: Option<String>,
    pub server_version: Option<String>,
}

impl ServerInfo {
    const NAME: &'static str = "GetServerInfoResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(ref node) = self.node {
            wire::write_string(1, node, &mut buf);
        }
        if let Some(ref server_version) = self.server_version {
            wire::write_string(2, server_version, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut info = ServerInfo::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => info.node = Some(read_string(&mut buf, Self::NAME)?),
                2 => info.server_version = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(info)
    }
}

/// Fetches one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub bucket: String,
    pub key: String,
    /// Read quorum; unset means the bucket default applies server-side.
    pub r: Option<Quorum>,
}

impl GetRequest {
    const NAME: &'static str = "GetReq";

    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            r: None,
        }
    }

    pub fn with_r(mut self, r: Quorum) -> Self {
        self.r = Some(r);
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        wire::write_string(2, &self.key, &mut buf);
        if let Some(r) = self.r {
            wire::write_uint32(3, r.to_wire(), &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;
        let mut key = None;
        let mut r = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                2 => key = Some(read_string(&mut buf, Self::NAME)?),
                3 => r = Some(Quorum::from_wire(read_u32(&mut buf, Self::NAME)?)),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
            key: key.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "key",
            })?,
            r,
        })
    }
}

/// Object versions and causality token returned by fetch.
///
/// A store response with a body carries the same shape, so this record
/// decodes both `GetResp` and `PutResp` payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetResponse {
    pub contents: Vec<Content>,
    pub vclock: Option<Bytes>,
}

impl GetResponse {
    const NAME: &'static str = "GetResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for content in &self.contents {
            let mut inner = Vec::new();
            content.encode(&mut inner);
            wire::write_message(1, &inner, &mut buf);
        }
        if let Some(ref vclock) = self.vclock {
            wire::write_bytes(2, vclock, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = GetResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    resp.contents.push(Content::decode(inner)?);
                }
                2 => resp.vclock = Some(read_bytes(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }
}

/// Stores one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub bucket: String,
    pub key: String,
    /// Causality token from a previous fetch of this key.
    pub vclock: Option<Bytes>,
    pub content: Content,
    pub w: Option<Quorum>,
    pub dw: Option<Quorum>,
    pub return_body: Option<bool>,
}

impl PutRequest {
    const NAME: &'static str = "PutReq";

    pub fn new(bucket: impl Into<String>, key: impl Into<String>, content: Content) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            vclock: None,
            content,
            w: None,
            dw: None,
            return_body: None,
        }
    }

    pub fn with_vclock(mut self, vclock: impl Into<Bytes>) -> Self {
        self.vclock = Some(vclock.into());
        self
    }

    pub fn with_w(mut self, w: Quorum) -> Self {
        self.w = Some(w);
        self
    }

    pub fn with_dw(mut self, dw: Quorum) -> Self {
        self.dw = Some(dw);
        self
    }

    pub fn with_return_body(mut self, return_body: bool) -> Self {
        self.return_body = Some(return_body);
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        wire::write_string(2, &self.key, &mut buf);
        if let Some(ref vclock) = self.vclock {
            wire::write_bytes(3, vclock, &mut buf);
        }
        let mut inner = Vec::new();
        self.content.encode(&mut inner);
        wire::write_message(4, &inner, &mut buf);
        if let Some(w) = self.w {
            wire::write_uint32(5, w.to_wire(), &mut buf);
        }
        if let Some(dw) = self.dw {
            wire::write_uint32(6, dw.to_wire(), &mut buf);
        }
        if let Some(return_body) = self.return_body {
            wire::write_bool(7, return_body, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;
        let mut key = None;
        let mut vclock = None;
        let mut content = None;
        let mut w = None;
        let mut dw = None;
        let mut return_body = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                2 => key = Some(read_string(&mut buf, Self::NAME)?),
                3 => vclock = Some(read_bytes(&mut buf, Self::NAME)?),
                4 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    content = Some(Content::decode(inner)?);
                }
                5 => w = Some(Quorum::from_wire(read_u32(&mut buf, Self::NAME)?)),
                6 => dw = Some(Quorum::from_wire(read_u32(&mut buf, Self::NAME)?)),
                7 => return_body = Some(read_bool(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
            key: key.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "key",
            })?,
            vclock,
            content: content.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "content",
            })?,
            w,
            dw,
            return_body,
        })
    }
}

/// Deletes one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelRequest {
    pub bucket: String,
    pub key: String,
    pub rw: Option<Quorum>,
}

impl DelRequest {
    const NAME: &'static str = "DelReq";

    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            rw: None,
        }
    }

    pub fn with_rw(mut self, rw: Quorum) -> Self {
        self.rw = Some(rw);
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        wire::write_string(2, &self.key, &mut buf);
        if let Some(rw) = self.rw {
            wire::write_uint32(3, rw.to_wire(), &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;
        let mut key = None;
        let mut rw = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                2 => key = Some(read_string(&mut buf, Self::NAME)?),
                3 => rw = Some(Quorum::from_wire(read_u32(&mut buf, Self::NAME)?)),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
            key: key.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "key",
            })?,
            rw,
        })
    }
}

/// All bucket names known to the server, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketsResponse {
    pub buckets: Vec<String>,
}

impl ListBucketsResponse {
    const NAME: &'static str = "ListBucketsResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for bucket in &self.buckets {
            wire::write_string(1, bucket, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = ListBucketsResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => resp.buckets.push(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }
}

/// Starts a key enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListKeysRequest {
    pub bucket: String,
}

impl ListKeysRequest {
    const NAME: &'static str = "ListKeysReq";

    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
        })
    }
}

/// One batch of a key enumeration. The exchange is complete only when a
/// frame arrives with `done` set; an absent flag counts as not-done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListKeysResponse {
    pub keys: Vec<String>,
    pub done: Option<bool>,
}

impl ListKeysResponse {
    const NAME: &'static str = "ListKeysResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for key in &self.keys {
            wire::write_string(1, key, &mut buf);
        }
        if let Some(done) = self.done {
            wire::write_bool(2, done, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = ListKeysResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => resp.keys.push(read_string(&mut buf, Self::NAME)?),
                2 => resp.done = Some(read_bool(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }

    /// Whether this is the terminal frame of the exchange.
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}

/// Reads bucket configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBucketRequest {
    pub bucket: String,
}

impl GetBucketRequest {
    const NAME: &'static str = "GetBucketReq";

    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
        })
    }
}

/// Bucket configuration response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetBucketResponse {
    pub props: BucketProps,
}

impl GetBucketResponse {
    const NAME: &'static str = "GetBucketResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut inner = Vec::new();
        self.props.encode(&mut inner);
        wire::write_message(1, &inner, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut props = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    props = Some(BucketProps::decode(inner)?);
                }
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            props: props.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "props",
            })?,
        })
    }
}

/// Writes bucket configuration. Only the fields carried by [`BucketProps`]
/// are representable; anything else a caller might want to set has no wire
/// slot and cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBucketRequest {
    pub bucket: String,
    pub props: BucketProps,
}

impl SetBucketRequest {
    const NAME: &'static str = "SetBucketReq";

    pub fn new(bucket: impl Into<String>, props: BucketProps) -> Self {
        Self {
            bucket: bucket.into(),
            props,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_string(1, &self.bucket, &mut buf);
        let mut inner = Vec::new();
        self.props.encode(&mut inner);
        wire::write_message(2, &inner, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut bucket = None;
        let mut props = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => bucket = Some(read_string(&mut buf, Self::NAME)?),
                2 => {
                    let inner = read_embedded(&mut buf, Self::NAME)?;
                    props = Some(BucketProps::decode(inner)?);
                }
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "bucket",
            })?,
            props: props.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "props",
            })?,
        })
    }
}

/// Submits a map-reduce job. The query bytes are opaque to this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRedRequest {
    pub request: Bytes,
    pub content_type: String,
}

impl MapRedRequest {
    const NAME: &'static str = "MapRedReq";

    pub fn new(request: impl Into<Bytes>) -> Self {
        Self {
            request: request.into(),
            content_type: MAPRED_CONTENT_TYPE.to_string(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        wire::write_bytes(1, &self.request, &mut buf);
        wire::write_string(2, &self.content_type, &mut buf);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut request = None;
        let mut content_type = None;

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => request = Some(read_bytes(&mut buf, Self::NAME)?),
                2 => content_type = Some(read_string(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(Self {
            request: request.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "request",
            })?,
            content_type: content_type.ok_or(ProtocolError::MissingField {
                message: Self::NAME,
                field: "content_type",
            })?,
        })
    }
}

/// One frame of a map-reduce result stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapRedResponse {
    pub phase: Option<u32>,
    pub response: Option<Bytes>,
    pub done: Option<bool>,
}

impl MapRedResponse {
    const NAME: &'static str = "MapRedResp";

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(phase) = self.phase {
            wire::write_uint32(1, phase, &mut buf);
        }
        if let Some(ref response) = self.response {
            wire::write_bytes(2, response, &mut buf);
        }
        if let Some(done) = self.done {
            wire::write_bool(3, done, &mut buf);
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = data;
        let mut resp = MapRedResponse::default();

        while !buf.is_empty() {
            let (field, wire_type) = wire::read_tag(&mut buf).ok_or_else(|| truncated(Self::NAME))?;
            match field {
                1 => resp.phase = Some(read_u32(&mut buf, Self::NAME)?),
                2 => resp.response = Some(read_bytes(&mut buf, Self::NAME)?),
                3 => resp.done = Some(read_bool(&mut buf, Self::NAME)?),
                _ => skip(wire_type, &mut buf, Self::NAME)?,
            }
        }

        Ok(resp)
    }

    /// Whether this is the terminal frame of the exchange.
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}
