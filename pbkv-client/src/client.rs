//! High-level client API.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::{ClientError, ServerError};
use crate::stream::{KeyBatches, MapRedBatches};
use bytes::Bytes;
use pbkv_protocol::frame::Frame;
use pbkv_protocol::message::{
    BucketProps, DelRequest, ErrorResponse, GetBucketRequest, GetBucketResponse,
    GetClientIdResponse, GetRequest, GetResponse, ListBucketsResponse, ListKeysRequest,
    MapRedRequest, PutRequest, ServerInfo, SetBucketRequest, SetClientIdRequest,
};
use pbkv_protocol::{EmptyResponse, MessageCode, ProtocolError, Quorum};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// High-level client for pbkv.
///
/// One outstanding request per connection: every operation takes `&mut self`,
/// writes one request frame and fully consumes its response (for
/// enumerations, the whole frame sequence) before the next can start.
/// Sharing a connection between tasks requires external serialization by the
/// caller.
pub struct Client<S = TcpStream> {
    conn: Connection<S>,
}

impl Client<TcpStream> {
    /// Connects to the server.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        Ok(Self {
            conn: Connection::connect(config).await?,
        })
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    /// Wraps an already-connected byte stream.
    pub fn from_stream(stream: S) -> Self {
        Self {
            conn: Connection::new(stream),
        }
    }

    // =========================================================================
    // Dispatch helpers
    // =========================================================================

    /// Sends one request frame and reads the single response frame.
    ///
    /// An Error frame decodes into a [`ServerError`]; any code other than
    /// `expected` is an unexpected-message protocol fault rather than a
    /// silent failure.
    async fn exchange(
        &mut self,
        operation: &'static str,
        request: Frame,
        expected: MessageCode,
    ) -> Result<Frame, ClientError> {
        self.conn.send(&request).await?;
        let frame = self.conn.recv().await?;

        if frame.code == MessageCode::ErrorResp {
            let resp = ErrorResponse::decode(&frame.payload)?;
            return Err(ServerError::from_response(operation, resp).into());
        }
        if frame.code != expected {
            return Err(ProtocolError::UnexpectedMessage {
                expected,
                actual: frame.code,
            }
            .into());
        }
        Ok(frame)
    }

    /// The registry meaning of a payload-less response frame, if any.
    fn empty_reply(frame: &Frame) -> Option<EmptyResponse> {
        if frame.payload.is_empty() {
            frame.code.empty_response()
        } else {
            None
        }
    }

    // =========================================================================
    // Server operations
    // =========================================================================

    /// Checks liveness. The acknowledgement is a bare code byte.
    pub async fn ping(&mut self) -> Result<(), ClientError> {
        self.exchange("ping", Frame::empty(MessageCode::PingReq), MessageCode::PingResp)
            .await?;
        Ok(())
    }

    /// Reads node name and software version.
    pub async fn server_info(&mut self) -> Result<ServerInfo, ClientError> {
        let frame = self
            .exchange(
                "server_info",
                Frame::empty(MessageCode::GetServerInfoReq),
                MessageCode::GetServerInfoResp,
            )
            .await?;
        Ok(ServerInfo::decode(&frame.payload)?)
    }

    /// Reads the connection's client identifier, or `None` if the server
    /// has none recorded.
    pub async fn get_client_id(&mut self) -> Result<Option<Bytes>, ClientError> {
        let frame = self
            .exchange(
                "get_client_id",
                Frame::empty(MessageCode::GetClientIdReq),
                MessageCode::GetClientIdResp,
            )
            .await?;
        Ok(GetClientIdResponse::decode(&frame.payload)?.client_id)
    }

    /// Sets the client identifier used for conflict attribution.
    pub async fn set_client_id(&mut self, client_id: impl Into<Bytes>) -> Result<(), ClientError> {
        let request = SetClientIdRequest {
            client_id: client_id.into(),
        };
        self.exchange(
            "set_client_id",
            Frame::new(MessageCode::SetClientIdReq, request.encode()),
            MessageCode::SetClientIdResp,
        )
        .await?;
        Ok(())
    }

    /// Sets an integer client identifier in its 4-byte big-endian form.
    pub async fn set_client_id_u32(&mut self, client_id: u32) -> Result<(), ClientError> {
        self.set_client_id(client_id.to_be_bytes().to_vec()).await
    }

    // =========================================================================
    // Object operations
    // =========================================================================

    /// Fetches an object. `Ok(None)` is the not-found signal: a fetch
    /// response with no payload bytes.
    pub async fn fetch(
        &mut self,
        bucket: &str,
        key: &str,
        r: Option<Quorum>,
    ) -> Result<Option<GetResponse>, ClientError> {
        let mut request = GetRequest::new(bucket, key);
        request.r = r;
        let frame = self
            .exchange(
                "fetch",
                Frame::new(MessageCode::GetReq, request.encode()),
                MessageCode::GetResp,
            )
            .await?;

        if Self::empty_reply(&frame) == Some(EmptyResponse::NotFound) {
            return Ok(None);
        }
        Ok(Some(GetResponse::decode(&frame.payload)?))
    }

    /// Stores an object. Returns the stored versions when the request asked
    /// for the body back and the server supplied one; a bare acknowledgement
    /// yields `None`.
    pub async fn store(&mut self, request: &PutRequest) -> Result<Option<GetResponse>, ClientError> {
        let frame = self
            .exchange(
                "store",
                Frame::new(MessageCode::PutReq, request.encode()),
                MessageCode::PutResp,
            )
            .await?;

        if Self::empty_reply(&frame) == Some(EmptyResponse::Ack) {
            return Ok(None);
        }
        Ok(Some(GetResponse::decode(&frame.payload)?))
    }

    /// Deletes an object.
    pub async fn delete(
        &mut self,
        bucket: &str,
        key: &str,
        rw: Option<Quorum>,
    ) -> Result<(), ClientError> {
        let mut request = DelRequest::new(bucket, key);
        request.rw = rw;
        self.exchange(
            "delete",
            Frame::new(MessageCode::DelReq, request.encode()),
            MessageCode::DelResp,
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Bucket operations
    // =========================================================================

    /// Lists all bucket names, in wire order.
    pub async fn list_buckets(&mut self) -> Result<Vec<String>, ClientError> {
        let frame = self
            .exchange(
                "list_buckets",
                Frame::empty(MessageCode::ListBucketsReq),
                MessageCode::ListBucketsResp,
            )
            .await?;
        Ok(ListBucketsResponse::decode(&frame.payload)?.buckets)
    }

    /// Starts a key enumeration. The returned producer must be consumed to
    /// completion before this connection can carry another request.
    pub async fn list_keys(&mut self, bucket: &str) -> Result<KeyBatches<'_, S>, ClientError> {
        let request = ListKeysRequest::new(bucket);
        self.conn
            .send(&Frame::new(MessageCode::ListKeysReq, request.encode()))
            .await?;
        Ok(KeyBatches::new(&mut self.conn, "list_keys"))
    }

    /// Reads bucket configuration.
    pub async fn get_bucket(&mut self, bucket: &str) -> Result<BucketProps, ClientError> {
        let request = GetBucketRequest::new(bucket);
        let frame = self
            .exchange(
                "get_bucket",
                Frame::new(MessageCode::GetBucketReq, request.encode()),
                MessageCode::GetBucketResp,
            )
            .await?;
        Ok(GetBucketResponse::decode(&frame.payload)?.props)
    }

    /// Writes bucket configuration.
    pub async fn set_bucket(
        &mut self,
        bucket: &str,
        props: BucketProps,
    ) -> Result<(), ClientError> {
        let request = SetBucketRequest::new(bucket, props);
        self.exchange(
            "set_bucket",
            Frame::new(MessageCode::SetBucketReq, request.encode()),
            MessageCode::SetBucketResp,
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Map-reduce
    // =========================================================================

    /// Submits a map-reduce job. The query is serialized to JSON and opaque
    /// to this layer; results stream back per phase.
    pub async fn map_reduce<Q: Serialize>(
        &mut self,
        query: &Q,
    ) -> Result<MapRedBatches<'_, S>, ClientError> {
        let request = MapRedRequest::new(serde_json::to_vec(query)?);
        self.conn
            .send(&Frame::new(MessageCode::MapRedReq, request.encode()))
            .await?;
        Ok(MapRedBatches::new(&mut self.conn, "map_reduce"))
    }
}
