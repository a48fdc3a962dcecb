//! Connection management.

use crate::error::ClientError;
use pbkv_protocol::frame::{Frame, HEADER_SIZE};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server address.
    pub addr: SocketAddr,
    /// Connection timeout. Established operations have no timeout: every
    /// exchange blocks until the server answers or the transport fails.
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// A connection carrying framed messages over a byte stream.
///
/// The stream is owned exclusively: exactly one request/response exchange
/// may be in flight at a time, and a streaming exchange must be consumed to
/// completion before the next request is written.
pub struct Connection<S> {
    stream: S,
}

impl Connection<TcpStream> {
    /// Connects to the server.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        tracing::debug!("connecting to {}", config.addr);

        let stream = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect(config.addr),
        )
        .await
        .map_err(|_| ClientError::ConnectTimeout)?
        .map_err(ClientError::Io)?;

        stream.set_nodelay(true).ok();
        tracing::debug!("connected");

        Ok(Self::new(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wraps an already-connected byte stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Writes one full frame.
    pub async fn send(&mut self, frame: &Frame) -> Result<(), ClientError> {
        let encoded = frame.encode()?;
        tracing::debug!(code = ?frame.code, bytes = encoded.len(), "sending frame");
        self.stream.write_all(&encoded).await?;
        Ok(())
    }

    /// Reads exactly one frame: the 5-byte header, then exactly the payload
    /// it promises. A zero-length payload read yields an empty buffer.
    pub async fn recv(&mut self) -> Result<Frame, ClientError> {
        let mut header = [0u8; HEADER_SIZE];
        self.read_exact(&mut header).await?;

        let (code, payload_len) = Frame::parse_header(&header)?;
        let mut payload = vec![0u8; payload_len];
        self.read_exact(&mut payload).await?;

        tracing::debug!(?code, payload_len, "received frame");
        Ok(Frame::new(code, payload))
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ClientError> {
        match self.stream.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(ClientError::ConnectionClosed)
            }
            Err(e) => Err(ClientError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbkv_protocol::MessageCode;
    use tokio_test::io::Builder;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("127.0.0.1:8087".parse().unwrap());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));

        let config = config.with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_send_writes_exact_frame_bytes() {
        let mock = Builder::new().write(&[0, 0, 0, 1, 1]).build();
        let mut conn = Connection::new(mock);
        conn.send(&Frame::empty(MessageCode::PingReq)).await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_code_only_frame() {
        let mock = Builder::new().read(&[0, 0, 0, 1, 2]).build();
        let mut conn = Connection::new(mock);
        let frame = conn.recv().await.unwrap();
        assert_eq!(frame.code, MessageCode::PingResp);
        assert!(frame.payload.is_empty());
    }

    #[tokio::test]
    async fn test_recv_frame_with_payload_split_across_reads() {
        // header and payload arriving separately still produce one frame
        let mock = Builder::new()
            .read(&[0, 0, 0, 4, 18])
            .read(b"\x12\x01\x01")
            .build();
        let mut conn = Connection::new(mock);
        let frame = conn.recv().await.unwrap();
        assert_eq!(frame.code, MessageCode::ListKeysResp);
        assert_eq!(frame.payload.as_ref(), b"\x12\x01\x01");
    }

    #[tokio::test]
    async fn test_recv_eof_is_connection_closed() {
        let mock = Builder::new().build();
        let mut conn = Connection::new(mock);
        let result = conn.recv().await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_recv_short_header_is_connection_closed() {
        let mock = Builder::new().read(&[0, 0, 0]).build();
        let mut conn = Connection::new(mock);
        let result = conn.recv().await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
    }
}
