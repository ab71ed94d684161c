//! TCP connection management and the public client surface.
//!
//! [`NodeSocket`] owns the connection end to end: it resolves and validates
//! the endpoint, opens the socket with the configured buffer sizes, spawns
//! the receive loop, exposes send operations, and drives the teardown
//! sequence that guarantees the loop has exited before the socket is freed.
//!
//! # Connection Lifecycle
//!
//! 1. Create the client with `new()`
//! 2. Connect with `connect()` or `connect_to()`
//! 3. Call `poll_once()` on every tick to drain inbound messages
//! 4. Send with `emit()` / `emit_str()`
//! 5. Close with `close()`
//!
//! A second `connect` while a connection is live is rejected with
//! [`Error::AlreadyConnected`] rather than silently leaking the previous
//! socket and loop. There is no automatic reconnect; after a failed connect
//! or a lost peer the client stays down until the caller connects again.
//!
//! # Error reporting
//!
//! Failed connects are logged and leave the client observably disconnected;
//! the returned `Result` carries the same information for callers that want
//! it, but checking `is_connected()` is equally valid. Send operations never
//! error: they return `false` when not connected or when the write fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpSocket, tcp::OwnedWriteHalf};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use bytes::Bytes;
use nodesock_core::{
    ConnectionState, Endpoint, Error, Result, codec,
    constants::{DEFAULT_CONNECT_TIMEOUT_MS, MAX_BUFFER_SIZE},
};

use crate::events::Listeners;
use crate::queue::{InboundMessage, InboundQueue, inbound_channel};
use crate::recv::receive_loop;

/// Configuration for the client.
///
/// Immutable once a connection is active; changes take effect on the next
/// connect.
///
/// # Example
///
/// ```
/// use nodesock_client::{Endpoint, SocketConfig};
/// use std::time::Duration;
///
/// let config = SocketConfig {
///     endpoint: Endpoint::new("192.168.0.100", 3000).unwrap(),
///     max_buffer_size: 64 * 1024,
///     connect_timeout: Duration::from_millis(5000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Default endpoint used by `connect()`.
    pub endpoint: Endpoint,

    /// Socket send/receive buffer size and the receive loop's read buffer
    /// size, in bytes. Bounds the size of a single inbound message.
    pub max_buffer_size: usize,

    /// Timeout for the connect attempt.
    pub connect_timeout: Duration,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            max_buffer_size: MAX_BUFFER_SIZE,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }
}

/// Resources tied to one live connection.
///
/// Created on a successful connect, consumed by `close`. The read half of
/// the stream is not here: the receive loop owns it until the loop exits.
struct Active {
    writer: OwnedWriteHalf,
    queue: InboundQueue,
    stop: CancellationToken,
    loop_task: JoinHandle<()>,
    link_up: Arc<AtomicBool>,
}

/// Single-connection async TCP client with polled inbound delivery.
///
/// See the [crate docs](crate) for the architecture. One instance manages at
/// most one connection at a time; all methods are called from the owning
/// task, and only the internal receive loop runs elsewhere.
pub struct NodeSocket {
    config: SocketConfig,
    state: ConnectionState,
    conn: Option<Active>,
    listeners: Listeners,
}

impl NodeSocket {
    /// Create a new, disconnected client.
    ///
    /// # Example
    ///
    /// ```
    /// use nodesock_client::{NodeSocket, SocketConfig};
    ///
    /// let client = NodeSocket::new(SocketConfig::default());
    /// assert!(!client.is_connected());
    /// ```
    #[must_use]
    pub fn new(config: SocketConfig) -> Self {
        debug!("creating client for endpoint {}", config.endpoint);

        Self {
            config,
            state: ConnectionState::Disconnected,
            conn: None,
            listeners: Listeners::default(),
        }
    }

    /// Register a listener for the connected notification.
    ///
    /// Fires synchronously from `connect` on success, in registration order.
    pub fn on_connected(&mut self, f: impl FnMut() + Send + 'static) {
        self.listeners.add_connected(f);
    }

    /// Register a listener for raw inbound bytes.
    ///
    /// Fires from `poll_once`, never from the receive loop.
    pub fn on_received_bytes(&mut self, f: impl FnMut(&Bytes) + Send + 'static) {
        self.listeners.add_received_bytes(f);
    }

    /// Register a listener for decoded inbound text.
    ///
    /// Fires from `poll_once`, after the byte listeners.
    pub fn on_received_text(&mut self, f: impl FnMut(&str) + Send + 'static) {
        self.listeners.add_received_text(f);
    }

    /// Connect to the configured default endpoint.
    ///
    /// See [`connect_to`](Self::connect_to).
    pub async fn connect(&mut self) -> Result<()> {
        let endpoint = self.config.endpoint.clone();
        self.open(endpoint).await
    }

    /// Connect to the server at `host:port` and start the receive loop.
    ///
    /// Blocks the caller for the duration of the connect attempt, bounded by
    /// the configured timeout. On success the connected listeners fire before
    /// this returns.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyConnected`] if a connection is live — close first.
    /// - [`Error::InvalidAddress`] if `host` is not an IP address literal.
    /// - [`Error::ConnectTimeout`] / [`Error::ConnectFailed`] on failure; the
    ///   client remains disconnected and usable.
    pub async fn connect_to(&mut self, host: &str, port: u16) -> Result<()> {
        let endpoint = Endpoint::new(host, port).inspect_err(|e| error!("{e}"))?;
        self.open(endpoint).await
    }

    async fn open(&mut self, endpoint: Endpoint) -> Result<()> {
        if self.conn.is_some() {
            warn!("connect while already connected; close the socket first");
            return Err(Error::AlreadyConnected);
        }

        info!("connecting to <{endpoint}>");
        self.state = ConnectionState::Connecting;
        let addr = endpoint.to_socket_addr();

        let stream = match self.dial(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        // Low latency matters more than throughput for tick-driven callers.
        if let Err(e) = stream.set_nodelay(true) {
            warn!("failed to set TCP_NODELAY: {e}");
        }

        let (reader, writer) = stream.into_split();
        let (tx, queue) = inbound_channel();
        let stop = CancellationToken::new();
        let link_up = Arc::new(AtomicBool::new(true));

        let loop_task = tokio::spawn(receive_loop(
            reader,
            tx,
            stop.clone(),
            Arc::clone(&link_up),
            self.config.max_buffer_size,
        ));

        self.conn = Some(Active {
            writer,
            queue,
            stop,
            loop_task,
            link_up,
        });
        self.state = ConnectionState::Connected;
        info!("connected to <{endpoint}>");

        self.listeners.emit_connected();
        Ok(())
    }

    /// Create the socket, apply buffer sizes, and connect with timeout.
    async fn dial(&self, addr: std::net::SocketAddr) -> Result<tokio::net::TcpStream> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|source| Error::ConnectFailed { addr, source })?;

        let buf_size = u32::try_from(self.config.max_buffer_size).unwrap_or(u32::MAX);
        if let Err(e) = socket.set_send_buffer_size(buf_size) {
            warn!("failed to set send buffer size: {e}");
        }
        if let Err(e) = socket.set_recv_buffer_size(buf_size) {
            warn!("failed to set receive buffer size: {e}");
        }

        match tokio::time::timeout(self.config.connect_timeout, socket.connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => {
                error!("connect to {addr} failed: {source}");
                Err(Error::ConnectFailed { addr, source })
            }
            Err(_) => {
                warn!(
                    "connect timeout after {}ms",
                    self.config.connect_timeout.as_millis()
                );
                Err(Error::ConnectTimeout(
                    self.config.connect_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Check whether the connection is up.
    ///
    /// Goes `false` as soon as the receive loop detects peer close or a read
    /// fault, even before `close` is called.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
            && self
                .conn
                .as_ref()
                .is_some_and(|c| c.link_up.load(Ordering::SeqCst))
    }

    /// Current lifecycle state.
    ///
    /// Reports `Disconnected` as soon as the receive loop has observed peer
    /// close or a read fault, matching [`is_connected`](Self::is_connected);
    /// `close` is still required to release the connection's resources.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.state == ConnectionState::Connected && !self.is_connected() {
            return ConnectionState::Disconnected;
        }
        self.state
    }

    /// Close the connection. Idempotent; a no-op when not connected.
    ///
    /// Signals the receive loop to stop, waits for its task to exit, and only
    /// then shuts the socket down. The join is mandatory ordering: the read
    /// half is owned by the loop and must not be freed while a read could
    /// still be in flight. When this returns, the loop has observably exited.
    pub async fn close(&mut self) {
        let Some(active) = self.conn.take() else {
            return;
        };

        info!("closing connection");
        self.state = ConnectionState::Closing;

        active.stop.cancel();
        if let Err(e) = active.loop_task.await {
            warn!("receive loop join failed: {e}");
        }

        let mut writer = active.writer;
        if let Err(e) = writer.shutdown().await {
            debug!("shutdown during close: {e}");
        }

        self.state = ConnectionState::Disconnected;
        info!("disconnected");
    }

    /// Send raw bytes to the server.
    ///
    /// Returns `false` without error when not connected; otherwise writes the
    /// full payload and reports whether that succeeded. Failures are logged.
    pub async fn emit(&mut self, payload: &[u8]) -> bool {
        let Some(active) = self.conn.as_mut() else {
            trace!("emit while not connected");
            return false;
        };
        if !active.link_up.load(Ordering::SeqCst) {
            trace!("emit on lost connection");
            return false;
        }

        match active.writer.write_all(payload).await {
            Ok(()) => true,
            Err(e) => {
                warn!("send failed: {e}");
                false
            }
        }
    }

    /// Encode text as UTF-8 and send it. Same contract as [`emit`](Self::emit).
    pub async fn emit_str(&mut self, text: &str) -> bool {
        trace!(%text, "sending text");
        self.emit(&codec::string_to_bytes(text)).await
    }

    /// Drain at most one inbound message and dispatch it to the listeners.
    ///
    /// Call once per tick. Byte listeners fire before text listeners, each in
    /// registration order; the message is also returned for callers that
    /// prefer pulling over callbacks. Returns `None` when the queue is empty
    /// or no connection exists.
    pub fn poll_once(&mut self) -> Option<InboundMessage> {
        let message = self.conn.as_mut()?.queue.try_pop()?;
        self.listeners.emit_received(&message.bytes, &message.text);
        Some(message)
    }
}

impl Drop for NodeSocket {
    fn drop(&mut self) {
        if let Some(active) = self.conn.take() {
            // Best effort: no join is possible in Drop, but the cancelled
            // token guarantees the loop exits on its next iteration.
            active.stop.cancel();
            debug!("client dropped while connected, receive loop cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = SocketConfig::default();
        assert_eq!(config.endpoint.to_string(), "127.0.0.1:3000");
        assert_eq!(config.max_buffer_size, 2 * 1024 * 1024);
        assert_eq!(config.connect_timeout.as_millis(), 3000);
    }

    #[test]
    fn not_connected_initially() {
        let client = NodeSocket::new(SocketConfig::default());
        assert!(!client.is_connected());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn emit_without_connect_returns_false() {
        let mut client = NodeSocket::new(SocketConfig::default());
        assert!(!client.emit(&[1, 2, 3]).await);
        assert!(!client.emit_str("hello").await);
    }

    #[test]
    fn poll_without_connect_yields_none() {
        let mut client = NodeSocket::new(SocketConfig::default());
        assert!(client.poll_once().is_none());
    }

    #[tokio::test]
    async fn close_when_not_connected_is_noop() {
        let mut client = NodeSocket::new(SocketConfig::default());
        client.close().await;
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn multiple_close_calls_are_safe() {
        let mut client = NodeSocket::new(SocketConfig::default());
        client.close().await;
        client.close().await;
        client.close().await;
    }

    #[tokio::test]
    async fn connect_to_invalid_host_fails() {
        let mut client = NodeSocket::new(SocketConfig::default());
        let result = client.connect_to("not-an-ip", 3000).await;
        assert!(matches!(result, Err(Error::InvalidAddress { .. })));
        assert!(!client.is_connected());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn connect_timeout() {
        // Non-routable address (RFC 5737 TEST-NET-1).
        let config = SocketConfig {
            endpoint: Endpoint::new("192.0.2.123", 9999).unwrap(),
            connect_timeout: Duration::from_millis(100),
            ..SocketConfig::default()
        };

        let mut client = NodeSocket::new(config);
        let result = client.connect().await;

        assert!(matches!(result, Err(Error::ConnectTimeout(_))));
        assert!(!client.is_connected());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
