//! Default values for the nodesock client.
//!
//! These mirror the defaults of the Node.js servers this client was written
//! against: a loopback endpoint on port 3000 and a 2 MiB socket buffer.

/// Default server host used when the caller does not specify one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port used when the caller does not specify one.
///
/// # Value: 3000
///
/// The conventional development port for Node.js/Express servers, which is
/// what this client most commonly talks to.
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum socket buffer size in bytes, applied to both the send and the
/// receive direction, and also the size of the receive loop's read buffer.
///
/// # Value: 2 MiB
///
/// A single successful read never exceeds this, so it is also the upper
/// bound on the size of one queued inbound message.
pub const MAX_BUFFER_SIZE: usize = 2 * 1024 * 1024;

/// Default timeout for the connect attempt (milliseconds).
///
/// # Value: 3000ms (3 seconds)
///
/// Connecting blocks the caller for at most this long; a server that does
/// not complete the handshake in time is reported as a timeout rather than
/// hanging the caller indefinitely.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3000;
