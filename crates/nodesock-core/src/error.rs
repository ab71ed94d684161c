use std::net::SocketAddr;

use thiserror::Error;

/// Errors produced by the connect path.
///
/// The client's other failure modes are deliberately not errors: a send
/// without an active connection reports `false` from the send operations,
/// and a receive fault (read error or peer close) is logged by the receive
/// loop and surfaces as the disconnected state. Callers observe those
/// through return values and `is_connected()`/`state()` rather than by
/// catching anything.
#[derive(Error, Debug)]
pub enum Error {
    // Address errors
    #[error("invalid address <{host}:{port}>")]
    InvalidAddress { host: String, port: u16 },

    // Connection errors
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("connect timeout after {0}ms")]
    ConnectTimeout(u64),

    #[error("already connected; close the socket before connecting again")]
    AlreadyConnected,
}

pub type Result<T> = std::result::Result<T, Error>;
