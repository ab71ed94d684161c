//! Shared types for the nodesock TCP client.
//!
//! This crate holds everything the transport layer and its callers have in
//! common: the error taxonomy, protocol-independent constants, the byte/text
//! codec, and the endpoint/state types. It has no async or socket code of its
//! own; `nodesock-client` builds the actual connection on top of it.

pub mod codec;
pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ConnectionState, Endpoint};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
