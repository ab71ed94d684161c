//! Async TCP client with polled inbound delivery.
//!
//! This crate provides [`NodeSocket`], a single-connection TCP client built
//! for callers that run their own periodic tick (a game loop, a TUI frame, a
//! scheduler slot) and want network input handed to them on that tick rather
//! than on an arbitrary runtime thread.
//!
//! # Architecture
//!
//! ```text
//! caller task                         receive loop task
//!     │                                      │
//!     ├─ connect() ── spawns ───────────────>│
//!     ├─ emit() / emit_str()                 ├─ read socket
//!     ├─ poll_once() <── InboundQueue ───────┤   decode UTF-8
//!     │     └─> listeners                    │   push message
//!     └─ close() ── cancel + join ──────────>│ exit
//! ```
//!
//! Exactly two tasks are active while connected: the caller's and the
//! receive loop. The loop owns the socket's read half for its whole life;
//! `close()` cancels it and *joins* it before the socket is torn down, so no
//! read can ever race the teardown.
//!
//! # Example
//!
//! ```no_run
//! use nodesock_client::{NodeSocket, SocketConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut socket = NodeSocket::new(SocketConfig::default());
//! socket.on_received_text(|text| println!("server says: {text}"));
//!
//! socket.connect_to("127.0.0.1", 3000).await?;
//! socket.emit_str("hello").await;
//!
//! // on every tick:
//! socket.poll_once();
//!
//! socket.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Design Principles
//!
//! - **No reconnection**: a failed or lost connection stays down until the
//!   caller connects again. Retry policy belongs to the caller.
//! - **No framing**: one queue entry per successful read; message boundaries
//!   within the byte stream are the caller's concern.
//! - **No cross-thread callbacks**: listeners fire only from the caller's
//!   own context (`connect` and `poll_once`), never from the receive loop.

mod client;
mod events;
mod queue;
mod recv;

pub use client::{NodeSocket, SocketConfig};
pub use queue::{InboundMessage, InboundQueue, InboundSender, inbound_channel};

pub use nodesock_core::{ConnectionState, Endpoint, Error, Result, codec};
