//! Background receive loop.
//!
//! One loop instance runs per connection, spawned by `connect` and owning the
//! socket's read half until it exits. Each successful read becomes exactly one
//! [`InboundMessage`](crate::InboundMessage): the full byte span of that read,
//! decoded before it is queued.
//!
//! # Termination
//!
//! The loop exits on exactly three conditions:
//!
//! - the stop token is cancelled (`close()` was called),
//! - the peer closed the connection (read of 0 bytes),
//! - a read error (treated as fatal — on a stream socket it means the
//!   connection is gone).
//!
//! On the latter two it clears the shared `connected` flag so the client's
//! `is_connected()` reflects the loss before the caller ever calls `close`.
//! The loop never closes the socket itself; `close()` joins the loop's task
//! and only then tears the socket down, so no read can race the teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use nodesock_core::codec;

use crate::queue::{InboundMessage, InboundSender};

pub(crate) async fn receive_loop(
    mut reader: OwnedReadHalf,
    tx: InboundSender,
    stop: CancellationToken,
    connected: Arc<AtomicBool>,
    buf_size: usize,
) {
    debug!("receive loop started");
    let mut buf = vec![0u8; buf_size];

    loop {
        tokio::select! {
            _ = stop.cancelled() => {
                debug!("receive loop observed stop signal");
                break;
            }
            read = reader.read(&mut buf) => match read {
                Ok(0) => {
                    debug!("connection closed by peer");
                    connected.store(false, Ordering::SeqCst);
                    break;
                }
                Ok(n) => {
                    let bytes = Bytes::copy_from_slice(&buf[..n]);
                    let text = codec::bytes_to_string(&bytes);
                    trace!(len = n, %text, "received data");

                    if !tx.push(InboundMessage { bytes, text }) {
                        // Consumer side is gone; nothing left to deliver to.
                        debug!("inbound queue closed, stopping receive loop");
                        break;
                    }
                }
                Err(e) => {
                    warn!("receive failed: {e}");
                    connected.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    debug!("receive loop exited");
}
