//! Inbound message queue bridging the receive loop and the poll hook.
//!
//! Single-producer (the receive loop) / single-consumer (the caller's tick)
//! FIFO. Insertion order is preserved and nothing is dropped; the queue is
//! unbounded, so a producer that outpaces the consumer grows it — an accepted
//! trade for never stalling the receive loop on a slow consumer.

use bytes::Bytes;
use tokio::sync::mpsc;

/// One decoded inbound message.
///
/// Each message corresponds to exactly one successful socket read: the full
/// byte span of that read, decoded to text atomically before it was queued.
/// The consumer never observes a half-written message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Raw bytes as read from the socket.
    pub bytes: Bytes,

    /// The same bytes decoded as UTF-8 (lossy).
    pub text: String,
}

/// Producer side of the inbound queue, held by the receive loop.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: mpsc::UnboundedSender<InboundMessage>,
}

impl InboundSender {
    /// Push a message onto the queue.
    ///
    /// Returns `false` when the consumer side has been dropped, which tells
    /// the receive loop there is nobody left to deliver to.
    pub fn push(&self, message: InboundMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Consumer side of the inbound queue, drained by the poll hook.
#[derive(Debug)]
pub struct InboundQueue {
    rx: mpsc::UnboundedReceiver<InboundMessage>,
}

impl InboundQueue {
    /// Pop the oldest queued message, or `None` when the queue is empty.
    ///
    /// Never blocks; this is what makes it safe to call once per tick.
    pub fn try_pop(&mut self) -> Option<InboundMessage> {
        self.rx.try_recv().ok()
    }
}

/// Create a connected (producer, consumer) pair.
#[must_use]
pub fn inbound_channel() -> (InboundSender, InboundQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InboundSender { tx }, InboundQueue { rx })
}
