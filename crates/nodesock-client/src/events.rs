//! Listener registry for connection notifications.
//!
//! Any number of listeners may be registered for each notification; dispatch
//! order is registration order, and dispatch is always synchronous from the
//! caller's own context — `connected` fires inside `connect`, the receive
//! notifications fire inside `poll_once`. The receive loop never calls a
//! listener directly.

use bytes::Bytes;

type ConnectedFn = Box<dyn FnMut() + Send>;
type ReceivedBytesFn = Box<dyn FnMut(&Bytes) + Send>;
type ReceivedTextFn = Box<dyn FnMut(&str) + Send>;

#[derive(Default)]
pub(crate) struct Listeners {
    connected: Vec<ConnectedFn>,
    received_bytes: Vec<ReceivedBytesFn>,
    received_text: Vec<ReceivedTextFn>,
}

impl Listeners {
    pub(crate) fn add_connected(&mut self, f: impl FnMut() + Send + 'static) {
        self.connected.push(Box::new(f));
    }

    pub(crate) fn add_received_bytes(&mut self, f: impl FnMut(&Bytes) + Send + 'static) {
        self.received_bytes.push(Box::new(f));
    }

    pub(crate) fn add_received_text(&mut self, f: impl FnMut(&str) + Send + 'static) {
        self.received_text.push(Box::new(f));
    }

    pub(crate) fn emit_connected(&mut self) {
        for f in &mut self.connected {
            f();
        }
    }

    pub(crate) fn emit_received(&mut self, bytes: &Bytes, text: &str) {
        for f in &mut self.received_bytes {
            f(bytes);
        }
        for f in &mut self.received_text {
            f(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn dispatch_follows_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();

        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            listeners.add_connected(move || log.lock().unwrap().push(tag));
        }

        listeners.emit_connected();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn received_dispatches_bytes_then_text() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();

        let l = Arc::clone(&log);
        listeners.add_received_bytes(move |b| l.lock().unwrap().push(format!("bytes:{}", b.len())));
        let l = Arc::clone(&log);
        listeners.add_received_text(move |t| l.lock().unwrap().push(format!("text:{t}")));

        let payload = Bytes::from_static(b"hi");
        listeners.emit_received(&payload, "hi");
        assert_eq!(*log.lock().unwrap(), vec!["bytes:2", "text:hi"]);
    }

    #[test]
    fn no_listeners_is_fine() {
        let mut listeners = Listeners::default();
        listeners.emit_connected();
        listeners.emit_received(&Bytes::new(), "");
    }
}
