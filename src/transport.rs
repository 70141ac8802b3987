//! Line-oriented announce transport
//!
//! The engine announces round start/end and the end-of-game initials prompt
//! over a line-oriented send primitive. Sends are fire-and-forget: delivery
//! failures are the transport's problem, never the engine's.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

/// A fire-and-forget line sink
pub trait Transport: Send + Sync {
    fn send_line(&self, line: &str);
}

/// Discards every line (headless instances)
pub struct NullTransport;

impl Transport for NullTransport {
    fn send_line(&self, line: &str) {
        debug!("transport(null): {}", line);
    }
}

/// Forwards lines to a channel.
///
/// Used by tests to observe announcements, and by hosts that bridge the
/// engine to a real writer (e.g. a UART thread draining the receiver).
pub struct ChannelTransport {
    tx: Sender<String>,
}

impl ChannelTransport {
    /// Build a transport plus the receiving end of its channel
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send_line(&self, line: &str) {
        // Receiver may be gone; fire-and-forget means we don't care
        let _ = self.tx.send(line.to_string());
    }
}
