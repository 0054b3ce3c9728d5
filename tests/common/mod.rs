//! Shared helpers for protocol integration tests.
//!
//! The mock transport only covers the write side; tests play the device by
//! waiting for a command to be written and then feeding reply lines back
//! through `handle_line`, exactly as the reader thread would.

#![allow(dead_code)]

use atline::{AtProtocol, MockLineTransport};
use std::sync::Arc;
use std::time::Duration;

/// Generous deadline for cross-thread waits; tests normally finish far
/// sooner.
pub const WAIT: Duration = Duration::from_secs(5);

pub fn mock_protocol() -> (Arc<AtProtocol>, MockLineTransport) {
    let mock = MockLineTransport::new("MOCK0");
    let protocol = Arc::new(AtProtocol::new(Box::new(mock.clone())));
    (protocol, mock)
}

/// Run `op` on a caller thread and answer its command with `reply` lines.
pub fn exchange<T: Send + 'static>(
    protocol: &Arc<AtProtocol>,
    mock: &MockLineTransport,
    reply: &[&str],
    op: impl FnOnce(Arc<AtProtocol>) -> T + Send + 'static,
) -> T {
    let caller = Arc::clone(protocol);
    let join = std::thread::spawn(move || op(caller));
    assert!(
        mock.take_write(WAIT).is_some(),
        "command was never written to the transport"
    );
    for line in reply {
        protocol.handle_line(line);
    }
    join.join().expect("caller thread panicked")
}

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
