//! Mock line transport for testing without hardware.
//!
//! The mock logs every line written to it and lets a test play the device:
//! wait for a command to hit the wire, then feed reply lines back through
//! [`AtProtocol::handle_line`](crate::AtProtocol::handle_line). Clones share
//! state, so a test can hand one clone to the protocol and keep another for
//! inspection.

use super::error::TransportError;
use super::traits::LineTransport;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct MockState {
    /// Every line ever written, in order.
    write_log: Vec<String>,
    /// Written lines not yet consumed by `take_write`.
    pending: VecDeque<String>,
    /// Whether the next write should fail.
    fail_next_write: bool,
}

/// Mock implementation of [`LineTransport`].
///
/// # Example
/// ```
/// use atline::{LineTransport, MockLineTransport};
///
/// let mut port = MockLineTransport::new("MOCK0");
/// port.write_line("AT+CSQ").unwrap();
/// assert_eq!(port.write_log(), ["AT+CSQ"]);
/// ```
#[derive(Clone)]
pub struct MockLineTransport {
    name: String,
    state: Arc<(Mutex<MockState>, Condvar)>,
}

impl MockLineTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new((Mutex::new(MockState::default()), Condvar::new())),
        }
    }

    /// All lines written so far, in order.
    pub fn write_log(&self) -> Vec<String> {
        self.state.0.lock().unwrap().write_log.clone()
    }

    /// Make the next `write_line` fail with an I/O error.
    pub fn fail_next_write(&self) {
        self.state.0.lock().unwrap().fail_next_write = true;
    }

    /// Block until at least `count` lines have been written in total.
    /// Returns `false` if the deadline passes first.
    pub fn wait_for_writes(&self, count: usize, timeout: Duration) -> bool {
        let (lock, signal) = &*self.state;
        let deadline = Instant::now() + timeout;
        let mut state = lock.lock().unwrap();
        while state.write_log.len() < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            state = signal.wait_timeout(state, remaining).unwrap().0;
        }
        true
    }

    /// Pop the oldest unconsumed written line, waiting up to `timeout` for
    /// one to arrive. Lets a test respond to commands in write order.
    pub fn take_write(&self, timeout: Duration) -> Option<String> {
        let (lock, signal) = &*self.state;
        let deadline = Instant::now() + timeout;
        let mut state = lock.lock().unwrap();
        loop {
            if let Some(line) = state.pending.pop_front() {
                return Some(line);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            state = signal.wait_timeout(state, remaining).unwrap().0;
        }
    }
}

impl LineTransport for MockLineTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let (lock, signal) = &*self.state;
        let mut state = lock.lock().unwrap();
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }
        state.write_log.push(line.to_string());
        state.pending.push_back(line.to_string());
        signal.notify_all();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockLineTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLineTransport")
            .field("name", &self.name)
            .field("writes", &self.state.0.lock().unwrap().write_log.len())
            .finish()
    }
}
