//! The public protocol API: command exchanges and URC registration.
//!
//! [`AtProtocol`] owns the write side of the transport, the exchange monitor
//! and the URC registry. The external framer (see [`crate::reader`]) feeds it
//! one decoded line at a time through [`AtProtocol::handle_line`]; callers on
//! any thread issue commands through [`command`], [`multiline`] and
//! [`singleline`].
//!
//! [`command`]: AtProtocol::command
//! [`multiline`]: AtProtocol::multiline
//! [`singleline`]: AtProtocol::singleline

use crate::classify::{self, ResultCode, NOT_A_RESULT_CODE};
use crate::dispatch::UrcRegistry;
use crate::error::ProtocolError;
use crate::exchange::ExchangeMonitor;
use crate::response::{MultilineResponse, SinglelineResponse};
use crate::transport::LineTransport;
use std::sync::Mutex;
use std::time::Duration;

/// Command/response correlation over a line transport.
///
/// # Example
///
/// ```
/// use atline::{AtProtocol, MockLineTransport};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let mock = MockLineTransport::new("MOCK0");
/// let at = Arc::new(AtProtocol::new(Box::new(mock.clone())));
///
/// let caller = Arc::clone(&at);
/// let join = std::thread::spawn(move || caller.command("AT", Some(Duration::from_secs(2))));
///
/// // Play the device: wait for the command, then answer it.
/// assert_eq!(mock.take_write(Duration::from_secs(2)).as_deref(), Some("AT"));
/// at.handle_line("OK");
///
/// assert_eq!(join.join().unwrap().unwrap(), 0);
/// ```
pub struct AtProtocol {
    transport: Mutex<Box<dyn LineTransport>>,
    exchange: ExchangeMonitor,
    urc: UrcRegistry,
    strip_command_echo: bool,
}

impl AtProtocol {
    pub fn new(transport: Box<dyn LineTransport>) -> Self {
        Self {
            transport: Mutex::new(transport),
            exchange: ExchangeMonitor::new(),
            urc: UrcRegistry::new(),
            strip_command_echo: true,
        }
    }

    /// Control whether `multiline` drops a leading line that echoes the
    /// command text. On by default; devices configured with `ATE0` never
    /// echo, and a device whose data lines legitimately start with the
    /// command text needs this off.
    pub fn strip_command_echo(mut self, enabled: bool) -> Self {
        self.strip_command_echo = enabled;
        self
    }

    /// Single entry point for the line-delivery context.
    ///
    /// Empty lines are discarded. While a command is outstanding the line is
    /// buffered as part of its response; otherwise it is dispatched as
    /// unsolicited. Lines must be delivered one at a time, in receipt order.
    pub fn handle_line(&self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.exchange.record_line(line, classify::is_final) {
            return;
        }
        self.urc.dispatch(line);
    }

    /// Send `cmd` and return the raw response snapshot: every line received
    /// up to and including the final one, or whatever had arrived when the
    /// timeout expired. `None` waits indefinitely.
    pub fn send(&self, cmd: &str, timeout: Option<Duration>) -> Result<Vec<String>, ProtocolError> {
        self.exchange.run_exchange(timeout, || {
            let mut transport = self
                .transport
                .lock()
                .map_err(|_| ProtocolError::LockPoisoned)?;
            transport.write_line(cmd)?;
            Ok(())
        })
    }

    /// Send `cmd` and return the result code of the last response line, or
    /// [`NOT_A_RESULT_CODE`] when nothing came back before the timeout.
    pub fn command(&self, cmd: &str, timeout: Option<Duration>) -> Result<i32, ProtocolError> {
        let resp = self.send(cmd, timeout)?;
        Ok(resp
            .last()
            .map(|line| classify::result_code(line))
            .unwrap_or(NOT_A_RESULT_CODE))
    }

    /// Send `cmd` and return the payload lines starting with `prefix`.
    ///
    /// An empty snapshot yields `Status(NOT_A_RESULT_CODE)`; a final line
    /// other than `OK` yields `Status` with that code. On success the command
    /// echo (when enabled) and the status line are stripped, and an empty
    /// `prefix` matches every line.
    pub fn multiline(
        &self,
        cmd: &str,
        prefix: &str,
        timeout: Option<Duration>,
    ) -> Result<MultilineResponse, ProtocolError> {
        let resp = self.send(cmd, timeout)?;
        Ok(self.collect_multiline(cmd, prefix, resp))
    }

    /// Send `cmd` and return the first line matching `prefix`, with the
    /// prefix stripped and surrounding whitespace trimmed. `NotFound` means
    /// the exchange succeeded but produced no matching line.
    pub fn singleline(
        &self,
        cmd: &str,
        prefix: &str,
        timeout: Option<Duration>,
    ) -> Result<SinglelineResponse, ProtocolError> {
        let lines = match self.multiline(cmd, prefix, timeout)? {
            MultilineResponse::Status(code) => return Ok(SinglelineResponse::Status(code)),
            MultilineResponse::Lines(lines) => lines,
        };
        Ok(match lines.first() {
            None => SinglelineResponse::NotFound,
            Some(line) => {
                let stripped = line.strip_prefix(prefix).unwrap_or(line);
                SinglelineResponse::Line(stripped.trim().to_string())
            }
        })
    }

    /// Register a URC handler for lines with the given prefix, replacing any
    /// previous handler. Handlers run synchronously on the delivery thread.
    pub fn register(
        &self,
        prefix: impl Into<String>,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) {
        self.urc.register(prefix, handler);
    }

    /// Remove the URC handler for `prefix`, if any.
    pub fn unregister(&self, prefix: &str) {
        self.urc.unregister(prefix);
    }

    fn collect_multiline(&self, cmd: &str, prefix: &str, resp: Vec<String>) -> MultilineResponse {
        let last = match resp.last() {
            Some(last) => last,
            None => return MultilineResponse::Status(NOT_A_RESULT_CODE),
        };
        let status = classify::result_code(last);
        if status != ResultCode::Ok.code() {
            return MultilineResponse::Status(status);
        }
        let end = resp.len() - 1;
        let start = if self.strip_command_echo && resp[0].starts_with(cmd) {
            1
        } else {
            0
        };
        let lines = resp[start.min(end)..end]
            .iter()
            .filter(|line| line.starts_with(prefix))
            .cloned()
            .collect();
        MultilineResponse::Lines(lines)
    }
}

impl std::fmt::Debug for AtProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtProtocol")
            .field("strip_command_echo", &self.strip_command_echo)
            .finish_non_exhaustive()
    }
}
