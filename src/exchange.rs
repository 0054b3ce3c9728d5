//! The exchange monitor: pairs one outstanding command with its response.
//!
//! All response state lives in a single mutex-guarded slot: the
//! outstanding-command flag, the completion flag, and the pending line
//! buffer. The delivery thread appends lines through [`record_line`]; a
//! caller runs a whole command cycle through [`run_exchange`], which blocks
//! on a condition variable until a final line is recorded or the timeout
//! expires.
//!
//! A separate gate mutex serializes entire exchanges. Without it, a second
//! caller could grab the slot between the final line being recorded and the
//! first caller draining its buffer, and the two responses would interleave.
//!
//! [`record_line`]: ExchangeMonitor::record_line
//! [`run_exchange`]: ExchangeMonitor::run_exchange

use crate::error::ProtocolError;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Guarded exchange state. `waiting` and `lines` are only ever read or
/// written under the slot mutex, so the flag can never be observed
/// inconsistently with the buffer contents.
#[derive(Debug, Default)]
struct Slot {
    waiting: bool,
    complete: bool,
    lines: Vec<String>,
}

/// Wait/notify coordination between the line-delivery thread and command
/// callers. At most one exchange is in flight at a time.
#[derive(Debug, Default)]
pub struct ExchangeMonitor {
    gate: Mutex<()>,
    slot: Mutex<Slot>,
    completed: Condvar,
}

impl ExchangeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an incoming line to the pending exchange.
    ///
    /// Returns `false` when no command is outstanding; the caller then treats
    /// the line as unsolicited. While a command is outstanding the line is
    /// appended to the buffer, and `is_final` decides whether to wake the
    /// waiting caller. Classification only runs for buffered lines, matching
    /// the protocol: unsolicited lines are never final-checked.
    pub fn record_line(&self, line: &str, is_final: impl FnOnce(&str) -> bool) -> bool {
        // The delivery thread cannot surface errors; a poisoned slot still
        // holds valid lines, so recover and keep routing.
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !slot.waiting {
            return false;
        }
        slot.lines.push(line.to_string());
        if is_final(line) {
            slot.complete = true;
            self.completed.notify_one();
        }
        true
    }

    /// Run one full command exchange: transmit via `write`, collect lines
    /// until a final response or timeout, and return the drained buffer.
    ///
    /// `None` waits indefinitely. On timeout the buffer is returned as-is,
    /// possibly empty or missing its final line; that is not an error at this
    /// layer. Concurrent callers serialize on the gate in undefined relative
    /// order.
    ///
    /// The waiting flag is cleared and the buffer drained inside one critical
    /// section, so a line arriving after timeout expiry can never join a
    /// drained buffer; it is routed as unsolicited instead.
    pub fn run_exchange(
        &self,
        timeout: Option<Duration>,
        write: impl FnOnce() -> Result<(), ProtocolError>,
    ) -> Result<Vec<String>, ProtocolError> {
        let _gate = self.gate.lock().map_err(|_| ProtocolError::LockPoisoned)?;

        let mut slot = self.slot.lock().map_err(|_| ProtocolError::LockPoisoned)?;
        // The command goes on the wire before the collection window opens;
        // the slot lock is held across both, so no reply line can be missed.
        write()?;
        slot.waiting = true;
        slot.complete = false;
        slot.lines.clear();

        let mut slot = match timeout {
            Some(timeout) => {
                self.completed
                    .wait_timeout_while(slot, timeout, |slot| !slot.complete)
                    .map_err(|_| ProtocolError::LockPoisoned)?
                    .0
            }
            None => self
                .completed
                .wait_while(slot, |slot| !slot.complete)
                .map_err(|_| ProtocolError::LockPoisoned)?,
        };

        slot.waiting = false;
        slot.complete = false;
        Ok(std::mem::take(&mut slot.lines))
    }
}
