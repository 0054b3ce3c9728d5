//! Crate-level error type.
//!
//! Only genuine faults surface as `Err`: a transport that cannot transmit,
//! or a poisoned lock left behind by a panicking thread. Protocol-level
//! outcomes — non-OK result codes, timeouts, missing lines — are ordinary
//! return values and never raised as errors.

use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying transport failed to transmit the command line.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A lock guarding protocol state was poisoned by a panicking thread.
    #[error("protocol lock is poisoned")]
    LockPoisoned,
}
