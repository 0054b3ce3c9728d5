//! AT command correlation over line-framed serial streams.
//!
//! This library turns the single stream of text lines coming back from a
//! modem-style device (ITU-T V.25ter / V.250 "AT commands") into two things:
//! synchronous request/response exchanges driven by callers, and unsolicited
//! result codes (URCs) routed to registered handlers. Both kinds of line
//! arrive on the same physical channel; the correlation rule is simple and
//! matches what the hardware actually does: while a command is outstanding,
//! every incoming line belongs to its response until a final result code is
//! seen; at any other time a line is unsolicited.
//!
//! # Modules
//!
//! - `classify`: result-code table and final-response detection
//! - `exchange`: the mutex/condvar monitor that pairs commands with responses
//! - `dispatch`: URC handler registry keyed by line prefix
//! - `protocol`: [`AtProtocol`], the public command API
//! - `response`: tagged response types for `multiline`/`singleline`
//! - `transport`: the `LineTransport` seam, serial and mock implementations
//! - `reader`: CRLF framing and the background line-delivery thread
//! - `error`: crate-level error type

pub mod classify;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod protocol;
pub mod reader;
pub mod response;
pub mod transport;

pub use classify::{is_final, result_code, ResultCode, NOT_A_RESULT_CODE};
pub use dispatch::{UrcHandler, UrcRegistry};
pub use error::ProtocolError;
pub use exchange::ExchangeMonitor;
pub use protocol::AtProtocol;
pub use reader::{LineFramer, ReaderThread};
pub use response::{MultilineResponse, SinglelineResponse};
pub use transport::{
    DataBits, FlowControl, LineTransport, MockLineTransport, Parity, PortSettings,
    SerialLineTransport, StopBits, TransportError,
};
