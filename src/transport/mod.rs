//! Transport seam between the protocol core and the physical channel.
//!
//! The core only needs a "write one line" primitive; receiving is handled by
//! the reader thread feeding [`AtProtocol::handle_line`] directly. The trait
//! keeps real serial ports and the mock interchangeable.
//!
//! [`AtProtocol::handle_line`]: crate::AtProtocol::handle_line

mod error;
mod mock;
mod serial;
mod traits;

pub use error::TransportError;
pub use mock::MockLineTransport;
pub use serial::SerialLineTransport;
pub use traits::{
    DataBits, FlowControl, LineTransport, Parity, PortSettings, StopBits, LINE_TERMINATOR,
};
