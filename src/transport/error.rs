//! Transport-specific error types, separate from protocol-level errors.

use thiserror::Error;

/// Errors from the line transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The specified serial port was not found on the system.
    #[error("serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while transmitting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// A serialport-specific error occurred.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = TransportError::NotFound("/dev/ttyUSB7".to_string());
        assert_eq!(err.to_string(), "serial port not found: /dev/ttyUSB7");

        let err = TransportError::Config("invalid data bits".to_string());
        assert_eq!(err.to_string(), "configuration error: invalid data bits");
    }
}
