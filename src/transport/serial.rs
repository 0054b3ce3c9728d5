//! Serial port transport built on the `serialport` crate.

use super::error::TransportError;
use super::traits::{LineTransport, PortSettings, LINE_TERMINATOR};
use std::io::Write;

/// Write side of a real serial port.
///
/// The read side is obtained separately through [`reader_handle`] and driven
/// by a [`ReaderThread`](crate::reader::ReaderThread), so reading never
/// contends with command writes.
///
/// [`reader_handle`]: SerialLineTransport::reader_handle
pub struct SerialLineTransport {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SerialLineTransport {
    /// Open a serial port with the given settings.
    pub fn open(port_name: &str, settings: PortSettings) -> Result<Self, TransportError> {
        let port = serialport::new(port_name, settings.baud_rate)
            .data_bits(settings.data_bits.into())
            .parity(settings.parity.into())
            .stop_bits(settings.stop_bits.into())
            .flow_control(settings.flow_control.into())
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice
                | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    TransportError::NotFound(port_name.to_string())
                }
                serialport::ErrorKind::InvalidInput => TransportError::Config(e.to_string()),
                _ => TransportError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }

    /// Open a serial port with default settings (115200 baud, 8N1).
    pub fn open_default(port_name: &str) -> Result<Self, TransportError> {
        Self::open(port_name, PortSettings::default())
    }

    /// A cloned handle onto the same port for the reader thread to consume.
    pub fn reader_handle(&self) -> Result<Box<dyn serialport::SerialPort>, TransportError> {
        self.port.try_clone().map_err(TransportError::Serial)
    }
}

impl LineTransport for SerialLineTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(LINE_TERMINATOR)?;
        self.port.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SerialLineTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLineTransport")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate().ok())
            .finish()
    }
}
