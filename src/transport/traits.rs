//! The `LineTransport` trait and serial port settings.

use super::error::TransportError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Canonical command-line terminator (V.250 S3/S4 defaults).
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Write side of a line-oriented channel.
///
/// Implementations append [`LINE_TERMINATOR`] and transmit the whole line.
/// The protocol core calls this only while it holds exchange exclusivity, so
/// implementations need not serialize writers themselves.
pub trait LineTransport: Send + std::fmt::Debug {
    /// Transmit one command line, terminator included.
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Name of the underlying channel (port path, or a mock label).
    fn name(&self) -> &str;
}

/// Serial port parameters for [`SerialLineTransport`](super::SerialLineTransport).
///
/// Defaults match common cellular modules: 115200 baud, 8N1, no flow
/// control. The read timeout is deliberately short so the reader thread can
/// notice a shutdown request between reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortSettings {
    #[serde(default = "default_baud")]
    pub baud_rate: u32,
    #[serde(default)]
    pub data_bits: DataBits,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    pub stop_bits: StopBits,
    #[serde(default)]
    pub flow_control: FlowControl,
    #[serde(default = "default_read_timeout")]
    pub read_timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: default_baud(),
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
            read_timeout: default_read_timeout(),
        }
    }
}

fn default_baud() -> u32 {
    115_200
}

fn default_read_timeout() -> Duration {
    Duration::from_millis(100)
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    #[default]
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowControl {
    #[default]
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_settings_are_115200_8n1() {
        let settings = PortSettings::default();
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.data_bits, DataBits::Eight);
        assert_eq!(settings.parity, Parity::None);
        assert_eq!(settings.stop_bits, StopBits::One);
        assert_eq!(settings.flow_control, FlowControl::None);
        assert_eq!(settings.read_timeout, Duration::from_millis(100));
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: PortSettings = serde_json::from_str(r#"{"baud_rate": 9600}"#).unwrap();
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.parity, Parity::None);
    }

    #[test]
    fn settings_roundtrip_through_json() {
        let settings: PortSettings = serde_json::from_str(
            r#"{
                "baud_rate": 230400,
                "data_bits": "seven",
                "parity": "even",
                "stop_bits": "two",
                "flow_control": "hardware"
            }"#,
        )
        .unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        let roundtrip: PortSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.baud_rate, 230_400);
        assert_eq!(roundtrip.data_bits, DataBits::Seven);
        assert_eq!(roundtrip.parity, Parity::Even);
        assert_eq!(roundtrip.stop_bits, StopBits::Two);
        assert_eq!(roundtrip.flow_control, FlowControl::Hardware);
    }

    #[test]
    fn conversions_into_serialport_types() {
        assert_eq!(
            serialport::DataBits::from(DataBits::Eight),
            serialport::DataBits::Eight
        );
        assert_eq!(
            serialport::Parity::from(Parity::Odd),
            serialport::Parity::Odd
        );
        assert_eq!(
            serialport::StopBits::from(StopBits::Two),
            serialport::StopBits::Two
        );
        assert_eq!(
            serialport::FlowControl::from(FlowControl::Software),
            serialport::FlowControl::Software
        );
    }
}
