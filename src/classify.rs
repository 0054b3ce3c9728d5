//! Line classification: result codes and final-response detection.
//!
//! A response window ends when the device emits a *final* line: either one of
//! the fixed V.250 result codes (`OK`, `ERROR`, `CONNECT`, ...) or a
//! device-reported error line (`+CME ERROR: ...` / `+CMS ERROR: ...`).
//! Everything here is a pure function over the line text; the only side
//! effect is a warning event when the device reports an error.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

/// Sentinel returned by [`result_code`] for any line that is not a result code.
pub const NOT_A_RESULT_CODE: i32 = -1;

const COLON: char = ':';

/// V.250 result codes with their standard numeric values.
///
/// See ITU-T V.250, <https://www.itu.int/rec/T-REC-V.250-200307-I/en>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Ok = 0,
    Connect = 1,
    Ring = 2,
    NoCarrier = 3,
    Error = 4,
    NoDialtone = 6,
    Busy = 7,
    NoAnswer = 8,
}

impl ResultCode {
    /// The numeric value defined by V.250.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a line verbatim in the result-code table.
    pub fn from_line(line: &str) -> Option<Self> {
        RESULT_CODES.get(line).copied()
    }
}

static RESULT_CODES: Lazy<HashMap<&'static str, ResultCode>> = Lazy::new(|| {
    HashMap::from([
        ("OK", ResultCode::Ok),
        ("CONNECT", ResultCode::Connect),
        ("RING", ResultCode::Ring),
        ("NO CARRIER", ResultCode::NoCarrier),
        ("ERROR", ResultCode::Error),
        ("NO DIALTONE", ResultCode::NoDialtone),
        ("BUSY", ResultCode::Busy),
        ("NO ANSWER", ResultCode::NoAnswer),
    ])
});

/// Numeric result code of `line`, or [`NOT_A_RESULT_CODE`] if the line is not
/// one of the fixed status strings. The lookup is verbatim over the whole
/// line, never over a prefix.
pub fn result_code(line: &str) -> i32 {
    ResultCode::from_line(line)
        .map(ResultCode::code)
        .unwrap_or(NOT_A_RESULT_CODE)
}

/// Text before the first colon, or `None` if the line has no colon.
///
/// The same prefix rule is used for error-report detection here and for URC
/// routing in the dispatcher.
pub fn prefix_of(line: &str) -> Option<&str> {
    line.split_once(COLON).map(|(prefix, _)| prefix)
}

/// Whether `line` terminates the current response window.
///
/// Only the two literal error prefixes are special-cased; any other
/// colon-containing line falls through to the whole-line result-code check.
/// Callers filter out empty lines before classification.
pub fn is_final(line: &str) -> bool {
    if let Some(prefix) = prefix_of(line) {
        if prefix == "+CME ERROR" || prefix == "+CMS ERROR" {
            warn!("Device reported error: {}", line);
            return true;
        }
    }
    result_code(line) >= 0
}
