//! Tagged response types for the parsing helpers.
//!
//! Each helper has a small set of distinct outcomes: a non-OK (or missing)
//! final result code, the filtered payload lines, or success with no
//! matching line. The sum types keep callers from conflating "the command
//! failed" with "the command succeeded and returned nothing".

/// Outcome of [`AtProtocol::multiline`](crate::AtProtocol::multiline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultilineResponse {
    /// The exchange did not end in `OK`: the final line's result code, or
    /// [`NOT_A_RESULT_CODE`](crate::NOT_A_RESULT_CODE) when no response
    /// arrived at all.
    Status(i32),
    /// Payload lines with the command echo and status line stripped,
    /// filtered by the requested prefix.
    Lines(Vec<String>),
}

/// Outcome of [`AtProtocol::singleline`](crate::AtProtocol::singleline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinglelineResponse {
    /// Same meaning as [`MultilineResponse::Status`].
    Status(i32),
    /// The first matching line, prefix stripped and whitespace trimmed.
    Line(String),
    /// The exchange succeeded but no line matched the prefix. Not an error.
    NotFound,
}
