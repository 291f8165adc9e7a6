//! Error types for the chat line protocol.
//!
//! [`MessageParseError`] covers a line that arrived intact but does not have
//! the segments a chat line needs. [`ProtocolError`] covers framing problems
//! seen by the [`LineCodec`](crate::line::LineCodec).

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Framing and decoding errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a line.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the decoder.
        details: String,
    },

    /// Line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

/// Errors encountered when splitting a chat line into its segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line has no space separating the tag segment from the rest.
    #[error("invalid payload")]
    InvalidPayload,

    /// Fewer than two `:`-separated segments after the tag segment.
    #[error("invalid number of message segments: expected at least 2, got {got}")]
    InvalidSegments {
        /// Number of non-empty segments found.
        got: usize,
    },

    /// A tag pair without a `=` separator.
    #[error("malformed tag: {0:?}")]
    MalformedTag(String),

    /// A hostmask with no usable name segment.
    #[error("invalid hostmask: {0:?}")]
    InvalidHostmask(String),
}
