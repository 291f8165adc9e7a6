//! Line-based codec for tokio.
//!
//! Reads newline-terminated lines (terminator stripped) and writes lines
//! with a CRLF terminator appended.
//!
//! A line that is too long, not UTF-8, or carries an illegal control
//! character is yielded as an `Err` item and skipped; the stream keeps
//! going. Only I/O failures end it.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default line limit. Tagged gateway lines routinely exceed the classic
/// 512-byte IRC limit.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Newline-framed codec for protocol lines.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length, terminator included
    max_len: usize,
    /// Dropping the rest of an overlong line up to its newline
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Validate that a line contains no illegal control characters.
    fn validate_line(s: &str) -> error::Result<()> {
        for ch in s.chars() {
            if crate::format::is_illegal_control_char(ch) {
                return Err(ProtocolError::IllegalControlChar(ch));
            }
        }
        Ok(())
    }

    /// Turn one complete frame into a line.
    fn finish_line(&self, line: &[u8]) -> error::Result<String> {
        if line.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        let data = std::str::from_utf8(line).map_err(|e| ProtocolError::InvalidUtf8 {
            byte_pos: e.valid_up_to(),
            details: e.to_string(),
        })?;
        let data = data.trim_end_matches(&['\r', '\n'][..]);

        Self::validate_line(data)?;

        Ok(data.to_string())
    }
}

impl Decoder for LineCodec {
    type Item = error::Result<String>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if self.discarding {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                if src.len() > self.max_len {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    return Ok(Some(Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    })));
                }
                // Remember where the scan stopped so the next call resumes there.
                self.next_index = src.len();
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            // Tail of a line already reported as too long.
            if self.discarding {
                self.discarding = false;
                continue;
            }

            return Ok(Some(self.finish_line(&line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        self.next_index = 0;
        if self.discarding || src.is_empty() {
            self.discarding = false;
            src.clear();
            return Ok(None);
        }
        // Final line without a terminator.
        let line = src.split_to(src.len());
        Ok(Some(self.finish_line(&line)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(msg.len() + 2);
        dst.extend_from_slice(msg.trim_end_matches(&['\r', '\n'][..]).as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
