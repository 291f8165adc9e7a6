//! Control characters permitted in chat lines.
//!
//! Chat text may carry mIRC-style formatting codes and the CTCP delimiter
//! used by `/me` actions. Everything else below 0x20 (apart from the line
//! terminators the codec strips) is rejected before a line reaches the
//! tokenizer.

/// Returns true if the character is a formatting code allowed in chat text.
///
/// ```
/// use celeste_proto::format::is_format_code;
///
/// assert!(is_format_code('\x01')); // CTCP, used by /me
/// assert!(is_format_code('\x02')); // Bold
/// assert!(!is_format_code('a'));
/// ```
#[inline]
pub fn is_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x01' | '\x02' | '\x03' | '\x04' | '\x0F' | '\x11' | '\x16' | '\x1D' | '\x1E' | '\x1F'
    )
}

/// Returns true if a control character must not appear in a chat line.
///
/// NUL and BEL are always illegal. CR and LF are tolerated because the codec
/// hands over lines before trimming their terminator.
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    if ch == '\0' || ch == '\x07' {
        return true;
    }
    ch.is_control() && ch != '\r' && ch != '\n' && !is_format_code(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_codes_are_legal() {
        for ch in ['\x01', '\x02', '\x03', '\x0F', '\x1D', '\x1F'] {
            assert!(!is_illegal_control_char(ch), "{ch:?} should be allowed");
        }
    }

    #[test]
    fn nul_and_bel_are_illegal() {
        assert!(is_illegal_control_char('\0'));
        assert!(is_illegal_control_char('\x07'));
    }

    #[test]
    fn terminators_and_text_are_legal() {
        assert!(!is_illegal_control_char('\r'));
        assert!(!is_illegal_control_char('\n'));
        assert!(!is_illegal_control_char('é'));
        assert!(!is_illegal_control_char(' '));
    }

    #[test]
    fn other_c0_controls_are_illegal() {
        assert!(is_illegal_control_char('\x1B'));
        assert!(is_illegal_control_char('\x08'));
    }
}
