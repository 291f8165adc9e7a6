//! Sender hostmask (`nick!user@host`) handling.

use crate::error::MessageParseError;

/// Extract the sender name from a hostmask.
///
/// The mask is split on `!`, empty pieces are discarded, and the first
/// remaining piece is the name. Anything after the first `!` (user, host,
/// the rest of the command line) is ignored.
///
/// ```
/// use celeste_proto::parse_hostmask;
///
/// assert_eq!(parse_hostmask("viewer!viewer@viewer.tmi.twitch.tv").unwrap(), "viewer");
/// assert_eq!(parse_hostmask("!!viewer").unwrap(), "viewer");
/// assert!(parse_hostmask("!!").is_err());
/// ```
pub fn parse_hostmask(mask: &str) -> Result<&str, MessageParseError> {
    mask.split('!')
        .find(|piece| !piece.is_empty())
        .ok_or_else(|| MessageParseError::InvalidHostmask(mask.to_string()))
}
