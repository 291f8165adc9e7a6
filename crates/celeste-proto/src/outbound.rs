//! Lines the bot sends to the gateway.
//!
//! Builders return the line without its CRLF terminator; the
//! [`LineCodec`](crate::line::LineCodec) writer appends it.

/// Capabilities requested once authenticated, so that chat lines carry tags.
pub const TWITCH_CAPABILITIES: &[&str] = &["twitch.tv/tags"];

/// `PASS oauth:<token>`. A token that already has the `oauth:` prefix is
/// sent unchanged.
pub fn pass(token: &str) -> String {
    if token.starts_with("oauth:") {
        format!("PASS {token}")
    } else {
        format!("PASS oauth:{token}")
    }
}

/// `NICK <name>`.
pub fn nick(name: &str) -> String {
    format!("NICK {name}")
}

/// `CAP REQ :<cap> <cap>...`.
pub fn cap_req(capabilities: &[&str]) -> String {
    format!("CAP REQ :{}", capabilities.join(" "))
}

/// `JOIN #<channel>`. The channel is lowercased and gets a `#` if missing.
pub fn join(channel: &str) -> String {
    format!("JOIN {}", channel_name(channel))
}

/// `PING :<server>`.
pub fn ping(server: &str) -> String {
    format!("PING :{server}")
}

/// `PONG :<server>`.
pub fn pong(server: &str) -> String {
    format!("PONG :{server}")
}

/// `PRIVMSG #<channel> :<text>`. Line breaks in `text` become spaces.
pub fn privmsg(channel: &str, text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    format!("PRIVMSG {} :{}", channel_name(channel), text)
}

/// Normalize a channel name to `#lowercase`.
pub fn channel_name(channel: &str) -> String {
    let bare = channel.trim().trim_start_matches('#');
    format!("#{}", bare.to_lowercase())
}

/// If `line` is a server keepalive (`PING <server>`), return the server
/// argument to echo back.
///
/// ```
/// use celeste_proto::outbound::keepalive_server;
///
/// assert_eq!(keepalive_server("PING :tmi.twitch.tv"), Some("tmi.twitch.tv"));
/// assert_eq!(keepalive_server("color=red a!a:PING"), None);
/// ```
pub fn keepalive_server(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("PING")?;
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some(rest.trim().trim_start_matches(':'))
}
