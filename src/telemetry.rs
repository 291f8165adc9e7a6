//! Standardized span constructors for bot observability.

pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one gateway session.
    pub fn session(nickname: &str, channel: &str) -> Span {
        info_span!("session", nickname = %nickname, channel = %channel)
    }

    /// Span for running a dispatched command.
    pub fn command(name: &str, sender: &str) -> Span {
        info_span!("command", name = %name, sender = %sender)
    }
}
