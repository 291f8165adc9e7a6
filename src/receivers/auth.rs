//! Authentication reply classification.

use super::{Event, Output, Receiver, StatusReceiver};
use std::time::Instant;
use tracing::{info, warn};

/// Decides pass/fail from the first reply after `PASS`/`NICK`.
#[derive(Debug, Clone)]
pub struct AuthenticationReceiver {
    status: StatusReceiver,
    marker: String,
}

impl AuthenticationReceiver {
    /// `marker` is the substring that identifies an accepting reply.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            status: StatusReceiver,
            marker: marker.into(),
        }
    }
}

impl Receiver for AuthenticationReceiver {
    fn process(&mut self, line: &str, _now: Instant) -> Vec<Event> {
        if line.contains(&self.marker) {
            info!("Server accepted authentication");
            vec![
                Event::Print(Output::Plain("Server accepted authentication".into())),
                self.status.interpret(line),
                Event::Succeeded,
            ]
        } else {
            warn!(reply = %line, "Server did not accept authentication");
            vec![
                Event::Print(Output::Plain("Server did not accept authentication".into())),
                self.status.interpret(line),
                Event::Failed,
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivers::outcome;

    const MARKER: &str = ":Welcome, GLHF!";

    #[test]
    fn welcome_succeeds() {
        let mut receiver = AuthenticationReceiver::new(MARKER);
        let events = receiver.process(
            ":tmi.twitch.tv 001 celestebot :Welcome, GLHF!",
            Instant::now(),
        );
        assert_eq!(outcome(&events), Some(true));
        assert_eq!(
            events[0],
            Event::Print(Output::Plain("Server accepted authentication".into()))
        );
        assert_eq!(
            events[1],
            Event::Print(Output::Plain(
                "> :tmi.twitch.tv 001 celestebot :Welcome, GLHF!".into()
            ))
        );
    }

    #[test]
    fn anything_else_fails() {
        let mut receiver = AuthenticationReceiver::new(MARKER);
        let events = receiver.process(
            ":tmi.twitch.tv NOTICE * :Login authentication failed",
            Instant::now(),
        );
        assert_eq!(outcome(&events), Some(false));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn malformed_input_is_a_rejection() {
        let mut receiver = AuthenticationReceiver::new(MARKER);
        assert_eq!(outcome(&receiver.process("", Instant::now())), Some(false));
    }
}
