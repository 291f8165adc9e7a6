//! Passthrough receiver: every line is echoed to the status display.

use super::{Event, Output, Receiver};
use std::time::Instant;
use tracing::trace;

/// Echoes lines as `> line`. The handshake receivers build on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusReceiver;

impl StatusReceiver {
    /// Status display event for a raw line.
    pub fn interpret(&self, line: &str) -> Event {
        trace!(line = %line, "Status line");
        Event::Print(Output::Plain(format!("> {line}")))
    }
}

impl Receiver for StatusReceiver {
    fn process(&mut self, line: &str, _now: Instant) -> Vec<Event> {
        vec![self.interpret(line)]
    }
}
