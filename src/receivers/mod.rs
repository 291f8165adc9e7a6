//! Per-phase consumers of protocol lines.
//!
//! ```text
//! ┌────────────────┐ Succeeded ┌──────────────┐ Succeeded ┌──────────────┐
//! │ Authentication ├──────────►│ Channel-Join ├──────────►│ Chat-Message │
//! └───────┬────────┘           └──────┬───────┘           └──────────────┘
//!         │ Failed                    │ Failed / timeout
//!         ▼                           ▼
//!       closed                      closed
//! ```
//!
//! Every receiver implements [`Receiver`]: it takes one line at a time and
//! returns the events that line produced. `Succeeded` and `Failed` end a
//! handshake receiver; the owner drops it and moves on. The chat receiver
//! reports `Failed` for a malformed line but keeps running.

mod auth;
mod chat;
mod join;
mod status;

pub use auth::AuthenticationReceiver;
pub use chat::ChatMessageReceiver;
pub use join::ChannelJoinReceiver;
pub use status::StatusReceiver;

use crate::commands::Command;
use std::path::PathBuf;
use std::time::Instant;

/// Something a receiver wants its owner (or an external collaborator) to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Line for the display.
    Print(Output),
    /// Operator-facing warning.
    Alert(String),
    /// A viewer chatted for the first time.
    Arrival(String),
    /// Play a video file.
    PlayVideo(PathBuf),
    /// Play an audio clip on behalf of a viewer.
    PlayAudio {
        sender: String,
        message: String,
        path: PathBuf,
    },
    /// Hand a command to an external handler.
    Dispatch {
        command: Command,
        argument: String,
        sender: String,
    },
    /// Protocol line for the transport.
    Send(String),
    /// Status text for the sender of a command, such as a fade description.
    Feedback(String),
    /// The receiver's phase completed.
    Succeeded,
    /// The receiver's phase (or, for chat, the current line) failed.
    Failed,
}

/// Display output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Plain text.
    Plain(String),
    /// A chat message echoed for the chat display.
    Chat(ChatEcho),
}

impl Output {
    /// Render for a rich-text display.
    pub fn to_markup(&self) -> String {
        match self {
            Self::Plain(text) => escape_markup(text),
            Self::Chat(echo) => echo.to_markup(),
        }
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(text) => f.write_str(text),
            Self::Chat(echo) => write!(f, "<{}> {}", echo.sender, echo.text),
        }
    }
}

/// A chat message as shown in the chat display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEcho {
    pub sender: String,
    /// Value of the `color` tag; empty when the line had none.
    pub color: String,
    pub text: String,
}

impl ChatEcho {
    /// `<div class='user' ...>sender</div><div class='message'>text</div><br>`
    pub fn to_markup(&self) -> String {
        format!(
            "<div class='user' style='color: {};'>{}</div><div class='message'>{}</div><br>",
            escape_markup(&self.color),
            escape_markup(&self.sender),
            escape_markup(&self.text)
        )
    }
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Consumer of protocol lines for one connection phase.
pub trait Receiver: Send {
    /// Consume one line received at `now`.
    fn process(&mut self, line: &str, now: Instant) -> Vec<Event>;

    /// When this receiver next needs [`Receiver::expire`] called, if ever.
    fn deadline(&self) -> Option<Instant> {
        None
    }

    /// Handle the passage of time with no new line.
    fn expire(&mut self, _now: Instant) -> Vec<Event> {
        Vec::new()
    }
}

/// Whether `events` ends a handshake phase, and how.
pub fn outcome(events: &[Event]) -> Option<bool> {
    events.iter().find_map(|event| match event {
        Event::Succeeded => Some(true),
        Event::Failed => Some(false),
        _ => None,
    })
}
