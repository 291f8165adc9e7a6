//! Integration test common infrastructure.
//!
//! Builds a [`Session`] from a command list written to a temporary
//! directory and drives it through the handshake with canned gateway
//! replies.

#![allow(dead_code)]

use celeste::commands::{CommandRegistry, builtin_commands};
use celeste::receivers::{ChatMessageReceiver, Event};
use celeste::session::{Phase, Session, SessionSettings};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub const ADMIN: &str = "celeste";
pub const WELCOME: &str = ":tmi.twitch.tv 001 celestebot :Welcome, GLHF!";
pub const JOIN_ECHO: &str = ":celestebot!celestebot@celestebot.tmi.twitch.tv JOIN #celeste";
pub const END_OF_NAMES: &str = ":celestebot.tmi.twitch.tv 366 celestebot #celeste :End of /NAMES list";

/// A session plus the directory its command list lives in.
pub struct TestBot {
    pub dir: TempDir,
    pub session: Session,
    pub start: Instant,
}

impl TestBot {
    /// Write `records` (a JSON array) as the command list and build a bot.
    pub fn with_commands(records: serde_json::Value) -> Self {
        Self::in_dir(TempDir::new().expect("tempdir"), records)
    }

    /// Like [`TestBot::with_commands`], in a directory the caller has
    /// already populated (media files, for example).
    pub fn in_dir(dir: TempDir, records: serde_json::Value) -> Self {
        let path = dir.path().join("data").join("commands.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, records.to_string()).unwrap();
        let session = build_session(&path);
        Self {
            dir,
            session,
            start: Instant::now(),
        }
    }

    pub fn empty() -> Self {
        Self::with_commands(serde_json::json!([]))
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Log in and join, asserting each step succeeds.
    pub fn handshake(&mut self) -> Vec<Event> {
        let mut events = self.session.begin();
        events.extend(self.session.process(WELCOME, self.start));
        events.extend(self.session.process(JOIN_ECHO, self.start + Duration::from_millis(50)));
        events.extend(self.session.process(END_OF_NAMES, self.start + Duration::from_millis(120)));
        assert_eq!(self.session.phase(), Phase::Chatting);
        events
    }

    /// A chat line from `sender` with a color tag.
    pub fn say(&mut self, sender: &str, text: &str) -> Vec<Event> {
        let line = chat_line(sender, text);
        self.session.process(&line, Instant::now())
    }
}

pub fn build_session(commands: &Path) -> Session {
    let registry = CommandRegistry::load(commands, builtin_commands()).expect("command list");
    let settings = SessionSettings {
        nickname: "celestebot".into(),
        oauth_token: Some("secret".into()),
        channel: "celeste".into(),
        authentication_marker: ":Welcome, GLHF!".into(),
        join_marker: ":End of /NAMES list".into(),
        join_timeout: Duration::from_secs(1),
    };
    Session::new(settings, ChatMessageReceiver::new(registry, ADMIN))
}

pub fn chat_line(sender: &str, text: &str) -> String {
    format!(
        "@badge-info=;color=#8A2BE2;display-name={sender} :{sender}!{sender}@{sender}.tmi.twitch.tv PRIVMSG #celeste :{text}"
    )
}

pub fn sent(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Send(line) => Some(line.as_str()),
            _ => None,
        })
        .collect()
}
