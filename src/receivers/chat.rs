//! Main chat loop: tokenize, track viewers, resolve and run commands, echo.

use super::{ChatEcho, Event, Output, Receiver};
use crate::commands::{Command, CommandRegistry, CommandType};
use crate::viewers::Viewers;
use celeste_proto::{ChatMessage, CommandInvocation};
use glob::{MatchOptions, Pattern};
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Receiver for the chat phase. Owns the command registry and viewer set.
#[derive(Debug)]
pub struct ChatMessageReceiver {
    registry: CommandRegistry,
    viewers: Viewers,
    administrator: String,
}

impl ChatMessageReceiver {
    /// `administrator` is the login allowed to run protected commands.
    pub fn new(registry: CommandRegistry, administrator: impl Into<String>) -> Self {
        Self {
            registry,
            viewers: Viewers::new(),
            administrator: administrator.into(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn viewers(&self) -> &Viewers {
        &self.viewers
    }

    /// Intents for an authorized command.
    fn act(command: &Command, invocation: CommandInvocation, sender: &str) -> Vec<Event> {
        debug!(
            command = %command.name(),
            kind = %command.kind(),
            sender = %sender,
            "Running command"
        );
        match command.kind() {
            CommandType::Video if command.random_path() => {
                let videos = list_videos(command.path());
                match videos.choose(&mut rand::thread_rng()) {
                    Some(video) => vec![Event::PlayVideo(video.clone())],
                    None => {
                        warn!(
                            command = %command.name(),
                            path = %command.path().display(),
                            "No videos found"
                        );
                        vec![Event::Print(Output::Plain("No videos found".into()))]
                    }
                }
            }
            CommandType::Video => vec![Event::PlayVideo(command.path().to_path_buf())],
            CommandType::Audio => vec![Event::PlayAudio {
                sender: sender.to_string(),
                message: command.message().unwrap_or_default().to_string(),
                path: command.path().to_path_buf(),
            }],
            CommandType::Dispatch => vec![Event::Dispatch {
                command: command.clone(),
                argument: invocation.argument,
                sender: sender.to_string(),
            }],
        }
    }
}

impl Receiver for ChatMessageReceiver {
    fn process(&mut self, line: &str, _now: Instant) -> Vec<Event> {
        let msg = match ChatMessage::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, line = %line, "Dropping malformed chat line");
                return vec![Event::Alert(e.to_string()), Event::Failed];
            }
        };

        let mut events = Vec::new();
        if self.viewers.identify(&msg.sender) {
            info!(viewer = %msg.sender, "Viewer arrived");
            events.push(Event::Arrival(msg.sender.clone()));
        }

        if let Some(invocation) = msg.command()
            && let Some(command) = self.registry.resolve(&invocation.name)
        {
            if !CommandRegistry::authorize(command, &msg.sender, &self.administrator) {
                warn!(
                    command = %command.name(),
                    sender = %msg.sender,
                    "Unauthorized protected command"
                );
                events.push(Event::Alert(format!(
                    "The command {} is protected but {} is not the broadcaster",
                    command.name(),
                    msg.sender
                )));
                return events;
            }
            events.extend(Self::act(command, invocation, &msg.sender));
        }

        let color = msg.tag("color").unwrap_or_default().to_string();
        events.push(Event::Print(Output::Chat(ChatEcho {
            sender: msg.sender,
            color,
            text: msg.text,
        })));
        events
    }
}

/// `*.mp4` regular files directly inside `directory` (extension matched
/// case-insensitively), sorted.
pub(crate) fn list_videos(directory: &Path) -> Vec<PathBuf> {
    let Some(dir) = directory.to_str() else {
        warn!(path = %directory.display(), "Video directory is not valid UTF-8");
        return Vec::new();
    };
    let pattern = Path::new(&Pattern::escape(dir)).join("*.mp4");
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let Ok(paths) = glob::glob_with(&pattern.to_string_lossy(), options) else {
        return Vec::new();
    };
    let mut videos: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    videos.sort();
    videos
}
