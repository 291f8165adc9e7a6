//! Chat commands: the immutable [`Command`] value, the [`CommandRegistry`]
//! that resolves names and aliases, the persisted list format, and the
//! built-in commands that overlay it.

mod builtin;
mod registry;
mod store;

pub use builtin::{BuiltinCommand, builtin_commands};
pub use registry::CommandRegistry;
pub use store::{CommandRecord, load_records};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a command does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Play a video file (or a random one from a directory).
    #[serde(alias = "VIDEO")]
    Video,
    /// Play an audio clip with an accompanying message.
    #[serde(alias = "AUDIO")]
    Audio,
    /// Hand the command to an external handler.
    #[serde(alias = "DISPATCH")]
    Dispatch,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Dispatch => "dispatch",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    description: String,
    kind: CommandType,
    protected: bool,
    random_path: bool,
    path: PathBuf,
    message: Option<String>,
}

impl Command {
    /// A command with no path, message, or protection.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: CommandType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            protected: false,
            random_path: false,
            path: PathBuf::new(),
            message: None,
        }
    }

    /// Restrict the command to the administrator.
    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Treat `path` as a directory to pick a random video from.
    pub fn with_random_path(mut self, random: bool) -> Self {
        self.random_path = random;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> CommandType {
        self.kind
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn random_path(&self) -> bool {
        self.random_path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
