//! Persisted command list.
//!
//! The list is a JSON array of records:
//!
//! ```json
//! [
//!   { "name": "hype", "description": "Hype clip", "type": "video",
//!     "randomPath": true, "path": "/media/hype", "aliases": ["h"] },
//!   { "name": "boo", "description": "Boo", "type": "audio",
//!     "path": "/media/boo.wav", "message": "booed the stream" }
//! ]
//! ```

use super::{Command, CommandType};
use crate::error::CommandListError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One entry of the persisted command list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CommandType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub random_path: bool,
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub protected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CommandRecord {
    /// Build a record from a command and the aliases bound to it.
    pub fn from_command(command: &Command, aliases: Vec<String>) -> Self {
        Self {
            name: command.name().to_string(),
            description: command.description().to_string(),
            kind: command.kind(),
            random_path: command.random_path(),
            path: command.path().to_path_buf(),
            message: command.message().map(str::to_string),
            aliases,
            protected: command.is_protected(),
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.name, &self.description, self.kind)
            .with_path(&self.path)
            .with_random_path(self.random_path);
        if let Some(message) = &self.message {
            command = command.with_message(message);
        }
        if self.protected {
            command = command.protected();
        }
        command
    }
}

/// Read the command list at `path`.
///
/// The parent directory and the file are created when missing; an empty file
/// reads as an empty list. A directory that cannot be created, a file that
/// cannot be opened for writing, or malformed JSON is an error.
pub fn load_records(path: &Path) -> Result<Vec<CommandRecord>, CommandListError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| CommandListError::StoragePath {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let io_error = |source| CommandListError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(io_error)?;
    let mut data = String::new();
    file.read_to_string(&mut data).map_err(io_error)?;

    if data.trim().is_empty() {
        debug!(path = %path.display(), "Command list is empty");
        return Ok(Vec::new());
    }

    serde_json::from_str(&data).map_err(|source| CommandListError::Json {
        path: path.to_path_buf(),
        source,
    })
}
