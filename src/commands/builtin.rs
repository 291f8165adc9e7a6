//! Commands the bot always provides. They overlay any persisted command
//! with the same name.

use super::{Command, CommandType};

/// Built-in commands, all handled through the dispatch intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    Agenda,
    Ping,
    Song,
    Vibe,
    Volume,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 5] = [
        Self::Agenda,
        Self::Ping,
        Self::Song,
        Self::Vibe,
        Self::Volume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Ping => "ping",
            Self::Song => "song",
            Self::Vibe => "vibe",
            Self::Volume => "volume",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Agenda => {
                "Set the agenda of the stream, displayed in the header of the chat window"
            }
            Self::Ping => "Let the chat servers know the bot is still alive",
            Self::Song => "Show the title, album, and artist of the song that is currently playing",
            Self::Vibe => "Start the playlist of music for the stream",
            Self::Volume => "Adjust the volume of the vibe keeper",
        }
    }

    fn is_protected(&self) -> bool {
        !matches!(self, Self::Song)
    }

    pub fn command(&self) -> Command {
        let command = Command::new(self.name(), self.description(), CommandType::Dispatch);
        if self.is_protected() {
            command.protected()
        } else {
            command
        }
    }
}

/// Commands for every [`BuiltinCommand`].
pub fn builtin_commands() -> Vec<Command> {
    BuiltinCommand::ALL.iter().map(BuiltinCommand::command).collect()
}
