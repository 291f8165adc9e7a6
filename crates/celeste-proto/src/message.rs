//! Chat line tokenizer.

use std::str::FromStr;

use crate::command::{parse_command, CommandInvocation, COMMAND_SENTINEL};
use crate::error::MessageParseError;
use crate::hostmask::parse_hostmask;
use crate::tags::{parse_tags, TagMap};

/// A chat line split into its tags, sender, and payload text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Tags from the leading segment.
    pub tags: TagMap,
    /// Sender name taken from the hostmask.
    pub sender: String,
    /// Payload text, `:` segments rejoined.
    pub text: String,
}

impl ChatMessage {
    /// Tokenize a raw line of the form `<tags> <hostmask>:<payload...>`.
    ///
    /// The line must have at least two space-separated fields (empty fields
    /// count), and after the tag field at least two non-empty `:`-separated
    /// segments: the hostmask and the payload. Colons inside the payload are
    /// kept, but runs of colons collapse since empty segments are dropped.
    pub fn parse(line: &str) -> Result<Self, MessageParseError> {
        let mut fields = line.split(' ');
        let tag_segment = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();
        if rest.is_empty() {
            return Err(MessageParseError::InvalidPayload);
        }
        let tags = parse_tags(tag_segment)?;

        let rest = rest.join(" ");
        let segments: Vec<&str> = rest.split(':').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Err(MessageParseError::InvalidSegments {
                got: segments.len(),
            });
        }

        let sender = parse_hostmask(segments[0])?.to_string();
        Ok(Self {
            tags,
            sender,
            text: segments[1..].join(":"),
        })
    }

    /// Value of a tag, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether the payload starts with the command sentinel.
    pub fn is_command(&self) -> bool {
        self.text.starts_with(COMMAND_SENTINEL)
    }

    /// The command typed in this message, if it is one.
    pub fn command(&self) -> Option<CommandInvocation> {
        self.is_command().then(|| parse_command(&self.text))
    }
}

impl FromStr for ChatMessage {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
