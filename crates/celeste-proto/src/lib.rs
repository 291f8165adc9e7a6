//! # celeste-proto
//!
//! Tokenizer for the chat line protocol spoken by the streaming service's
//! IRC gateway, plus builders for the handful of lines a bot sends back.
//!
//! A chat line has the shape `<tags> <hostmask>:<payload...>`:
//!
//! ```rust
//! use celeste_proto::ChatMessage;
//!
//! let line = "color=#1E90FF;mod=0 viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #chan :!song now";
//! let msg = ChatMessage::parse(line).expect("well-formed line");
//!
//! assert_eq!(msg.sender, "viewer");
//! assert_eq!(msg.tags.get("color").map(String::as_str), Some("#1E90FF"));
//! assert_eq!(msg.text, "!song now");
//! assert!(msg.is_command());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod format;
pub mod hostmask;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod outbound;
pub mod tags;

pub use self::command::{parse_command, CommandInvocation, COMMAND_SENTINEL};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::hostmask::parse_hostmask;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::ChatMessage;
pub use self::tags::{parse_tags, TagMap};
