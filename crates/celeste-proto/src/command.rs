//! Bot command invocations typed into chat (`!name argument...`).

/// Character that marks a chat payload as a bot command.
pub const COMMAND_SENTINEL: char = '!';

/// A command name and the raw argument text that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Command name without the sentinel.
    pub name: String,
    /// Remaining words rejoined with single spaces. Empty when absent.
    pub argument: String,
}

/// Split a chat payload into a command name and argument string.
///
/// The text is trimmed and split on single spaces; one leading sentinel is
/// removed from the first word. Interior runs of spaces survive in the
/// argument as-is.
///
/// ```
/// use celeste_proto::parse_command;
///
/// let invocation = parse_command("!song extra words");
/// assert_eq!(invocation.name, "song");
/// assert_eq!(invocation.argument, "extra words");
/// ```
pub fn parse_command(text: &str) -> CommandInvocation {
    let mut words = text.trim().split(' ');
    let first = words.next().unwrap_or_default();
    let name = first.strip_prefix(COMMAND_SENTINEL).unwrap_or(first);
    CommandInvocation {
        name: name.to_string(),
        argument: words.collect::<Vec<_>>().join(" "),
    }
}
