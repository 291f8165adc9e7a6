//! Command registry: lookup by name or alias, authorization, random picks.
//!
//! Aliases store the key of the command they point at, not the command
//! itself. Resolution is alias → key → command at lookup time, so a command
//! replaced through [`CommandRegistry::attach`] is what all of its aliases
//! resolve to from then on.

use super::Command;
use super::store::{CommandRecord, load_records};
use crate::error::CommandListError;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Registry of chat commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    /// Alias name → primary command name.
    aliases: HashMap<String, String>,
    /// Names of unprotected commands, sorted.
    user_commands: Vec<String>,
}

impl CommandRegistry {
    /// Build a registry from persisted records, then overlay `builtins`.
    ///
    /// A later record replaces an earlier one with the same name; a built-in
    /// replaces any record with its name.
    pub fn new(records: Vec<CommandRecord>, builtins: Vec<Command>) -> Self {
        let mut registry = Self::default();
        for record in records {
            for alias in &record.aliases {
                registry.aliases.insert(alias.clone(), record.name.clone());
            }
            registry.commands.insert(record.name.clone(), record.to_command());
        }
        for command in builtins {
            registry.commands.insert(command.name().to_string(), command);
        }
        registry.refresh_user_commands();
        registry
    }

    /// Load the persisted list at `path` and overlay `builtins`.
    pub fn load(path: &Path, builtins: Vec<Command>) -> Result<Self, CommandListError> {
        let records = load_records(path)?;
        let registry = Self::new(records, builtins);
        info!(
            path = %path.display(),
            commands = registry.len(),
            aliases = registry.aliases.len(),
            user_commands = registry.user_commands.len(),
            "Loaded command registry"
        );
        Ok(registry)
    }

    /// Find a command by primary name, falling back to aliases.
    pub fn resolve(&self, name: &str) -> Option<&Command> {
        if let Some(command) = self.commands.get(name) {
            return Some(command);
        }
        let target = self.aliases.get(name)?;
        self.commands.get(target)
    }

    /// Whether `sender` may run `command`.
    ///
    /// Protected commands are reserved for the administrator; comparison is
    /// exact.
    pub fn authorize(command: &Command, sender: &str, administrator: &str) -> bool {
        !command.is_protected() || sender == administrator
    }

    /// Pick an unprotected command uniformly at random.
    pub fn random_user_command(&self) -> Option<&Command> {
        let name = self.user_commands.choose(&mut rand::thread_rng())?;
        self.commands.get(name)
    }

    /// Insert or replace a command by name.
    pub fn attach(&mut self, command: Command) {
        debug!(command = %command.name(), kind = %command.kind(), "Attaching command");
        self.commands.insert(command.name().to_string(), command);
        self.refresh_user_commands();
    }

    /// Bind `alias` to the command named `target`.
    ///
    /// Returns false (and binds nothing) when no command is named `target`.
    pub fn add_alias(&mut self, alias: impl Into<String>, target: &str) -> bool {
        if !self.commands.contains_key(target) {
            return false;
        }
        self.aliases.insert(alias.into(), target.to_string());
        true
    }

    /// Alias names bound to the command named `name`, sorted.
    pub fn aliases_of(&self, name: &str) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The registry in persisted-list form, sorted by name, for an external
    /// writer.
    pub fn records(&self) -> Vec<CommandRecord> {
        let mut records: Vec<CommandRecord> = self
            .commands
            .values()
            .map(|command| CommandRecord::from_command(command, self.aliases_of(command.name())))
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    fn refresh_user_commands(&mut self) {
        self.user_commands = self
            .commands
            .values()
            .filter(|command| !command.is_protected())
            .map(|command| command.name().to_string())
            .collect();
        self.user_commands.sort();
    }
}
