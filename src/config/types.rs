//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Who the bot is and who administers it.
    pub identity: IdentityConfig,
    /// Channel to join.
    pub channel: ChannelConfig,
    /// Handshake reply markers and line limits.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Persisted command list location.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Volume fade defaults.
    #[serde(default)]
    pub volume: VolumeConfig,
    /// Periodic command advertisement.
    #[serde(default)]
    pub help: HelpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity and authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Login name allowed to run protected commands (usually the broadcaster).
    pub administrator: String,
    /// Login name the bot authenticates as.
    pub nickname: String,
    /// OAuth token sent with `PASS`. Anonymous login when absent.
    #[serde(default)]
    pub oauth_token: Option<String>,
}

/// Channel join configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Channel name, with or without the leading `#`.
    pub name: String,
    /// Milliseconds of unsuccessful join replies tolerated before giving up
    /// (default: 1000).
    #[serde(default = "default_join_timeout_ms")]
    pub join_timeout_ms: u64,
}

impl ChannelConfig {
    /// Join timeout as a [`Duration`].
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}

fn default_join_timeout_ms() -> u64 {
    1000
}

/// Markers identifying successful handshake replies.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// Substring of the reply that accepts authentication.
    #[serde(default = "default_authentication_marker")]
    pub authentication_marker: String,
    /// Substring of the reply that confirms the channel join.
    #[serde(default = "default_join_marker")]
    pub join_marker: String,
    /// Longest accepted inbound line in bytes (default: 4096).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            authentication_marker: default_authentication_marker(),
            join_marker: default_join_marker(),
            max_line_len: default_max_line_len(),
        }
    }
}

fn default_authentication_marker() -> String {
    ":Welcome, GLHF!".to_string()
}

fn default_join_marker() -> String {
    ":End of /NAMES list".to_string()
}

fn default_max_line_len() -> usize {
    celeste_proto::line::DEFAULT_MAX_LINE_LEN
}

/// Persisted command list configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    /// JSON command list. Created empty when missing.
    #[serde(default = "default_commands_path")]
    pub path: PathBuf,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            path: default_commands_path(),
        }
    }
}

fn default_commands_path() -> PathBuf {
    PathBuf::from("commands.json")
}

/// Volume fade configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeConfig {
    /// Fade duration used when `!volume` omits one (default: 5).
    #[serde(default = "default_fade_seconds")]
    pub default_fade_seconds: u64,
    /// Output level at startup, 0-100 (default: 50).
    #[serde(default = "default_initial_volume")]
    pub initial: u8,
}

impl VolumeConfig {
    /// Default fade duration as a [`Duration`].
    pub fn default_fade(&self) -> Duration {
        Duration::from_secs(self.default_fade_seconds)
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            default_fade_seconds: default_fade_seconds(),
            initial: default_initial_volume(),
        }
    }
}

fn default_fade_seconds() -> u64 {
    5
}

fn default_initial_volume() -> u8 {
    50
}

/// Help clock configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelpConfig {
    /// Seconds between random command advertisements. Disabled when absent.
    pub cooldown_secs: Option<u64>,
}
