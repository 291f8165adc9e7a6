//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and TOML loading
//! - [`validation`]: Startup checks that report every problem at once

mod types;
mod validation;

pub use types::{
    ChannelConfig, CommandsConfig, Config, ConfigError, HelpConfig, IdentityConfig,
    ProtocolConfig, VolumeConfig,
};
pub use validation::{MAX_HELP_COOLDOWN_SECS, MAX_JOIN_TIMEOUT_MS, ValidationError, validate};
