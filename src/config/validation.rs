//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Longest accepted join timeout (ten minutes).
pub const MAX_JOIN_TIMEOUT_MS: u64 = 600_000;

/// Longest accepted help clock period (one day).
pub const MAX_HELP_COOLDOWN_SECS: u64 = 86_400;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identity.administrator is required")]
    MissingAdministrator,
    #[error("identity.nickname is required")]
    MissingNickname,
    #[error("channel.name is required")]
    MissingChannel,
    #[error("channel.name may only contain letters, digits and underscores, got '{0}'")]
    InvalidChannel(String),
    #[error("channel.join_timeout_ms must be greater than zero")]
    ZeroJoinTimeout,
    #[error("channel.join_timeout_ms must be at most {max}, got {0}", max = MAX_JOIN_TIMEOUT_MS)]
    JoinTimeoutTooLong(u64),
    #[error("protocol.{0} must not be empty")]
    EmptyMarker(&'static str),
    #[error("volume.initial must be between 0 and 100, got {0}")]
    InitialVolumeOutOfRange(u8),
    #[error("help.cooldown_secs must be greater than zero")]
    ZeroHelpCooldown,
    #[error("help.cooldown_secs must be at most {max}, got {0}", max = MAX_HELP_COOLDOWN_SECS)]
    HelpCooldownTooLong(u64),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.identity.administrator.trim().is_empty() {
        errors.push(ValidationError::MissingAdministrator);
    }
    if config.identity.nickname.trim().is_empty() {
        errors.push(ValidationError::MissingNickname);
    }

    let channel = config.channel.name.trim().trim_start_matches('#');
    if channel.is_empty() {
        errors.push(ValidationError::MissingChannel);
    } else if !channel
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        errors.push(ValidationError::InvalidChannel(config.channel.name.clone()));
    }
    match config.channel.join_timeout_ms {
        0 => errors.push(ValidationError::ZeroJoinTimeout),
        ms if ms > MAX_JOIN_TIMEOUT_MS => errors.push(ValidationError::JoinTimeoutTooLong(ms)),
        _ => {}
    }

    if config.protocol.authentication_marker.is_empty() {
        errors.push(ValidationError::EmptyMarker("authentication_marker"));
    }
    if config.protocol.join_marker.is_empty() {
        errors.push(ValidationError::EmptyMarker("join_marker"));
    }

    if config.volume.initial > 100 {
        errors.push(ValidationError::InitialVolumeOutOfRange(config.volume.initial));
    }

    match config.help.cooldown_secs {
        Some(0) => errors.push(ValidationError::ZeroHelpCooldown),
        Some(secs) if secs > MAX_HELP_COOLDOWN_SECS => {
            errors.push(ValidationError::HelpCooldownTooLong(secs));
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
