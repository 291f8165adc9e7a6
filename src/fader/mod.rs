//! Volume fades along a quartic curve.
//!
//! A [`Fader`] is a planned fade (target and duration). Starting it against
//! the current output level yields a [`Fade`], which computes the level for
//! any moment:
//!
//! ```text
//! level(t) = initial + (t / duration)^4 * (target - initial)
//! ```
//!
//! The x^4 curve approximates perceived loudness, so most of the change
//! lands near the end. [`FaderHandle`] drives a fade on the tokio runtime.

mod driver;

pub use driver::FaderHandle;

use crate::error::FaderError;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Highest output level.
pub const MAX_VOLUME: u8 = 100;

/// Output device whose level a fade adjusts.
pub trait VolumeControl: Send + Sync {
    /// Current level, 0-100.
    fn volume(&self) -> u8;
    /// Set the level, 0-100. Devices may round or ignore the request.
    fn set_volume(&self, level: u8);
}

/// In-process volume level, for when no player is attached.
#[derive(Debug)]
pub struct SoftwareVolume {
    level: AtomicU8,
}

impl SoftwareVolume {
    pub fn new(level: u8) -> Self {
        Self {
            level: AtomicU8::new(level.min(MAX_VOLUME)),
        }
    }
}

impl VolumeControl for SoftwareVolume {
    fn volume(&self) -> u8 {
        self.level.load(Ordering::Relaxed)
    }

    fn set_volume(&self, level: u8) {
        trace!(level, "Volume set");
        self.level.store(level.min(MAX_VOLUME), Ordering::Relaxed);
    }
}

/// A planned fade that has not started yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fader {
    target: u8,
    duration: Duration,
}

impl Fader {
    /// Plan a fade to `volume` (clamped to 0-100) over `duration`.
    pub fn new(volume: u32, duration: Duration) -> Self {
        Self {
            target: volume.min(MAX_VOLUME as u32) as u8,
            duration,
        }
    }

    /// Plan a fade from `<volume> [durationSeconds]`.
    ///
    /// `default_duration` applies when the second word is absent. Extra
    /// words are ignored.
    pub fn parse(arguments: &str, default_duration: Duration) -> Result<Self, FaderError> {
        let mut words = arguments.split_whitespace();
        let volume = words.next().ok_or(FaderError::NoVolume)?;
        let volume = parse_whole(volume)?;
        let duration = match words.next() {
            Some(seconds) => Duration::from_secs(parse_whole(seconds)?),
            None => default_duration,
        };
        Ok(Self::new(volume.min(u32::MAX as u64) as u32, duration))
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Begin fading from `current` at `now`.
    pub fn start(self, current: u8, now: Instant) -> Fade {
        Fade {
            initial: current.min(MAX_VOLUME),
            target: self.target,
            started: now,
            duration: self.duration,
        }
    }
}

fn parse_whole(word: &str) -> Result<u64, FaderError> {
    word.parse::<u64>()
        .map_err(|_| FaderError::InvalidNumber(word.to_string()))
}

/// What a fade wants applied at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    /// Set this level and keep stepping.
    Apply(u8),
    /// The duration has elapsed; set the target and stop.
    Finished(u8),
}

/// A fade in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    initial: u8,
    target: u8,
    started: Instant,
    duration: Duration,
}

impl Fade {
    pub fn initial(&self) -> u8 {
        self.initial
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Human-readable description of the planned transition.
    pub fn feedback(&self) -> String {
        format!(
            "Adjusting volume from {}% to {}% over {} seconds",
            self.initial,
            self.target,
            self.duration.as_secs()
        )
    }

    /// Exact level `elapsed` into the fade.
    pub fn level_at(&self, elapsed: Duration) -> f64 {
        let initial = f64::from(self.initial);
        let target = f64::from(self.target);
        if self.duration.is_zero() {
            return target;
        }
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        initial + progress.powi(4) * (target - initial)
    }

    /// Level to apply at `now`.
    pub fn step(&self, now: Instant) -> FadeStep {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return FadeStep::Finished(self.target);
        }
        let level = self.level_at(elapsed).round().clamp(0.0, f64::from(MAX_VOLUME));
        FadeStep::Apply(level as u8)
    }
}
