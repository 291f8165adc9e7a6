//! Drives a [`Fade`] on the tokio runtime.

use super::{Fade, FadeStep, Fader, VolumeControl};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::debug;

/// Shared between the handle and its task so that a restore on abort can
/// never be overwritten by a step already in flight.
#[derive(Debug, Default)]
struct Gate {
    closed: bool,
}

/// A running fade.
///
/// The task re-evaluates the curve as fast as the scheduler allows and
/// yields between steps. Dropping the handle cancels the fade and leaves
/// the output at whatever level it reached.
pub struct FaderHandle {
    task: Option<JoinHandle<()>>,
    gate: Arc<Mutex<Gate>>,
    initial: u8,
    target: u8,
    output: Arc<dyn VolumeControl>,
}

impl FaderHandle {
    /// Snapshot the output level and start fading.
    ///
    /// Returns the handle and the feedback line describing the transition.
    /// Must be called from within a tokio runtime.
    pub fn start(fader: Fader, output: Arc<dyn VolumeControl>) -> (Self, String) {
        let fade = fader.start(output.volume(), Instant::now());
        let feedback = fade.feedback();
        let gate = Arc::new(Mutex::new(Gate::default()));
        let task = tokio::spawn(run(fade, Arc::clone(&output), Arc::clone(&gate)));
        debug!(from = fade.initial(), to = fade.target(), "Fade started");
        let handle = Self {
            task: Some(task),
            gate,
            initial: fade.initial(),
            target: fade.target(),
            output,
        };
        (handle, feedback)
    }

    /// Level captured when the fade started.
    pub fn initial(&self) -> u8 {
        self.initial
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Cancel the fade, keeping the current level.
    pub fn stop(mut self) {
        self.cancel();
        debug!(level = self.output.volume(), "Fade stopped");
    }

    /// Cancel the fade and restore the level captured at start.
    pub fn abort(mut self) {
        let mut gate = self.gate.lock();
        gate.closed = true;
        self.output.set_volume(self.initial);
        drop(gate);
        self.cancel();
        debug!(level = self.initial, "Fade aborted");
    }

    /// Wait for the fade to run to completion.
    pub async fn finished(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn cancel(&mut self) {
        self.gate.lock().closed = true;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FaderHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(fade: Fade, output: Arc<dyn VolumeControl>, gate: Arc<Mutex<Gate>>) {
    loop {
        let step = fade.step(Instant::now());
        {
            let gate = gate.lock();
            if gate.closed {
                return;
            }
            match step {
                FadeStep::Apply(level) => output.set_volume(level),
                FadeStep::Finished(level) => {
                    output.set_volume(level);
                    debug!(level, "Fade finished");
                    return;
                }
            }
        }
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fader::SoftwareVolume;
    use std::time::Duration;

    fn output(level: u8) -> Arc<SoftwareVolume> {
        Arc::new(SoftwareVolume::new(level))
    }

    #[tokio::test]
    async fn fade_reaches_target() {
        let volume = output(10);
        let fader = Fader::new(60, Duration::from_millis(50));
        let (handle, feedback) = FaderHandle::start(fader, volume.clone());
        assert_eq!(feedback, "Adjusting volume from 10% to 60% over 0 seconds");
        assert_eq!(handle.initial(), 10);
        handle.finished().await;
        assert_eq!(volume.volume(), 60);
    }

    #[tokio::test]
    async fn abort_restores_initial_level() {
        let volume = output(80);
        let fader = Fader::new(0, Duration::from_secs(30));
        let (handle, _) = FaderHandle::start(fader, volume.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();
        assert_eq!(volume.volume(), 80);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(volume.volume(), 80);
    }

    #[tokio::test]
    async fn stop_keeps_current_level() {
        let volume = output(0);
        let fader = Fader::new(100, Duration::from_secs(30));
        let (handle, _) = FaderHandle::start(fader, volume.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.stop();
        let level = volume.volume();
        assert!(level < 100);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(volume.volume(), level);
    }

    #[tokio::test]
    async fn drop_cancels() {
        let volume = output(50);
        let fader = Fader::new(100, Duration::from_secs(30));
        let (handle, _) = FaderHandle::start(fader, volume.clone());
        drop(handle);
        let level = volume.volume();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(volume.volume(), level);
        assert!(level < 100);
    }
}
