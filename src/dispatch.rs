//! Handlers for built-in dispatch commands and the help clock.
//!
//! The chat receiver only emits [`Event::Dispatch`]; the [`Dispatcher`]
//! turns the built-in ones into effects: volume fades, agenda updates,
//! and keepalive pings.

use crate::commands::{BuiltinCommand, Command, CommandRegistry};
use crate::fader::{Fader, FaderHandle, VolumeControl};
use crate::receivers::{Event, Output};
use celeste_proto::outbound;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Server pinged by `!ping`.
pub const PING_SERVER: &str = "tmi.twitch.tv";

/// Runs built-in commands. Holds at most one fade at a time.
pub struct Dispatcher {
    output: Arc<dyn VolumeControl>,
    default_fade: Duration,
    fade: Option<FaderHandle>,
    agenda: Option<String>,
}

impl Dispatcher {
    pub fn new(output: Arc<dyn VolumeControl>, default_fade: Duration) -> Self {
        Self {
            output,
            default_fade,
            fade: None,
            agenda: None,
        }
    }

    /// Current stream agenda, if one was set.
    pub fn agenda(&self) -> Option<&str> {
        self.agenda.as_deref()
    }

    /// The running (or most recently started) fade.
    pub fn fade(&self) -> Option<&FaderHandle> {
        self.fade.as_ref()
    }

    /// Run `command` with `argument`. Returns follow-up events.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle(&mut self, command: &Command, argument: &str) -> Vec<Event> {
        let Some(builtin) = BuiltinCommand::from_name(command.name()) else {
            debug!(command = %command.name(), "No built-in handler, leaving to external handlers");
            return Vec::new();
        };
        match builtin {
            BuiltinCommand::Volume => self.volume(argument),
            BuiltinCommand::Agenda => {
                let agenda = argument.trim().to_string();
                info!(agenda = %agenda, "Agenda updated");
                let line = format!("Agenda: {agenda}");
                self.agenda = Some(agenda);
                vec![Event::Print(Output::Plain(line))]
            }
            BuiltinCommand::Ping => vec![Event::Send(outbound::ping(PING_SERVER))],
            BuiltinCommand::Song | BuiltinCommand::Vibe => {
                warn!(command = %command.name(), "No playlist is attached");
                vec![Event::Print(Output::Plain("No playlist is attached".into()))]
            }
        }
    }

    fn volume(&mut self, argument: &str) -> Vec<Event> {
        let fader = match Fader::parse(argument, self.default_fade) {
            Ok(fader) => fader,
            Err(e) => {
                warn!(error = %e, argument = %argument, "Rejected volume request");
                return vec![Event::Alert(format!("volume: {e}"))];
            }
        };
        if let Some(previous) = self.fade.take() {
            previous.stop();
        }
        let (handle, feedback) = FaderHandle::start(fader, Arc::clone(&self.output));
        info!(from = handle.initial(), to = handle.target(), "Fading volume");
        self.fade = Some(handle);
        vec![Event::Feedback(feedback)]
    }

    /// Cancel any running fade and restore the level it started from.
    pub fn abort_fade(&mut self) {
        if let Some(fade) = self.fade.take() {
            fade.abort();
        }
    }
}

/// Help clock line advertising a random unprotected command.
pub fn advertisement(registry: &CommandRegistry) -> Option<Event> {
    let command = registry.random_user_command()?;
    Some(Event::Print(Output::Plain(format!(
        "Try !{}: {}",
        command.name(),
        command.description()
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandType, builtin_commands};
    use crate::fader::SoftwareVolume;

    fn dispatcher(level: u8) -> (Dispatcher, Arc<SoftwareVolume>) {
        let output = Arc::new(SoftwareVolume::new(level));
        (Dispatcher::new(output.clone(), Duration::from_secs(5)), output)
    }

    fn builtin(which: BuiltinCommand) -> Command {
        which.command()
    }

    #[tokio::test]
    async fn volume_starts_fade_with_feedback() {
        let (mut d, output) = dispatcher(20);
        let events = d.handle(&builtin(BuiltinCommand::Volume), "80 0");
        assert_eq!(
            events,
            [Event::Feedback("Adjusting volume from 20% to 80% over 0 seconds".into())]
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(output.volume(), 80);
    }

    #[tokio::test]
    async fn new_fade_replaces_running_one() {
        let (mut d, output) = dispatcher(50);
        d.handle(&builtin(BuiltinCommand::Volume), "100 30");
        let events = d.handle(&builtin(BuiltinCommand::Volume), "10 0");
        assert!(matches!(&events[..], [Event::Feedback(_)]));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(output.volume(), 10);
        assert_eq!(d.fade().map(FaderHandle::target), Some(10));
    }

    #[tokio::test]
    async fn abort_fade_restores_level() {
        let (mut d, output) = dispatcher(70);
        d.handle(&builtin(BuiltinCommand::Volume), "0 30");
        d.abort_fade();
        assert_eq!(output.volume(), 70);
        assert!(d.fade().is_none());
    }

    #[tokio::test]
    async fn volume_usage_error_alerts() {
        let (mut d, _) = dispatcher(50);
        assert_eq!(
            d.handle(&builtin(BuiltinCommand::Volume), ""),
            [Event::Alert("volume: no volume specified".into())]
        );
        assert!(d.fade().is_none());
    }

    #[test]
    fn agenda_and_ping() {
        let (mut d, _) = dispatcher(50);
        let events = d.handle(&builtin(BuiltinCommand::Agenda), " speedrun practice ");
        assert_eq!(events, [Event::Print(Output::Plain("Agenda: speedrun practice".into()))]);
        assert_eq!(d.agenda(), Some("speedrun practice"));

        let events = d.handle(&builtin(BuiltinCommand::Ping), "");
        assert_eq!(events, [Event::Send("PING :tmi.twitch.tv".into())]);
    }

    #[test]
    fn user_dispatch_is_left_alone() {
        let (mut d, _) = dispatcher(50);
        let custom = Command::new("raid", "Start a raid", CommandType::Dispatch);
        assert!(d.handle(&custom, "someone").is_empty());
    }

    #[test]
    fn advertisement_picks_unprotected() {
        let registry = CommandRegistry::new(Vec::new(), builtin_commands());
        // song is the only unprotected built-in.
        assert_eq!(
            advertisement(&registry),
            Some(Event::Print(Output::Plain(
                "Try !song: Show the title, album, and artist of the song that is currently playing"
                    .into()
            )))
        );

        let empty = CommandRegistry::new(Vec::new(), Vec::new());
        assert_eq!(advertisement(&empty), None);
    }
}
