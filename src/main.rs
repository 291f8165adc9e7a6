//! celeste - stream chat bot.
//!
//! Reads gateway lines from stdin and writes protocol lines to stdout.

use celeste::commands::{CommandRegistry, builtin_commands};
use celeste::config::{Config, validate};
use celeste::dispatch::{Dispatcher, advertisement};
use celeste::fader::{SoftwareVolume, VolumeControl};
use celeste::receivers::{ChatMessageReceiver, Event};
use celeste::session::{Phase, Session, SessionSettings};
use celeste::telemetry::spans;
use celeste_proto::{LineCodec, outbound};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{Stdin, Stdout};
use tokio::time::Interval;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries protocol lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "celeste.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    let registry = CommandRegistry::load(&config.commands.path, builtin_commands()).map_err(|e| {
        error!(
            path = %config.commands.path.display(),
            code = e.error_code(),
            error = %e,
            "Failed to load command list"
        );
        e
    })?;
    info!(commands = registry.len(), "Command list loaded");

    let chat = ChatMessageReceiver::new(registry, config.identity.administrator.clone());
    let session = Session::new(SessionSettings::from(&config), chat);
    let output: Arc<dyn VolumeControl> = Arc::new(SoftwareVolume::new(config.volume.initial));
    let dispatcher = Dispatcher::new(output, config.volume.default_fade());

    info!(
        nickname = %config.identity.nickname,
        channel = %config.channel.name,
        "Starting celeste"
    );
    let span = spans::session(&config.identity.nickname, &config.channel.name);
    Bot::new(session, dispatcher, &config).run().instrument(span).await
}

/// Wires the session to stdin/stdout and acts on its events.
struct Bot {
    session: Session,
    dispatcher: Dispatcher,
    lines: FramedRead<Stdin, LineCodec>,
    sink: FramedWrite<Stdout, LineCodec>,
    channel: String,
    help: Option<Interval>,
}

impl Bot {
    fn new(session: Session, dispatcher: Dispatcher, config: &Config) -> Self {
        let help = config.help.cooldown_secs.map(|secs| {
            let period = Duration::from_secs(secs);
            tokio::time::interval_at(tokio::time::Instant::now() + period, period)
        });
        Self {
            session,
            dispatcher,
            lines: FramedRead::new(
                tokio::io::stdin(),
                LineCodec::with_max_len(config.protocol.max_line_len),
            ),
            sink: FramedWrite::new(tokio::io::stdout(), LineCodec::new()),
            channel: config.channel.name.clone(),
            help,
        }
    }

    async fn run(mut self) -> anyhow::Result<()> {
        let events = self.session.begin();
        self.deliver(events).await?;

        loop {
            let deadline = self.session.deadline();
            tokio::select! {
                frame = self.lines.next() => match frame {
                    Some(Ok(Ok(line))) => {
                        let events = self.session.process(&line, Instant::now());
                        self.deliver(events).await?;
                    }
                    Some(Ok(Err(e))) => {
                        let events = self.session.reject_line(&e);
                        self.deliver(events).await?;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Failed to read input");
                        return Err(e.into());
                    }
                    None => {
                        info!("Input closed");
                        break;
                    }
                },
                _ = wait_until(deadline) => {
                    let events = self.session.expire(Instant::now());
                    self.deliver(events).await?;
                }
                _ = tick(&mut self.help) => {
                    if self.session.phase() == Phase::Chatting
                        && let Some(event) = advertisement(self.session.chat().registry())
                    {
                        self.deliver(vec![event]).await?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }

            if self.session.phase() == Phase::Closed {
                anyhow::bail!("session closed during handshake");
            }
        }
        Ok(())
    }

    /// Act on events, including any produced while handling them.
    async fn deliver(&mut self, events: Vec<Event>) -> anyhow::Result<()> {
        let mut queue = VecDeque::from(events);
        while let Some(event) = queue.pop_front() {
            match event {
                Event::Send(line) => {
                    debug!(line = %line, "Sending");
                    self.sink.send(line).await?;
                }
                Event::Feedback(text) => {
                    info!(feedback = %text, "Feedback");
                    queue.push_back(Event::Send(outbound::privmsg(&self.channel, &text)));
                }
                Event::Print(output) => info!(target: "celeste::display", "{output}"),
                Event::Alert(text) => warn!(alert = %text, "Alert"),
                // Logged by the chat receiver.
                Event::Arrival(_) => {}
                Event::PlayVideo(path) => {
                    info!(path = %path.display(), "Play video (no player attached)");
                }
                Event::PlayAudio {
                    sender,
                    message,
                    path,
                } => {
                    info!(
                        sender = %sender,
                        message = %message,
                        path = %path.display(),
                        "Play audio (no player attached)"
                    );
                }
                Event::Dispatch {
                    command,
                    argument,
                    sender,
                } => {
                    let span = spans::command(command.name(), &sender);
                    let _enter = span.enter();
                    queue.extend(self.dispatcher.handle(&command, &argument));
                }
                Event::Succeeded | Event::Failed => {}
            }
        }
        Ok(())
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
