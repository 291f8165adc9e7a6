//! Connection coordinator: owns the active receiver and swaps it as the
//! handshake progresses.

use crate::config::Config;
use crate::receivers::{
    AuthenticationReceiver, ChannelJoinReceiver, ChatMessageReceiver, Event, Receiver, outcome,
};
use celeste_proto::{ProtocolError, outbound};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Connection phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// [`Session::begin`] has not been called.
    Idle,
    Authenticating,
    Joining,
    Chatting,
    /// A handshake step failed. Input is ignored.
    Closed,
}

/// What the session needs to log in and join.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub nickname: String,
    pub oauth_token: Option<String>,
    pub channel: String,
    pub authentication_marker: String,
    pub join_marker: String,
    pub join_timeout: Duration,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            nickname: config.identity.nickname.clone(),
            oauth_token: config.identity.oauth_token.clone(),
            channel: config.channel.name.clone(),
            authentication_marker: config.protocol.authentication_marker.clone(),
            join_marker: config.protocol.join_marker.clone(),
            join_timeout: config.channel.join_timeout(),
        }
    }
}

/// Drives one connection through authentication, channel join and chat.
///
/// Handshake receivers are created when their phase begins and dropped once
/// they report an outcome. The chat receiver is built up front so that its
/// registry is available before the join completes.
#[derive(Debug)]
pub struct Session {
    settings: SessionSettings,
    phase: Phase,
    authentication: Option<AuthenticationReceiver>,
    join: Option<ChannelJoinReceiver>,
    chat: ChatMessageReceiver,
}

impl Session {
    pub fn new(settings: SessionSettings, chat: ChatMessageReceiver) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            authentication: None,
            join: None,
            chat,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chat(&self) -> &ChatMessageReceiver {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatMessageReceiver {
        &mut self.chat
    }

    /// Start authenticating. Returns the login lines to send.
    pub fn begin(&mut self) -> Vec<Event> {
        if self.phase != Phase::Idle {
            warn!(phase = ?self.phase, "Session already started");
            return Vec::new();
        }
        self.phase = Phase::Authenticating;
        self.authentication = Some(AuthenticationReceiver::new(
            self.settings.authentication_marker.clone(),
        ));
        info!(nickname = %self.settings.nickname, "Authenticating");

        let mut events = Vec::with_capacity(2);
        match &self.settings.oauth_token {
            Some(token) => events.push(Event::Send(outbound::pass(token))),
            None => debug!("No OAuth token configured, logging in anonymously"),
        }
        events.push(Event::Send(outbound::nick(&self.settings.nickname)));
        events
    }

    fn active(&mut self) -> Option<&mut dyn Receiver> {
        match self.phase {
            Phase::Authenticating => self.authentication.as_mut().map(|r| r as &mut dyn Receiver),
            Phase::Joining => self.join.as_mut().map(|r| r as &mut dyn Receiver),
            Phase::Chatting => Some(&mut self.chat as &mut dyn Receiver),
            Phase::Idle | Phase::Closed => None,
        }
    }

    /// Consume one line received at `now`.
    pub fn process(&mut self, line: &str, now: Instant) -> Vec<Event> {
        if let Some(server) = outbound::keepalive_server(line) {
            debug!(server = %server, "Answering keepalive");
            return vec![Event::Send(outbound::pong(server))];
        }
        let phase = self.phase;
        let Some(receiver) = self.active() else {
            debug!(phase = ?phase, line = %line, "Ignoring line");
            return Vec::new();
        };
        let mut events = receiver.process(line, now);
        self.advance(&mut events);
        events
    }

    /// Report an input line the codec could not decode. The line is
    /// dropped and the phase is unaffected.
    pub fn reject_line(&self, error: &ProtocolError) -> Vec<Event> {
        warn!(phase = ?self.phase, error = %error, "Dropping unreadable line");
        vec![Event::Alert(format!("Dropped unreadable line: {error}"))]
    }

    /// When [`Session::expire`] should next be called, if ever.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Joining => self.join.as_ref().and_then(Receiver::deadline),
            _ => None,
        }
    }

    /// Handle the passage of time with no new line.
    pub fn expire(&mut self, now: Instant) -> Vec<Event> {
        let Some(receiver) = self.active() else {
            return Vec::new();
        };
        let mut events = receiver.expire(now);
        self.advance(&mut events);
        events
    }

    fn advance(&mut self, events: &mut Vec<Event>) {
        let Some(succeeded) = outcome(events) else {
            return;
        };
        match (self.phase, succeeded) {
            (Phase::Authenticating, true) => {
                self.authentication = None;
                self.join = Some(ChannelJoinReceiver::new(
                    self.settings.join_marker.clone(),
                    self.settings.join_timeout,
                ));
                self.phase = Phase::Joining;
                info!(channel = %self.settings.channel, "Joining channel");
                events.push(Event::Send(outbound::cap_req(outbound::TWITCH_CAPABILITIES)));
                events.push(Event::Send(outbound::join(&self.settings.channel)));
            }
            (Phase::Joining, true) => {
                self.join = None;
                self.phase = Phase::Chatting;
                info!(channel = %self.settings.channel, "Following chat");
            }
            (Phase::Authenticating | Phase::Joining, false) => {
                warn!(phase = ?self.phase, "Handshake failed, closing session");
                self.authentication = None;
                self.join = None;
                self.phase = Phase::Closed;
            }
            // A bad chat line is not fatal.
            _ => {}
        }
    }
}
