//! Channel join with a quiet-period failure deadline.
//!
//! The gateway answers `JOIN` with several lines before (and sometimes
//! instead of) the one that confirms the join. The first line without the
//! join marker arms a deadline; a confirming line before the deadline
//! disarms it and succeeds. If the deadline passes first, the join fails.
//! At most one deadline is armed at a time and it is not pushed back by
//! further non-confirming lines.

use super::{Event, Output, Receiver, StatusReceiver};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ChannelJoinReceiver {
    status: StatusReceiver,
    marker: String,
    timeout: Duration,
    deadline: Option<Instant>,
    finished: bool,
}

impl ChannelJoinReceiver {
    /// `marker` identifies the confirming reply; `timeout` is how long to
    /// wait for it once a non-confirming reply arrives.
    pub fn new(marker: impl Into<String>, timeout: Duration) -> Self {
        Self {
            status: StatusReceiver,
            marker: marker.into(),
            timeout,
            deadline: None,
            finished: false,
        }
    }

    fn overdue(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    fn fail(&mut self) -> Vec<Event> {
        self.deadline = None;
        self.finished = true;
        warn!(timeout_ms = self.timeout.as_millis() as u64, "Failed to join channel");
        vec![
            Event::Print(Output::Plain("Failed to join channel for stream".into())),
            Event::Failed,
        ]
    }
}

impl Receiver for ChannelJoinReceiver {
    fn process(&mut self, line: &str, now: Instant) -> Vec<Event> {
        if self.finished {
            return Vec::new();
        }
        // The deadline passed before this line arrived.
        if self.overdue(now) {
            return self.fail();
        }

        if line.contains(&self.marker) {
            self.deadline = None;
            self.finished = true;
            info!("Stream joined");
            return vec![
                Event::Print(Output::Plain("Stream joined".into())),
                self.status.interpret(line),
                Event::Succeeded,
            ];
        }

        if self.deadline.is_none() {
            debug!(
                timeout_ms = self.timeout.as_millis() as u64,
                "Join pending, arming deadline"
            );
            self.deadline = now.checked_add(self.timeout);
            if self.deadline.is_none() {
                warn!("Join timeout out of range, waiting indefinitely");
            }
        }
        vec![self.status.interpret(line)]
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn expire(&mut self, now: Instant) -> Vec<Event> {
        if self.finished || !self.overdue(now) {
            return Vec::new();
        }
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivers::outcome;

    const MARKER: &str = ":End of /NAMES list";
    const TIMEOUT: Duration = Duration::from_millis(1000);
    const JOIN_ECHO: &str = ":celestebot!celestebot@celestebot.tmi.twitch.tv JOIN #celeste";
    const NAMES_END: &str = ":celestebot.tmi.twitch.tv 366 celestebot #celeste :End of /NAMES list";

    fn ms(base: Instant, offset: u64) -> Instant {
        base + Duration::from_millis(offset)
    }

    fn count_failed(events: &[Event]) -> usize {
        events.iter().filter(|e| **e == Event::Failed).count()
    }

    // ========================================================================
    // Success paths
    // ========================================================================

    #[test]
    fn out_of_range_timeout_never_arms() {
        let t0 = Instant::now();
        let mut receiver = ChannelJoinReceiver::new(MARKER, Duration::MAX);
        let events = receiver.process(JOIN_ECHO, t0);
        assert_eq!(outcome(&events), None);
        assert!(receiver.deadline().is_none());
        assert_eq!(outcome(&receiver.process(NAMES_END, ms(t0, 5000))), Some(true));
    }

    #[test]
    fn immediate_confirmation_succeeds() {
        let mut receiver = ChannelJoinReceiver::new(MARKER, TIMEOUT);
        let events = receiver.process(NAMES_END, Instant::now());
        assert_eq!(outcome(&events), Some(true));
        assert_eq!(events[0], Event::Print(Output::Plain("Stream joined".into())));
        assert!(receiver.deadline().is_none());
    }

    #[test]
    fn confirmation_within_window_succeeds() {
        let t0 = Instant::now();
        let mut receiver = ChannelJoinReceiver::new(MARKER, TIMEOUT);

        let mut events = receiver.process(JOIN_ECHO, t0);
        assert_eq!(receiver.deadline(), Some(ms(t0, 1000)));
        events.extend(receiver.process(
            ":celestebot.tmi.twitch.tv 353 celestebot = #celeste :celestebot",
            ms(t0, 500),
        ));
        assert_eq!(receiver.deadline(), Some(ms(t0, 1000)), "deadline is not pushed back");
        events.extend(receiver.process(NAMES_END, ms(t0, 900)));

        assert!(events.contains(&Event::Succeeded));
        assert_eq!(count_failed(&events), 0);
        assert!(receiver.deadline().is_none());
        assert!(receiver.expire(ms(t0, 5000)).is_empty());
    }

    // ========================================================================
    // Failure paths
    // ========================================================================

    #[test]
    fn deadline_fails_exactly_once() {
        let t0 = Instant::now();
        let mut receiver = ChannelJoinReceiver::new(MARKER, TIMEOUT);

        receiver.process(JOIN_ECHO, t0);
        receiver.process(":tmi.twitch.tv NOTICE #celeste :No response", ms(t0, 500));

        assert!(receiver.expire(ms(t0, 999)).is_empty());
        let events = receiver.expire(ms(t0, 1000));
        assert_eq!(count_failed(&events), 1);
        assert_eq!(
            events[0],
            Event::Print(Output::Plain("Failed to join channel for stream".into()))
        );

        assert!(receiver.expire(ms(t0, 2000)).is_empty());
        assert!(receiver.process(NAMES_END, ms(t0, 2100)).is_empty());
    }

    #[test]
    fn late_confirmation_still_fails() {
        let t0 = Instant::now();
        let mut receiver = ChannelJoinReceiver::new(MARKER, TIMEOUT);

        receiver.process(JOIN_ECHO, t0);
        let events = receiver.process(NAMES_END, ms(t0, 1200));
        assert_eq!(outcome(&events), Some(false));
        assert_eq!(count_failed(&events), 1);
    }

    #[test]
    fn no_deadline_without_a_line() {
        let mut receiver = ChannelJoinReceiver::new(MARKER, TIMEOUT);
        assert!(receiver.deadline().is_none());
        assert!(receiver.expire(Instant::now() + Duration::from_secs(60)).is_empty());
    }
}
