//! Round countdown
//!
//! A restartable, single-shot countdown. The countdown never sleeps on its
//! own: each second is requested from the host through `schedule_message`
//! and delivered back through [`Countdown::receive_alarm`]. Every start, stop
//! and reset opens a new generation, and alarms from older generations are
//! ignored, so at most one chain of ticks is ever live.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_with::SerializeDisplay;
use thiserror::Error;

use crate::constants::countdown::{MAX_DURATION, MIN_DURATION, TICK_SECONDS};

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Not started, or stopped before reaching zero
    #[default]
    Idle,
    /// Decrementing once per second
    Running,
    /// Reached zero; the terminal event has fired
    Expired,
}

/// Errors that can occur when reconfiguring the countdown
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The duration cannot change while the countdown is running
    #[error("cannot change the duration of a running countdown")]
    Running,
    /// The duration is outside of the supported range
    #[error("duration must be between {} and {} seconds", MIN_DURATION, MAX_DURATION)]
    OutOfRange,
}

/// Remaining time formatted as `MM:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay)]
pub struct Clock(u64);

impl Clock {
    /// Creates a clock showing the given number of seconds
    pub fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Seconds represented by this clock
    pub fn seconds(self) -> u64 {
        self.0
    }
}

impl Display for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Alarm messages driving a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One second has elapsed for the run opened at `generation`
    Tick {
        /// Generation the tick was scheduled under
        generation: u64,
    },
}

/// Update messages about the countdown sent to the rendering side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// The displayed time or phase changed
    Clock {
        /// Time left on the clock
        clock: Clock,
        /// Current phase
        phase: Phase,
    },
    /// Time ran out; emitted exactly once per run
    TimeUp,
}

/// Outcome of delivering an alarm to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The alarm belonged to a cancelled run and changed nothing
    Ignored,
    /// One second was taken off the clock and the next tick is scheduled
    Ticked(Clock),
    /// The clock reached zero
    Expired,
}

/// Countdown state: configured duration, time left and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    configured: u64,
    remaining: u64,
    phase: Phase,
    generation: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            configured: crate::constants::countdown::DEFAULT_DURATION,
            remaining: crate::constants::countdown::DEFAULT_DURATION,
            phase: Phase::Idle,
            generation: 0,
        }
    }
}

fn check_duration(seconds: u64) -> Result<u64, Error> {
    if (MIN_DURATION..=MAX_DURATION).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(Error::OutOfRange)
    }
}

impl Countdown {
    /// Creates an idle countdown with the given duration in seconds
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the duration is not supported.
    pub fn new(seconds: u64) -> Result<Self, Error> {
        let seconds = check_duration(seconds)?;
        Ok(Self {
            configured: seconds,
            remaining: seconds,
            ..Self::default()
        })
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether ticks are currently being counted
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Configured round duration in seconds
    pub fn configured(&self) -> u64 {
        self.configured
    }

    /// Seconds left on the clock
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Time left, ready for display
    pub fn clock(&self) -> Clock {
        Clock(self.remaining)
    }

    /// Snapshot message of the current display
    pub fn clock_message(&self) -> UpdateMessage {
        UpdateMessage::Clock {
            clock: self.clock(),
            phase: self.phase,
        }
    }

    /// Changes the round duration
    ///
    /// When idle, the displayed time follows the new duration immediately.
    /// An expired countdown keeps showing zero until it is started or reset.
    ///
    /// # Errors
    ///
    /// * `Error::Running` - The countdown is running
    /// * `Error::OutOfRange` - The duration is not supported
    pub fn configure(&mut self, seconds: u64) -> Result<Clock, Error> {
        if self.is_running() {
            return Err(Error::Running);
        }
        self.configured = check_duration(seconds)?;
        if self.phase == Phase::Idle {
            self.remaining = self.configured;
        }
        Ok(self.clock())
    }

    /// Starts a fresh run from the full configured duration
    ///
    /// Any run already in progress is cancelled first, so calling this twice
    /// in a row still yields a single tick per second.
    pub fn start<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: &mut S,
    ) -> Clock {
        self.generation += 1;
        self.remaining = self.configured;
        self.phase = Phase::Running;
        log::debug!(
            "countdown started at {} (generation {})",
            self.clock(),
            self.generation
        );
        self.schedule_tick(schedule_message);
        self.clock()
    }

    /// Stops a running countdown without firing the terminal event
    ///
    /// The clock keeps showing the time at which it was stopped. Returns
    /// `false` if the countdown was not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.generation += 1;
        self.phase = Phase::Idle;
        log::debug!("countdown stopped at {}", self.clock());
        true
    }

    /// Returns to idle with the full duration on the clock, from any phase
    pub fn reset(&mut self) -> Clock {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.remaining = self.configured;
        self.clock()
    }

    /// Delivers a previously scheduled alarm
    pub fn receive_alarm<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        message: &AlarmMessage,
        schedule_message: &mut S,
    ) -> Transition {
        let AlarmMessage::Tick { generation } = *message;
        if generation != self.generation || !self.is_running() {
            return Transition::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(TICK_SECONDS);
        if self.remaining == 0 {
            self.phase = Phase::Expired;
            self.generation += 1;
            log::debug!("countdown expired");
            Transition::Expired
        } else {
            self.schedule_tick(schedule_message);
            Transition::Ticked(self.clock())
        }
    }

    fn schedule_tick<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &self,
        schedule_message: &mut S,
    ) {
        schedule_message(
            AlarmMessage::Tick {
                generation: self.generation,
            }
            .into(),
            web_time::Duration::from_secs(TICK_SECONDS),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Scheduled = Vec<(crate::AlarmMessage, web_time::Duration)>;

    fn tick_of(alarm: &crate::AlarmMessage) -> AlarmMessage {
        match alarm {
            crate::AlarmMessage::Countdown(tick) => *tick,
            other => panic!("unexpected alarm {other:?}"),
        }
    }

    /// Delivers the most recently scheduled alarm, like a host queue would
    fn fire_last(countdown: &mut Countdown, scheduled: &mut Scheduled) -> Transition {
        let (alarm, _) = scheduled.pop().expect("an alarm should be scheduled");
        countdown.receive_alarm(&tick_of(&alarm), &mut |m, d| scheduled.push((m, d)))
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(Clock::new(0).to_string(), "00:00");
        assert_eq!(Clock::new(5).to_string(), "00:05");
        assert_eq!(Clock::new(60).to_string(), "01:00");
        assert_eq!(Clock::new(125).to_string(), "02:05");
        assert_eq!(Clock::new(MAX_DURATION).to_string(), "99:59");
    }

    #[test]
    fn test_clock_serializes_as_text() {
        assert_eq!(serde_json::to_string(&Clock::new(75)).unwrap(), "\"01:15\"");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(Countdown::new(0).unwrap_err(), Error::OutOfRange);
        assert_eq!(
            Countdown::new(MAX_DURATION + 1).unwrap_err(),
            Error::OutOfRange
        );
        assert!(Countdown::new(MIN_DURATION).is_ok());
    }

    #[test]
    fn test_configure_updates_idle_display() {
        let mut countdown = Countdown::default();
        let clock = countdown.configure(90).unwrap();
        assert_eq!(clock.to_string(), "01:30");
        assert_eq!(countdown.remaining(), 90);
        assert_eq!(countdown.phase(), Phase::Idle);
    }

    #[test]
    fn test_configure_rejected_while_running() {
        let mut countdown = Countdown::new(30).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        assert_eq!(countdown.configure(45), Err(Error::Running));
        assert_eq!(countdown.configured(), 30);
    }

    #[test]
    fn test_start_shows_full_duration_and_counts_down() {
        let mut countdown = Countdown::new(3).unwrap();
        let mut scheduled = Scheduled::new();
        let clock = countdown.start(&mut |m, d| scheduled.push((m, d)));

        assert_eq!(clock.to_string(), "00:03");
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].1, web_time::Duration::from_secs(1));

        assert_eq!(
            fire_last(&mut countdown, &mut scheduled),
            Transition::Ticked(Clock::new(2))
        );
        assert_eq!(
            fire_last(&mut countdown, &mut scheduled),
            Transition::Ticked(Clock::new(1))
        );
        assert_eq!(
            fire_last(&mut countdown, &mut scheduled),
            Transition::Expired
        );
        assert_eq!(countdown.clock().to_string(), "00:00");
        assert!(scheduled.is_empty());
    }

    #[test]
    fn test_every_second_is_shown_down_to_zero() {
        for duration in [1, 59, 60, 61, MAX_DURATION] {
            let mut countdown = Countdown::new(duration).unwrap();
            let mut scheduled = Scheduled::new();
            let clock = countdown.start(&mut |m, d| scheduled.push((m, d)));
            assert_eq!(clock, Clock::new(duration));

            let (mut minutes, mut seconds) = (duration / 60, duration % 60);
            for remaining in (1..duration).rev() {
                if seconds == 0 {
                    minutes -= 1;
                    seconds = 59;
                } else {
                    seconds -= 1;
                }
                assert_eq!(
                    fire_last(&mut countdown, &mut scheduled),
                    Transition::Ticked(Clock::new(remaining))
                );
                assert_eq!(
                    countdown.clock().to_string(),
                    format!("{minutes:02}:{seconds:02}")
                );
            }

            assert_eq!(
                fire_last(&mut countdown, &mut scheduled),
                Transition::Expired
            );
            assert_eq!(countdown.clock().to_string(), "00:00");
            assert!(scheduled.is_empty());
        }
    }

    #[test]
    fn test_double_start_keeps_single_tick_chain() {
        let mut countdown = Countdown::new(10).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        assert_eq!(scheduled.len(), 2);

        // Both alarms come due one second later; only the newest run counts.
        let (second, _) = scheduled.pop().unwrap();
        let (first, _) = scheduled.pop().unwrap();
        let mut next = Scheduled::new();
        assert_eq!(
            countdown.receive_alarm(&tick_of(&first), &mut |m, d| next.push((m, d))),
            Transition::Ignored
        );
        assert_eq!(
            countdown.receive_alarm(&tick_of(&second), &mut |m, d| next.push((m, d))),
            Transition::Ticked(Clock::new(9))
        );
        assert_eq!(next.len(), 1);
        assert_eq!(countdown.remaining(), 9);
    }

    #[test]
    fn test_stop_then_start_resets_to_full_duration() {
        let mut countdown = Countdown::new(5).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        fire_last(&mut countdown, &mut scheduled);
        fire_last(&mut countdown, &mut scheduled);
        assert_eq!(countdown.remaining(), 3);

        assert!(countdown.stop());
        assert_eq!(countdown.phase(), Phase::Idle);
        assert_eq!(countdown.remaining(), 3);

        let clock = countdown.start(&mut |m, d| scheduled.push((m, d)));
        assert_eq!(clock, Clock::new(5));
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut countdown = Countdown::new(5).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        countdown.stop();
        assert_eq!(
            fire_last(&mut countdown, &mut scheduled),
            Transition::Ignored
        );
        assert_eq!(countdown.remaining(), 5);
    }

    #[test]
    fn test_stop_when_not_running_is_noop() {
        let mut countdown = Countdown::default();
        assert!(!countdown.stop());
        assert_eq!(countdown.phase(), Phase::Idle);
    }

    #[test]
    fn test_one_second_countdown_expires_once() {
        let mut countdown = Countdown::new(1).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));

        let (alarm, _) = scheduled.pop().unwrap();
        let tick = tick_of(&alarm);
        assert_eq!(
            countdown.receive_alarm(&tick, &mut |m, d| scheduled.push((m, d))),
            Transition::Expired
        );
        assert_eq!(countdown.phase(), Phase::Expired);
        assert!(scheduled.is_empty());

        // A duplicate delivery must not fire the terminal event again.
        assert_eq!(
            countdown.receive_alarm(&tick, &mut |m, d| scheduled.push((m, d))),
            Transition::Ignored
        );
    }

    #[test]
    fn test_expired_can_restart() {
        let mut countdown = Countdown::new(1).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        fire_last(&mut countdown, &mut scheduled);
        assert_eq!(countdown.phase(), Phase::Expired);

        countdown.start(&mut |m, d| scheduled.push((m, d)));
        assert!(countdown.is_running());
        assert_eq!(countdown.remaining(), 1);
    }

    #[test]
    fn test_configure_while_expired_keeps_zero() {
        let mut countdown = Countdown::new(1).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        fire_last(&mut countdown, &mut scheduled);

        countdown.configure(30).unwrap();
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.reset(), Clock::new(30));
    }

    #[test]
    fn test_remaining_never_exceeds_configured() {
        let mut countdown = Countdown::new(120).unwrap();
        let mut scheduled = Scheduled::new();
        countdown.start(&mut |m, d| scheduled.push((m, d)));
        fire_last(&mut countdown, &mut scheduled);
        countdown.stop();
        countdown.configure(30).unwrap();
        assert!(countdown.remaining() <= countdown.configured());
    }
}
