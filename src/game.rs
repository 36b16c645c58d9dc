//! Core game logic and state management
//!
//! This module contains the game session: which mode is being played, the
//! word on screen, the countdown, the wheel and the scoreboard copy. Every
//! operation takes its collaborators explicitly (the server client, the
//! presentation tunnel and the alarm scheduler), so several sessions can
//! live side by side and each one can be driven from a test.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::{
    AlarmMessage, Error,
    api::{Client, Transport},
    config::Options,
    countdown::{self, Clock, Countdown, Phase, Transition},
    leaderboard::{Leaderboard, LeaderboardMessage},
    mode::{GameMode, ModeDisplay, SelectionMethod},
    session::{Confirmation, Tunnel},
    teams::TeamManager,
    wheel::{self, Wheel},
};

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum State {
    /// Choosing the mode, by wheel or by hand
    #[default]
    Selection,
    /// Playing rounds in the given mode
    Round(GameMode),
}

/// Update messages about the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// Back to the mode selection screen
    SelectionScreen(SelectionMethod),
    /// A mode was chosen and the round area is shown
    ModeSelected(ModeDisplay),
    /// The word was cleared; the host is invited to draw one
    WordPrompt,
    /// The word to perform, in upper case
    Word(String),
}

/// Complete state for a view attaching late
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncMessage {
    /// The selection screen
    Selection {
        /// Wheel or manual view
        method: SelectionMethod,
        /// Whether the wheel is turning
        spinning: bool,
        /// The scoreboard
        scores: LeaderboardMessage,
    },
    /// The round screen
    Round {
        /// The active mode
        mode: ModeDisplay,
        /// The word in upper case, if one was drawn
        word: Option<String>,
        /// Time left
        clock: Clock,
        /// Countdown phase
        phase: Phase,
        /// The scoreboard
        scores: LeaderboardMessage,
    },
}

/// A game session
#[derive(Serialize, Deserialize)]
pub struct Game {
    /// Session options
    options: Options,
    /// Current screen
    pub state: State,
    /// Which selection view is shown
    selection_method: SelectionMethod,
    /// The word of the current round
    word: Option<String>,
    /// Round countdown
    pub countdown: Countdown,
    /// Wheel used for random selection
    wheel: Wheel,
    /// Copy of the server's scoreboard
    pub leaderboard: Leaderboard,
    /// Roster operations
    team_manager: TeamManager,
}

impl Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("word", &self.word)
            .field("phase", &self.countdown.phase())
            .finish_non_exhaustive()
    }
}

fn surface<T: Tunnel>(tunnel: &T, error: impl Into<Error>) {
    let error = error.into();
    log::warn!("action failed: {error}");
    tunnel.alert(&error);
}

impl Game {
    /// Creates a session on the selection screen
    ///
    /// # Errors
    ///
    /// Returns [`countdown::Error::OutOfRange`] if the configured round
    /// duration is not supported.
    pub fn new(options: Options) -> Result<Self, countdown::Error> {
        Ok(Self {
            countdown: Countdown::new(options.timer_duration)?,
            team_manager: TeamManager::new(options.censor_team_names),
            options,
            state: State::Selection,
            selection_method: SelectionMethod::default(),
            word: None,
            wheel: Wheel::default(),
            leaderboard: Leaderboard::default(),
        })
    }

    /// The active mode, if a round is being played
    pub fn mode(&self) -> Option<GameMode> {
        match self.state {
            State::Selection => None,
            State::Round(mode) => Some(mode),
        }
    }

    /// The word of the current round as received
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// The word of the current round as displayed
    pub fn display_word(&self) -> Option<String> {
        self.word.as_deref().map(str::to_uppercase)
    }

    /// Which selection view is shown
    pub fn selection_method(&self) -> SelectionMethod {
        self.selection_method
    }

    /// Whether the wheel is turning
    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    /// Switches between the wheel and the manual selection view
    pub fn set_selection_method<T: Tunnel>(&mut self, method: SelectionMethod, tunnel: &T) {
        self.selection_method = method;
        if self.state == State::Selection {
            tunnel.send_message(&UpdateMessage::SelectionScreen(method).into());
        }
    }

    /// Makes `mode` the active mode
    ///
    /// The previous word is cleared, a pending spin is abandoned and the
    /// countdown goes back to idle with the full duration. Nothing is sent to
    /// the server.
    pub fn select_mode<T: Tunnel>(&mut self, mode: GameMode, tunnel: &T) {
        self.wheel.cancel();
        self.state = State::Round(mode);
        self.word = None;
        self.countdown.reset();
        log::debug!("mode {mode} selected");

        tunnel.send_message(&UpdateMessage::ModeSelected(mode.into()).into());
        tunnel.send_message(&UpdateMessage::WordPrompt.into());
        tunnel.send_message(&self.countdown.clock_message().into());
    }

    /// Spins the wheel; the mode is selected when the spin alarm comes due
    ///
    /// A spin requested while the wheel is already turning, or outside of the
    /// selection screen, is ignored.
    pub fn spin_wheel<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel: &T,
    ) {
        if self.state != State::Selection {
            log::debug!("spin ignored outside of mode selection");
            return;
        }
        match self.wheel.spin(&mut schedule_message) {
            Ok(update) => tunnel.send_message(&update.into()),
            Err(e) => log::debug!("spin ignored: {e}"),
        }
    }

    /// Leaves the round and goes back to choosing a mode
    pub fn reset_selection<T: Tunnel>(&mut self, tunnel: &T) {
        self.wheel.cancel();
        self.state = State::Selection;
        self.word = None;
        if self.countdown.stop() {
            tunnel.send_message(&self.countdown.clock_message().into());
        }
        tunnel.send_message(&UpdateMessage::SelectionScreen(self.selection_method).into());
    }

    /// Asks the server for a word in the active mode
    ///
    /// Does nothing on the selection screen. On success the word replaces the
    /// previous one and the countdown goes back to idle; on failure the host
    /// is alerted and the previous word stays.
    pub fn generate_word<T: Tunnel, X: Transport>(&mut self, client: &Client<X>, tunnel: &T) {
        let State::Round(mode) = self.state else {
            return;
        };
        match client.word(mode) {
            Ok(word) => {
                log::debug!("new {mode} word drawn");
                self.word = Some(word);
                self.countdown.reset();
                if let Some(display) = self.display_word() {
                    tunnel.send_message(&UpdateMessage::Word(display).into());
                }
                tunnel.send_message(&self.countdown.clock_message().into());
            }
            Err(e) => surface(tunnel, e),
        }
    }

    /// Changes the round duration
    pub fn configure_timer<T: Tunnel>(&mut self, seconds: u64, tunnel: &T) {
        match self.countdown.configure(seconds) {
            Ok(_) => {
                self.options.timer_duration = seconds;
                tunnel.send_message(&self.countdown.clock_message().into());
            }
            Err(e) => surface(tunnel, e),
        }
    }

    /// Starts the countdown from the full duration, cancelling any run
    pub fn start_timer<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel: &T,
    ) {
        self.countdown.start(&mut schedule_message);
        tunnel.send_message(&self.countdown.clock_message().into());
    }

    /// Stops the countdown without the time's-up effect
    pub fn stop_timer<T: Tunnel>(&mut self, tunnel: &T) {
        if self.countdown.stop() {
            tunnel.send_message(&self.countdown.clock_message().into());
        }
    }

    /// Delivers an alarm previously requested through `schedule_message`
    pub fn receive_alarm<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel: &T,
        message: &AlarmMessage,
    ) {
        match message {
            AlarmMessage::Countdown(tick) => {
                match self.countdown.receive_alarm(tick, &mut schedule_message) {
                    Transition::Ignored => {}
                    Transition::Ticked(_) => {
                        tunnel.send_message(&self.countdown.clock_message().into());
                    }
                    Transition::Expired => {
                        tunnel.send_message(&self.countdown.clock_message().into());
                        tunnel.send_message(&countdown::UpdateMessage::TimeUp.into());
                        if let Err(e) = tunnel.ring_alarm() {
                            log::debug!("alarm sound unavailable: {e}");
                        }
                    }
                }
            }
            AlarmMessage::Wheel(alarm) => {
                if let Some(mode) = self.wheel.receive_alarm(alarm, self.options.spin_outcome) {
                    tunnel.send_message(&wheel::UpdateMessage::Stopped { mode }.into());
                    self.select_mode(mode, tunnel);
                }
            }
        }
    }

    /// Reloads the scoreboard from the server
    pub fn load_scores<T: Tunnel, X: Transport>(&mut self, client: &Client<X>, tunnel: &T) {
        match self.leaderboard.load(client) {
            Ok(update) => tunnel.send_message(&update.into()),
            Err(e) => surface(tunnel, e),
        }
    }

    /// Adds `delta` points to a team, never going below zero
    pub fn adjust_score<T: Tunnel, X: Transport>(
        &mut self,
        client: &Client<X>,
        team: &str,
        delta: i64,
        tunnel: &T,
    ) {
        match self
            .leaderboard
            .adjust(client, self.options.score_update, team, delta)
        {
            Ok(update) => tunnel.send_message(&update.into()),
            Err(e) => surface(tunnel, e),
        }
    }

    /// Sets every score back to zero once the host confirms
    pub fn reset_scores<T: Tunnel, X: Transport>(&mut self, client: &Client<X>, tunnel: &T) {
        if !tunnel.confirm(&Confirmation::ResetScores) {
            return;
        }
        match self.leaderboard.reset(client) {
            Ok(update) => tunnel.send_message(&update.into()),
            Err(e) => surface(tunnel, e),
        }
    }

    /// Adds a team at zero points
    pub fn add_team<T: Tunnel, X: Transport>(&mut self, client: &Client<X>, name: &str, tunnel: &T) {
        match self.team_manager.add_team(client, &mut self.leaderboard, name) {
            Ok((roster, scores)) => {
                tunnel.send_message(&scores.into());
                tunnel.send_message(&roster.into());
            }
            Err(e) => surface(tunnel, e),
        }
    }

    /// Removes a team once the host confirms
    pub fn remove_team<T: Tunnel, X: Transport>(
        &mut self,
        client: &Client<X>,
        name: &str,
        tunnel: &T,
    ) {
        if !tunnel.confirm(&Confirmation::RemoveTeam(name.to_owned())) {
            return;
        }
        match self.team_manager.remove_team(client, &mut self.leaderboard, name) {
            Ok((roster, scores)) => {
                tunnel.send_message(&scores.into());
                tunnel.send_message(&roster.into());
            }
            Err(e) => surface(tunnel, e),
        }
    }

    /// Complete description of what should be on screen
    pub fn state_message(&self) -> SyncMessage {
        let scores = self.leaderboard.summary();
        match self.state {
            State::Selection => SyncMessage::Selection {
                method: self.selection_method,
                spinning: self.wheel.is_spinning(),
                scores,
            },
            State::Round(mode) => SyncMessage::Round {
                mode: mode.into(),
                word: self.display_word(),
                clock: self.countdown.clock(),
                phase: self.countdown.phase(),
                scores,
            },
        }
    }

    /// Sends the complete state through the tunnel
    pub fn update_session<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message().into());
    }
}
