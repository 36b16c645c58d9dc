//! # Charades Game Library
//!
//! This library provides the game logic for a drawing and mimicry party
//! game: choosing the mode of play, drawing a word per round from a server,
//! timing the round with a countdown, and keeping a per-team scoreboard on
//! the server.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
use derive_where::derive_where;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod constants;

pub mod api;
pub mod backend;
pub mod config;
pub mod countdown;
pub mod game;
pub mod leaderboard;
pub mod mode;
pub mod session;
pub mod teams;
pub mod wheel;

/// Messages sent to bring a late view up to date
#[derive(Debug, Serialize, Clone, PartialEq, Eq, derive_more::From)]
pub enum SyncMessage {
    /// General game synchronization messages
    Game(game::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages sent when part of the game changes
#[derive(Debug, Serialize, Clone, PartialEq, Eq, derive_more::From)]
pub enum UpdateMessage {
    /// Mode selection and round word updates
    Game(game::UpdateMessage),
    /// Countdown updates
    Countdown(countdown::UpdateMessage),
    /// Wheel updates
    Wheel(wheel::UpdateMessage),
    /// Scoreboard updates
    Leaderboard(leaderboard::UpdateMessage),
    /// Roster updates
    Teams(teams::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// The host delivers each alarm back to [`game::Game::receive_alarm`] once
/// the requested delay has passed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Countdown ticks
    Countdown(countdown::AlarmMessage),
    /// End of a wheel spin
    Wheel(wheel::AlarmMessage),
}

/// Failures shown to the host
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A request to the server failed or was refused
    #[error(transparent)]
    Api(#[from] api::Error),
    /// The countdown refused a change
    #[error(transparent)]
    Countdown(#[from] countdown::Error),
}

/// A truncated vector that maintains the exact count while limiting displayed items
///
/// Keeps long scoreboards cheap to send while still telling the view how
/// many teams there are in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[derive_where(Default)]
pub struct TruncatedVec<T> {
    /// The exact total count of items
    exact_count: usize,
    /// The truncated list of items (up to the limit)
    items: Vec<T>,
}

impl<T: Clone> TruncatedVec<T> {
    /// Creates a new truncated vector from an iterator
    ///
    /// # Arguments
    ///
    /// * `list` - An iterator over items to include
    /// * `limit` - Maximum number of items to include in the truncated vector
    /// * `exact_count` - The exact total count of items (may be larger than limit)
    pub fn new<I: Iterator<Item = T>>(list: I, limit: usize, exact_count: usize) -> Self {
        let items = list.take(limit).collect_vec();
        Self { exact_count, items }
    }

    /// Returns the exact count of items
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Returns the truncated items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}
