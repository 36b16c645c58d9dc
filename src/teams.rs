//! Team roster management
//!
//! The roster is the key set of the scoreboard: adding a team creates it at
//! zero points and removing it drops its score. Names are checked locally
//! before anything is sent, and the server may still refuse a duplicate.

use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    api::{self, Client, Transport},
    leaderboard::{self, Leaderboard},
};

/// Errors that can occur when validating a team
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("team name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("team name is inappropriate")]
    Sinful,
    /// The team is not on the scoreboard
    #[error("team does not exist")]
    Unknown,
}

/// Checks a requested team name and returns it trimmed
///
/// # Errors
///
/// * `Error::Empty` - Name is empty after trimming whitespace
/// * `Error::Sinful` - `censor` is set and the name is inappropriate
pub fn validate_name(name: &str, censor: bool) -> Result<&str, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if censor && name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name)
}

/// Update messages about the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// A team joined; the name input can be cleared
    TeamAdded(String),
    /// A team left
    TeamRemoved(String),
}

/// Roster operations against the server
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamManager {
    /// Whether inappropriate team names are refused
    censor_names: bool,
}

impl TeamManager {
    /// Creates a roster manager
    ///
    /// # Arguments
    ///
    /// * `censor_names` - Whether to refuse inappropriate team names
    pub fn new(censor_names: bool) -> Self {
        Self { censor_names }
    }

    /// Adds a team at zero points
    ///
    /// Invalid names never reach the server. On success the scoreboard is
    /// replaced by the one the server returned.
    ///
    /// # Errors
    ///
    /// * `api::Error::Validation` - The name failed local validation
    /// * `api::Error::Rejected` - The server refused the team
    /// * `api::Error::Transport` - The server could not be reached
    pub fn add_team<T: Transport>(
        &self,
        client: &Client<T>,
        leaderboard: &mut Leaderboard,
        name: &str,
    ) -> Result<(UpdateMessage, leaderboard::UpdateMessage), api::Error> {
        let name = validate_name(name, self.censor_names)?;
        let scores = client.add_team(name)?;
        log::info!("team {name} added");
        Ok((
            UpdateMessage::TeamAdded(name.to_owned()),
            leaderboard.replace(scores),
        ))
    }

    /// Removes a team and its score
    ///
    /// # Errors
    ///
    /// * `api::Error::Rejected` - The server refused, for example an unknown team
    /// * `api::Error::Transport` - The server could not be reached
    pub fn remove_team<T: Transport>(
        &self,
        client: &Client<T>,
        leaderboard: &mut Leaderboard,
        name: &str,
    ) -> Result<(UpdateMessage, leaderboard::UpdateMessage), api::Error> {
        let scores = client.remove_team(name)?;
        log::info!("team {name} removed");
        Ok((
            UpdateMessage::TeamRemoved(name.to_owned()),
            leaderboard.replace(scores),
        ))
    }
}
