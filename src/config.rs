//! Game options
//!
//! Options are usually loaded from JSON, where every field is optional and
//! falls back to its default, then validated against the limits in
//! [`crate::constants`].

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants, leaderboard::ScoreUpdate, wheel::SpinOutcome};

/// Errors that can occur while loading options
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text is not valid options JSON
    #[error("cannot parse options: {0}")]
    Parse(String),
    /// A value is outside of its allowed range
    #[error("invalid options: {0}")]
    Invalid(String),
}

/// Options for a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Round length in seconds
    #[garde(range(
        min = constants::countdown::MIN_DURATION,
        max = constants::countdown::MAX_DURATION
    ))]
    pub timer_duration: u64,
    /// How score changes are sent to the server
    #[garde(skip)]
    pub score_update: ScoreUpdate,
    /// How the wheel picks a mode
    #[garde(skip)]
    pub spin_outcome: SpinOutcome,
    /// Whether inappropriate team names are refused
    #[garde(skip)]
    pub censor_team_names: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timer_duration: constants::countdown::DEFAULT_DURATION,
            score_update: ScoreUpdate::default(),
            spin_outcome: SpinOutcome::default(),
            censor_team_names: false,
        }
    }
}

impl Options {
    /// Parses and validates options from JSON
    ///
    /// # Errors
    ///
    /// * `Error::Parse` - The JSON is malformed or has unknown values
    /// * `Error::Invalid` - A value is outside of its allowed range
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;
        options
            .validate()
            .map_err(|report| Error::Invalid(report.to_string()))?;
        Ok(options)
    }
}
