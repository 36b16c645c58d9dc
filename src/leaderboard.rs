//! Scoreboard and scoring functionality
//!
//! The authoritative scores live on the server. This module holds the
//! transient copy used for rendering, the pure transformations applied to a
//! scoreboard, and the client operations that fetch, adjust and reset the
//! remote scores.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    TruncatedVec,
    api::{self, Client, Transport},
    teams,
};

/// Mapping from team name to its non-negative score
///
/// Serialized as a plain JSON object, which is the shape the server sends
/// and accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard(BTreeMap<String, u64>);

impl<S: Into<String>> FromIterator<(S, u64)> for ScoreBoard {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(team, score)| (team.into(), score)).collect())
    }
}

impl ScoreBoard {
    /// Score of a team, if it exists
    pub fn get(&self, team: &str) -> Option<u64> {
        self.0.get(team).copied()
    }

    /// Whether a team is on the board
    pub fn contains(&self, team: &str) -> bool {
        self.0.contains_key(team)
    }

    /// Number of teams
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the board has no teams
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Team names in alphabetical order
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(team, score)| (team.as_str(), *score))
    }

    /// Returns a copy with `delta` applied to `team`, clamped at zero
    ///
    /// # Errors
    ///
    /// Returns [`teams::Error::Unknown`] if the team is not on the board.
    pub fn adjusted(&self, team: &str, delta: i64) -> Result<Self, teams::Error> {
        let mut next = self.clone();
        let score = next.0.get_mut(team).ok_or(teams::Error::Unknown)?;
        *score = score.saturating_add_signed(delta);
        Ok(next)
    }

    /// Returns a copy with a new team at zero points, if it is not there yet
    pub fn with_team(&self, team: &str) -> Self {
        let mut next = self.clone();
        next.0.entry(team.to_owned()).or_default();
        next
    }

    /// Returns a copy without the given team
    pub fn without_team(&self, team: &str) -> Self {
        let mut next = self.clone();
        next.0.remove(team);
        next
    }

    /// Returns a copy with every team back at zero
    pub fn zeroed(&self) -> Self {
        self.0.keys().map(|team| (team.as_str(), 0)).collect()
    }

    /// Teams ordered by descending score, ties broken alphabetically
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        self.iter()
            .sorted_by(|(a_team, a_score), (b_team, b_score)| {
                b_score.cmp(a_score).then_with(|| a_team.cmp(b_team))
            })
            .collect_vec()
    }

    /// Who is ahead, if anybody has scored
    pub fn standing(&self) -> Option<Standing> {
        let top = self.0.values().copied().max().filter(|top| *top > 0)?;
        let mut leaders = self
            .iter()
            .filter(|(_, score)| *score == top)
            .map(|(team, _)| team.to_owned())
            .collect_vec();

        Some(if leaders.len() == 1 {
            Standing::Leader {
                team: leaders.remove(0),
                points: top,
            }
        } else {
            Standing::Tie {
                teams: leaders,
                points: top,
            }
        })
    }
}

/// The top of the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Standing {
    /// A single team has the highest score
    Leader {
        /// The leading team
        team: String,
        /// Its score
        points: u64,
    },
    /// Several teams share the highest score
    Tie {
        /// The tied teams in alphabetical order
        teams: Vec<String>,
        /// Their shared score
        points: u64,
    },
}

/// How a score change reaches the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreUpdate {
    /// Fetch the scores, apply the change locally and send the whole board
    ///
    /// Works with the plain `GET`/`POST /api/scores` routes. Concurrent
    /// adjustments can overwrite each other; the last write wins.
    #[default]
    ReadModifyWrite,
    /// Send only the change with `PATCH /api/scores` and let the server
    /// apply it
    ///
    /// Only for servers that expose the delta route.
    Delta,
}

/// Scoreboard message for the rendering side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardMessage {
    /// Teams ranked by score
    pub ranked: TruncatedVec<(String, u64)>,
    /// The current leader or tie
    pub standing: Option<Standing>,
}

/// Update messages about the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// The scoreboard should be redrawn
    Scores(LeaderboardMessage),
}

/// Client-side copy of the remote scoreboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    cached: ScoreBoard,
}

impl Leaderboard {
    /// The last scoreboard confirmed by the server
    pub fn scores(&self) -> &ScoreBoard {
        &self.cached
    }

    /// Replaces the cached copy with a confirmed scoreboard
    pub fn replace(&mut self, scores: ScoreBoard) -> UpdateMessage {
        self.cached = scores;
        self.message()
    }

    /// Ranking and standing of the cached scoreboard
    pub fn summary(&self) -> LeaderboardMessage {
        const LIMIT: usize = 50;

        let ranked = self.cached.ranked();
        LeaderboardMessage {
            ranked: TruncatedVec::new(
                ranked
                    .iter()
                    .map(|(team, score)| ((*team).to_owned(), *score)),
                LIMIT,
                ranked.len(),
            ),
            standing: self.cached.standing(),
        }
    }

    /// Message describing the cached scoreboard
    pub fn message(&self) -> UpdateMessage {
        UpdateMessage::Scores(self.summary())
    }

    /// Fetches the whole scoreboard and replaces the cached copy
    ///
    /// # Errors
    ///
    /// Any [`api::Error`] from the request.
    pub fn load<T: Transport>(&mut self, client: &Client<T>) -> Result<UpdateMessage, api::Error> {
        let scores = client.scores()?;
        Ok(self.replace(scores))
    }

    /// Changes a team's score by `delta`, never going below zero
    ///
    /// The cached copy is only replaced by the scoreboard the server
    /// confirms.
    ///
    /// # Errors
    ///
    /// * `api::Error::Validation` - The team is not on the authoritative board
    /// * Any other [`api::Error`] from the requests
    pub fn adjust<T: Transport>(
        &mut self,
        client: &Client<T>,
        strategy: ScoreUpdate,
        team: &str,
        delta: i64,
    ) -> Result<UpdateMessage, api::Error> {
        let confirmed = match strategy {
            ScoreUpdate::Delta => client.adjust_score(team, delta)?,
            ScoreUpdate::ReadModifyWrite => {
                let latest = client.scores()?;
                client.save_scores(&latest.adjusted(team, delta)?)?
            }
        };
        log::debug!("score of {team} adjusted by {delta}");
        Ok(self.replace(confirmed))
    }

    /// Sets every score back to zero on the server
    ///
    /// # Errors
    ///
    /// Any [`api::Error`] from the request.
    pub fn reset<T: Transport>(&mut self, client: &Client<T>) -> Result<UpdateMessage, api::Error> {
        let confirmed = client.reset_scores()?;
        log::info!("scores reset for {} teams", confirmed.len());
        Ok(self.replace(confirmed))
    }
}
