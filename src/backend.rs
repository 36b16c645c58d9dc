//! In-process word and score server
//!
//! A [`Transport`] that answers requests from memory instead of over the
//! network, following the same routes and reply shapes as the HTTP server.
//! Useful for demos without a server and for exercising the client.

use std::cell::{Cell, RefCell};

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    api::{AdjustRequest, Method, Request, Transport, TransportFailure},
    leaderboard::ScoreBoard,
    mode::GameMode,
};

/// Word lists per mode, as stored in `{"pictionary": [...], "mimic": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordBank(EnumMap<GameMode, Vec<String>>);

impl WordBank {
    /// Parses a word bank from JSON
    ///
    /// # Errors
    ///
    /// Returns the parse error if the JSON is not a word bank.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Words available for a mode
    pub fn words(&self, mode: GameMode) -> &[String] {
        &self.0[mode]
    }

    /// Adds words to a mode
    #[must_use]
    pub fn with_words<I, S>(mut self, mode: GameMode, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0[mode].extend(words.into_iter().map(Into::into));
        self
    }

    fn draw(&self, mode: GameMode) -> Option<&str> {
        let words = self.words(mode);
        if words.is_empty() {
            None
        } else {
            Some(words[fastrand::usize(..words.len())].as_str())
        }
    }
}

#[derive(Deserialize)]
struct TeamBody {
    #[serde(default)]
    team: Option<String>,
}

/// A server kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    words: WordBank,
    scores: RefCell<ScoreBoard>,
    offline: Cell<bool>,
    requests: Cell<usize>,
}

impl MemoryBackend {
    /// Creates a server with the given word bank and no teams
    pub fn new(words: WordBank) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    /// Replaces the stored scores
    #[must_use]
    pub fn with_scores(self, scores: ScoreBoard) -> Self {
        self.scores.replace(scores);
        self
    }

    /// The stored scores
    pub fn scores(&self) -> ScoreBoard {
        self.scores.borrow().clone()
    }

    /// Makes every following request fail as if the server were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Number of requests that reached the server
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    fn route(&self, request: &Request) -> serde_json::Value {
        let body = request.body.as_deref().unwrap_or("null");
        match (request.method, request.path.as_str()) {
            (Method::Get, path) if path.starts_with("/api/words/") => {
                let segment = &path["/api/words/".len()..];
                match GameMode::from_path_segment(segment).and_then(|mode| self.words.draw(mode)) {
                    Some(word) => json!({ "word": word }),
                    None => json!({ "error": "No words found for this mode" }),
                }
            }
            (Method::Get, "/api/scores") => json!(*self.scores.borrow()),
            (Method::Post, "/api/scores") => match serde_json::from_str::<ScoreBoard>(body) {
                Ok(scores) => self.store(scores),
                Err(_) => json!({ "error": "Invalid scores" }),
            },
            (Method::Patch, "/api/scores") => match serde_json::from_str::<AdjustRequest>(body) {
                Ok(AdjustRequest { team, delta }) => {
                    let adjusted = self.scores.borrow().adjusted(&team, delta);
                    match adjusted {
                        Ok(scores) => self.store(scores),
                        Err(_) => json!({ "error": "Team not found" }),
                    }
                }
                Err(_) => json!({ "error": "Invalid adjustment" }),
            },
            (method @ (Method::Post | Method::Delete), "/api/teams") => {
                let team = serde_json::from_str::<TeamBody>(body)
                    .ok()
                    .and_then(|body| body.team)
                    .filter(|team| !team.is_empty());
                let Some(team) = team else {
                    return json!({ "error": "Team name required" });
                };
                let exists = self.scores.borrow().contains(&team);
                match (method, exists) {
                    (Method::Post, false) => {
                        let scores = self.scores.borrow().with_team(&team);
                        self.store(scores)
                    }
                    (Method::Post, true) => json!({ "error": "Team already exists" }),
                    (_, true) => {
                        let scores = self.scores.borrow().without_team(&team);
                        self.store(scores)
                    }
                    (_, false) => json!({ "error": "Team not found" }),
                }
            }
            (Method::Post, "/api/reset") => {
                let scores = self.scores.borrow().zeroed();
                self.store(scores)
            }
            _ => json!({ "error": "Not found" }),
        }
    }

    fn store(&self, scores: ScoreBoard) -> serde_json::Value {
        let reply = json!({ "success": true, "scores": scores });
        self.scores.replace(scores);
        reply
    }
}

impl Transport for MemoryBackend {
    fn send(&self, request: &Request) -> Result<String, TransportFailure> {
        if self.offline.get() {
            return Err(TransportFailure("server unreachable".to_owned()));
        }
        self.requests.set(self.requests.get() + 1);
        log::debug!("{:?} {}", request.method, request.path);
        Ok(self.route(request).to_string())
    }
}
