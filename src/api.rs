//! HTTP contract with the word and score server
//!
//! The crate does not open connections itself. A [`Transport`] carries a
//! [`Request`] to the server and hands back the raw response body; the
//! [`Client`] builds the requests for each endpoint and turns the JSON
//! replies into typed results. Anything that cannot be parsed is treated as
//! a connection failure.

use derive_where::derive_where;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{leaderboard::ScoreBoard, mode::GameMode, teams};

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

/// A request ready to be sent by a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path relative to the server root, starting with `/`
    pub path: String,
    /// UTF-8 JSON body, if any
    pub body: Option<String>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    fn with_json<B: Serialize>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_string(body).expect("default serializer cannot fail"));
        self
    }
}

/// The request could not be delivered or no body came back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportFailure(pub String);

/// Carries requests to the server
///
/// Implementations might use a blocking HTTP client, the browser's fetch
/// API, or an in-process server. Non-success HTTP statuses are not failures
/// here: the body is returned and its JSON shape decides the outcome.
pub trait Transport {
    /// Sends a request and returns the response body
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure`] if the server could not be reached.
    fn send(&self, request: &Request) -> Result<String, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<String, TransportFailure> {
        (**self).send(request)
    }
}

/// Errors surfaced to the user for a failed action
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input was rejected before anything was sent
    #[error(transparent)]
    Validation(#[from] teams::Error),
    /// The server refused the request; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),
    /// The server could not be reached or answered with something unreadable
    #[error("connection error")]
    Transport,
    /// The word provider did not return a word
    #[error("could not fetch a word")]
    MissingWord,
}

impl From<TransportFailure> for Error {
    fn from(_: TransportFailure) -> Self {
        Self::Transport
    }
}

/// Reply of `GET /api/words/{mode}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordResponse {
    /// The drawn word; absent when the mode has no words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Reason given by the server when no word is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply of every endpoint that changes the scoreboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoresResponse {
    /// Whether the change was applied
    #[serde(default)]
    pub success: bool,
    /// The scoreboard after the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreBoard>,
    /// Reason for a refusal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of the roster endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRequest {
    /// Name of the team to add or remove
    pub team: String,
}

/// Body of `PATCH /api/scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustRequest {
    /// Team whose score changes
    pub team: String,
    /// Points to add; negative to subtract
    pub delta: i64,
}

/// Typed client for the server endpoints
#[derive_where(Debug)]
pub struct Client<T> {
    #[derive_where(skip)]
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Wraps a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call<R: DeserializeOwned>(&self, request: &Request) -> Result<R, Error> {
        let body = self.transport.send(request).inspect_err(|failure| {
            log::warn!("{:?} {} not delivered: {failure}", request.method, request.path);
        })?;
        serde_json::from_str(&body).map_err(|e| {
            log::warn!("unreadable reply to {:?} {}: {e}", request.method, request.path);
            Error::Transport
        })
    }

    fn call_scores(&self, request: &Request) -> Result<ScoreBoard, Error> {
        let response: ScoresResponse = self.call(request)?;
        match response {
            ScoresResponse {
                success: true,
                scores: Some(scores),
                ..
            } => Ok(scores),
            ScoresResponse { success: true, .. } => {
                log::warn!("{} succeeded without returning scores", request.path);
                Err(Error::Transport)
            }
            ScoresResponse { error, .. } => Err(Error::Rejected(
                error.unwrap_or_else(|| "request rejected".to_owned()),
            )),
        }
    }

    /// Draws a word for the given mode
    ///
    /// # Errors
    ///
    /// * `Error::MissingWord` - The reply has no word, or an empty one
    /// * `Error::Transport` - The server could not be reached or the reply was unreadable
    pub fn word(&self, mode: GameMode) -> Result<String, Error> {
        let request = Request::new(Method::Get, format!("/api/words/{}", mode.path_segment()));
        let response: WordResponse = self.call(&request)?;
        match response.word {
            Some(word) if !word.trim().is_empty() => Ok(word),
            _ => {
                log::warn!(
                    "no word for {mode}: {}",
                    response.error.as_deref().unwrap_or("empty reply")
                );
                Err(Error::MissingWord)
            }
        }
    }

    /// Fetches the whole scoreboard
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the server could not be reached or the
    /// reply was not a scoreboard.
    pub fn scores(&self) -> Result<ScoreBoard, Error> {
        self.call(&Request::new(Method::Get, "/api/scores"))
    }

    /// Replaces the whole scoreboard and returns the stored one
    ///
    /// # Errors
    ///
    /// `Error::Rejected` or `Error::Transport`.
    pub fn save_scores(&self, scores: &ScoreBoard) -> Result<ScoreBoard, Error> {
        self.call_scores(&Request::new(Method::Post, "/api/scores").with_json(scores))
    }

    /// Applies a score change on the server and returns the stored scoreboard
    ///
    /// # Errors
    ///
    /// `Error::Rejected` or `Error::Transport`.
    pub fn adjust_score(&self, team: &str, delta: i64) -> Result<ScoreBoard, Error> {
        let body = AdjustRequest {
            team: team.to_owned(),
            delta,
        };
        self.call_scores(&Request::new(Method::Patch, "/api/scores").with_json(&body))
    }

    /// Adds a team at zero points
    ///
    /// # Errors
    ///
    /// `Error::Rejected` (for example a duplicate name) or `Error::Transport`.
    pub fn add_team(&self, team: &str) -> Result<ScoreBoard, Error> {
        let body = TeamRequest {
            team: team.to_owned(),
        };
        self.call_scores(&Request::new(Method::Post, "/api/teams").with_json(&body))
    }

    /// Removes a team
    ///
    /// # Errors
    ///
    /// `Error::Rejected` or `Error::Transport`.
    pub fn remove_team(&self, team: &str) -> Result<ScoreBoard, Error> {
        let body = TeamRequest {
            team: team.to_owned(),
        };
        self.call_scores(&Request::new(Method::Delete, "/api/teams").with_json(&body))
    }

    /// Sets every score to zero
    ///
    /// # Errors
    ///
    /// `Error::Rejected` or `Error::Transport`.
    pub fn reset_scores(&self) -> Result<ScoreBoard, Error> {
        self.call_scores(&Request::new(Method::Post, "/api/reset"))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replies with canned bodies and records what was sent
    #[derive(Default)]
    struct Canned {
        replies: RefCell<Vec<Result<String, TransportFailure>>>,
        sent: RefCell<Vec<Request>>,
    }

    impl Canned {
        fn replying(body: &str) -> Self {
            let canned = Self::default();
            canned.replies.borrow_mut().push(Ok(body.to_owned()));
            canned
        }

        fn failing() -> Self {
            let canned = Self::default();
            canned
                .replies
                .borrow_mut()
                .push(Err(TransportFailure("connection refused".to_owned())));
            canned
        }
    }

    impl Transport for Canned {
        fn send(&self, request: &Request) -> Result<String, TransportFailure> {
            self.sent.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(TransportFailure("no reply".to_owned())))
        }
    }

    #[test]
    fn test_word_request_path() {
        let client = Client::new(Canned::replying(r#"{"word": "cat"}"#));
        assert_eq!(client.word(GameMode::Drawing), Ok("cat".to_string()));

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/api/words/pictionary");
        assert_eq!(sent[0].body, None);
    }

    #[test]
    fn test_word_missing_or_empty() {
        for body in [r"{}", r#"{"error": "No words found for this mode"}"#, r#"{"word": "  "}"#] {
            let client = Client::new(Canned::replying(body));
            assert_eq!(client.word(GameMode::Mimicry), Err(Error::MissingWord));
        }
    }

    #[test]
    fn test_unreadable_reply_is_transport_error() {
        let client = Client::new(Canned::replying("<html>502 Bad Gateway</html>"));
        assert_eq!(client.word(GameMode::Mimicry), Err(Error::Transport));

        let client = Client::new(Canned::replying("<html>502 Bad Gateway</html>"));
        assert_eq!(client.scores(), Err(Error::Transport));
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        let client = Client::new(Canned::failing());
        assert_eq!(client.reset_scores(), Err(Error::Transport));
    }

    #[test]
    fn test_transport_failure_converts_to_connection_error() {
        let error = Error::from(TransportFailure("connection refused".to_owned()));
        assert_eq!(error, Error::Transport);
        assert_eq!(error.to_string(), "connection error");
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let client = Client::new(Canned::replying(r#"{"error": "Team already exists"}"#));
        assert_eq!(
            client.add_team("Red"),
            Err(Error::Rejected("Team already exists".to_string()))
        );
        assert_eq!(
            Error::Rejected("Team already exists".to_string()).to_string(),
            "Team already exists"
        );
    }

    #[test]
    fn test_success_without_scores_is_transport_error() {
        let client = Client::new(Canned::replying(r#"{"success": true}"#));
        assert_eq!(client.reset_scores(), Err(Error::Transport));
    }

    #[test]
    fn test_request_bodies() {
        let reply = r#"{"success": true, "scores": {}}"#;

        let client = Client::new(Canned::replying(reply));
        client.remove_team("Red").unwrap();
        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Delete);
        assert_eq!(sent[0].path, "/api/teams");
        let body: TeamRequest = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body.team, "Red");

        let client = Client::new(Canned::replying(reply));
        client.adjust_score("Red", -2).unwrap();
        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Patch);
        let body: AdjustRequest = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body.delta, -2);
    }

    #[test]
    fn test_save_scores_sends_full_mapping() {
        let client = Client::new(Canned::replying(
            r#"{"success": true, "scores": {"Red": 2}}"#,
        ));
        let scores: ScoreBoard = [("Red", 2)].into_iter().collect();
        assert_eq!(client.save_scores(&scores), Ok(scores.clone()));

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"Red":2}"#));
    }
}
