//! Presentation session
//!
//! This module defines the trait through which the game reaches whatever
//! draws it: a web page, a terminal, or a test recorder. The game only
//! decides what changed; the tunnel decides how it looks and sounds.

use serde::Serialize;

use super::{Error, SyncMessage, UpdateMessage};

/// Questions the host must confirm before a destructive action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Confirmation {
    /// Remove a team and its score
    RemoveTeam(String),
    /// Set every score back to zero
    ResetScores,
}

/// Trait for presenting the game to the host
pub trait Tunnel {
    /// Sends an update about something that changed
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to present
    fn send_message(&self, message: &UpdateMessage);

    /// Sends the whole current state, for a view attaching late
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to present
    fn send_state(&self, state: &SyncMessage);

    /// Shows a blocking notification about a failed action
    fn alert(&self, error: &Error);

    /// Asks the host to confirm an action; `false` cancels it
    fn confirm(&self, question: &Confirmation) -> bool;

    /// Plays the time's-up sound
    ///
    /// Failures are reported back but never shown to the host.
    ///
    /// # Errors
    ///
    /// A description of why the sound could not be played.
    fn ring_alarm(&self) -> Result<(), String> {
        Ok(())
    }
}
