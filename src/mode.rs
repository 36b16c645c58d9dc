//! Game modes and how they are chosen
//!
//! A round is played either by drawing the word or by miming it. The mode
//! decides which word list the server draws from and how the round is
//! presented on screen.

use std::fmt::Display;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::constants;

/// The category of play for the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum GameMode {
    /// Sketch the word for the team to guess
    #[serde(rename = "pictionary")]
    Drawing,
    /// Act the word out without speaking
    #[serde(rename = "mimic")]
    Mimicry,
}

impl GameMode {
    /// Both modes, in wheel order
    pub const ALL: [GameMode; 2] = [GameMode::Drawing, GameMode::Mimicry];

    /// Path segment used by the word provider, as in `/api/words/{segment}`
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Drawing => "pictionary",
            Self::Mimicry => "mimic",
        }
    }

    /// Parses a path segment back into a mode
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.path_segment() == segment)
    }

    /// Human readable label shown while the mode is active
    pub fn label(self) -> &'static str {
        match self {
            Self::Drawing => "🎨 DRAWING",
            Self::Mimicry => "🎭 MIMICRY",
        }
    }

    /// Background accent used to tint the round area
    pub fn accent(self) -> &'static str {
        match self {
            Self::Drawing => "rgba(255, 102, 0, 0.2)",
            Self::Mimicry => "rgba(102, 0, 204, 0.2)",
        }
    }

    /// Maps the resting angle of the wheel to the slice it points at
    ///
    /// The drawing slice covers `[0, 180)` degrees and the mimicry slice the
    /// other half. Angles beyond a full turn are normalized first.
    pub fn from_landing_angle(degrees: u32) -> Self {
        if degrees % constants::wheel::FULL_TURN < constants::wheel::FULL_TURN / 2 {
            Self::Drawing
        } else {
            Self::Mimicry
        }
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Which selection view the host is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Spin the wheel and let chance decide
    #[default]
    Wheel,
    /// Pick the mode directly
    Manual,
}

/// Display metadata sent when a mode becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeDisplay {
    /// The mode itself
    pub mode: GameMode,
    /// Label from [`GameMode::label`]
    pub label: &'static str,
    /// Accent from [`GameMode::accent`]
    pub accent: &'static str,
}

impl From<GameMode> for ModeDisplay {
    fn from(mode: GameMode) -> Self {
        Self {
            mode,
            label: mode.label(),
            accent: mode.accent(),
        }
    }
}
