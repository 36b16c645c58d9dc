//! Configuration constants for the party game
//!
//! This module contains the limits and fixed timings used throughout the
//! crate so that validation, scheduling and display agree on the same
//! boundaries.

/// Countdown timer configuration constants
pub mod countdown {
    /// Minimum configurable round duration in seconds
    pub const MIN_DURATION: u64 = 1;
    /// Maximum configurable round duration in seconds (99:59 on the display)
    pub const MAX_DURATION: u64 = 99 * 60 + 59;
    /// Round duration used until the host picks another one
    pub const DEFAULT_DURATION: u64 = 60;
    /// Granularity of the duration slider offered to the host
    pub const DURATION_STEP: u64 = 15;
    /// Seconds between two decrements of a running countdown
    pub const TICK_SECONDS: u64 = 1;
}

/// Wheel of fortune configuration constants
pub mod wheel {
    /// Length of the spin animation in seconds
    pub const SPIN_SECONDS: u64 = 3;
    /// Full turns performed before the random offset, in degrees
    pub const BASE_ROTATION: u32 = 5 * 360;
    /// Degrees in a full turn
    pub const FULL_TURN: u32 = 360;
}
