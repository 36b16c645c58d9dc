//! Wheel of fortune
//!
//! The random way into a round: the wheel spins for a fixed time and then
//! settles on one of the two modes. The trigger is locked while the wheel is
//! turning so a second spin cannot start on top of the first one. Picking a
//! mode by hand cancels a pending spin; its alarm is then ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{constants::wheel, mode::GameMode};

/// How the wheel decides the mode once it stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// The mode under the pointer wins
    #[default]
    LandingAngle,
    /// A separate coin flip decides, whatever the wheel shows
    Independent,
}

/// Errors that can occur when spinning the wheel
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The previous spin has not finished yet
    #[error("the wheel is already spinning")]
    AlreadySpinning,
}

/// Alarm messages for the spin animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The spin animation has finished
    SpinFinished {
        /// Total rotation of the spin in degrees
        rotation: u32,
        /// Generation the spin was started under
        generation: u64,
    },
}

/// Update messages about the wheel
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateMessage {
    /// The wheel started turning; the trigger is disabled
    Spinning {
        /// Total rotation to animate, in degrees
        rotation: u32,
        /// Length of the animation
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        duration: web_time::Duration,
    },
    /// The wheel stopped; the trigger is enabled again
    Stopped {
        /// The mode the wheel settled on
        mode: GameMode,
    },
}

/// Spin state of the wheel
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wheel {
    spinning: bool,
    rotation: u32,
    generation: u64,
}

impl Wheel {
    /// Whether a spin is in progress
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Rotation of the last spin in degrees
    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    /// Starts a spin of several full turns plus a uniform random offset
    ///
    /// The end of the animation is scheduled through `schedule_message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadySpinning`] if the previous spin is still running.
    pub fn spin<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: &mut S,
    ) -> Result<UpdateMessage, Error> {
        if self.spinning {
            return Err(Error::AlreadySpinning);
        }
        let rotation = wheel::BASE_ROTATION + fastrand::u32(0..wheel::FULL_TURN);
        let duration = web_time::Duration::from_secs(wheel::SPIN_SECONDS);
        self.generation += 1;
        self.spinning = true;
        self.rotation = rotation;
        log::debug!("wheel spinning to {rotation} degrees");
        schedule_message(
            AlarmMessage::SpinFinished {
                rotation,
                generation: self.generation,
            }
            .into(),
            duration,
        );
        Ok(UpdateMessage::Spinning { rotation, duration })
    }

    /// Abandons a pending spin so that its alarm changes nothing
    ///
    /// Returns `false` if the wheel was not spinning.
    pub fn cancel(&mut self) -> bool {
        if !self.spinning {
            return false;
        }
        self.generation += 1;
        self.spinning = false;
        log::debug!("wheel spin cancelled");
        true
    }

    /// Settles the wheel when its spin alarm comes due
    ///
    /// Returns `None` if the alarm belongs to a cancelled or finished spin.
    pub fn receive_alarm(
        &mut self,
        message: &AlarmMessage,
        outcome: SpinOutcome,
    ) -> Option<GameMode> {
        let AlarmMessage::SpinFinished {
            rotation,
            generation,
        } = *message;
        if generation != self.generation || !self.spinning {
            return None;
        }
        self.spinning = false;
        let mode = match outcome {
            SpinOutcome::LandingAngle => GameMode::from_landing_angle(rotation),
            SpinOutcome::Independent => {
                if fastrand::bool() {
                    GameMode::Drawing
                } else {
                    GameMode::Mimicry
                }
            }
        };
        log::debug!("wheel stopped on {mode}");
        Some(mode)
    }
}
