//! Tunable parameters for the world simulation.

use std::time::Duration;

use serde::Deserialize;
use valley_core::ItemKind;

use crate::{placement::PlacementRegistry, WorldError};

/// Complete world configuration. Every field falls back to its default when omitted.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Crop and obstacle timers.
    pub timing: TimingConfig,
    /// Fixed-step physics parameters.
    pub physics: PhysicsConfig,
    /// Post-placement hidden item distribution.
    pub hidden_items: HiddenItemConfig,
    /// Type-id factory registrations used by the placement builder.
    pub placement: PlacementRegistry,
}

impl WorldConfig {
    pub(crate) fn validate(&self) -> Result<(), WorldError> {
        ensure_period("timing.grow_secs", self.timing.grow_secs)?;
        ensure_period("timing.rot_secs", self.timing.rot_secs)?;
        let _ = ensure_duration("timing.disturbed_secs", self.timing.disturbed_secs)?;
        ensure_period("physics.max_frame_secs", self.physics.max_frame_secs)?;
        ensure_positive("physics.actor_radius", self.physics.actor_radius)?;
        ensure_non_negative("physics.move_speed", self.physics.move_speed)?;

        if self.physics.step_hz == 0 {
            return Err(WorldError::InvalidConfig(
                "physics.step_hz must be at least 1".to_owned(),
            ));
        }
        if self.physics.actor_radius > 0.5 {
            return Err(WorldError::InvalidConfig(
                "physics.actor_radius must fit inside a tile".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Durations driving the crop and obstacle state machines.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds a crop spends as a seed and as a sprout.
    pub grow_secs: f32,
    /// Seconds a mature crop survives before rotting.
    pub rot_secs: f32,
    /// Seconds an obstacle jitters after a blow.
    pub disturbed_secs: f32,
}

impl TimingConfig {
    /// Time a crop spends in each growing stage.
    #[must_use]
    pub fn grow(&self) -> Duration {
        seconds(self.grow_secs)
    }

    /// Time a mature crop survives unharvested.
    #[must_use]
    pub fn rot(&self) -> Duration {
        seconds(self.rot_secs)
    }

    /// Cosmetic jitter window after a blow.
    #[must_use]
    pub fn disturbed(&self) -> Duration {
        seconds(self.disturbed_secs)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            grow_secs: 5.0,
            rot_secs: 15.0,
            disturbed_secs: 0.2,
        }
    }
}

/// Parameters of the fixed-step physics adapter.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Physics steps per simulated second.
    pub step_hz: u32,
    /// Longest frame the accumulator accepts before clamping.
    pub max_frame_secs: f32,
    /// Velocity solver iterations per step.
    pub velocity_iterations: u32,
    /// Position correction iterations per step.
    pub position_iterations: u32,
    /// Radius of the actor's circular body in tiles.
    pub actor_radius: f32,
    /// Walking speed in tiles per second.
    pub move_speed: f32,
}

impl PhysicsConfig {
    /// Longest frame the accumulator accepts.
    #[must_use]
    pub fn max_frame(&self) -> Duration {
        seconds(self.max_frame_secs)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            step_hz: 60,
            max_frame_secs: 0.25,
            velocity_iterations: 6,
            position_iterations: 2,
            actor_radius: 0.3,
            move_speed: 2.0,
        }
    }
}

/// Controls which items get buried under obstacles after placement.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HiddenItemConfig {
    /// Seed of the shuffle choosing obstacle tiles.
    pub seed: u64,
    /// Kinds hidden once each, in priority order.
    pub required: Vec<ItemKind>,
}

impl Default for HiddenItemConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_7a11_e9da_7001,
            required: vec![ItemKind::Shovel, ItemKind::WateringCan],
        }
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

/// Rejects values `Duration` cannot represent as well as zero-length periods.
fn ensure_period(field: &str, value: f32) -> Result<(), WorldError> {
    if ensure_duration(field, value)?.is_zero() {
        return Err(WorldError::InvalidConfig(format!(
            "{field} must be a positive number of seconds, got {value}"
        )));
    }
    Ok(())
}

fn ensure_duration(field: &str, value: f32) -> Result<Duration, WorldError> {
    Duration::try_from_secs_f32(value).map_err(|error| {
        WorldError::InvalidConfig(format!(
            "{field} is not a usable number of seconds ({value}): {error}"
        ))
    })
}

fn ensure_positive(field: &str, value: f32) -> Result<(), WorldError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidConfig(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

fn ensure_non_negative(field: &str, value: f32) -> Result<(), WorldError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidConfig(format!(
            "{field} must be finite and non-negative, got {value}"
        )))
    }
}
