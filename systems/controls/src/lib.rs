#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating resolved frame input into world commands.
//!
//! Adapters poll their control scheme, reduce it to a [`ControlInput`], and
//! hand it to [`Controls::handle`] once per frame together with the frame
//! duration. Holding the clear input re-issues
//! [`Interaction::ClearObstacle`] on a fixed cooldown so the world only ever
//! sees discrete commands.

use std::time::Duration;

use serde::Deserialize;
use valley_core::{Command, Direction, Interaction};

/// Tunables for the controls system.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Milliseconds between repeated clear commands while the clear input is held.
    pub clear_cooldown_ms: u64,
}

impl ControlsConfig {
    /// Cooldown between repeated clear commands.
    #[must_use]
    pub const fn clear_cooldown(&self) -> Duration {
        Duration::from_millis(self.clear_cooldown_ms)
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            clear_cooldown_ms: 300,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Direction currently held, if any.
    pub movement: Option<Direction>,
    /// Interaction pressed on this frame, if any.
    pub action: Option<Interaction>,
    /// Indicates whether the clear input is held down.
    pub clear_held: bool,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        movement: Option<Direction>,
        action: Option<Interaction>,
        clear_held: bool,
    ) -> Self {
        Self {
            movement,
            action,
            clear_held,
        }
    }
}

/// Controls system that turns frame input into steering and interaction commands.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    config: ControlsConfig,
    clear_cooldown: Duration,
}

impl Controls {
    /// Creates a controls system using the provided configuration.
    #[must_use]
    pub const fn new(config: ControlsConfig) -> Self {
        Self {
            config,
            clear_cooldown: Duration::ZERO,
        }
    }

    /// Time left before a held clear input fires again.
    #[must_use]
    pub const fn clear_cooldown(&self) -> Duration {
        self.clear_cooldown
    }

    /// Emits the commands for one frame of input.
    ///
    /// Steering is emitted every frame so the world always reflects the held
    /// direction, even right after a map reload.
    pub fn handle(&mut self, input: &ControlInput, dt: Duration, out: &mut Vec<Command>) {
        out.push(Command::SteerActor {
            direction: input.movement,
        });

        let pressed_clear = input.action == Some(Interaction::ClearObstacle);
        if let Some(interaction) = input.action {
            out.push(Command::Interact { interaction });
        }

        if !input.clear_held {
            self.clear_cooldown = Duration::ZERO;
            return;
        }

        if pressed_clear {
            self.clear_cooldown = self.config.clear_cooldown();
            return;
        }

        self.clear_cooldown = self.clear_cooldown.saturating_sub(dt);
        if self.clear_cooldown.is_zero() {
            out.push(Command::Interact {
                interaction: Interaction::ClearObstacle,
            });
            self.clear_cooldown = self.config.clear_cooldown();
        }
    }
}
