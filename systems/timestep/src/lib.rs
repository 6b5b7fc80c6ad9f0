#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep scheduler that decouples frame time from simulation time.
//!
//! Callers feed variable frame durations into [`FixedTimestep::advance`]. The
//! scheduler caps each frame to a maximum, accumulates the remainder, and
//! reports how many constant-size steps the simulation should execute. It has
//! no knowledge of what a step does, so any backend can be driven by it.

use std::time::Duration;

/// Events reported while advancing the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestepEvent {
    /// The supplied frame exceeded the maximum and was shortened.
    FrameClamped {
        /// Frame duration that was supplied.
        requested: Duration,
        /// Frame duration that was accumulated instead.
        applied: Duration,
    },
    /// One fixed-size step is due.
    Step {
        /// Zero-based index of the step since the scheduler was created.
        index: u64,
        /// Fixed duration of the step.
        dt: Duration,
    },
}

/// Accumulator that converts frame time into whole fixed steps.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: Duration,
    max_frame: Duration,
    accumulator: Duration,
    steps_taken: u64,
}

impl FixedTimestep {
    /// Creates a scheduler with the provided step size and per-frame cap.
    ///
    /// A zero step never produces steps.
    #[must_use]
    pub const fn new(step: Duration, max_frame: Duration) -> Self {
        Self {
            step,
            max_frame,
            accumulator: Duration::ZERO,
            steps_taken: 0,
        }
    }

    /// Creates a scheduler stepping `hz` times per simulated second.
    #[must_use]
    pub fn from_rate(hz: u32, max_frame: Duration) -> Self {
        let step = if hz == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(1_000_000_000 / u64::from(hz))
        };
        Self::new(step, max_frame)
    }

    /// Fixed duration of a single step.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Time accumulated but not yet consumed by a step.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Total number of steps emitted since creation.
    #[must_use]
    pub const fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Accumulates a frame and emits one [`TimestepEvent::Step`] per whole step due.
    ///
    /// Returns the number of steps emitted.
    pub fn advance(&mut self, frame_time: Duration, out: &mut Vec<TimestepEvent>) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        let applied = frame_time.min(self.max_frame);
        if applied < frame_time {
            out.push(TimestepEvent::FrameClamped {
                requested: frame_time,
                applied,
            });
        }

        self.accumulator = self.accumulator.saturating_add(applied);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            out.push(TimestepEvent::Step {
                index: self.steps_taken,
                dt: self.step,
            });
            self.steps_taken = self.steps_taken.saturating_add(1);
            steps += 1;
        }
        steps
    }
}
