//! Entity records owned by the world and their per-entity state machines.

use std::time::Duration;

use valley_core::{
    CropSnapshot, CropStage, DecorationKind, ItemKind, ObstacleMaterial, ObstacleSnapshot,
    StructureKind, TileCoord,
};

use crate::physics::StaticVolume;

/// Destructible grid feature blocking movement until cleared.
#[derive(Clone, Debug)]
pub(crate) struct Obstacle {
    pub(crate) material: ObstacleMaterial,
    pub(crate) durability: u32,
    /// Remaining cosmetic jitter window. Never affects durability.
    pub(crate) disturbed: Duration,
    pub(crate) volume: StaticVolume,
}

/// Result of striking an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strike {
    /// The obstacle survived with the given durability.
    Hit { remaining: u32 },
    /// Durability reached zero.
    Broken,
}

impl Obstacle {
    pub(crate) fn new(material: ObstacleMaterial, volume: StaticVolume) -> Self {
        Self {
            material,
            durability: material.starting_durability(),
            disturbed: Duration::ZERO,
            volume,
        }
    }

    pub(crate) fn strike(&mut self, damage: u32, jitter: Duration) -> Strike {
        self.durability = self.durability.saturating_sub(damage);
        if self.durability == 0 {
            Strike::Broken
        } else {
            self.disturbed = jitter;
            Strike::Hit {
                remaining: self.durability,
            }
        }
    }

    pub(crate) fn settle(&mut self, dt: Duration) {
        self.disturbed = self.disturbed.saturating_sub(dt);
    }

    pub(crate) fn snapshot(&self, tile: TileCoord) -> ObstacleSnapshot {
        ObstacleSnapshot {
            tile,
            material: self.material,
            durability: self.durability,
            disturbed: !self.disturbed.is_zero(),
        }
    }
}

/// Planted crop with a growth and rot timer.
#[derive(Clone, Debug)]
pub(crate) struct Crop {
    stage: CropStage,
    elapsed: Duration,
}

impl Crop {
    pub(crate) const fn seed() -> Self {
        Self {
            stage: CropStage::Seed,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) const fn stage(&self) -> CropStage {
        self.stage
    }

    /// Advances the stage timer and returns the stage entered, if any.
    ///
    /// The timer resets on every transition, so a single call moves the crop
    /// at most one stage forward.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        grow: Duration,
        rot: Duration,
    ) -> Option<CropStage> {
        if self.stage == CropStage::Rotten {
            return None;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        let next = match self.stage {
            CropStage::Seed if self.elapsed >= grow => CropStage::Sprout,
            CropStage::Sprout if self.elapsed >= grow => CropStage::Mature,
            CropStage::Mature if self.elapsed >= rot => CropStage::Rotten,
            _ => return None,
        };

        self.stage = next;
        self.elapsed = Duration::ZERO;
        Some(next)
    }

    /// Sends a rotten crop back to seed. Other stages are left untouched.
    pub(crate) fn restore(&mut self) -> bool {
        if self.stage != CropStage::Rotten {
            return false;
        }
        self.stage = CropStage::Seed;
        self.elapsed = Duration::ZERO;
        true
    }

    pub(crate) fn snapshot(&self, tile: TileCoord) -> CropSnapshot {
        CropSnapshot {
            tile,
            stage: self.stage,
            stage_elapsed: self.elapsed,
        }
    }
}

/// Item lying on the ground waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GroundItem {
    pub(crate) tile: TileCoord,
    pub(crate) kind: ItemKind,
}

/// Indestructible collision-bearing feature.
#[derive(Clone, Debug)]
pub(crate) struct Structure {
    pub(crate) kind: StructureKind,
    pub(crate) volume: StaticVolume,
}

/// Walkable presentation-only feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Decoration {
    pub(crate) kind: DecorationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROW: Duration = Duration::from_secs(5);
    const ROT: Duration = Duration::from_secs(15);

    #[test]
    fn crop_walks_every_stage_in_order() {
        let mut crop = Crop::seed();
        assert_eq!(crop.advance(GROW, GROW, ROT), Some(CropStage::Sprout));
        assert_eq!(crop.advance(GROW, GROW, ROT), Some(CropStage::Mature));
        assert_eq!(crop.advance(ROT, GROW, ROT), Some(CropStage::Rotten));
        assert_eq!(crop.advance(ROT, GROW, ROT), None);
        assert_eq!(crop.stage(), CropStage::Rotten);
    }

    #[test]
    fn huge_ticks_never_skip_sprout() {
        let mut crop = Crop::seed();
        assert_eq!(
            crop.advance(Duration::from_secs(600), GROW, ROT),
            Some(CropStage::Sprout)
        );
        assert_eq!(crop.snapshot(TileCoord::new(0, 0)).stage_elapsed, Duration::ZERO);
    }

    #[test]
    fn crop_waits_below_threshold() {
        let mut crop = Crop::seed();
        assert_eq!(crop.advance(Duration::from_millis(4_999), GROW, ROT), None);
        assert_eq!(
            crop.advance(Duration::from_millis(1), GROW, ROT),
            Some(CropStage::Sprout)
        );
    }

    #[test]
    fn restore_only_applies_to_rotten_crops() {
        let mut crop = Crop::seed();
        assert!(!crop.restore());
        let _ = crop.advance(GROW, GROW, ROT);
        let _ = crop.advance(GROW, GROW, ROT);
        let _ = crop.advance(ROT, GROW, ROT);
        assert!(crop.restore());
        assert_eq!(crop.stage(), CropStage::Seed);
    }
}
