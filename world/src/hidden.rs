//! Registry of items buried under obstacles and their post-placement distribution.

use std::collections::BTreeMap;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use valley_core::{ItemKind, TileCoord};

/// Pending items keyed by the exact integer tile they are buried under.
#[derive(Clone, Debug, Default)]
pub(crate) struct HiddenItems {
    entries: BTreeMap<TileCoord, ItemKind>,
}

impl HiddenItems {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Buries an item under a tile. Fails if the tile already hides one.
    pub(crate) fn insert(&mut self, tile: TileCoord, kind: ItemKind) -> bool {
        if self.entries.contains_key(&tile) {
            return false;
        }
        let _ = self.entries.insert(tile, kind);
        true
    }

    /// Removes and returns the item buried under a tile.
    pub(crate) fn take(&mut self, tile: TileCoord) -> Option<ItemKind> {
        self.entries.remove(&tile)
    }

    pub(crate) fn get(&self, tile: TileCoord) -> Option<ItemKind> {
        self.entries.get(&tile).copied()
    }

    pub(crate) fn contains_kind(&self, kind: ItemKind) -> bool {
        self.entries.values().any(|pending| *pending == kind)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Hides one item of every required kind under a distinct, randomly chosen obstacle.
///
/// Kinds that already have a pending entry are skipped. When obstacles run
/// out, the remaining kinds stay unhidden and a warning is logged. Returns the
/// number of items hidden by this call.
pub(crate) fn distribute(
    registry: &mut HiddenItems,
    obstacle_tiles: impl IntoIterator<Item = TileCoord>,
    required: &[ItemKind],
    seed: u64,
) -> usize {
    let mut candidates: Vec<TileCoord> = obstacle_tiles
        .into_iter()
        .filter(|tile| registry.get(*tile).is_none())
        .collect();
    candidates.sort_unstable();
    candidates.dedup();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let mut hidden = 0;
    let mut missing: Vec<ItemKind> = Vec::new();
    for &kind in required {
        if registry.contains_kind(kind) {
            continue;
        }
        let Some(tile) = candidates.pop() else {
            missing.push(kind);
            continue;
        };
        if registry.insert(tile, kind) {
            hidden += 1;
        }
    }

    if !missing.is_empty() {
        tracing::warn!(
            ?missing,
            hidden,
            "not enough obstacle tiles to hide every required item"
        );
    }

    hidden
}
