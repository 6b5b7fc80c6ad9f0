//! Dense walkability grid.

use valley_core::TileCoord;

/// Per-tile walkability flags laid out row by row.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl Grid {
    /// Creates a grid where every tile starts walkable.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            walkable: vec![true; capacity],
        }
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Out-of-bounds tiles are never walkable.
    pub(crate) fn is_walkable(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    pub(crate) fn set_walkable(&mut self, tile: TileCoord, walkable: bool) {
        if let Some(index) = self.index(tile) {
            if let Some(slot) = self.walkable.get_mut(index) {
                *slot = walkable;
            }
        }
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let x = u32::try_from(tile.x()).ok()?;
        let y = u32::try_from(tile.y()).ok()?;
        if x < self.width && y < self.height {
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
