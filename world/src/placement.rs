//! Placement builder turning a [`PlacementTable`] into grid and entity state.

use std::collections::BTreeMap;

use serde::Deserialize;
use valley_core::{
    DecorationKind, ObjectTypeId, ObstacleMaterial, PlacementTable, StructureKind, TileCoord,
    DEFAULT_ENTRANCE, ENTRANCE_TYPE_ID, MAX_GRID_DIMENSION,
};

use crate::{
    config::HiddenItemConfig,
    entities::{Decoration, Obstacle, Structure},
    grid::Grid,
    hidden::{self, HiddenItems},
    physics::PhysicsAdapter,
};

/// What a registered type id produces when placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFactory {
    /// Indestructible collision-bearing structure.
    Structure(StructureKind),
    /// Destructible obstacle of the given material.
    Obstacle(ObstacleMaterial),
    /// Walkable decoration without collision.
    Decoration(DecorationKind),
}

/// Single type id registration as it appears in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Registration {
    /// Type id found in placement tables.
    pub type_id: ObjectTypeId,
    /// Factory invoked for tiles carrying the type id.
    pub factory: EntityFactory,
}

/// Table mapping placement type ids onto entity factories.
///
/// The entrance id is reserved and can never be registered.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Registration>")]
pub struct PlacementRegistry {
    factories: BTreeMap<ObjectTypeId, EntityFactory>,
}

impl PlacementRegistry {
    /// Creates a registry without any registrations.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a factory, replacing any earlier registration of the id.
    ///
    /// Returns `false` when the id is reserved for the entrance.
    pub fn register(&mut self, type_id: ObjectTypeId, factory: EntityFactory) -> bool {
        if type_id == ENTRANCE_TYPE_ID {
            tracing::warn!(
                type_id = type_id.get(),
                "refusing to register the reserved entrance id"
            );
            return false;
        }
        let _ = self.factories.insert(type_id, factory);
        true
    }

    /// Looks up the factory registered for a type id.
    #[must_use]
    pub fn factory(&self, type_id: ObjectTypeId) -> Option<EntityFactory> {
        self.factories.get(&type_id).copied()
    }

    /// Number of registered type ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Reports whether no type id is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for PlacementRegistry {
    fn default() -> Self {
        Vec::from([
            Registration {
                type_id: ObjectTypeId::new(0),
                factory: EntityFactory::Structure(StructureKind::Fence),
            },
            Registration {
                type_id: ObjectTypeId::new(1),
                factory: EntityFactory::Obstacle(ObstacleMaterial::Light),
            },
            Registration {
                type_id: ObjectTypeId::new(6),
                factory: EntityFactory::Structure(StructureKind::Chest),
            },
            Registration {
                type_id: ObjectTypeId::new(7),
                factory: EntityFactory::Obstacle(ObstacleMaterial::Medium),
            },
            Registration {
                type_id: ObjectTypeId::new(8),
                factory: EntityFactory::Obstacle(ObstacleMaterial::Heavy),
            },
            Registration {
                type_id: ObjectTypeId::new(9),
                factory: EntityFactory::Decoration(DecorationKind::Flowers),
            },
        ])
        .into()
    }
}

impl From<Vec<Registration>> for PlacementRegistry {
    fn from(registrations: Vec<Registration>) -> Self {
        let mut registry = Self::empty();
        for registration in registrations {
            let _ = registry.register(registration.type_id, registration.factory);
        }
        registry
    }
}

/// Freshly built grid and entity collections.
#[derive(Debug)]
pub(crate) struct Placement {
    pub(crate) grid: Grid,
    pub(crate) obstacles: BTreeMap<TileCoord, Obstacle>,
    pub(crate) structures: BTreeMap<TileCoord, Structure>,
    pub(crate) decorations: BTreeMap<TileCoord, Decoration>,
    pub(crate) hidden: HiddenItems,
    pub(crate) entrance: TileCoord,
}

/// Runs every registered factory over the table, then hides the required items.
///
/// Duplicate tiles keep the last entry. Entries outside the grid and ids
/// without a factory are dropped. Dimensions above [`MAX_GRID_DIMENSION`]
/// are clamped to it. Static volumes and map boundaries are
/// created in `physics`, which is expected to be freshly constructed.
pub(crate) fn build(
    table: &PlacementTable,
    registry: &PlacementRegistry,
    hidden_items: &HiddenItemConfig,
    physics: &mut PhysicsAdapter,
) -> Placement {
    let width = table.width().min(MAX_GRID_DIMENSION);
    let height = table.height().min(MAX_GRID_DIMENSION);
    let clamped = (width, height) != (table.width(), table.height());
    if clamped {
        tracing::warn!(
            requested_width = table.width(),
            requested_height = table.height(),
            width,
            height,
            "placement table exceeds the grid limit, clamping"
        );
    }
    let mut grid = Grid::new(width, height);

    let mut cells: BTreeMap<TileCoord, ObjectTypeId> = BTreeMap::new();
    let mut dropped = 0_usize;
    for entry in table.entries() {
        if !grid.contains(entry.tile) {
            tracing::debug!(tile = ?entry.tile, "dropping placement outside the grid");
            dropped += 1;
            continue;
        }
        let _ = cells.insert(entry.tile, entry.type_id);
    }
    if clamped && dropped > 0 {
        tracing::warn!(dropped, "dropped placements beyond the clamped grid");
    }

    let mut obstacles = BTreeMap::new();
    let mut structures = BTreeMap::new();
    let mut decorations = BTreeMap::new();
    let mut entrance = None;

    for (tile, type_id) in cells {
        if type_id == ENTRANCE_TYPE_ID {
            if let Some(previous) = entrance.replace(tile) {
                tracing::warn!(?previous, ?tile, "placement table declares several entrances");
            }
            continue;
        }

        match registry.factory(type_id) {
            Some(EntityFactory::Obstacle(material)) => {
                grid.set_walkable(tile, false);
                let volume = physics.add_static_tile(tile);
                let _ = obstacles.insert(tile, Obstacle::new(material, volume));
            }
            Some(EntityFactory::Structure(kind)) => {
                grid.set_walkable(tile, false);
                let volume = physics.add_static_tile(tile);
                let _ = structures.insert(tile, Structure { kind, volume });
            }
            Some(EntityFactory::Decoration(kind)) => {
                let _ = decorations.insert(tile, Decoration { kind });
            }
            None => {
                tracing::debug!(type_id = type_id.get(), ?tile, "no factory registered");
            }
        }
    }

    physics.add_boundaries(grid.width(), grid.height());

    let mut hidden = HiddenItems::new();
    let _ = hidden::distribute(
        &mut hidden,
        obstacles.keys().copied(),
        &hidden_items.required,
        hidden_items.seed,
    );

    Placement {
        grid,
        obstacles,
        structures,
        decorations,
        hidden,
        entrance: entrance.unwrap_or(DEFAULT_ENTRANCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valley_core::{ItemKind, PlacementEntry};

    use crate::config::PhysicsConfig;

    fn hidden_none() -> HiddenItemConfig {
        HiddenItemConfig {
            seed: 1,
            required: Vec::new(),
        }
    }

    fn run(table: &PlacementTable, hidden_items: &HiddenItemConfig) -> Placement {
        let mut physics = PhysicsAdapter::new(&PhysicsConfig::default());
        build(table, &PlacementRegistry::default(), hidden_items, &mut physics)
    }

    #[test]
    fn factories_populate_collections_and_walkability() {
        let table = PlacementTable::from_entries(vec![
            PlacementEntry::new(0, 0, 0),
            PlacementEntry::new(1, 0, 1),
            PlacementEntry::new(2, 0, 6),
            PlacementEntry::new(3, 0, 8),
            PlacementEntry::new(4, 0, 9),
            PlacementEntry::new(2, 2, 2),
        ]);
        let placement = run(&table, &hidden_none());

        assert_eq!((placement.grid.width(), placement.grid.height()), (5, 3));
        assert_eq!(placement.entrance, TileCoord::new(2, 2));
        assert_eq!(placement.structures.len(), 2);
        assert_eq!(placement.obstacles.len(), 2);
        assert_eq!(placement.decorations.len(), 1);

        for x in 0..4 {
            assert!(!placement.grid.is_walkable(TileCoord::new(x, 0)));
        }
        assert!(placement.grid.is_walkable(TileCoord::new(4, 0)));
        assert!(placement.grid.is_walkable(TileCoord::new(2, 2)));

        let stump = placement
            .obstacles
            .get(&TileCoord::new(3, 0))
            .expect("stump placed");
        assert_eq!(stump.material, ObstacleMaterial::Heavy);
        assert_eq!(stump.durability, 10);
    }

    #[test]
    fn missing_entrance_falls_back_to_default() {
        let table = PlacementTable::from_entries(vec![PlacementEntry::new(4, 4, 1)]);
        let placement = run(&table, &hidden_none());
        assert_eq!(placement.entrance, DEFAULT_ENTRANCE);
    }

    #[test]
    fn unknown_ids_and_out_of_bounds_entries_are_ignored() {
        let table = PlacementTable::with_dimensions(
            vec![
                PlacementEntry::new(1, 1, 42),
                PlacementEntry::new(9, 9, 1),
                PlacementEntry::new(-1, 0, 1),
            ],
            3,
            3,
        );
        let placement = run(&table, &hidden_none());
        assert!(placement.obstacles.is_empty());
        assert!(placement.grid.is_walkable(TileCoord::new(1, 1)));
    }

    #[test]
    fn oversized_tables_are_clamped_to_the_grid_limit() {
        let limit = i32::try_from(MAX_GRID_DIMENSION).expect("limit fits in i32");
        let table = PlacementTable::from_entries(vec![
            PlacementEntry::new(2, 2, 1),
            PlacementEntry::new(limit - 1, 0, 8),
            PlacementEntry::new(i32::MAX, i32::MAX, 1),
        ]);
        let placement = run(&table, &hidden_none());

        assert_eq!(
            (placement.grid.width(), placement.grid.height()),
            (MAX_GRID_DIMENSION, MAX_GRID_DIMENSION)
        );
        assert_eq!(placement.obstacles.len(), 2);
        assert!(placement.obstacles.contains_key(&TileCoord::new(limit - 1, 0)));
        assert!(!placement.grid.contains(TileCoord::new(i32::MAX, i32::MAX)));
    }

    #[test]
    fn maximal_dimensions_without_entries_build_a_bounded_grid() {
        let table = PlacementTable::with_dimensions(Vec::new(), u32::MAX, u32::MAX);
        let placement = run(&table, &hidden_none());
        assert_eq!(
            (placement.grid.width(), placement.grid.height()),
            (MAX_GRID_DIMENSION, MAX_GRID_DIMENSION)
        );
        assert_eq!(placement.entrance, DEFAULT_ENTRANCE);
    }

    #[test]
    fn last_entry_for_a_tile_wins() {
        let table = PlacementTable::from_entries(vec![
            PlacementEntry::new(1, 1, 1),
            PlacementEntry::new(1, 1, 9),
        ]);
        let placement = run(&table, &hidden_none());
        assert!(placement.obstacles.is_empty());
        assert!(placement.decorations.contains_key(&TileCoord::new(1, 1)));
        assert!(placement.grid.is_walkable(TileCoord::new(1, 1)));
    }

    #[test]
    fn hidden_items_land_on_obstacles() {
        let table = PlacementTable::from_entries(vec![
            PlacementEntry::new(0, 0, 1),
            PlacementEntry::new(1, 0, 7),
            PlacementEntry::new(2, 0, 8),
            PlacementEntry::new(3, 0, 0),
        ]);
        let placement = run(&table, &HiddenItemConfig::default());

        assert_eq!(placement.hidden.len(), 2);
        assert!(placement.hidden.contains_kind(ItemKind::Shovel));
        assert!(placement.hidden.contains_kind(ItemKind::WateringCan));
        assert_eq!(placement.hidden.get(TileCoord::new(3, 0)), None);
    }

    #[test]
    fn entrance_id_cannot_be_registered() {
        let mut registry = PlacementRegistry::empty();
        assert!(!registry.register(
            ENTRANCE_TYPE_ID,
            EntityFactory::Obstacle(ObstacleMaterial::Light)
        ));
        assert!(registry.is_empty());
        assert!(registry.register(
            ObjectTypeId::new(3),
            EntityFactory::Obstacle(ObstacleMaterial::Light)
        ));
        assert_eq!(registry.len(), 1);
    }
}
