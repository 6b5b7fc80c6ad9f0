#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Valley Day simulation.
//!
//! The world owns the walkability grid, every entity collection, the hidden
//! item registry, and the physics adapter. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

mod config;
mod entities;
mod grid;
mod hidden;
mod interaction;
mod physics;
mod placement;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use thiserror::Error;
use valley_core::{
    Command, Direction, Event, Interaction, Inventory, ItemKind, PlacementTable, TileCoord,
};

pub use config::{HiddenItemConfig, PhysicsConfig, TimingConfig, WorldConfig};
pub use physics::init;
pub use placement::{EntityFactory, PlacementRegistry, Registration};

use entities::{Crop, Decoration, GroundItem, Obstacle, Structure};
use grid::Grid;
use hidden::HiddenItems;
use physics::PhysicsAdapter;

/// Lifecycle faults raised while constructing a world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// [`init`] was not called before the first world was created.
    #[error("physics backend is not initialised; call valley_world::init() first")]
    PhysicsUninitialized,
    /// A configuration value is outside its valid range.
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
}

/// Represents the authoritative Valley Day world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    grid: Grid,
    obstacles: BTreeMap<TileCoord, Obstacle>,
    crops: BTreeMap<TileCoord, Crop>,
    items: Vec<GroundItem>,
    structures: BTreeMap<TileCoord, Structure>,
    decorations: BTreeMap<TileCoord, Decoration>,
    hidden: HiddenItems,
    physics: PhysicsAdapter,
    entrance: TileCoord,
    facing: Direction,
    steering: Option<Direction>,
}

impl World {
    /// Creates an empty world. Load a map with [`Command::LoadMap`] before playing.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PhysicsUninitialized`] when [`init`] has not run
    /// and [`WorldError::InvalidConfig`] when the configuration is out of range.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        if !physics::is_initialized() {
            return Err(WorldError::PhysicsUninitialized);
        }
        config.validate()?;
        Ok(Self::assemble(config, &PlacementTable::default()))
    }

    /// Buries an item under the obstacle occupying `tile`.
    ///
    /// Returns `false` when no obstacle occupies the tile or it already hides
    /// an item.
    pub fn hide_item(&mut self, tile: TileCoord, kind: ItemKind) -> bool {
        if !self.obstacles.contains_key(&tile) {
            return false;
        }
        self.hidden.insert(tile, kind)
    }

    /// Builds a world from scratch. The actor is recreated at the entrance.
    fn assemble(config: WorldConfig, table: &PlacementTable) -> Self {
        let mut physics = PhysicsAdapter::new(&config.physics);
        let placement = placement::build(
            table,
            &config.placement,
            &config.hidden_items,
            &mut physics,
        );
        physics.spawn_actor(placement.entrance.center(), config.physics.actor_radius);

        Self {
            grid: placement.grid,
            obstacles: placement.obstacles,
            crops: BTreeMap::new(),
            items: Vec::new(),
            structures: placement.structures,
            decorations: placement.decorations,
            hidden: placement.hidden,
            physics,
            entrance: placement.entrance,
            facing: Direction::Down,
            steering: None,
            config,
        }
    }

    fn load_map(&mut self, table: &PlacementTable) {
        let config = std::mem::take(&mut self.config);
        *self = Self::assemble(config, table);
        tracing::info!(
            width = self.grid.width(),
            height = self.grid.height(),
            obstacles = self.obstacles.len(),
            structures = self.structures.len(),
            hidden = self.hidden.len(),
            entrance = ?self.entrance,
            "map loaded"
        );
    }

    fn steer(&mut self, direction: Option<Direction>) {
        if let Some(direction) = direction {
            self.facing = direction;
        }
        self.steering = direction;
        let velocity = self.desired_velocity();
        self.physics.set_actor_velocity(velocity);
    }

    fn desired_velocity(&self) -> Vec2 {
        self.steering.map_or(Vec2::ZERO, |direction| {
            direction.unit_vector() * self.config.physics.move_speed
        })
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        let grow = self.config.timing.grow();
        let rot = self.config.timing.rot();
        for (tile, crop) in &mut self.crops {
            if let Some(stage) = crop.advance(dt, grow, rot) {
                out_events.push(Event::CropStageChanged { tile: *tile, stage });
            }
        }

        for obstacle in self.obstacles.values_mut() {
            obstacle.settle(dt);
        }

        let velocity = self.desired_velocity();
        self.physics.set_actor_velocity(velocity);
        let steps = self.physics.advance(dt);
        if steps > 0 {
            out_events.push(Event::PhysicsStepped { steps });
        }
    }

    fn actor_position(&self) -> Vec2 {
        self.physics
            .actor_position()
            .unwrap_or_else(|| self.entrance.center())
    }

    fn actor_tile(&self) -> TileCoord {
        TileCoord::containing(self.actor_position())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply<I: Inventory + ?Sized>(
    world: &mut World,
    command: Command,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::LoadMap { table } => {
            world.load_map(&table);
            out_events.push(Event::MapLoaded {
                width: world.grid.width(),
                height: world.grid.height(),
                entrance: world.entrance,
            });
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SteerActor { direction } => world.steer(direction),
        Command::Interact { interaction } => {
            let _ = interact(world, interaction, inventory, out_events);
        }
    }
}

/// Resolves a single interaction against the tile the actor faces.
///
/// Returns `true` when the interaction changed the world. Rejections leave
/// the world untouched and emit [`Event::InteractionRejected`].
pub fn interact<I: Inventory + ?Sized>(
    world: &mut World,
    interaction: Interaction,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) -> bool {
    interaction::resolve(world, interaction, inventory, out_events)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use valley_core::{
        ActorSnapshot, CropView, DecorationSnapshot, Direction, FenceLinks, ItemKind,
        ItemSnapshot, ItemView, ObstacleSnapshot, ObstacleView, StructureKind, StructureSnapshot,
        StructureView, TileCoord,
    };

    use super::World;

    /// Grid dimensions as `(width, height)` in tiles.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.width(), world.grid.height())
    }

    /// Reports whether the actor may walk onto the tile. Out-of-bounds tiles are not walkable.
    #[must_use]
    pub fn is_walkable(world: &World, tile: TileCoord) -> bool {
        world.grid.is_walkable(tile)
    }

    /// Tile the actor spawned on when the current map loaded.
    #[must_use]
    pub fn entrance(world: &World) -> TileCoord {
        world.entrance
    }

    /// Captures the actor's position and facing.
    #[must_use]
    pub fn actor(world: &World) -> ActorSnapshot {
        let position = world.actor_position();
        ActorSnapshot {
            position,
            tile: TileCoord::containing(position),
            facing: world.facing,
        }
    }

    /// Tile the next interaction will target.
    #[must_use]
    pub fn target_tile(world: &World) -> TileCoord {
        world.actor_tile().step(world.facing)
    }

    /// Captures a read-only view of the obstacles still standing.
    #[must_use]
    pub fn obstacle_view(world: &World) -> ObstacleView {
        let snapshots: Vec<ObstacleSnapshot> = world
            .obstacles
            .iter()
            .map(|(tile, obstacle)| obstacle.snapshot(*tile))
            .collect();
        ObstacleView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the planted crops.
    #[must_use]
    pub fn crop_view(world: &World) -> CropView {
        CropView::from_snapshots(
            world
                .crops
                .iter()
                .map(|(tile, crop)| crop.snapshot(*tile))
                .collect(),
        )
    }

    /// Captures a read-only view of the items lying on the ground.
    #[must_use]
    pub fn item_view(world: &World) -> ItemView {
        ItemView::from_snapshots(
            world
                .items
                .iter()
                .map(|item| ItemSnapshot {
                    tile: item.tile,
                    kind: item.kind,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of fences and chests, including fence connectivity.
    #[must_use]
    pub fn structure_view(world: &World) -> StructureView {
        StructureView::from_snapshots(
            world
                .structures
                .iter()
                .map(|(tile, structure)| StructureSnapshot {
                    tile: *tile,
                    kind: structure.kind,
                    links: fence_links(world, *tile, structure.kind),
                })
                .collect(),
        )
    }

    /// Decorations in tile order.
    #[must_use]
    pub fn decorations(world: &World) -> Vec<DecorationSnapshot> {
        world
            .decorations
            .iter()
            .map(|(tile, decoration)| DecorationSnapshot {
                tile: *tile,
                kind: decoration.kind,
            })
            .collect()
    }

    /// Item still buried under the obstacle at `tile`, if any.
    #[must_use]
    pub fn hidden_item_at(world: &World, tile: TileCoord) -> Option<ItemKind> {
        world.hidden.get(tile)
    }

    /// Number of items still buried under obstacles.
    #[must_use]
    pub fn hidden_item_count(world: &World) -> usize {
        world.hidden.len()
    }

    /// Reports whether a static collision volume covers the tile.
    #[must_use]
    pub fn has_collision_volume(world: &World, tile: TileCoord) -> bool {
        let volume = world
            .obstacles
            .get(&tile)
            .map(|obstacle| obstacle.volume)
            .or_else(|| world.structures.get(&tile).map(|structure| structure.volume));
        volume.is_some_and(|volume| world.physics.contains(volume))
    }

    fn fence_links(world: &World, tile: TileCoord, kind: StructureKind) -> FenceLinks {
        if kind != StructureKind::Fence {
            return FenceLinks::default();
        }
        let is_fence = |direction: Direction| {
            world
                .structures
                .get(&tile.step(direction))
                .is_some_and(|neighbour| neighbour.kind == StructureKind::Fence)
        };
        FenceLinks {
            up: is_fence(Direction::Up),
            down: is_fence(Direction::Down),
            left: is_fence(Direction::Left),
            right: is_fence(Direction::Right),
        }
    }
}
