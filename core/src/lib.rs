#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Valley Day simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that presentation
//! and audio collaborators react to. Inventory and progress live outside the
//! world behind the [`Inventory`] trait.

use std::{collections::BTreeSet, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Damage dealt by a single clearing blow without specialised tools.
pub const BASE_DAMAGE: u32 = 1;

/// Damage dealt by a clearing blow with [`Capability::HeavyTool`] against tough material.
pub const HEAVY_TOOL_DAMAGE: u32 = 5;

/// Placement type identifier reserved for the actor's spawn tile.
pub const ENTRANCE_TYPE_ID: ObjectTypeId = ObjectTypeId::new(2);

/// Spawn tile used when a placement table carries no entrance.
pub const DEFAULT_ENTRANCE: TileCoord = TileCoord::new(1, 1);

/// Largest grid width or height a placement table may describe.
///
/// Larger tables are clamped and the entries beyond the limit are dropped.
pub const MAX_GRID_DIMENSION: u32 = 1024;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the world from a placement table, discarding all previous state.
    LoadMap {
        /// Placement entries and grid dimensions produced by map ingestion.
        table: PlacementTable,
    },
    /// Advances the simulation clock by the provided frame duration.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Sets the actor's desired movement for the coming frame.
    SteerActor {
        /// Direction the actor walks in, or `None` to stand still.
        direction: Option<Direction>,
    },
    /// Resolves a single interaction against the tile the actor faces.
    Interact {
        /// Interaction issued by the input layer.
        interaction: Interaction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports how many fixed physics steps a tick consumed.
    PhysicsStepped {
        /// Number of fixed-size steps executed.
        steps: u32,
    },
    /// Confirms that a placement table was loaded into the world.
    MapLoaded {
        /// Number of tile columns in the loaded grid.
        width: u32,
        /// Number of tile rows in the loaded grid.
        height: u32,
        /// Tile the actor spawned on.
        entrance: TileCoord,
    },
    /// Confirms that an obstacle absorbed a blow without breaking.
    ObstacleHit {
        /// Tile occupied by the obstacle.
        tile: TileCoord,
        /// Durability left after the blow.
        remaining: u32,
    },
    /// Confirms that an obstacle broke and its tile became walkable.
    ObstacleCleared {
        /// Tile the obstacle occupied.
        tile: TileCoord,
    },
    /// Announces that a hidden item surfaced on a freshly cleared tile.
    ItemRevealed {
        /// Tile the item now lies on.
        tile: TileCoord,
        /// Kind of item that surfaced.
        kind: ItemKind,
    },
    /// Confirms that the actor collected an item.
    ItemPickedUp {
        /// Tile the item was lying on.
        tile: TileCoord,
        /// Kind of item collected.
        kind: ItemKind,
    },
    /// Confirms that a seed was planted.
    CropPlanted {
        /// Tile holding the new crop.
        tile: TileCoord,
    },
    /// Announces that a crop entered a new growth stage.
    CropStageChanged {
        /// Tile holding the crop.
        tile: TileCoord,
        /// Stage the crop entered.
        stage: CropStage,
    },
    /// Confirms that a mature crop was harvested and removed.
    CropHarvested {
        /// Tile the crop occupied.
        tile: TileCoord,
    },
    /// Confirms that a rotten crop was watered back to a seed.
    CropRestored {
        /// Tile holding the crop.
        tile: TileCoord,
    },
    /// Reports that an interaction failed without mutating the world.
    InteractionRejected {
        /// Interaction that was attempted.
        interaction: Interaction,
        /// Tile the interaction targeted.
        tile: TileCoord,
        /// Specific reason the interaction failed.
        reason: InteractionRejection,
    },
}

/// Interactions the actor can attempt against the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Collect an item in front of or underneath the actor.
    PickUp,
    /// Harvest or restore the crop in front of the actor.
    Harvest,
    /// Plant a seed on the tile in front of the actor.
    Plant,
    /// Strike the obstacle in front of the actor.
    ClearObstacle,
    /// Try [`Interaction::PickUp`], then [`Interaction::Harvest`], then
    /// [`Interaction::Plant`], stopping at the first success.
    Primary,
}

/// Reasons an interaction may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionRejection {
    /// No item lies in front of or underneath the actor.
    NothingToPickUp,
    /// The targeted tile lies outside the grid.
    OutOfBounds,
    /// The targeted tile is blocked.
    NotWalkable,
    /// The targeted tile already holds an obstacle, crop, or item.
    Occupied,
    /// No crop grows on the targeted tile.
    NoCrop,
    /// The crop has not matured yet.
    CropNotReady,
    /// The crop rotted and needs water or a clearing tool.
    NeedsWaterOrClearingTool,
    /// No obstacle occupies the targeted tile.
    NoObstacle,
}

/// Cardinal facing directions available to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward increasing `y`.
    Up,
    /// Toward decreasing `y`.
    Down,
    /// Toward decreasing `x`.
    Left,
    /// Toward increasing `x`.
    Right,
}

impl Direction {
    /// Integer offset of a single step in this direction.
    #[must_use]
    pub const fn unit_offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Unit vector in continuous world space.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        let (x, y) = self.unit_offset();
        Vec2::new(x as f32, y as f32)
    }
}

/// Location of a single grid tile.
///
/// Tiles are keyed by exact integer coordinates. Continuous positions are
/// converted with [`TileCoord::containing`] before any lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the adjacent tile in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.unit_offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the tile containing a continuous world-space position.
    #[must_use]
    pub fn containing(position: Vec2) -> Self {
        Self {
            x: position.x.floor() as i32,
            y: position.y.floor() as i32,
        }
    }

    /// Continuous world-space position of the tile's centre.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/// Identifier carried by placement entries and resolved through a factory registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTypeId(u32);

impl ObjectTypeId {
    /// Creates a new type identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Single `(tile, type id)` pair produced by map ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEntry {
    /// Tile the object should be placed on.
    pub tile: TileCoord,
    /// Type identifier resolved through the placement registry.
    pub type_id: ObjectTypeId,
}

impl PlacementEntry {
    /// Creates a new placement entry.
    #[must_use]
    pub const fn new(x: i32, y: i32, type_id: u32) -> Self {
        Self {
            tile: TileCoord::new(x, y),
            type_id: ObjectTypeId::new(type_id),
        }
    }
}

/// Table of placement entries together with the grid dimensions they describe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementTable {
    entries: Vec<PlacementEntry>,
    width: u32,
    height: u32,
}

impl PlacementTable {
    /// Builds a table whose dimensions are the maximum coordinate plus one in each axis.
    #[must_use]
    pub fn from_entries(entries: Vec<PlacementEntry>) -> Self {
        let extent = |coordinate: i32| u32::try_from(coordinate).map_or(0, |v| v.saturating_add(1));
        let width = entries
            .iter()
            .map(|entry| extent(entry.tile.x()))
            .max()
            .unwrap_or(0);
        let height = entries
            .iter()
            .map(|entry| extent(entry.tile.y()))
            .max()
            .unwrap_or(0);
        Self {
            entries,
            width,
            height,
        }
    }

    /// Builds a table with explicit grid dimensions.
    #[must_use]
    pub fn with_dimensions(entries: Vec<PlacementEntry>, width: u32, height: u32) -> Self {
        Self {
            entries,
            width,
            height,
        }
    }

    /// Entries in ingestion order.
    #[must_use]
    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Material class of a destructible obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleMaterial {
    /// Brittle debris such as twigs.
    Light,
    /// Sturdy material such as rocks.
    Medium,
    /// Tough material such as stumps.
    Heavy,
}

impl ObstacleMaterial {
    /// Durability an obstacle of this material starts with.
    #[must_use]
    pub const fn starting_durability(self) -> u32 {
        match self {
            Self::Light => 3,
            Self::Medium => 5,
            Self::Heavy => 10,
        }
    }

    /// Reports whether a heavy tool deals boosted damage against this material.
    #[must_use]
    pub const fn is_tough(self) -> bool {
        match self {
            Self::Light => false,
            Self::Medium | Self::Heavy => true,
        }
    }
}

/// Growth stage of a crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropStage {
    /// Freshly planted.
    Seed,
    /// Sprouted but not harvestable.
    Sprout,
    /// Ready to harvest.
    Mature,
    /// Left too long; terminal unless restored.
    Rotten,
}

/// Kinds of items that can lie on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Digging tool that breaks tough material.
    Shovel,
    /// Can that revives rotten crops.
    WateringCan,
}

impl ItemKind {
    /// Capability granted to the actor when the item is collected.
    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::Shovel => Capability::HeavyTool,
            Self::WateringCan => Capability::WateringCan,
        }
    }
}

/// Boolean flags held by the inventory collaborator that gate interaction outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Deals boosted damage against tough obstacles.
    HeavyTool,
    /// Restores rotten crops to seeds.
    WateringCan,
}

/// Indestructible collision-bearing features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Fence segment.
    Fence,
    /// Storage chest.
    Chest,
}

/// Walkable, collision-free decorations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Flower patch.
    Flowers,
}

/// Inventory and progress collaborator consulted and updated by the world.
pub trait Inventory {
    /// Reports whether the capability has been granted.
    fn has_capability(&self, capability: Capability) -> bool;

    /// Grants the capability.
    fn grant_capability(&mut self, capability: Capability);

    /// Records one successful harvest.
    fn increment_harvest_count(&mut self);
}

/// Default in-memory [`Inventory`] implementation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    capabilities: BTreeSet<Capability>,
    harvest_count: u32,
}

impl Progress {
    /// Creates an empty progress record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of crops harvested so far.
    #[must_use]
    pub const fn harvest_count(&self) -> u32 {
        self.harvest_count
    }

    /// Iterator over granted capabilities in deterministic order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }
}

impl Inventory for Progress {
    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn grant_capability(&mut self, capability: Capability) {
        let _ = self.capabilities.insert(capability);
    }

    fn increment_harvest_count(&mut self) {
        self.harvest_count = self.harvest_count.saturating_add(1);
    }
}

/// Immutable representation of a single obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleSnapshot {
    /// Tile occupied by the obstacle.
    pub tile: TileCoord,
    /// Material class of the obstacle.
    pub material: ObstacleMaterial,
    /// Durability left before the obstacle breaks.
    pub durability: u32,
    /// Indicates whether the obstacle is inside its cosmetic jitter window.
    pub disturbed: bool,
}

/// Immutable representation of a single crop used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropSnapshot {
    /// Tile holding the crop.
    pub tile: TileCoord,
    /// Current growth stage.
    pub stage: CropStage,
    /// Time spent in the current stage.
    pub stage_elapsed: Duration,
}

/// Immutable representation of a ground item used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Tile the item lies on.
    pub tile: TileCoord,
    /// Kind of item.
    pub kind: ItemKind,
}

/// Neighbouring fence segments, used to pick corner and edge appearances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FenceLinks {
    /// A fence occupies the tile above.
    pub up: bool,
    /// A fence occupies the tile below.
    pub down: bool,
    /// A fence occupies the tile to the left.
    pub left: bool,
    /// A fence occupies the tile to the right.
    pub right: bool,
}

/// Immutable representation of a structure used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureSnapshot {
    /// Tile occupied by the structure.
    pub tile: TileCoord,
    /// Kind of structure.
    pub kind: StructureKind,
    /// Adjacent fences; always empty for non-fence structures.
    pub links: FenceLinks,
}

/// Immutable representation of a decoration used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecorationSnapshot {
    /// Tile decorated.
    pub tile: TileCoord,
    /// Kind of decoration.
    pub kind: DecorationKind,
}

/// Immutable representation of the actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Continuous physics position.
    pub position: Vec2,
    /// Tile containing the continuous position.
    pub tile: TileCoord,
    /// Direction the actor faces.
    pub facing: Direction,
}

/// Read-only snapshot describing all obstacles in the world.
#[derive(Clone, Debug, Default)]
pub struct ObstacleView {
    snapshots: Vec<ObstacleSnapshot>,
}

impl ObstacleView {
    /// Creates a new obstacle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ObstacleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tile);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tile order.
    pub fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the snapshot for the obstacle on the provided tile, if any.
    #[must_use]
    pub fn at(&self, tile: TileCoord) -> Option<&ObstacleSnapshot> {
        self.snapshots
            .binary_search_by_key(&tile, |snapshot| snapshot.tile)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ObstacleSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all crops in the world.
#[derive(Clone, Debug, Default)]
pub struct CropView {
    snapshots: Vec<CropSnapshot>,
}

impl CropView {
    /// Creates a new crop view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CropSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tile);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tile order.
    pub fn iter(&self) -> impl Iterator<Item = &CropSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the snapshot for the crop on the provided tile, if any.
    #[must_use]
    pub fn at(&self, tile: TileCoord) -> Option<&CropSnapshot> {
        self.snapshots
            .binary_search_by_key(&tile, |snapshot| snapshot.tile)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CropSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all ground items in the world.
#[derive(Clone, Debug, Default)]
pub struct ItemView {
    snapshots: Vec<ItemSnapshot>,
}

impl ItemView {
    /// Creates a new item view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ItemSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.tile, snapshot.kind));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tile order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the items lying on the provided tile.
    pub fn at(&self, tile: TileCoord) -> impl Iterator<Item = &ItemSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.tile == tile)
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ItemSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all structures in the world.
#[derive(Clone, Debug, Default)]
pub struct StructureView {
    snapshots: Vec<StructureSnapshot>,
}

impl StructureView {
    /// Creates a new structure view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StructureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tile);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tile order.
    pub fn iter(&self) -> impl Iterator<Item = &StructureSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<StructureSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Capability, Direction, Inventory, ItemKind, ObjectTypeId, ObstacleMaterial,
        PlacementEntry, PlacementTable, Progress, TileCoord,
    };
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn step_follows_direction_offsets() {
        let origin = TileCoord::new(3, 5);
        assert_eq!(origin.step(Direction::Up), TileCoord::new(3, 6));
        assert_eq!(origin.step(Direction::Down), TileCoord::new(3, 4));
        assert_eq!(origin.step(Direction::Left), TileCoord::new(2, 5));
        assert_eq!(origin.step(Direction::Right), TileCoord::new(4, 5));
    }

    #[test]
    fn step_off_the_grid_goes_negative() {
        assert_eq!(
            TileCoord::new(0, 0).step(Direction::Left),
            TileCoord::new(-1, 0)
        );
    }

    #[test]
    fn containing_floors_continuous_positions() {
        assert_eq!(
            TileCoord::containing(Vec2::new(2.99, 0.01)),
            TileCoord::new(2, 0)
        );
        assert_eq!(
            TileCoord::containing(Vec2::new(-0.2, 4.5)),
            TileCoord::new(-1, 4)
        );
        assert_eq!(
            TileCoord::containing(TileCoord::new(7, 8).center()),
            TileCoord::new(7, 8)
        );
    }

    #[test]
    fn table_dimensions_cover_maximum_coordinates() {
        let table = PlacementTable::from_entries(vec![
            PlacementEntry::new(0, 0, 0),
            PlacementEntry::new(9, 2, 1),
            PlacementEntry::new(4, 14, 0),
            PlacementEntry::new(-3, -3, 0),
        ]);
        assert_eq!(table.width(), 10);
        assert_eq!(table.height(), 15);
    }

    #[test]
    fn empty_table_has_no_extent() {
        let table = PlacementTable::from_entries(Vec::new());
        assert_eq!((table.width(), table.height()), (0, 0));
    }

    #[test]
    fn durability_follows_material_class() {
        assert_eq!(ObstacleMaterial::Light.starting_durability(), 3);
        assert_eq!(ObstacleMaterial::Medium.starting_durability(), 5);
        assert_eq!(ObstacleMaterial::Heavy.starting_durability(), 10);
        assert!(!ObstacleMaterial::Light.is_tough());
        assert!(ObstacleMaterial::Medium.is_tough());
        assert!(ObstacleMaterial::Heavy.is_tough());
    }

    #[test]
    fn items_grant_matching_capabilities() {
        assert_eq!(ItemKind::Shovel.capability(), Capability::HeavyTool);
        assert_eq!(ItemKind::WateringCan.capability(), Capability::WateringCan);
    }

    #[test]
    fn progress_tracks_capabilities_and_harvests() {
        let mut progress = Progress::new();
        assert!(!progress.has_capability(Capability::WateringCan));
        progress.grant_capability(Capability::WateringCan);
        progress.grant_capability(Capability::WateringCan);
        progress.increment_harvest_count();
        assert!(progress.has_capability(Capability::WateringCan));
        assert_eq!(
            progress.capabilities().collect::<Vec<_>>(),
            vec![Capability::WateringCan]
        );
        assert_eq!(progress.harvest_count(), 1);
    }

    #[test]
    fn progress_round_trips_through_bincode() {
        let mut progress = Progress::new();
        progress.grant_capability(Capability::HeavyTool);
        progress.increment_harvest_count();
        assert_round_trip(&progress);
    }

    #[test]
    fn placement_table_round_trips_through_bincode() {
        let table = PlacementTable::with_dimensions(vec![PlacementEntry::new(1, 2, 8)], 4, 4);
        assert_round_trip(&table);
        assert_eq!(table.entries()[0].type_id, ObjectTypeId::new(8));
    }
}
