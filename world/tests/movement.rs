use std::time::Duration;

use valley_core::{
    Command, CropStage, Direction, Event, Interaction, ItemKind, PlacementEntry, PlacementTable,
    Progress, TileCoord, MAX_GRID_DIMENSION,
};
use valley_world::{self as world, query, HiddenItemConfig, World, WorldConfig};

const FENCE: u32 = 0;
const DEBRIS: u32 = 1;
const ENTRANCE: u32 = 2;
const FLOWERS: u32 = 9;

const QUARTER_SECOND: Duration = Duration::from_millis(250);

fn world_without_hidden_items() -> World {
    world::init();
    let config = WorldConfig {
        hidden_items: HiddenItemConfig {
            seed: 3,
            required: Vec::new(),
        },
        ..WorldConfig::default()
    };
    World::new(config).expect("config is valid")
}

fn run(world: &mut World, progress: &mut Progress, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, progress, &mut events);
    events
}

fn load(world: &mut World, progress: &mut Progress, entries: Vec<PlacementEntry>) -> Vec<Event> {
    run(
        world,
        progress,
        Command::LoadMap {
            table: PlacementTable::from_entries(entries),
        },
    )
}

fn walk(world: &mut World, progress: &mut Progress, direction: Direction, frames: u32) {
    let _ = run(
        world,
        progress,
        Command::SteerActor {
            direction: Some(direction),
        },
    );
    for _ in 0..frames {
        let _ = run(world, progress, Command::Tick { dt: QUARTER_SECOND });
    }
    let _ = run(world, progress, Command::SteerActor { direction: None });
}

#[test]
fn physics_only_steps_in_whole_increments() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(4, 4, FLOWERS),
        ],
    );

    let events = run(
        &mut world,
        &mut progress,
        Command::Tick {
            dt: Duration::from_millis(5),
        },
    );
    assert_eq!(
        events,
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(5)
        }]
    );

    let events = run(
        &mut world,
        &mut progress,
        Command::Tick {
            dt: Duration::from_secs(5),
        },
    );
    assert!(events.contains(&Event::PhysicsStepped { steps: 15 }));
}

#[test]
fn walking_covers_speed_times_time() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(7, 2, FLOWERS),
        ],
    );

    walk(&mut world, &mut progress, Direction::Right, 2);

    let actor = query::actor(&world);
    assert!((actor.position.x - 2.5).abs() < 0.05, "x = {}", actor.position.x);
    assert!((actor.position.y - 1.5).abs() < 1e-3);
    assert_eq!(actor.tile, TileCoord::new(2, 1));
    assert_eq!(actor.facing, Direction::Right);

    let _ = run(&mut world, &mut progress, Command::Tick { dt: QUARTER_SECOND });
    assert_eq!(query::actor(&world).position, actor.position);
}

#[test]
fn obstacles_block_until_cleared() {
    let debris = TileCoord::new(4, 1);
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(4, 1, DEBRIS),
            PlacementEntry::new(7, 2, FLOWERS),
        ],
    );

    walk(&mut world, &mut progress, Direction::Right, 8);
    let actor = query::actor(&world);
    assert!(actor.position.x < 3.8, "walked into debris: {}", actor.position.x);
    assert!(actor.position.x > 3.5, "stopped early: {}", actor.position.x);
    assert_eq!(query::target_tile(&world), debris);

    let mut events = Vec::new();
    for _ in 0..3 {
        assert!(world::interact(
            &mut world,
            Interaction::ClearObstacle,
            &mut progress,
            &mut events,
        ));
    }
    assert!(!query::has_collision_volume(&world, debris));

    walk(&mut world, &mut progress, Direction::Right, 4);
    let actor = query::actor(&world);
    assert!(actor.position.x > 5.0, "still blocked: {}", actor.position.x);
}

#[test]
fn structures_block_permanently() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(1, 3, FENCE),
            PlacementEntry::new(4, 4, FLOWERS),
        ],
    );

    walk(&mut world, &mut progress, Direction::Up, 8);
    let actor = query::actor(&world);
    assert!(actor.position.y < 2.8, "walked through fence: {}", actor.position.y);
    assert_eq!(actor.tile, TileCoord::new(1, 2));

    let mut events = Vec::new();
    assert!(!world::interact(
        &mut world,
        Interaction::ClearObstacle,
        &mut progress,
        &mut events,
    ));
    assert!(query::has_collision_volume(&world, TileCoord::new(1, 3)));
}

#[test]
fn map_boundaries_contain_the_actor() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(2, 2, FLOWERS),
        ],
    );

    walk(&mut world, &mut progress, Direction::Left, 8);
    let actor = query::actor(&world);
    assert!(actor.position.x > 0.2, "left the map: {}", actor.position.x);
    assert_eq!(actor.tile, TileCoord::new(0, 1));
}

#[test]
fn pick_up_reaches_the_tile_underfoot() {
    let buried = TileCoord::new(2, 1);
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(2, 1, DEBRIS),
            PlacementEntry::new(7, 2, FLOWERS),
        ],
    );
    assert!(world.hide_item(buried, ItemKind::Shovel));

    let mut events = Vec::new();
    let _ = run(
        &mut world,
        &mut progress,
        Command::SteerActor {
            direction: Some(Direction::Right),
        },
    );
    let _ = run(&mut world, &mut progress, Command::SteerActor { direction: None });
    for _ in 0..3 {
        assert!(world::interact(
            &mut world,
            Interaction::ClearObstacle,
            &mut progress,
            &mut events,
        ));
    }

    walk(&mut world, &mut progress, Direction::Right, 2);
    assert_eq!(query::actor(&world).tile, buried);
    assert_eq!(query::target_tile(&world), TileCoord::new(3, 1));

    events.clear();
    assert!(world::interact(
        &mut world,
        Interaction::PickUp,
        &mut progress,
        &mut events,
    ));
    assert_eq!(
        events,
        vec![Event::ItemPickedUp {
            tile: buried,
            kind: ItemKind::Shovel,
        }]
    );
    assert!(query::item_view(&world).is_empty());
}

#[test]
fn reloading_recreates_the_actor_and_discards_state() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let _ = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(1, 1, ENTRANCE),
            PlacementEntry::new(4, 4, FLOWERS),
        ],
    );

    let mut events = Vec::new();
    assert!(world::interact(
        &mut world,
        Interaction::Plant,
        &mut progress,
        &mut events,
    ));
    let _ = run(
        &mut world,
        &mut progress,
        Command::Tick {
            dt: Duration::from_secs(5),
        },
    );
    assert_eq!(
        query::crop_view(&world).at(TileCoord::new(1, 0)).map(|crop| crop.stage),
        Some(CropStage::Sprout)
    );
    let _ = run(
        &mut world,
        &mut progress,
        Command::SteerActor {
            direction: Some(Direction::Right),
        },
    );

    let events = load(
        &mut world,
        &mut progress,
        vec![
            PlacementEntry::new(3, 2, ENTRANCE),
            PlacementEntry::new(5, 5, DEBRIS),
        ],
    );
    assert_eq!(
        events,
        vec![Event::MapLoaded {
            width: 6,
            height: 6,
            entrance: TileCoord::new(3, 2),
        }]
    );

    assert!(query::crop_view(&world).is_empty());
    assert_eq!(query::obstacle_view(&world).len(), 1);
    assert_eq!(query::dimensions(&world), (6, 6));
    let actor = query::actor(&world);
    assert_eq!(actor.tile, TileCoord::new(3, 2));
    assert_eq!(actor.facing, Direction::Down);

    let _ = run(&mut world, &mut progress, Command::Tick { dt: QUARTER_SECOND });
    assert_eq!(query::actor(&world).position, actor.position);
}

#[test]
fn oversized_map_is_clamped_instead_of_allocating_it() {
    let mut world = world_without_hidden_items();
    let mut progress = Progress::new();
    let events = run(
        &mut world,
        &mut progress,
        Command::LoadMap {
            table: PlacementTable::with_dimensions(
                vec![
                    PlacementEntry::new(1, 1, ENTRANCE),
                    PlacementEntry::new(i32::MAX, i32::MAX, DEBRIS),
                ],
                u32::MAX,
                u32::MAX,
            ),
        },
    );

    assert_eq!(
        events,
        vec![Event::MapLoaded {
            width: MAX_GRID_DIMENSION,
            height: MAX_GRID_DIMENSION,
            entrance: TileCoord::new(1, 1),
        }]
    );
    assert!(query::obstacle_view(&world).is_empty());

    walk(&mut world, &mut progress, Direction::Right, 2);
    assert_eq!(query::actor(&world).tile, TileCoord::new(2, 1));
}
