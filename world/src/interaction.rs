//! Interaction resolver applying a single actor interaction to the faced tile.

use valley_core::{
    Capability, CropStage, Event, Interaction, InteractionRejection, Inventory, TileCoord,
    BASE_DAMAGE, HEAVY_TOOL_DAMAGE,
};

use crate::{
    entities::{Crop, GroundItem, Strike},
    World,
};

type Outcome = Result<(), InteractionRejection>;

/// Resolves one interaction and reports whether it succeeded.
///
/// Failures never mutate the world. They emit [`Event::InteractionRejected`],
/// except harvesting an empty tile, which fails silently.
pub(crate) fn resolve<I: Inventory + ?Sized>(
    world: &mut World,
    interaction: Interaction,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) -> bool {
    let actor = world.actor_tile();
    let target = actor.step(world.facing);

    let outcome = match interaction {
        Interaction::PickUp => pick_up(world, actor, target, inventory, out_events),
        Interaction::Harvest => harvest(world, target, inventory, out_events),
        Interaction::Plant => plant(world, target, out_events),
        Interaction::ClearObstacle => clear_obstacle(world, target, &*inventory, out_events),
        Interaction::Primary => primary(world, actor, target, inventory, out_events),
    };

    match outcome {
        Ok(()) => {
            tracing::debug!(?interaction, ?target, "interaction resolved");
            true
        }
        Err(InteractionRejection::NoCrop) if interaction == Interaction::Harvest => {
            tracing::debug!(?target, "nothing to harvest");
            false
        }
        Err(reason) => {
            tracing::debug!(?interaction, ?target, ?reason, "interaction rejected");
            out_events.push(Event::InteractionRejected {
                interaction,
                tile: target,
                reason,
            });
            false
        }
    }
}

/// Tries pick up, harvest, and plant in that order and stops at the first success.
fn primary<I: Inventory + ?Sized>(
    world: &mut World,
    actor: TileCoord,
    target: TileCoord,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) -> Outcome {
    if pick_up(world, actor, target, inventory, out_events).is_ok() {
        return Ok(());
    }
    let harvest_rejection = match harvest(world, target, inventory, out_events) {
        Ok(()) => return Ok(()),
        Err(reason) => reason,
    };
    let plant_rejection = match plant(world, target, out_events) {
        Ok(()) => return Ok(()),
        Err(reason) => reason,
    };

    // A crop on the tile explains the failure better than the occupied tile.
    if harvest_rejection == InteractionRejection::NoCrop {
        Err(plant_rejection)
    } else {
        Err(harvest_rejection)
    }
}

fn pick_up<I: Inventory + ?Sized>(
    world: &mut World,
    actor: TileCoord,
    target: TileCoord,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) -> Outcome {
    let index = world
        .items
        .iter()
        .position(|item| item.tile == target)
        .or_else(|| world.items.iter().position(|item| item.tile == actor))
        .ok_or(InteractionRejection::NothingToPickUp)?;

    let GroundItem { tile, kind } = world.items.remove(index);
    inventory.grant_capability(kind.capability());
    out_events.push(Event::ItemPickedUp { tile, kind });
    Ok(())
}

fn harvest<I: Inventory + ?Sized>(
    world: &mut World,
    target: TileCoord,
    inventory: &mut I,
    out_events: &mut Vec<Event>,
) -> Outcome {
    let stage = world
        .crops
        .get(&target)
        .map(Crop::stage)
        .ok_or(InteractionRejection::NoCrop)?;

    match stage {
        CropStage::Seed | CropStage::Sprout => Err(InteractionRejection::CropNotReady),
        CropStage::Mature => {
            let _ = world.crops.remove(&target);
            inventory.increment_harvest_count();
            out_events.push(Event::CropHarvested { tile: target });
            Ok(())
        }
        CropStage::Rotten => {
            if !inventory.has_capability(Capability::WateringCan) {
                return Err(InteractionRejection::NeedsWaterOrClearingTool);
            }
            if let Some(crop) = world.crops.get_mut(&target) {
                let _ = crop.restore();
            }
            out_events.push(Event::CropRestored { tile: target });
            Ok(())
        }
    }
}

fn plant(world: &mut World, target: TileCoord, out_events: &mut Vec<Event>) -> Outcome {
    if !world.grid.contains(target) {
        return Err(InteractionRejection::OutOfBounds);
    }
    if world.obstacles.contains_key(&target) {
        return Err(InteractionRejection::Occupied);
    }
    if !world.grid.is_walkable(target) {
        return Err(InteractionRejection::NotWalkable);
    }
    if world.crops.contains_key(&target) || world.items.iter().any(|item| item.tile == target) {
        return Err(InteractionRejection::Occupied);
    }

    let _ = world.crops.insert(target, Crop::seed());
    out_events.push(Event::CropPlanted { tile: target });
    Ok(())
}

fn clear_obstacle<I: Inventory + ?Sized>(
    world: &mut World,
    target: TileCoord,
    inventory: &I,
    out_events: &mut Vec<Event>,
) -> Outcome {
    let jitter = world.config.timing.disturbed();
    let obstacle = world
        .obstacles
        .get_mut(&target)
        .ok_or(InteractionRejection::NoObstacle)?;

    // Light tools only chip away at tough material.
    let damage = if obstacle.material.is_tough() && inventory.has_capability(Capability::HeavyTool)
    {
        HEAVY_TOOL_DAMAGE
    } else {
        BASE_DAMAGE
    };

    match obstacle.strike(damage, jitter) {
        Strike::Hit { remaining } => {
            out_events.push(Event::ObstacleHit {
                tile: target,
                remaining,
            });
        }
        Strike::Broken => {
            if let Some(obstacle) = world.obstacles.remove(&target) {
                world.physics.remove_static(obstacle.volume);
            }
            world.grid.set_walkable(target, true);
            out_events.push(Event::ObstacleCleared { tile: target });
            reveal(world, target, out_events);
        }
    }
    Ok(())
}

/// Moves the item buried under a cleared tile onto the ground.
fn reveal(world: &mut World, tile: TileCoord, out_events: &mut Vec<Event>) {
    if let Some(kind) = world.hidden.take(tile) {
        world.items.push(GroundItem { tile, kind });
        out_events.push(Event::ItemRevealed { tile, kind });
    }
}
