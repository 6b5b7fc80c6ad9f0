//! rapier2d adapter driving the actor's movement and collisions.
//!
//! Only the actor is dynamic. Obstacles, structures, and the map border are
//! fixed unit boxes centred on their tiles. The adapter never advances the
//! rapier world by anything other than the fixed step handed out by its
//! [`FixedTimestep`], so movement is independent of frame rate.

use std::{fmt, num::NonZeroUsize, sync::Once, time::Duration};

use glam::Vec2;
use rapier2d::prelude::*;
use valley_core::TileCoord;
use valley_system_timestep::{FixedTimestep, TimestepEvent};

use crate::config::PhysicsConfig;

static BACKEND: Once = Once::new();

/// Initialises the physics backend for the process.
///
/// Must be called once by the host before any [`World`](crate::World) is
/// constructed. Repeated calls are harmless.
pub fn init() {
    BACKEND.call_once(|| {
        tracing::debug!("physics backend initialised");
    });
}

pub(crate) fn is_initialized() -> bool {
    BACKEND.is_completed()
}

/// Handle to a fixed collision volume owned by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StaticVolume(RigidBodyHandle);

/// Owns the rapier world and steps it on a fixed cadence.
pub(crate) struct PhysicsAdapter {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    timestep: FixedTimestep,
    actor: Option<RigidBodyHandle>,
}

impl PhysicsAdapter {
    /// Creates an empty zero-gravity world.
    pub(crate) fn new(config: &PhysicsConfig) -> Self {
        let timestep = FixedTimestep::from_rate(config.step_hz, config.max_frame());

        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = timestep.step().as_secs_f32();
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations as usize).unwrap_or(NonZeroUsize::MIN);
        integration_params.num_internal_pgs_iterations =
            (config.position_iterations as usize).max(1);

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, 0.0],
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            timestep,
            actor: None,
        }
    }

    /// Adds a fixed unit box covering the tile.
    pub(crate) fn add_static_tile(&mut self, tile: TileCoord) -> StaticVolume {
        let center = tile.center();
        self.add_fixed_box(center, Vec2::splat(0.5))
    }

    /// Surrounds the `width` × `height` grid with fixed walls.
    pub(crate) fn add_boundaries(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let width = width as f32;
        let height = height as f32;
        let walls = [
            (Vec2::new(-0.5, height / 2.0), Vec2::new(0.5, height / 2.0 + 1.0)),
            (
                Vec2::new(width + 0.5, height / 2.0),
                Vec2::new(0.5, height / 2.0 + 1.0),
            ),
            (Vec2::new(width / 2.0, -0.5), Vec2::new(width / 2.0 + 1.0, 0.5)),
            (
                Vec2::new(width / 2.0, height + 0.5),
                Vec2::new(width / 2.0 + 1.0, 0.5),
            ),
        ];
        for (center, half_extents) in walls {
            let _ = self.add_fixed_box(center, half_extents);
        }
    }

    /// Destroys a fixed volume. Removing an already removed volume is a no-op.
    pub(crate) fn remove_static(&mut self, volume: StaticVolume) {
        let _ = self.rigid_body_set.remove(
            volume.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub(crate) fn contains(&self, volume: StaticVolume) -> bool {
        self.rigid_body_set.contains(volume.0)
    }

    /// Creates the actor's circular body, replacing any previous one.
    pub(crate) fn spawn_actor(&mut self, position: Vec2, radius: f32) {
        if let Some(previous) = self.actor.take() {
            let _ = self.rigid_body_set.remove(
                previous,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .lock_rotations()
            .ccd_enabled(true)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius)
            .density(1.0)
            .friction(0.0)
            .build();
        let _ = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.actor = Some(handle);
    }

    /// Sets the velocity the actor carries into the next fixed steps.
    pub(crate) fn set_actor_velocity(&mut self, velocity: Vec2) {
        let Some(handle) = self.actor else {
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    pub(crate) fn actor_position(&self) -> Option<Vec2> {
        let handle = self.actor?;
        let body = self.rigid_body_set.get(handle)?;
        let translation = body.translation();
        Some(Vec2::new(translation.x, translation.y))
    }

    /// Consumes a frame's worth of time in fixed steps. Returns the steps taken.
    pub(crate) fn advance(&mut self, frame_time: Duration) -> u32 {
        let mut events = Vec::new();
        let steps = self.timestep.advance(frame_time, &mut events);
        for event in events {
            match event {
                TimestepEvent::FrameClamped { requested, applied } => {
                    tracing::debug!(?requested, ?applied, "frame time clamped");
                }
                TimestepEvent::Step { dt, .. } => self.step(dt),
            }
        }
        steps
    }

    fn step(&mut self, dt: Duration) {
        self.integration_params.dt = dt.as_secs_f32();
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn add_fixed_box(&mut self, center: Vec2, half_extents: Vec2) -> StaticVolume {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(0.6)
            .build();
        let _ = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        StaticVolume(handle)
    }

    #[cfg(test)]
    fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl fmt::Debug for PhysicsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsAdapter")
            .field("bodies", &self.rigid_body_set.len())
            .field("colliders", &self.collider_set.len())
            .field("timestep", &self.timestep)
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PhysicsAdapter {
        PhysicsAdapter::new(&PhysicsConfig::default())
    }

    #[test]
    fn static_tiles_can_be_removed() {
        let mut physics = adapter();
        let volume = physics.add_static_tile(TileCoord::new(2, 2));
        assert!(physics.contains(volume));
        assert_eq!(physics.body_count(), 1);

        physics.remove_static(volume);
        assert!(!physics.contains(volume));
        assert_eq!(physics.body_count(), 0);

        physics.remove_static(volume);
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn boundaries_add_four_walls() {
        let mut physics = adapter();
        physics.add_boundaries(5, 4);
        assert_eq!(physics.body_count(), 4);
        physics.add_boundaries(0, 4);
        assert_eq!(physics.body_count(), 4);
    }

    #[test]
    fn respawning_replaces_the_actor() {
        let mut physics = adapter();
        physics.spawn_actor(Vec2::new(1.5, 1.5), 0.3);
        physics.spawn_actor(Vec2::new(4.5, 2.5), 0.3);
        assert_eq!(physics.body_count(), 1);
        assert_eq!(physics.actor_position(), Some(Vec2::new(4.5, 2.5)));
    }

    #[test]
    fn actor_stays_put_until_a_step_is_due() {
        let mut physics = adapter();
        physics.spawn_actor(Vec2::new(1.5, 1.5), 0.3);
        physics.set_actor_velocity(Vec2::new(2.0, 0.0));

        assert_eq!(physics.advance(Duration::from_millis(5)), 0);
        assert_eq!(physics.actor_position(), Some(Vec2::new(1.5, 1.5)));

        assert_eq!(physics.advance(Duration::from_millis(20)), 1);
        let position = physics.actor_position().expect("actor exists");
        assert!(position.x > 1.5);
    }

    #[test]
    fn free_movement_covers_speed_times_time() {
        let mut physics = adapter();
        physics.spawn_actor(Vec2::new(1.5, 1.5), 0.3);
        physics.set_actor_velocity(Vec2::new(2.0, 0.0));

        let mut steps = 0;
        for _ in 0..60 {
            steps += physics.advance(Duration::from_micros(16_667));
        }
        assert_eq!(steps, 60);

        let position = physics.actor_position().expect("actor exists");
        assert!((position.x - 3.5).abs() < 0.05, "x = {}", position.x);
        assert!((position.y - 1.5).abs() < 1e-3);
    }

    #[test]
    fn static_tiles_block_the_actor() {
        let mut physics = adapter();
        let _ = physics.add_static_tile(TileCoord::new(3, 1));
        physics.spawn_actor(Vec2::new(1.5, 1.5), 0.3);

        for _ in 0..120 {
            physics.set_actor_velocity(Vec2::new(2.0, 0.0));
            let _ = physics.advance(Duration::from_micros(16_667));
        }

        let position = physics.actor_position().expect("actor exists");
        assert!(position.x < 2.8, "actor passed through the box: {}", position.x);
        assert!(position.x > 2.5, "actor stopped early: {}", position.x);
    }
}
