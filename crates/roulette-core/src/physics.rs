//! Physics contract consumed by marbles, and a `Rapier2D` implementation.
//!
//! Marbles never own their pose. They ask a [`MarblePhysics`] for it by id
//! every time it is read, and may request a one-shot shake when stuck.

use std::collections::HashMap;
use std::fmt;

use rapier2d::prelude::*;

use crate::marble::MarbleId;
use crate::rng::{RandomSource, SeededRandom};

/// Fixed timestep for physics simulation (60Hz).
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Radius of a marble's collider in world units.
pub const MARBLE_RADIUS: f32 = 0.25;

/// Largest impulse component applied by a shake.
const SHAKE_IMPULSE: f32 = 5.0;

/// Default gravity vector (downward, in world units/s²).
pub fn default_gravity() -> Vector {
    Vector::new(0.0, 10.0)
}

/// World-space pose of a marble.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarblePose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl MarblePose {
    pub const fn new(x: f32, y: f32, angle: f32) -> Self {
        Self { x, y, angle }
    }
}

/// What the core needs from the physics engine.
pub trait MarblePhysics {
    /// Current pose of marble `id`, or `None` when the engine does not know it.
    fn marble_position(&self, id: MarbleId) -> Option<MarblePose>;

    /// Creates the body for marble `id` at the given world position.
    fn create_marble(&mut self, id: MarbleId, x: f32, y: f32);

    /// Fire-and-forget disturbance to free a stuck marble.
    fn shake_marble(&mut self, id: MarbleId);

    /// Pose lookup that degrades to the origin for unknown ids.
    fn pose_or_default(&self, id: MarbleId) -> MarblePose {
        self.marble_position(id).unwrap_or_default()
    }
}

/// Physics world containing all `Rapier2D` components.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector,
    pub frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(default_gravity())
    }

    pub fn with_gravity(gravity: Vector) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity,
            frame: 0,
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.frame += 1;
    }

    pub fn add_rigid_body(&mut self, rigid_body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(rigid_body)
    }

    pub fn add_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Adds a collider without a parent (static stage geometry).
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }
}

/// [`MarblePhysics`] backed by a [`PhysicsWorld`].
#[derive(Debug)]
pub struct RapierMarblePhysics {
    world: PhysicsWorld,
    bodies: HashMap<MarbleId, RigidBodyHandle>,
    rng: SeededRandom,
}

impl RapierMarblePhysics {
    /// Creates an empty world; `seed` drives shake impulses.
    pub fn new(seed: u64) -> Self {
        Self {
            world: PhysicsWorld::new(),
            bodies: HashMap::new(),
            rng: SeededRandom::new(seed),
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable access for adding stage colliders.
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.world.step();
    }

    /// Removes every marble body, e.g. when the race is reset.
    pub fn clear_marbles(&mut self) {
        for (_, handle) in self.bodies.drain() {
            self.world.remove_rigid_body(handle);
        }
    }

    pub fn marble_count(&self) -> usize {
        self.bodies.len()
    }
}

impl MarblePhysics for RapierMarblePhysics {
    fn marble_position(&self, id: MarbleId) -> Option<MarblePose> {
        let handle = self.bodies.get(&id)?;
        let body = self.world.get_rigid_body(*handle)?;
        let pos = body.translation();
        Some(MarblePose::new(pos.x, pos.y, body.rotation().angle()))
    }

    fn create_marble(&mut self, id: MarbleId, x: f32, y: f32) {
        if let Some(old) = self.bodies.remove(&id) {
            tracing::warn!("[physics] Marble {} recreated, dropping previous body", id);
            self.world.remove_rigid_body(old);
        }

        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(x, y))
            .linear_damping(0.1)
            .angular_damping(0.1)
            .ccd_enabled(true)
            .build();
        let handle = self.world.add_rigid_body(rigid_body);

        let collider = ColliderBuilder::ball(MARBLE_RADIUS)
            .restitution(0.1)
            .friction(0.1)
            .density(1.0)
            .build();
        self.world.add_collider(collider, handle);

        self.bodies.insert(id, handle);
    }

    fn shake_marble(&mut self, id: MarbleId) {
        let Some(handle) = self.bodies.get(&id).copied() else {
            tracing::debug!("[physics] Shake requested for unknown marble {}", id);
            return;
        };
        let impulse = Vector::new(
            self.rng.range(-SHAKE_IMPULSE, SHAKE_IMPULSE),
            self.rng.range(-SHAKE_IMPULSE, SHAKE_IMPULSE),
        );
        if let Some(body) = self.world.get_rigid_body_mut(handle) {
            body.apply_impulse(impulse, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.frame, 0);
        assert_eq!(world.integration_parameters.dt, PHYSICS_DT);
    }

    #[test]
    fn test_created_marble_has_pose() {
        let mut physics = RapierMarblePhysics::new(1);
        physics.create_marble(3, 10.0, 2.0);

        let pose = physics.marble_position(3).unwrap();
        assert_eq!(pose.x, 10.0);
        assert_eq!(pose.y, 2.0);
        assert!(physics.marble_position(4).is_none());
        assert_eq!(physics.pose_or_default(4), MarblePose::default());
    }

    #[test]
    fn test_marble_falls_under_gravity() {
        let mut physics = RapierMarblePhysics::new(1);
        physics.create_marble(0, 0.0, 0.0);
        for _ in 0..30 {
            physics.step();
        }
        assert!(physics.marble_position(0).unwrap().y > 0.0);
    }

    #[test]
    fn test_marble_rests_on_static_floor() {
        let mut physics = RapierMarblePhysics::new(1);
        let floor = ColliderBuilder::cuboid(10.0, 0.5)
            .translation(Vector::new(0.0, 2.5))
            .build();
        physics.world_mut().add_static_collider(floor);
        physics.create_marble(0, 0.0, 0.0);

        for _ in 0..300 {
            physics.step();
        }
        let pose = physics.marble_position(0).unwrap();
        assert!(pose.y > 1.0 && pose.y < 2.0);
    }

    #[test]
    fn test_shake_moves_resting_marble() {
        let mut physics = RapierMarblePhysics::new(99);
        physics.world_mut().gravity = Vector::new(0.0, 0.0);
        physics.create_marble(0, 5.0, 5.0);

        physics.shake_marble(0);
        physics.step();

        let pose = physics.marble_position(0).unwrap();
        assert!((pose.x - 5.0).abs() > 0.0 || (pose.y - 5.0).abs() > 0.0);
    }

    #[test]
    fn test_recreate_and_clear() {
        let mut physics = RapierMarblePhysics::new(1);
        physics.create_marble(0, 0.0, 0.0);
        physics.create_marble(0, 1.0, 1.0);
        assert_eq!(physics.marble_count(), 1);
        assert_eq!(physics.marble_position(0).unwrap().x, 1.0);

        physics.clear_marbles();
        assert_eq!(physics.marble_count(), 0);
        assert_eq!(physics.world().rigid_body_set.len(), 0);
        physics.shake_marble(0);
    }
}
