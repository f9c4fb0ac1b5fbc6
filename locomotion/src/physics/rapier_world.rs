use cgmath::{Quaternion, Vector3, vec3};
use engine::physics_log;
use rapier3d::parry::shape::Capsule;
use rapier3d::prelude::*;

use super::{
    LineHit, PlayerBody, SceneQuery,
    util::{nquat_to_quat, nvec_to_cgmath, npoint_to_cgvec, quat_to_nquat, vec_to_npoint, vec_to_nvec},
};
use crate::config::PlayerConfig;

/// Static level geometry understood by [`RapierLocomotionWorld`].
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    /// Axis-aligned box centred on `center`
    Cuboid {
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
    },
    /// Box rotated about the x axis, useful for ramps
    Ramp {
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        pitch_degrees: f32,
    },
}

/// A rapier scene with fixed level colliders and one dynamic capsule player.
///
/// Scene queries exclude the player body. Disabling collisions disables the
/// player's collider, disabling gravity zeroes its gravity scale.
pub struct RapierLocomotionWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query_pipeline: QueryPipeline,
    physics_pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    integration_parameters: IntegrationParameters,
    gravity: Vector<Real>,
    player: RigidBodyHandle,
    player_collider: ColliderHandle,
    // Distance from the feet to the body's centre of mass
    feet_to_center: f32,
}

impl RapierLocomotionWorld {
    pub fn new(level: &[StaticShape], player: &PlayerConfig, spawn_feet: Vector3<f32>) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for shape in level {
            let collider = match *shape {
                StaticShape::Cuboid {
                    center,
                    half_extents,
                } => ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                    .translation(vec_to_nvec(center))
                    .build(),
                StaticShape::Ramp {
                    center,
                    half_extents,
                    pitch_degrees,
                } => ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                    .translation(vec_to_nvec(center))
                    .rotation(vector![pitch_degrees.to_radians(), 0.0, 0.0])
                    .build(),
            };
            colliders.insert(collider);
        }

        let feet_to_center = player.capsule_height * 0.5;
        let half_segment = (player.capsule_height * 0.5 - player.capsule_radius).max(0.0);

        let body = RigidBodyBuilder::dynamic()
            .translation(vec_to_nvec(spawn_feet + vec3(0.0, feet_to_center, 0.0)))
            .lock_rotations()
            .can_sleep(false)
            .build();
        let player_handle = bodies.insert(body);
        let player_collider = colliders.insert_with_parent(
            ColliderBuilder::capsule_y(half_segment, player.capsule_radius)
                .friction(0.0)
                .friction_combine_rule(CoefficientCombineRule::Min)
                .build(),
            player_handle,
            &mut bodies,
        );

        let mut query_pipeline = QueryPipeline::new();
        query_pipeline.update(&bodies, &colliders);

        physics_log!(
            DEBUG,
            statics = level.len(),
            "built locomotion physics world"
        );

        Self {
            bodies,
            colliders,
            query_pipeline,
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            integration_parameters: IntegrationParameters::default(),
            gravity: vector![0.0, -9.81, 0.0],
            player: player_handle,
            player_collider,
            feet_to_center,
        }
    }

    /// Integrate the simulation by `dt` seconds and refresh the query structures.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn player_body(&self) -> &RigidBody {
        &self.bodies[self.player]
    }

    fn player_body_mut(&mut self) -> &mut RigidBody {
        &mut self.bodies[self.player]
    }

    fn query_filter(&self) -> QueryFilter<'_> {
        QueryFilter::default()
            .exclude_rigid_body(self.player)
            .exclude_sensors()
    }
}

impl SceneQuery for RapierLocomotionWorld {
    fn line_cast(&self, from: Vector3<f32>, to: Vector3<f32>) -> Option<LineHit> {
        let delta = to - from;
        if delta == vec3(0.0, 0.0, 0.0) {
            return None;
        }

        // Unnormalized direction: time of impact is the fraction along the segment
        let ray = Ray::new(vec_to_npoint(from), vec_to_nvec(delta));
        let (_handle, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            1.0,
            true,
            self.query_filter(),
        )?;

        Some(LineHit {
            point: npoint_to_cgvec(ray.point_at(intersection.time_of_impact)),
            normal: nvec_to_cgmath(intersection.normal),
        })
    }

    fn capsule_overlap(&self, bottom: Vector3<f32>, top: Vector3<f32>, radius: f32) -> bool {
        let capsule = Capsule::new(vec_to_npoint(bottom), vec_to_npoint(top), radius);
        self.query_pipeline
            .intersection_with_shape(
                &self.bodies,
                &self.colliders,
                &Isometry::identity(),
                &capsule,
                self.query_filter(),
            )
            .is_some()
    }
}

impl PlayerBody for RapierLocomotionWorld {
    fn position(&self) -> Vector3<f32> {
        nvec_to_cgmath(*self.player_body().translation()) - vec3(0.0, self.feet_to_center, 0.0)
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        let center = vec_to_nvec(position + vec3(0.0, self.feet_to_center, 0.0));
        self.player_body_mut().set_translation(center, true);
    }

    fn rotation(&self) -> Quaternion<f32> {
        nquat_to_quat(*self.player_body().rotation())
    }

    fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.player_body_mut()
            .set_rotation(quat_to_nquat(rotation), true);
    }

    fn velocity(&self) -> Vector3<f32> {
        nvec_to_cgmath(*self.player_body().linvel())
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.player_body_mut()
            .set_linvel(vec_to_nvec(velocity), true);
    }

    fn collisions_enabled(&self) -> bool {
        self.colliders[self.player_collider].is_enabled()
    }

    fn set_collisions_enabled(&mut self, enabled: bool) {
        self.colliders[self.player_collider].set_enabled(enabled);
    }

    fn gravity_enabled(&self) -> bool {
        self.player_body().gravity_scale() != 0.0
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        let scale = if enabled { 1.0 } else { 0.0 };
        self.player_body_mut().set_gravity_scale(scale, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::assert_vec_near;

    fn floor_level() -> Vec<StaticShape> {
        vec![
            StaticShape::Cuboid {
                center: vec3(0.0, -0.5, 0.0),
                half_extents: vec3(20.0, 0.5, 20.0),
            },
            StaticShape::Cuboid {
                center: vec3(0.0, 1.5, -6.0),
                half_extents: vec3(3.0, 1.5, 0.25),
            },
        ]
    }

    fn world() -> RapierLocomotionWorld {
        RapierLocomotionWorld::new(&floor_level(), &PlayerConfig::default(), vec3(0.0, 0.0, 0.0))
    }

    #[test]
    fn test_line_cast_hits_floor() {
        let world = world();
        let hit = world
            .line_cast(vec3(2.0, 2.0, 2.0), vec3(2.0, -2.0, 2.0))
            .expect("floor hit");
        assert!((hit.point.y).abs() < 1e-3);
        assert!((hit.normal.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_cast_ignores_player() {
        let world = world();
        // Straight through the player's capsule and stopping above the floor
        assert!(world
            .line_cast(vec3(-2.0, 1.0, 0.0), vec3(2.0, 1.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_capsule_overlap_against_wall() {
        let world = world();
        assert!(world.capsule_overlap(vec3(0.0, 0.5, -6.0), vec3(0.0, 1.5, -6.0), 0.3));
        assert!(!world.capsule_overlap(vec3(0.0, 0.5, 3.0), vec3(0.0, 1.5, 3.0), 0.3));
    }

    #[test]
    fn test_player_body_round_trips_feet_position() {
        let mut world = world();
        world.set_position(vec3(1.0, 0.5, 2.0));
        assert_vec_near(world.position(), vec3(1.0, 0.5, 2.0), 1e-5);

        world.set_gravity_enabled(false);
        world.set_collisions_enabled(false);
        assert!(!world.gravity_enabled());
        assert!(!world.collisions_enabled());
        world.set_gravity_enabled(true);
        world.set_collisions_enabled(true);
        assert!(world.gravity_enabled());
        assert!(world.collisions_enabled());
    }

    #[test]
    fn test_step_applies_velocity() {
        let mut world = world();
        world.set_position(vec3(0.0, 0.01, 0.0));
        world.set_velocity(vec3(1.0, 0.0, 0.0));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        assert!(world.position().x > 0.1);
    }
}
