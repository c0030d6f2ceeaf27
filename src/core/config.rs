use crate::collision::BoundingBox;
use crate::math::Vector;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How contacts are turned into motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ResolutionStrategy {
    /// Axis-aligned position correction only, no velocity exchange
    #[default]
    Box,

    /// Impulse along the contact normal using mass, bounciness and friction
    RigidBody,
}

/// Configuration parameters for the collision simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Whether stepping does anything at all
    pub enabled: bool,

    /// Global acceleration (e.g. gravity) in px/s², applied only to Active bodies
    pub acc: Vector,

    /// The resolution strategy applied to every contact
    pub resolution_strategy: ResolutionStrategy,

    /// Whether to sweep fast bodies with a ray cast to prevent tunneling
    pub check_for_fast_bodies: bool,

    /// Sweep every Active body regardless of its speed
    pub disable_minimum_speed_for_fast_body: bool,

    /// Gap left between a swept fast body and the surface it hit, in px
    pub surface_epsilon: f32,

    /// Fraction of the step re-integrated after resolution
    pub collision_shift: f32,

    /// Number of broadphase/narrowphase/resolve passes per step
    pub collision_passes: u32,

    /// Whether the rigid body strategy changes angular velocity
    pub allow_rigid_body_rotation: bool,

    /// Padding added around re-inserted dynamic tree leaves, in px
    pub bounds_padding: f32,

    /// How far leaves are stretched along a body's velocity
    pub dynamic_tree_velocity_multiplier: f32,

    /// Mass given to bodies that don't specify one
    pub default_mass: f32,

    /// Bodies whose bounds leave this box are dropped from the dynamic tree
    pub world_bounds: BoundingBox,

    /// Collect contact points for debug inspection
    pub show_contacts: bool,

    /// Collect contact normals for debug inspection
    pub show_collision_normals: bool,

    /// Expose dynamic tree node bounds for debug inspection
    pub broadphase_debug: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            acc: Vector::ZERO,
            resolution_strategy: ResolutionStrategy::Box,
            check_for_fast_bodies: true,
            disable_minimum_speed_for_fast_body: false,
            surface_epsilon: 0.1,
            collision_shift: 0.001,
            collision_passes: 5,
            allow_rigid_body_rotation: true,
            bounds_padding: 5.0,
            dynamic_tree_velocity_multiplier: 2.0,
            default_mass: 10.0,
            world_bounds: BoundingBox::everything(),
            show_contacts: false,
            show_collision_normals: false,
            broadphase_debug: false,
        }
    }
}

impl SimulationConfig {
    /// Default configuration using the rigid body strategy
    pub fn rigid_body() -> Self {
        Self {
            resolution_strategy: ResolutionStrategy::RigidBody,
            ..Self::default()
        }
    }
}
