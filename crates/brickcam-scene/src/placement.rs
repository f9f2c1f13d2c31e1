//! Brick placement: ground plane sizing, drop pose and rigid-body setup.
//!
//! A capture either drops the brick from above with a random orientation and
//! lets the physics engine settle it, or rests it upright on the ground.

use std::f64::consts::TAU;

use brickcam_core::{BoundingBox, CaptureError, DMat3, DMat4, DVec3, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::lighting::SegmentationCategory;

/// Ground plane half-size as a multiple of the brick's largest horizontal extent.
pub const GROUND_PLANE_SCALE_FACTOR: f64 = 50.0;

/// Drop height as a multiple of the brick's vertical extent.
pub const DROP_HEIGHT_FACTOR: f64 = 10.0;

/// Scene object name of the brick.
pub const BRICK_OBJECT_NAME: &str = "brick";

/// Scene object name of the ground plane.
pub const GROUND_OBJECT_NAME: &str = "ground";

/// Vertical shift that puts the lowest corner of `bbox` on the ground.
pub fn ground_offset(bbox: &BoundingBox, ground_height: f64) -> f64 {
    ground_height - bbox.lowest_z()
}

/// Scale of the unit ground plane primitive for a brick of this size.
pub fn ground_plane_scale(bbox: &BoundingBox) -> f64 {
    let extent = bbox.extent();
    extent.x.max(extent.y) * GROUND_PLANE_SCALE_FACTOR
}

/// Height the brick is released from before simulation.
pub fn drop_height(bbox: &BoundingBox) -> f64 {
    bbox.extent().z * DROP_HEIGHT_FACTOR
}

/// Rotation for Euler angles applied in X, then Y, then Z order (world axes).
pub fn rotation_from_euler_xyz(angles: DVec3) -> DMat3 {
    DMat3::from_rotation_z(angles.z)
        * DMat3::from_rotation_y(angles.y)
        * DMat3::from_rotation_x(angles.x)
}

/// Rigid-body parameters handed to the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyParams {
    /// Whether the body moves under simulation.
    pub active: bool,
    pub friction: f64,
    pub angular_damping: f64,
    pub linear_damping: f64,
    /// Mass in kilograms; passive bodies have none.
    pub mass: Option<f64>,
}

impl RigidBodyParams {
    /// The falling brick.
    pub fn brick() -> Self {
        Self {
            active: true,
            friction: 0.1,
            angular_damping: 0.01,
            linear_damping: 0.01,
            mass: Some(0.5),
        }
    }

    /// The static ground.
    pub fn ground() -> Self {
        Self {
            active: false,
            mass: None,
            ..Self::brick()
        }
    }
}

/// Time window the physics engine simulates before fixing final poses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Minimum simulated time in seconds.
    pub min_simulation_time: f64,
    /// Maximum simulated time in seconds.
    pub max_simulation_time: f64,
    /// Interval in seconds between checks for bodies at rest.
    pub check_object_interval: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            min_simulation_time: 0.5,
            max_simulation_time: 5.0,
            check_object_interval: 1.0,
        }
    }
}

/// A body registered with the physics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Scene object name.
    pub name: String,
    /// Object-to-world transform at the start of the simulation.
    pub initial_transform: DMat4,
    /// Bounds in object space.
    pub local_bounds: BoundingBox,
    pub params: RigidBodyParams,
    pub category: SegmentationCategory,
}

/// The ground plane created under the brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    /// Plane center.
    pub location: DVec3,
    /// Scale of the 2x2 plane primitive.
    pub scale: DVec3,
    /// RGBA base color of its diffuse material.
    pub base_color: [f64; 4],
}

impl GroundPlane {
    /// A plane at the origin, far larger than the brick.
    pub fn for_object(bbox: &BoundingBox) -> Self {
        let s = ground_plane_scale(bbox);
        Self {
            location: DVec3::ZERO,
            scale: DVec3::new(s, s, 1.0),
            base_color: [1.0, 0.75, 0.8, 1.0],
        }
    }

    /// Passive rigid body for the plane. Its bounds are the flat 2x2 primitive.
    pub fn rigid_body(&self) -> RigidBody {
        RigidBody {
            name: GROUND_OBJECT_NAME.to_string(),
            initial_transform: DMat4::from_scale_rotation_translation(
                self.scale,
                glam::DQuat::IDENTITY,
                self.location,
            ),
            local_bounds: BoundingBox::from_extents(
                DVec3::new(-1.0, -1.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
            ),
            params: RigidBodyParams::ground(),
            category: SegmentationCategory::Background,
        }
    }
}

/// Configuration of the brick drop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Probability that the brick is dropped and simulated.
    pub simulate_probability: f64,
    pub brick: RigidBodyParams,
    pub simulation: SimulationParams,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            simulate_probability: 0.8,
            brick: RigidBodyParams::brick(),
            simulation: SimulationParams::default(),
        }
    }
}

/// How the brick is placed before capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DropPlan {
    /// Released above the ground with a random orientation, then simulated.
    Simulated {
        /// Euler angles (radians) applied in X, Y, Z order.
        rotation_euler: DVec3,
        /// Release height of the object origin.
        height: f64,
    },
    /// Upright, resting on the ground.
    Resting,
}

impl DropPlan {
    /// Object-to-world transform before any simulation.
    pub fn initial_transform(&self, bbox: &BoundingBox) -> DMat4 {
        match *self {
            DropPlan::Simulated {
                rotation_euler,
                height,
            } => {
                DMat4::from_translation(DVec3::new(0.0, 0.0, height))
                    * DMat4::from_mat3(rotation_from_euler_xyz(rotation_euler))
            }
            DropPlan::Resting => {
                DMat4::from_translation(DVec3::new(0.0, 0.0, ground_offset(bbox, 0.0)))
            }
        }
    }

    /// Whether the physics engine must run.
    pub fn needs_simulation(&self) -> bool {
        matches!(self, DropPlan::Simulated { .. })
    }
}

/// Decides how the brick enclosed by `bbox` is placed.
pub fn plan_drop<R: Rng + ?Sized>(
    bbox: &BoundingBox,
    config: &DropConfig,
    rng: &mut R,
) -> Result<DropPlan> {
    let p = config.simulate_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(CaptureError::InvalidParameter(format!(
            "drop probability must be in [0, 1], got {p}"
        )));
    }

    let plan = if rng.gen::<f64>() < p {
        DropPlan::Simulated {
            rotation_euler: DVec3::new(
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            ),
            height: drop_height(bbox),
        }
    } else {
        DropPlan::Resting
    };
    log::debug!("drop plan: {plan:?}");
    Ok(plan)
}
