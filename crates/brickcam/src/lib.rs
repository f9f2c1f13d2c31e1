//! brickcam: plan synthetic camera captures of a single brick model.
//!
//! The heavy lifting (mesh import, physics, rendering) belongs to a host
//! application. brickcam computes everything around it: where the brick
//! rests, where the camera goes for each frame, and where the light sits.
//!
//! # Quick Start
//!
//! ```no_run
//! use brickcam::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let min = DVec3::new(-0.4, -0.2, 0.0);
//!     let bounds = BoundingBox::from_extents(min, DVec3::new(0.4, 0.2, 0.28));
//!     let mut sampler = WalkSampler::seeded(7);
//!     let plan = plan_trajectory(&bounds, &TrajectorySpec::orbit(8), &mut sampler)?;
//!
//!     for pose in &plan.poses {
//!         println!("{:?}", pose.to_matrix());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Full captures
//!
//! [`CaptureSession`] runs the whole sequence against a host that implements
//! [`PhysicsEngine`] and [`Renderer`].

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod session;

pub use session::{CaptureReport, CaptureSession, Placement};

// Re-export core types
pub use brickcam_core::{
    compose_orbit_pose, compute_framing_distance, compute_object_frame, look_at_rotation,
    plan_trajectory, BoundingBox, CameraPose, CaptureError, DMat3, DMat4, DVec3, HeightSampling,
    ObjectFrame, OrbitFrame, RandomWalkSeries, Result, Shake, StepDistribution, TrajectoryPlan,
    TrajectorySpec, WalkParams, WalkSampler,
};

// Re-export scene types
pub use brickcam_scene::{
    CaptureSettings, DatasetOutput, DropConfig, DropPlan, GroundPlane, ImporterPreferences,
    LightConfig, OutputMode, PhysicsEngine, PointLight, RenderRequest, RenderedFrame, Renderer,
    RigidBody, RigidBodyParams, SegmentationCategory, SimulationParams,
};

/// Initializes logging from the `RUST_LOG` environment variable.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::debug!("brickcam logging initialized");
}
