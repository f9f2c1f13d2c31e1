//! Core math for brickcam.
//!
//! This crate holds everything about a capture that does not depend on a host
//! application:
//! - [`BoundingBox`] statistics and the framing distance for a field of view
//! - [`WalkSampler`] for smoothed, bounded random walks (drift and shake)
//! - [`compose_orbit_pose`] and [`plan_trajectory`] for camera poses
//!
//! All functions take plain values and return plain values. Randomness comes
//! only from the [`WalkSampler`] passed in by the caller.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod geometry;
pub mod pose;
pub mod random_walk;
pub mod trajectory;

pub use error::{CaptureError, Result};
pub use geometry::{compute_framing_distance, compute_object_frame, BoundingBox, ObjectFrame};
pub use pose::{
    compose_orbit_pose, look_at_rotation, CameraPose, OrbitFrame, Shake, ORTHONORMAL_TOLERANCE,
};
pub use random_walk::{RandomWalkSeries, StepDistribution, WalkParams, WalkSampler};
pub use trajectory::{plan_trajectory, HeightSampling, TrajectoryPlan, TrajectorySpec};

// Re-export glam types for convenience
pub use glam::{DMat3, DMat4, DQuat, DVec3};
