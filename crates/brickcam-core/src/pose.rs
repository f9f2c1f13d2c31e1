//! Camera poses orbiting an object.
//!
//! Cameras follow the renderer convention of looking down their local `-Z`
//! axis with local `+Y` up. Look-at orientations use world `+Z` as the up
//! reference, falling back to world `+Y` when the view direction is vertical.

use glam::{DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::geometry::ObjectFrame;

/// Tolerance used for orthonormality checks.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// Squared length below which a direction is treated as zero.
const DEGENERATE_LENGTH_SQUARED: f64 = 1e-24;

/// A camera position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: DVec3,
    /// Camera-to-world rotation; columns are the camera's right, up and back axes.
    pub rotation: DMat3,
}

impl CameraPose {
    /// Direction the camera looks along.
    pub fn forward(&self) -> DVec3 {
        -self.rotation.z_axis
    }

    /// Camera up axis in world space.
    pub fn up(&self) -> DVec3 {
        self.rotation.y_axis
    }

    /// Camera right axis in world space.
    pub fn right(&self) -> DVec3 {
        self.rotation.x_axis
    }

    /// Camera-to-world transform handed to the renderer.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_cols(
            self.rotation.x_axis.extend(0.0),
            self.rotation.y_axis.extend(0.0),
            self.rotation.z_axis.extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// Whether the rotation columns are unit length, mutually orthogonal and right-handed.
    pub fn is_orthonormal(&self) -> bool {
        let (x, y, z) = (
            self.rotation.x_axis,
            self.rotation.y_axis,
            self.rotation.z_axis,
        );
        let tol = ORTHONORMAL_TOLERANCE;
        (x.dot(x) - 1.0).abs() < tol
            && (y.dot(y) - 1.0).abs() < tol
            && (z.dot(z) - 1.0).abs() < tol
            && x.dot(y).abs() < tol
            && y.dot(z).abs() < tol
            && z.dot(x).abs() < tol
            && (self.rotation.determinant() - 1.0).abs() < tol
    }
}

/// Position of a frame within an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitFrame {
    /// Zero-based frame index.
    pub index: usize,
    /// Total number of frames in the orbit.
    pub count: usize,
}

impl OrbitFrame {
    /// Creates a frame descriptor.
    pub fn new(index: usize, count: usize) -> Self {
        Self { index, count }
    }

    /// Orbit angle of this frame in radians.
    #[allow(clippy::cast_precision_loss)]
    pub fn angle(&self) -> f64 {
        std::f64::consts::TAU * self.index as f64 / self.count as f64
    }
}

/// Rotational camera shake as an axis-angle pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shake {
    /// Rotation angle in radians.
    pub angle: f64,
    /// Rotation axis; normalized before use.
    pub axis: DVec3,
}

impl Shake {
    /// No shake at all.
    pub const NONE: Self = Self {
        angle: 0.0,
        axis: DVec3::Z,
    };

    /// Creates a shake rotation.
    pub fn new(angle: f64, axis: DVec3) -> Self {
        Self { angle, axis }
    }

    /// Rotation matrix of this shake.
    pub fn rotation(&self) -> Result<DMat3> {
        if !self.angle.is_finite() {
            return Err(CaptureError::invalid_parameter(format!(
                "shake angle must be finite, got {}",
                self.angle
            )));
        }
        if self.angle == 0.0 {
            return Ok(DMat3::IDENTITY);
        }
        if !self.axis.is_finite() || self.axis.length_squared() < DEGENERATE_LENGTH_SQUARED {
            return Err(CaptureError::invalid_parameter(
                "shake axis must be a finite non-zero vector",
            ));
        }
        Ok(DMat3::from_axis_angle(self.axis.normalize(), self.angle))
    }
}

impl Default for Shake {
    fn default() -> Self {
        Self::NONE
    }
}

/// Builds a camera rotation whose forward axis is `forward`.
pub fn look_at_rotation(forward: DVec3) -> Result<DMat3> {
    if !forward.is_finite() || forward.length_squared() < DEGENERATE_LENGTH_SQUARED {
        return Err(CaptureError::DegenerateOrientation);
    }
    let forward = forward.normalize();

    let mut right = forward.cross(DVec3::Z);
    if right.length_squared() < DEGENERATE_LENGTH_SQUARED {
        right = forward.cross(DVec3::Y);
    }
    let right = right.normalize();
    let up = right.cross(forward);

    Ok(DMat3::from_cols(right, up, -forward))
}

/// Composes the camera pose for one frame of an orbit around `object`.
///
/// The camera sits on a circle of radius `distance` around the object center,
/// raised by `height_multiplier * distance`. It looks at the center shifted in
/// X/Y by `drift`, then the shake rotation is applied on top in world space.
pub fn compose_orbit_pose(
    frame: OrbitFrame,
    object: &ObjectFrame,
    distance: f64,
    height_multiplier: f64,
    drift: DVec3,
    shake: &Shake,
) -> Result<CameraPose> {
    if frame.count == 0 || frame.index >= frame.count {
        return Err(CaptureError::invalid_parameter(format!(
            "frame index {} out of range for {} frames",
            frame.index, frame.count
        )));
    }
    if !distance.is_finite() || !height_multiplier.is_finite() || !drift.is_finite() {
        return Err(CaptureError::invalid_parameter(
            "distance, height and drift must be finite",
        ));
    }

    let angle = frame.angle();
    let height = height_multiplier * distance;
    let position = object.center
        + DVec3::new(distance * angle.cos(), distance * angle.sin(), height);

    let look_target = DVec3::new(
        object.center.x + drift.x,
        object.center.y + drift.y,
        object.center.z,
    );

    let base = look_at_rotation(look_target - position)?;
    let rotation = shake.rotation()? * base;

    log::debug!(
        "orbit frame {}/{}: position={position:?} target={look_target:?}",
        frame.index,
        frame.count
    );

    Ok(CameraPose { position, rotation })
}
