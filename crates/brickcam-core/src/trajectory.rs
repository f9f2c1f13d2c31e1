//! Planning a full orbit of camera poses around an object.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::geometry::{compute_framing_distance, compute_object_frame, BoundingBox, ObjectFrame};
use crate::pose::{compose_orbit_pose, CameraPose, OrbitFrame, Shake};
use crate::random_walk::{WalkParams, WalkSampler};

/// When the camera height multiplier is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightSampling {
    /// One multiplier shared by every frame of the orbit.
    PerSession,
    /// A fresh multiplier for every frame.
    #[default]
    PerFrame,
}

/// Configuration of a capture trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectorySpec {
    /// Number of frames around the orbit.
    pub frame_count: usize,
    /// Camera field of view in radians.
    pub field_of_view: f64,
    /// Fraction of the field of view the object should fill.
    pub target_fill_ratio: f64,
    /// Camera height as a multiple of the framing distance, `[min, max]`.
    pub height_multiplier_range: [f64; 2],
    /// Extra space around the object as a fraction of its radius.
    pub margin_ratio: f64,
    /// When the height multiplier is drawn.
    pub height_sampling: HeightSampling,
    /// Walk of the look-at point (X/Y used).
    pub drift: WalkParams,
    /// Walk of the shake angle.
    pub shake_angle: WalkParams,
    /// Walk of the shake axis, normalized per frame.
    pub shake_axis: WalkParams,
}

impl Default for TrajectorySpec {
    fn default() -> Self {
        Self {
            frame_count: 1,
            field_of_view: 39.6_f64.to_radians(),
            target_fill_ratio: 0.65,
            height_multiplier_range: [0.8, 1.6],
            margin_ratio: 0.15,
            height_sampling: HeightSampling::PerFrame,
            drift: WalkParams::look_at_drift(),
            shake_angle: WalkParams::shake_angle(),
            shake_axis: WalkParams::shake_axis(),
        }
    }
}

impl TrajectorySpec {
    /// Default trajectory with `frame_count` frames.
    pub fn orbit(frame_count: usize) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Sets the field of view from degrees.
    #[must_use]
    pub fn with_fov_degrees(mut self, degrees: f64) -> Self {
        self.field_of_view = degrees.to_radians();
        self
    }

    /// Sets the target fill ratio.
    #[must_use]
    pub fn with_fill_ratio(mut self, fill_ratio: f64) -> Self {
        self.target_fill_ratio = fill_ratio;
        self
    }

    /// Sets the height multiplier range.
    #[must_use]
    pub fn with_height_range(mut self, min: f64, max: f64) -> Self {
        self.height_multiplier_range = [min, max];
        self
    }

    /// Sets when the height multiplier is drawn.
    #[must_use]
    pub fn with_height_sampling(mut self, sampling: HeightSampling) -> Self {
        self.height_sampling = sampling;
        self
    }

    /// Disables look-at drift and camera shake.
    ///
    /// Shake is switched off through its angle walk. Zeroing only the axis
    /// walk leaves no axis to rotate about and fails validation.
    #[must_use]
    pub fn steady(mut self) -> Self {
        self.drift = self.drift.with_step_magnitude(0.0);
        self.shake_angle = self.shake_angle.with_step_magnitude(0.0);
        self
    }

    /// Checks the parameters not covered by the geometry and walk checks.
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(CaptureError::invalid_parameter("frame count must be >= 1"));
        }
        let [min, max] = self.height_multiplier_range;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max < min {
            return Err(CaptureError::invalid_parameter(format!(
                "height multiplier range must satisfy 0 < min <= max, got [{min}, {max}]"
            )));
        }
        // A still axis walk stays at zero, which only a zero angle can rotate about.
        if self.shake_axis.step_magnitude == 0.0 && self.shake_angle.step_magnitude != 0.0 {
            return Err(CaptureError::invalid_parameter(
                "shake axis step must be > 0 while the shake angle varies; \
                 use steady() to disable shake",
            ));
        }
        Ok(())
    }
}

/// The outcome of trajectory planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPlan {
    /// Framing of the target object.
    pub object: ObjectFrame,
    /// Distance from the object center on the orbit plane.
    pub distance: f64,
    /// Height multiplier used for each frame.
    pub height_multipliers: Vec<f64>,
    /// One pose per frame, in orbit order.
    pub poses: Vec<CameraPose>,
}

impl TrajectoryPlan {
    /// Consumes the plan, keeping only the poses.
    pub fn into_poses(self) -> Vec<CameraPose> {
        self.poses
    }
}

/// Plans one camera pose per frame around the object enclosed by `bbox`.
///
/// Random draws happen in a fixed order (drift, shake angle, shake axis,
/// heights) so a seeded sampler always yields the same plan.
pub fn plan_trajectory(
    bbox: &BoundingBox,
    spec: &TrajectorySpec,
    sampler: &mut WalkSampler,
) -> Result<TrajectoryPlan> {
    spec.validate()?;

    let object = compute_object_frame(bbox, spec.margin_ratio)?;
    let distance = compute_framing_distance(
        object.radius,
        spec.field_of_view,
        spec.target_fill_ratio,
    )?;

    let frames = spec.frame_count;
    let drift = sampler.random_walk(frames, 3, &spec.drift)?;
    let shake_angle = sampler.random_walk(frames, 1, &spec.shake_angle)?;
    let shake_axis = sampler
        .random_walk(frames, 3, &spec.shake_axis)?
        .normalize_rows();

    let height_multipliers = sample_heights(sampler, spec);

    let mut poses = Vec::with_capacity(frames);
    for (index, &height) in height_multipliers.iter().enumerate() {
        let shake = Shake::new(
            shake_angle.scalar(index).unwrap_or(0.0),
            shake_axis.vec3(index).unwrap_or(DVec3::Z),
        );
        let pose = compose_orbit_pose(
            OrbitFrame::new(index, frames),
            &object,
            distance,
            height,
            drift.vec3(index).unwrap_or(DVec3::ZERO),
            &shake,
        )?;
        poses.push(pose);
    }

    log::info!(
        "planned {frames} camera poses at distance {distance:.3} (radius {:.3})",
        object.radius
    );

    Ok(TrajectoryPlan {
        object,
        distance,
        height_multipliers,
        poses,
    })
}

fn sample_heights(sampler: &mut WalkSampler, spec: &TrajectorySpec) -> Vec<f64> {
    let [min, max] = spec.height_multiplier_range;
    let mut draw = || {
        if max > min {
            sampler.rng().gen_range(min..max)
        } else {
            min
        }
    };

    match spec.height_sampling {
        HeightSampling::PerSession => vec![draw(); spec.frame_count],
        HeightSampling::PerFrame => (0..spec.frame_count).map(|_| draw()).collect(),
    }
}
