//! Bounding-box statistics and framing distance.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

/// The eight corners of a box enclosing a mesh.
///
/// Corners may come from an axis-aligned box or from an object-space box
/// that has been moved by a rigid transform; only their positions matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    corners: [DVec3; 8],
}

impl BoundingBox {
    /// Creates a bounding box from exactly eight corner points.
    pub fn from_corners(points: &[DVec3]) -> Result<Self> {
        let corners: [DVec3; 8] = points.try_into().map_err(|_| {
            CaptureError::invalid_geometry(format!(
                "bounding box needs 8 corners, got {}",
                points.len()
            ))
        })?;
        Ok(Self { corners })
    }

    /// Creates an axis-aligned bounding box from its extreme corners.
    ///
    /// Corner order matches the host's `bound_box` layout: x-major, then y, then z,
    /// walking the y/z face as a loop.
    pub fn from_extents(min: DVec3, max: DVec3) -> Self {
        Self {
            corners: [
                DVec3::new(min.x, min.y, min.z),
                DVec3::new(min.x, min.y, max.z),
                DVec3::new(min.x, max.y, max.z),
                DVec3::new(min.x, max.y, min.z),
                DVec3::new(max.x, min.y, min.z),
                DVec3::new(max.x, min.y, max.z),
                DVec3::new(max.x, max.y, max.z),
                DVec3::new(max.x, max.y, min.z),
            ],
        }
    }

    /// Returns the corner points.
    pub fn corners(&self) -> &[DVec3; 8] {
        &self.corners
    }

    /// Component-wise minimum over all corners.
    pub fn min(&self) -> DVec3 {
        self.corners
            .iter()
            .fold(DVec3::splat(f64::INFINITY), |acc, c| acc.min(*c))
    }

    /// Component-wise maximum over all corners.
    pub fn max(&self) -> DVec3 {
        self.corners
            .iter()
            .fold(DVec3::splat(f64::NEG_INFINITY), |acc, c| acc.max(*c))
    }

    /// Size of the box along each world axis.
    pub fn extent(&self) -> DVec3 {
        self.max() - self.min()
    }

    /// Height of the lowest corner.
    pub fn lowest_z(&self) -> f64 {
        self.min().z
    }

    /// Whether every coordinate of every corner is finite.
    pub fn is_finite(&self) -> bool {
        self.corners.iter().all(|c| c.is_finite())
    }

    /// Applies an affine transform to every corner.
    #[must_use]
    pub fn transformed(&self, transform: &DMat4) -> Self {
        Self {
            corners: self.corners.map(|c| transform.transform_point3(c)),
        }
    }

    /// Moves every corner by `offset`.
    #[must_use]
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            corners: self.corners.map(|c| c + offset),
        }
    }
}

/// Center and enclosing radius of an object, derived from its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectFrame {
    /// Mean of the bounding box corners.
    pub center: DVec3,
    /// Enclosing radius, margin included.
    pub radius: f64,
    /// Absolute amount added to the raw radius.
    pub margin: f64,
}

/// Computes the center and margin-padded radius of a bounding box.
///
/// The radius is the largest corner distance from the mean corner, scaled by
/// `1 + margin_ratio`.
pub fn compute_object_frame(bbox: &BoundingBox, margin_ratio: f64) -> Result<ObjectFrame> {
    if !bbox.is_finite() {
        return Err(CaptureError::invalid_geometry(
            "bounding box has non-finite coordinates",
        ));
    }
    if !margin_ratio.is_finite() || margin_ratio < 0.0 {
        return Err(CaptureError::invalid_parameter(format!(
            "margin ratio must be finite and >= 0, got {margin_ratio}"
        )));
    }

    let corners = bbox.corners();
    #[allow(clippy::cast_precision_loss)]
    let center = corners.iter().copied().sum::<DVec3>() / corners.len() as f64;
    let raw_radius = corners
        .iter()
        .map(|c| c.distance(center))
        .fold(0.0_f64, f64::max);
    let margin = raw_radius * margin_ratio;

    Ok(ObjectFrame {
        center,
        radius: raw_radius + margin,
        margin,
    })
}

/// Distance at which a sphere of `radius` fills `fill_ratio` of the field of view.
pub fn compute_framing_distance(radius: f64, fov: f64, fill_ratio: f64) -> Result<f64> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(CaptureError::invalid_parameter(format!(
            "radius must be > 0, got {radius}"
        )));
    }
    if !fov.is_finite() || fov <= 0.0 || fov >= std::f64::consts::PI {
        return Err(CaptureError::invalid_parameter(format!(
            "field of view must be in (0, pi), got {fov}"
        )));
    }
    if !fill_ratio.is_finite() || fill_ratio <= 0.0 || fill_ratio > 1.0 {
        return Err(CaptureError::invalid_parameter(format!(
            "fill ratio must be in (0, 1], got {fill_ratio}"
        )));
    }

    Ok((radius / fill_ratio) / (fov / 2.0).tan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_cube() -> BoundingBox {
        BoundingBox::from_extents(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    #[test]
    fn test_from_corners_requires_eight_points() {
        assert!(BoundingBox::from_corners(&[]).is_err());
        assert!(BoundingBox::from_corners(&[DVec3::ZERO; 7]).is_err());
        assert!(BoundingBox::from_corners(&[DVec3::ZERO; 8]).is_ok());
    }

    #[test]
    fn test_cube_object_frame() {
        let frame = compute_object_frame(&unit_cube(), 0.0).unwrap();
        assert!(frame.center.length() < 1e-12);
        assert!((frame.radius - 3.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(frame.margin, 0.0);
    }

    #[test]
    fn test_margin_scales_radius() {
        let frame = compute_object_frame(&unit_cube(), 0.15).unwrap();
        let raw = 3.0_f64.sqrt();
        assert!((frame.radius - raw * 1.15).abs() < 1e-12);
        assert!((frame.margin - raw * 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_corner_rejected() {
        let mut corners = *unit_cube().corners();
        corners[3].y = f64::NAN;
        let bbox = BoundingBox::from_corners(&corners).unwrap();
        assert!(matches!(
            compute_object_frame(&bbox, 0.0),
            Err(CaptureError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_negative_margin_rejected() {
        assert!(matches!(
            compute_object_frame(&unit_cube(), -0.1),
            Err(CaptureError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_cube_framing_distance() {
        // 39.6 degrees, the host's default lens.
        let distance = compute_framing_distance(3.0_f64.sqrt(), 0.691, 0.65).unwrap();
        assert!((distance - 7.40).abs() < 0.01, "distance = {distance}");
    }

    #[test]
    fn test_framing_distance_rejects_bad_parameters() {
        use std::f64::consts::PI;
        assert!(compute_framing_distance(0.0, 1.0, 0.5).is_err());
        assert!(compute_framing_distance(1.0, PI, 0.5).is_err());
        assert!(compute_framing_distance(1.0, 0.0, 0.5).is_err());
        assert!(compute_framing_distance(1.0, 1.0, 0.0).is_err());
        assert!(compute_framing_distance(1.0, 1.0, 1.5).is_err());
        assert!(compute_framing_distance(1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_extents_and_transform() {
        let bbox = BoundingBox::from_extents(DVec3::new(0.0, 0.0, 0.0), DVec3::new(2.0, 4.0, 1.0));
        assert_eq!(bbox.extent(), DVec3::new(2.0, 4.0, 1.0));
        assert_eq!(bbox.lowest_z(), 0.0);

        let moved = bbox.transformed(&DMat4::from_translation(DVec3::new(0.0, 0.0, 3.0)));
        assert_eq!(moved.lowest_z(), 3.0);
        assert_eq!(moved.extent(), bbox.extent());
        assert_eq!(bbox.translated(DVec3::Z * 3.0), moved);
    }

    fn arb_point() -> impl Strategy<Value = DVec3> {
        (-100.0..100.0_f64, -100.0..100.0_f64, -100.0..100.0_f64)
            .prop_map(|(x, y, z)| DVec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_center_is_corner_mean(points in prop::collection::vec(arb_point(), 8)) {
            let bbox = BoundingBox::from_corners(&points).unwrap();
            let frame = compute_object_frame(&bbox, 0.0).unwrap();
            let mean = points.iter().copied().sum::<DVec3>() / 8.0;
            prop_assert!((frame.center - mean).length() < 1e-9);
            prop_assert!(frame.radius >= 0.0);
        }

        #[test]
        fn prop_distance_positive_and_monotonic(
            radius in 0.001..1000.0_f64,
            extra in 0.001..100.0_f64,
            fov in 0.01..3.1_f64,
            fill in 0.01..=1.0_f64,
        ) {
            let near = compute_framing_distance(radius, fov, fill).unwrap();
            let far = compute_framing_distance(radius + extra, fov, fill).unwrap();
            prop_assert!(near > 0.0);
            prop_assert!(far > near);
        }
    }
}
