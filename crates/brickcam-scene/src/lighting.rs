//! Scene lighting and segmentation labels.

use brickcam_core::{CameraPose, CaptureError, DVec3, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Segmentation label stored on scene objects as `category_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum SegmentationCategory {
    /// Everything that is not the brick, including the ground plane.
    Background = 0,
    /// The captured brick.
    Brick = 1,
}

impl SegmentationCategory {
    /// Numeric id written into segmentation maps.
    pub fn id(self) -> u32 {
        self as u32
    }
}

/// How the point light is configured for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Light energy is drawn uniformly from `[min, max]` once per session.
    pub energy_range: [f64; 2],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            energy_range: [5.0, 80.0],
        }
    }
}

/// A point light placed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Light position in world space.
    pub position: DVec3,
    /// Radiant energy in watts.
    pub energy: f64,
}

/// Places one point light per frame, co-located with the camera.
pub fn plan_lights<R: Rng + ?Sized>(
    poses: &[CameraPose],
    config: &LightConfig,
    rng: &mut R,
) -> Result<Vec<PointLight>> {
    let [min, max] = config.energy_range;
    if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
        return Err(CaptureError::InvalidParameter(format!(
            "light energy range must satisfy 0 <= min <= max, got [{min}, {max}]"
        )));
    }
    let energy = if max > min { rng.gen_range(min..max) } else { min };
    log::debug!("point light energy {energy:.2} W");

    Ok(poses
        .iter()
        .map(|pose| PointLight {
            position: pose.position,
            energy,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickcam_core::DMat3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pose_at(position: DVec3) -> CameraPose {
        CameraPose {
            position,
            rotation: DMat3::IDENTITY,
        }
    }

    #[test]
    fn test_category_ids() {
        assert_eq!(SegmentationCategory::Background.id(), 0);
        assert_eq!(SegmentationCategory::Brick.id(), 1);
    }

    #[test]
    fn test_lights_follow_camera() {
        let poses = [pose_at(DVec3::X), pose_at(DVec3::Y), pose_at(DVec3::Z)];
        let mut rng = StdRng::seed_from_u64(3);
        let lights = plan_lights(&poses, &LightConfig::default(), &mut rng).unwrap();

        assert_eq!(lights.len(), 3);
        for (light, pose) in lights.iter().zip(&poses) {
            assert_eq!(light.position, pose.position);
            assert!((5.0..80.0).contains(&light.energy));
            assert_eq!(light.energy, lights[0].energy);
        }
    }

    #[test]
    fn test_invalid_energy_range() {
        let config = LightConfig {
            energy_range: [10.0, 1.0],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(plan_lights(&[], &config, &mut rng).is_err());
    }
}
