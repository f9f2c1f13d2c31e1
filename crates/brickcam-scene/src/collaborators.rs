//! Capabilities the capture relies on but does not implement.
//!
//! Physics and rendering belong to the host application. A session only sees
//! them through these traits, so tests and alternative hosts can plug in
//! their own implementations.

use std::path::PathBuf;

use brickcam_core::{CameraPose, DMat4, Result};
use serde::{Deserialize, Serialize};

use crate::lighting::{PointLight, SegmentationCategory};
use crate::placement::{
    GroundPlane, RigidBody, SimulationParams, BRICK_OBJECT_NAME, GROUND_OBJECT_NAME,
};

/// Settles rigid bodies under gravity and contact.
pub trait PhysicsEngine {
    /// Simulates `bodies` and returns each body's final object-to-world
    /// transform, in the same order.
    fn settle(&mut self, bodies: &[RigidBody], params: &SimulationParams) -> Result<Vec<DMat4>>;
}

/// Turns camera poses into images.
pub trait Renderer {
    /// Renders one frame per pose in `request`.
    fn render(&mut self, request: &RenderRequest) -> Result<Vec<RenderedFrame>>;
}

/// Per-pixel maps requested from a dataset render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOutput {
    /// Directory the renderer appends its dataset files to.
    pub output_dir: PathBuf,
    /// Whether to produce depth maps.
    pub depth: bool,
    /// Whether to antialias the depth map.
    pub antialias_depth: bool,
    /// Object properties segmentation maps are keyed by.
    pub segmentation_keys: Vec<String>,
    /// Append to existing output instead of replacing it.
    pub append_to_existing: bool,
}

impl Default for DatasetOutput {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/"),
            depth: true,
            antialias_depth: false,
            segmentation_keys: vec![
                "category_id".to_string(),
                "instance".to_string(),
                "name".to_string(),
            ],
            append_to_existing: true,
        }
    }
}

/// What a capture produces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// A single color image written to the configured output path.
    #[default]
    Still,
    /// Color, depth and segmentation for every frame.
    Dataset(DatasetOutput),
}

/// Everything a renderer needs for one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Camera pose per frame.
    pub poses: Vec<CameraPose>,
    /// Light per frame, aligned with `poses`.
    pub lights: Vec<PointLight>,
    /// Final object-to-world transform of the brick, after placement.
    pub brick_transform: DMat4,
    /// Ground plane under the brick.
    pub ground: GroundPlane,
    /// Square image size in pixels.
    pub resolution: u32,
    /// Camera field of view in radians.
    pub field_of_view: f64,
    pub mode: OutputMode,
}

impl RenderRequest {
    /// Segmentation category of every object in the scene, by object name.
    pub const OBJECT_CATEGORIES: [(&'static str, SegmentationCategory); 2] = [
        (BRICK_OBJECT_NAME, SegmentationCategory::Brick),
        (GROUND_OBJECT_NAME, SegmentationCategory::Background),
    ];

    /// Camera-to-world matrices, one per frame.
    pub fn camera_matrices(&self) -> Vec<DMat4> {
        self.poses.iter().map(CameraPose::to_matrix).collect()
    }

    /// Number of frames requested.
    pub fn frame_count(&self) -> usize {
        self.poses.len()
    }
}

/// One rendered frame as returned by a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row by row from the top-left corner.
    pub rgba: Vec<u8>,
    /// Per-pixel depth, when requested.
    pub depth: Option<Vec<f32>>,
    /// Per-pixel category id, when requested.
    pub segmentation: Option<Vec<u32>>,
}

impl RenderedFrame {
    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether every buffer matches the frame size.
    pub fn is_consistent(&self) -> bool {
        let n = self.pixel_count();
        self.rgba.len() == n * 4
            && self.depth.as_ref().map_or(true, |d| d.len() == n)
            && self.segmentation.as_ref().map_or(true, |s| s.len() == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickcam_core::{BoundingBox, DMat3, DVec3};

    #[test]
    fn test_dataset_output_defaults() {
        let output = DatasetOutput::default();
        assert!(output.depth);
        assert!(!output.antialias_depth);
        assert_eq!(output.segmentation_keys, ["category_id", "instance", "name"]);
    }

    #[test]
    fn test_camera_matrices() {
        let pose = CameraPose {
            position: DVec3::new(1.0, 2.0, 3.0),
            rotation: DMat3::IDENTITY,
        };
        let bounds = BoundingBox::from_extents(DVec3::splat(-1.0), DVec3::ONE);
        let request = RenderRequest {
            poses: vec![pose, pose],
            lights: Vec::new(),
            brick_transform: DMat4::IDENTITY,
            ground: GroundPlane::for_object(&bounds),
            resolution: 64,
            field_of_view: 0.7,
            mode: OutputMode::Still,
        };
        let matrices = request.camera_matrices();
        assert_eq!(request.frame_count(), 2);
        assert_eq!(matrices[1].w_axis.truncate(), DVec3::new(1.0, 2.0, 3.0));

        let categories = RenderRequest::OBJECT_CATEGORIES;
        assert!(categories.contains(&("brick", SegmentationCategory::Brick)));
        assert!(categories.contains(&("ground", SegmentationCategory::Background)));
    }

    #[test]
    fn test_frame_consistency() {
        let mut frame = RenderedFrame {
            width: 2,
            height: 2,
            rgba: vec![0; 16],
            depth: Some(vec![1.0; 4]),
            segmentation: None,
        };
        assert!(frame.is_consistent());
        frame.segmentation = Some(vec![0; 3]);
        assert!(!frame.is_consistent());
    }
}
