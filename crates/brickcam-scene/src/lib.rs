//! Scene setup for brickcam.
//!
//! This crate covers the parts of a capture that sit around the camera math:
//! - [`CaptureSettings`] and the importer's [`ImporterPreferences`] file
//! - brick placement, drop planning and rigid-body parameters
//! - point lights and segmentation categories
//! - the [`Renderer`] and [`PhysicsEngine`] capabilities provided by the host

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Importer options mirror the add-on's flat list of flags
#![allow(clippy::struct_excessive_bools)]

pub mod collaborators;
pub mod frame_output;
pub mod importer;
pub mod lighting;
pub mod placement;
pub mod settings;

pub use collaborators::{
    DatasetOutput, OutputMode, PhysicsEngine, RenderRequest, RenderedFrame, Renderer,
};
pub use frame_output::{encode_png, save_png};
pub use importer::{imported_object_name, ImporterPreferences};
pub use lighting::{plan_lights, LightConfig, PointLight, SegmentationCategory};
pub use placement::{
    drop_height, ground_offset, ground_plane_scale, plan_drop, DropConfig, DropPlan, GroundPlane,
    RigidBody, RigidBodyParams, SimulationParams, BRICK_OBJECT_NAME, GROUND_OBJECT_NAME,
};
pub use settings::{CaptureSettings, DEFAULT_PART, LDRAW_ADDON_NAME, PREFERENCES_FILE_NAME};
