//! A full capture: place the brick, plan the camera, light and render.

use std::path::{Path, PathBuf};

use brickcam_core::{
    plan_trajectory, BoundingBox, CaptureError, DMat4, Result, TrajectoryPlan, TrajectorySpec,
    WalkSampler,
};
use brickcam_scene::{
    plan_drop, plan_lights, save_png, CaptureSettings, DropConfig, DropPlan, GroundPlane,
    ImporterPreferences, LightConfig, OutputMode, PhysicsEngine, PointLight, RenderRequest,
    RenderedFrame, Renderer, RigidBody, SegmentationCategory, BRICK_OBJECT_NAME,
};

/// Where the brick ended up before capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// How the brick was placed.
    pub plan: DropPlan,
    /// Final object-to-world transform of the brick.
    pub transform: DMat4,
    /// Brick bounds in world space.
    pub world_bounds: BoundingBox,
    /// Ground plane under the brick.
    pub ground: GroundPlane,
}

/// Everything produced by [`CaptureSession::run`].
#[derive(Debug, Clone)]
pub struct CaptureReport {
    pub placement: Placement,
    pub trajectory: TrajectoryPlan,
    pub lights: Vec<PointLight>,
    pub frames: Vec<RenderedFrame>,
    /// Image written for still captures.
    pub saved_to: Option<PathBuf>,
}

/// One capture session.
///
/// A session owns its random state; run independent sessions with separate
/// instances rather than sharing one.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    settings: CaptureSettings,
    trajectory: TrajectorySpec,
    drop: DropConfig,
    lights: LightConfig,
    mode: OutputMode,
    sampler: WalkSampler,
}

impl CaptureSession {
    /// Creates a session. Passing a seed makes every random draw reproducible.
    pub fn new(settings: CaptureSettings, trajectory: TrajectorySpec, seed: Option<u64>) -> Self {
        Self {
            settings,
            trajectory,
            drop: DropConfig::default(),
            lights: LightConfig::default(),
            mode: OutputMode::default(),
            sampler: WalkSampler::new(seed),
        }
    }

    /// Sets the drop configuration.
    #[must_use]
    pub fn with_drop_config(mut self, drop: DropConfig) -> Self {
        self.drop = drop;
        self
    }

    /// Sets the light configuration.
    #[must_use]
    pub fn with_light_config(mut self, lights: LightConfig) -> Self {
        self.lights = lights;
        self
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn trajectory_spec(&self) -> &TrajectorySpec {
        &self.trajectory
    }

    pub fn output_mode(&self) -> &OutputMode {
        &self.mode
    }

    /// Importer preferences matching this session's output mode.
    pub fn importer_preferences(&self) -> ImporterPreferences {
        let ldraw_dir = self.settings.ldraw_path.clone();
        match self.mode {
            OutputMode::Still => ImporterPreferences::still_render(ldraw_dir),
            OutputMode::Dataset(_) => ImporterPreferences::dataset(ldraw_dir),
        }
    }

    /// Writes the importer preferences into the add-on directory under `scripts_dir`.
    pub fn write_importer_preferences(&self, scripts_dir: &Path) -> Result<PathBuf> {
        let path = CaptureSettings::importer_preferences_path(scripts_dir);
        self.importer_preferences().write_to(&path)?;
        Ok(path)
    }

    /// Places the brick, running the physics engine when the drop plan asks for it.
    ///
    /// `local_bounds` are the brick's bounds in object space.
    pub fn place_brick<P>(
        &mut self,
        local_bounds: &BoundingBox,
        physics: &mut P,
    ) -> Result<Placement>
    where
        P: PhysicsEngine + ?Sized,
    {
        if !local_bounds.is_finite() {
            return Err(CaptureError::InvalidGeometry(
                "brick bounds have non-finite coordinates".to_string(),
            ));
        }

        let ground = GroundPlane::for_object(local_bounds);
        let plan = plan_drop(local_bounds, &self.drop, self.sampler.rng())?;
        let initial = plan.initial_transform(local_bounds);

        let transform = if plan.needs_simulation() {
            let bodies = [
                ground.rigid_body(),
                RigidBody {
                    name: BRICK_OBJECT_NAME.to_string(),
                    initial_transform: initial,
                    local_bounds: *local_bounds,
                    params: self.drop.brick,
                    category: SegmentationCategory::Brick,
                },
            ];
            let settled = physics.settle(&bodies, &self.drop.simulation)?;
            if settled.len() != bodies.len() {
                return Err(CaptureError::Collaborator(format!(
                    "physics engine returned {} transforms for {} bodies",
                    settled.len(),
                    bodies.len()
                )));
            }
            settled[1]
        } else {
            initial
        };

        let world_bounds = local_bounds.transformed(&transform);
        log::info!(
            "brick placed ({}), lowest point at z={:.4}",
            if plan.needs_simulation() { "simulated" } else { "resting" },
            world_bounds.lowest_z()
        );

        Ok(Placement {
            plan,
            transform,
            world_bounds,
            ground,
        })
    }

    /// Runs the whole capture for a brick with object-space bounds `local_bounds`.
    pub fn run<P, R>(
        &mut self,
        local_bounds: &BoundingBox,
        physics: &mut P,
        renderer: &mut R,
    ) -> Result<CaptureReport>
    where
        P: PhysicsEngine + ?Sized,
        R: Renderer + ?Sized,
    {
        let placement = self.place_brick(local_bounds, physics)?;
        let trajectory =
            plan_trajectory(&placement.world_bounds, &self.trajectory, &mut self.sampler)?;
        let lights = plan_lights(&trajectory.poses, &self.lights, self.sampler.rng())?;

        let request = RenderRequest {
            poses: trajectory.poses.clone(),
            lights: lights.clone(),
            brick_transform: placement.transform,
            ground: placement.ground,
            resolution: self.settings.render_resolution,
            field_of_view: self.trajectory.field_of_view,
            mode: self.mode.clone(),
        };
        let frames = renderer.render(&request)?;
        if frames.len() != request.frame_count() {
            return Err(CaptureError::Collaborator(format!(
                "renderer returned {} frames for {} poses",
                frames.len(),
                request.frame_count()
            )));
        }
        for (i, frame) in frames.iter().enumerate() {
            if !frame.is_consistent() {
                log::warn!(
                    "frame {i} buffers do not match its {}x{} size",
                    frame.width,
                    frame.height
                );
            }
        }

        let saved_to = match self.mode {
            OutputMode::Still => {
                let path = self.settings.output_path.clone();
                save_png(&path, &frames[0])?;
                Some(path)
            }
            OutputMode::Dataset(ref output) => {
                log::info!(
                    "rendered {} dataset frames into {}",
                    frames.len(),
                    output.output_dir.display()
                );
                None
            }
        };

        Ok(CaptureReport {
            placement,
            trajectory,
            lights,
            frames,
            saved_to,
        })
    }
}
