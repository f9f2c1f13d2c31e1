//! Runs a dataset capture against a host stand-in that only logs.
//!
//! Run with: RUST_LOG=debug cargo run --example capture_session_demo

use brickcam::*;

/// Leaves every body where it started.
struct FrozenPhysics;

impl PhysicsEngine for FrozenPhysics {
    fn settle(&mut self, bodies: &[RigidBody], params: &SimulationParams) -> Result<Vec<DMat4>> {
        log::info!(
            "would simulate {} bodies for {}..{} s",
            bodies.len(),
            params.min_simulation_time,
            params.max_simulation_time
        );
        Ok(bodies.iter().map(|b| b.initial_transform).collect())
    }
}

/// Prints each camera matrix and returns black frames.
struct PrintingRenderer;

impl Renderer for PrintingRenderer {
    fn render(&mut self, request: &RenderRequest) -> Result<Vec<RenderedFrame>> {
        let size = request.resolution;
        let pixels = (size * size) as usize;
        println!("brick transform:\n{}", request.brick_transform);
        for (i, (matrix, light)) in request
            .camera_matrices()
            .iter()
            .zip(&request.lights)
            .enumerate()
        {
            println!("frame {i}: light {:.1} W\n{matrix}", light.energy);
        }
        Ok(request
            .poses
            .iter()
            .map(|_| RenderedFrame {
                width: size,
                height: size,
                rgba: vec![0; pixels * 4],
                ..RenderedFrame::default()
            })
            .collect())
    }
}

fn main() -> Result<()> {
    init_logging();

    let settings = CaptureSettings::default();
    let mut session = CaptureSession::new(settings, TrajectorySpec::orbit(4), None)
        .with_output_mode(OutputMode::Dataset(DatasetOutput::default()));

    let bounds = BoundingBox::from_extents(
        DVec3::new(-0.4, -0.2, -0.14),
        DVec3::new(0.4, 0.2, 0.14),
    );
    let report = session.run(&bounds, &mut FrozenPhysics, &mut PrintingRenderer)?;
    println!(
        "placed as {:?}, camera distance {:.3}",
        report.placement.plan, report.trajectory.distance
    );
    Ok(())
}
