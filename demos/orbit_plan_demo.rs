//! Plans a 12-frame orbit around a 2x4 brick and prints it as JSON.
//!
//! Run with: cargo run --example orbit_plan_demo

use brickcam::*;

fn main() -> Result<()> {
    init_logging();

    let bounds = BoundingBox::from_extents(
        DVec3::new(-0.4, -0.2, 0.0),
        DVec3::new(0.4, 0.2, 0.28),
    );
    let spec = TrajectorySpec::orbit(12).with_height_sampling(HeightSampling::PerSession);
    let mut sampler = WalkSampler::seeded(7);

    let plan = plan_trajectory(&bounds, &spec, &mut sampler)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
