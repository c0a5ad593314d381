//! CLI command implementations.

use std::path::Path;

use glam::Vec2;
use marrow_io::{fixtures, SceneDescription};
use marrow_render::{JsonFrameExporter, RenderFrame, Renderer};
use marrow_solver::{FixedStepper, World};
use marrow_types::{MarrowError, MarrowResult};

/// Runs a scene or fixture headless and prints a summary.
pub fn simulate(
    scene: Option<&str>,
    fixture: Option<&str>,
    duration: f32,
    output: Option<&str>,
) -> MarrowResult<()> {
    if duration <= 0.0 {
        return Err(MarrowError::InvalidConfig(
            "duration must be positive".into(),
        ));
    }

    let mut world = match (scene, fixture) {
        (Some(path), None) => marrow_io::load_scene_file(Path::new(path))?,
        (None, Some(name)) => build_fixture_world(name)?,
        (None, None) => {
            return Err(MarrowError::InvalidConfig(
                "pass either --scene or --fixture".into(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(MarrowError::InvalidConfig(
                "--scene and --fixture are mutually exclusive".into(),
            ))
        }
    };

    let dt = world.params().dt;
    let steps = (duration / dt).ceil() as u64;

    let mut exporter = output.map(JsonFrameExporter::new);

    let mut stepper = FixedStepper::new();
    for _ in 0..steps {
        stepper.advance(&mut world, dt);
        if world.is_urgent_stopped() {
            return Err(MarrowError::SolverHalted(
                "urgent stop latched during simulation".into(),
            ));
        }
        if let Some(exporter) = exporter.as_mut() {
            exporter.submit_frame(&RenderFrame::capture(&world))?;
        }
    }

    if let Some(exporter) = exporter.as_mut() {
        exporter.finalize()?;
        println!("wrote {} frames", exporter.frame_count());
    }

    println!(
        "simulated {:.2}s in {} steps | bodies: {} | avg step: {:.3} ms | kinetic: {:.4e} | elastic: {:.4e}",
        duration,
        world.step_count(),
        world.bodies().len(),
        world.average_step_time() * 1000.0,
        world.kinetic_energy(),
        world.elastic_energy(),
    );
    Ok(())
}

/// Validates a scene file and reports the result.
pub fn validate(path: &str) -> MarrowResult<()> {
    let text = std::fs::read_to_string(path)?;
    let scene: SceneDescription = serde_json::from_str(&text)
        .map_err(|e| MarrowError::Serialization(format!("scene parse failed: {e}")))?;
    marrow_io::validate(&scene)?;
    println!(
        "{path}: ok ({} static, {} dynamic, {} joints, {} springs)",
        scene.statics.len(),
        scene.dynamics.len(),
        scene.joints.len(),
        scene.springs.len(),
    );
    Ok(())
}

/// Lists the built-in fixtures.
pub fn scenes() -> MarrowResult<()> {
    println!("cloth       16x10 Neo-Hookean cloth grid, top row pinned");
    println!("hex         hexagonal Neo-Hookean soft cell over a floor");
    println!("cantilever  20x5 StVK beam, right column pinned");
    Ok(())
}

fn build_fixture_world(name: &str) -> MarrowResult<World> {
    let mut world = World::default();
    match name {
        "cloth" => {
            fixtures::cloth_grid(
                &mut world,
                16,
                10,
                0.5,
                0.05,
                3000.0,
                0.3,
                Vec2::new(-4.0, 8.0),
            )?;
        }
        "hex" => {
            use marrow_body::Body;
            world.add_body(Body::rectangle(
                Vec2::new(0.0, -5.0),
                0.0,
                Vec2::new(50.0, 2.0),
                0.0,
                0.6,
            ));
            fixtures::hex_cell(&mut world, Vec2::new(0.0, 3.0), 3.0, 1.0, 3000.0, 0.3)?;
        }
        "cantilever" => {
            fixtures::cantilever_beam(
                &mut world,
                20,
                5,
                0.5,
                0.1,
                300.0,
                258.0,
                Vec2::new(-10.0, 2.0),
            )?;
        }
        other => {
            return Err(MarrowError::InvalidConfig(format!(
                "unknown fixture {other:?}; see `marrow scenes`"
            )))
        }
    }
    Ok(world)
}
