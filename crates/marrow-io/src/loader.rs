//! Scene loading: description → populated world.

use std::path::Path;

use glam::{Vec2, Vec3};
use marrow_body::Body;
use marrow_force::{Joint, Spring};
use marrow_solver::World;
use marrow_types::{BodyId, MarrowError, MarrowResult};

use crate::contract::{parse_color, BodyDesc, Fixture, SceneDescription};
use crate::fixtures;
use crate::validator::validate;

/// Builds a world from a validated scene description.
pub fn load_scene(scene: &SceneDescription) -> MarrowResult<World> {
    validate(scene)?;

    let mut world = World::default();
    let mut ids: Vec<BodyId> = Vec::with_capacity(scene.statics.len() + scene.dynamics.len());

    for desc in &scene.statics {
        ids.push(world.add_body(build_body(desc, 0.0)?));
    }
    for desc in &scene.dynamics {
        ids.push(world.add_body(build_body(desc, desc.density)?));
    }

    for desc in &scene.joints {
        let joint = Joint::new(
            world.bodies(),
            desc.body_a.map(|a| ids[a]),
            ids[desc.body_b],
            Vec2::from(desc.r_a),
            Vec2::from(desc.r_b),
            Vec3::from(desc.stiffness),
            desc.fracture,
        )?;
        world.add_force(Box::new(joint));
    }

    for desc in &scene.springs {
        let spring = Spring::new(
            world.bodies(),
            ids[desc.body_a],
            ids[desc.body_b],
            Vec2::from(desc.r_a),
            Vec2::from(desc.r_b),
            desc.stiffness,
            desc.rest_length,
        )?;
        world.add_force(Box::new(spring));
    }

    if let Some(fixture) = &scene.fixture {
        build_fixture(&mut world, fixture)?;
    }

    Ok(world)
}

/// Reads and loads a JSON scene file.
pub fn load_scene_file(path: &Path) -> MarrowResult<World> {
    let text = std::fs::read_to_string(path)?;
    let scene: SceneDescription = serde_json::from_str(&text)
        .map_err(|e| MarrowError::Serialization(format!("scene parse failed: {e}")))?;
    load_scene(&scene)
}

fn build_body(desc: &BodyDesc, density: f32) -> MarrowResult<Body> {
    let color = parse_color(&desc.color)
        .ok_or_else(|| MarrowError::InvalidScene(format!("bad color {:?}", desc.color)))?;

    Ok(Body::rectangle(
        Vec2::from(desc.position),
        desc.rotation.to_radians(),
        Vec2::from(desc.scale),
        density,
        desc.friction,
    )
    .with_velocity(Vec3::from(desc.init_velocity))
    .with_color(color))
}

fn build_fixture(world: &mut World, fixture: &Fixture) -> MarrowResult<()> {
    match *fixture {
        Fixture::ClothGrid {
            cols,
            rows,
            spacing,
            particle_mass,
            young,
            poisson,
            origin,
        } => {
            fixtures::cloth_grid(
                world,
                cols,
                rows,
                spacing,
                particle_mass,
                young,
                poisson,
                Vec2::from(origin),
            )?;
        }
        Fixture::HexCell {
            center,
            radius,
            particle_mass,
            young,
            poisson,
        } => {
            fixtures::hex_cell(
                world,
                Vec2::from(center),
                radius,
                particle_mass,
                young,
                poisson,
            )?;
        }
        Fixture::CantileverBeam {
            cols,
            rows,
            spacing,
            particle_mass,
            mu,
            lambda,
            origin,
        } => {
            fixtures::cantilever_beam(
                world,
                cols,
                rows,
                spacing,
                particle_mass,
                mu,
                lambda,
                Vec2::from(origin),
            )?;
        }
    }
    Ok(())
}
