//! Deterministic procedural fixtures.
//!
//! Each builder seeds particles, elements and pins from its parameters
//! alone, so identical inputs produce identical worlds and identical
//! trajectories.

use glam::{Vec2, Vec3};
use marrow_body::Body;
use marrow_energy::{NeoHookean, StVenantKirchhoff};
use marrow_force::Joint;
use marrow_solver::World;
use marrow_types::{BodyId, MarrowResult, Scalar};

/// Pins a particle to its current position with a hard one-body joint.
fn pin(world: &mut World, particle: BodyId) -> MarrowResult<()> {
    let anchor = world
        .body(particle)
        .map(|b| b.position())
        .unwrap_or(Vec2::ZERO);
    let joint = Joint::new(
        world.bodies(),
        None,
        particle,
        anchor,
        Vec2::ZERO,
        Vec3::new(Scalar::INFINITY, Scalar::INFINITY, 0.0),
        None,
    )?;
    world.add_force(Box::new(joint));
    Ok(())
}

/// Splits a quad grid into triangles with alternating diagonals to
/// avoid structural anisotropy. Returns the particle grid in row-major
/// order (rows + 1 by cols + 1 vertices).
fn seed_particle_grid(
    world: &mut World,
    cols: usize,
    rows: usize,
    spacing: Scalar,
    particle_mass: Scalar,
    origin: Vec2,
) -> Vec<BodyId> {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let mut ids = Vec::with_capacity(verts_x * verts_y);
    for j in 0..verts_y {
        for i in 0..verts_x {
            let position = origin + Vec2::new(i as Scalar * spacing, -(j as Scalar) * spacing);
            ids.push(world.add_body(Body::particle(position, particle_mass)));
        }
    }
    ids
}

/// Triangle index pairs for one quad, diagonal chosen by parity.
fn quad_triangles(
    i: usize,
    j: usize,
    verts_x: usize,
) -> [[usize; 3]; 2] {
    let top_left = j * verts_x + i;
    let top_right = top_left + 1;
    let bot_left = top_left + verts_x;
    let bot_right = bot_left + 1;

    if (i + j) % 2 == 0 {
        [
            [top_left, bot_left, top_right],
            [top_right, bot_left, bot_right],
        ]
    } else {
        [
            [top_left, bot_left, bot_right],
            [top_left, bot_right, top_right],
        ]
    }
}

/// Builds a cloth grid of Neo-Hookean triangles with the top row
/// pinned. Returns the particle ids in row-major order.
#[allow(clippy::too_many_arguments)]
pub fn cloth_grid(
    world: &mut World,
    cols: usize,
    rows: usize,
    spacing: Scalar,
    particle_mass: Scalar,
    young: Scalar,
    poisson: Scalar,
    origin: Vec2,
) -> MarrowResult<Vec<BodyId>> {
    let verts_x = cols + 1;
    let ids = seed_particle_grid(world, cols, rows, spacing, particle_mass, origin);

    for j in 0..rows {
        for i in 0..cols {
            for tri in quad_triangles(i, j, verts_x) {
                let particles = [ids[tri[0]], ids[tri[1]], ids[tri[2]]];
                let energy =
                    NeoHookean::from_young_poisson(world.bodies(), particles, young, poisson)?;
                world.add_energy(Box::new(energy));
            }
        }
    }

    for i in 0..verts_x {
        pin(world, ids[i])?;
    }

    Ok(ids)
}

/// Builds a hexagonal soft-body cell: a center particle, six ring
/// particles at `radius`, and six Neo-Hookean triangles fanned around
/// the center. Returns [center, ring₀..ring₅].
pub fn hex_cell(
    world: &mut World,
    center: Vec2,
    radius: Scalar,
    particle_mass: Scalar,
    young: Scalar,
    poisson: Scalar,
) -> MarrowResult<Vec<BodyId>> {
    let mut ids = Vec::with_capacity(7);
    ids.push(world.add_body(Body::particle(center, particle_mass)));

    for k in 0..6 {
        let angle = std::f32::consts::TAU * (k as Scalar) / 6.0;
        let position = center + radius * Vec2::new(angle.cos(), angle.sin());
        ids.push(world.add_body(Body::particle(position, particle_mass)));
    }

    for k in 0..6 {
        let particles = [ids[0], ids[1 + k], ids[1 + (k + 1) % 6]];
        let energy = NeoHookean::from_young_poisson(world.bodies(), particles, young, poisson)?;
        world.add_energy(Box::new(energy));
    }

    Ok(ids)
}

/// Builds a cantilever beam of StVK triangles with the right column
/// pinned by hard joints. Returns the particle ids in row-major order.
#[allow(clippy::too_many_arguments)]
pub fn cantilever_beam(
    world: &mut World,
    cols: usize,
    rows: usize,
    spacing: Scalar,
    particle_mass: Scalar,
    mu: Scalar,
    lambda: Scalar,
    origin: Vec2,
) -> MarrowResult<Vec<BodyId>> {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let ids = seed_particle_grid(world, cols, rows, spacing, particle_mass, origin);

    for j in 0..rows {
        for i in 0..cols {
            for tri in quad_triangles(i, j, verts_x) {
                let particles = [ids[tri[0]], ids[tri[1]], ids[tri[2]]];
                let energy = StVenantKirchhoff::from_lame(world.bodies(), particles, mu, lambda)?;
                world.add_energy(Box::new(energy));
            }
        }
    }

    for j in 0..verts_y {
        pin(world, ids[j * verts_x + cols])?;
    }

    Ok(ids)
}
