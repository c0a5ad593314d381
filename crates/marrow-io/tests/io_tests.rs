//! Integration tests for marrow-io: contract round-trips, validation,
//! loading, and the soft-body fixture scenarios.

use glam::Vec2;
use marrow_energy::Energy;
use marrow_io::{fixtures, load_scene, validate, BodyDesc, JointDesc, SceneDescription};
use marrow_solver::World;
use marrow_types::BodyId;

const DT: f32 = 1.0 / 60.0;

fn simple_scene() -> SceneDescription {
    SceneDescription {
        name: "drop".into(),
        statics: vec![BodyDesc {
            position: [0.0, -5.0],
            rotation: 0.0,
            init_velocity: [0.0; 3],
            scale: [50.0, 2.0],
            friction: 0.6,
            density: 0.0,
            color: "#808080".into(),
        }],
        dynamics: vec![BodyDesc {
            position: [0.0, 2.0],
            rotation: 45.0,
            init_velocity: [0.0, -1.0, 0.0],
            scale: [1.0, 1.0],
            friction: 0.4,
            density: 1.0,
            color: "#4080ff".into(),
        }],
        joints: Vec::new(),
        springs: Vec::new(),
        fixture: None,
    }
}

// ─── Contract Tests ───────────────────────────────────────────

#[test]
fn scene_round_trips_through_json() {
    let scene = simple_scene();
    let json = serde_json::to_string(&scene).unwrap();
    let back: SceneDescription = serde_json::from_str(&json).unwrap();

    assert_eq!(back.name, "drop");
    assert_eq!(back.statics.len(), 1);
    assert_eq!(back.dynamics.len(), 1);
    assert_eq!(back.dynamics[0].rotation, 45.0);
    assert_eq!(back.dynamics[0].color, "#4080ff");
}

#[test]
fn missing_fields_take_defaults() {
    let json = r#"{
        "dynamics": [
            { "position": [0.0, 1.0], "scale": [1.0, 1.0] }
        ]
    }"#;
    let scene: SceneDescription = serde_json::from_str(json).unwrap();
    assert_eq!(scene.dynamics[0].friction, 0.5);
    assert_eq!(scene.dynamics[0].density, 1.0);
    assert_eq!(scene.dynamics[0].color, "#ffffff");
}

// ─── Validator Tests ──────────────────────────────────────────

#[test]
fn validator_accepts_good_scene() {
    assert!(validate(&simple_scene()).is_ok());
}

#[test]
fn validator_rejects_bad_friction() {
    let mut scene = simple_scene();
    scene.dynamics[0].friction = 1.5;
    assert!(validate(&scene).is_err());
}

#[test]
fn validator_rejects_bad_color() {
    let mut scene = simple_scene();
    scene.dynamics[0].color = "blue".into();
    assert!(validate(&scene).is_err());
}

#[test]
fn validator_rejects_out_of_range_joint() {
    let mut scene = simple_scene();
    scene.joints.push(JointDesc {
        body_a: Some(0),
        body_b: 9,
        r_a: [0.0, 0.0],
        r_b: [0.0, 0.0],
        stiffness: [f32::INFINITY; 3],
        fracture: None,
    });
    assert!(validate(&scene).is_err());
}

#[test]
fn validator_rejects_self_joint() {
    let mut scene = simple_scene();
    scene.joints.push(JointDesc {
        body_a: Some(1),
        body_b: 1,
        r_a: [0.0, 0.0],
        r_b: [0.0, 0.0],
        stiffness: [f32::INFINITY; 3],
        fracture: None,
    });
    assert!(validate(&scene).is_err());
}

// ─── Loader Tests ─────────────────────────────────────────────

#[test]
fn loader_builds_bodies_in_wire_order() {
    let world = load_scene(&simple_scene()).unwrap();
    assert_eq!(world.bodies().len(), 2);

    let statics: Vec<_> = world
        .bodies()
        .iter()
        .filter(|(_, b)| b.is_static())
        .collect();
    assert_eq!(statics.len(), 1);

    let dynamic = world
        .bodies()
        .iter()
        .find(|(_, b)| !b.is_static())
        .map(|(_, b)| b.clone())
        .unwrap();
    // Degrees on the wire, radians in the world.
    assert!((dynamic.pose.z - 45.0_f32.to_radians()).abs() < 1e-5);
    assert_eq!(dynamic.velocity.y, -1.0);
    assert_eq!(dynamic.color, 0x4080ff);
}

#[test]
fn loader_rejects_invalid_scene_without_side_effects() {
    let mut scene = simple_scene();
    scene.dynamics[0].density = -1.0;
    assert!(load_scene(&scene).is_err());
}

// ─── Fixture Tests ────────────────────────────────────────────

#[test]
fn cloth_grid_shape() {
    let mut world = World::default();
    let ids = fixtures::cloth_grid(
        &mut world,
        4,
        3,
        0.5,
        0.05,
        3000.0,
        0.3,
        Vec2::new(-1.0, 2.0),
    )
    .unwrap();

    assert_eq!(ids.len(), 5 * 4);
    // Two triangles per quad.
    assert_eq!(world.energies().count(), 4 * 3 * 2);
    // Top row pinned by one joint each.
    assert_eq!(world.forces().count(), 5);
}

#[test]
fn hex_cell_shape() {
    let mut world = World::default();
    let ids = fixtures::hex_cell(&mut world, Vec2::new(0.0, 3.0), 3.0, 1.0, 3000.0, 0.3).unwrap();

    assert_eq!(ids.len(), 7);
    assert_eq!(world.energies().count(), 6);

    // Ring particles sit at the requested radius.
    let center = world.body(ids[0]).unwrap().position();
    for &ring in &ids[1..] {
        let p = world.body(ring).unwrap().position();
        assert!(((p - center).length() - 3.0).abs() < 1e-4);
    }
}

#[test]
fn fixtures_are_reproducible() {
    let build = || {
        let mut world = World::default();
        fixtures::cloth_grid(
            &mut world,
            4,
            3,
            0.5,
            0.05,
            3000.0,
            0.3,
            Vec2::new(-1.0, 2.0),
        )
        .unwrap();
        world
    };

    let mut a = build();
    let mut b = build();
    for _ in 0..60 {
        a.step(DT);
        b.step(DT);
    }

    let poses = |w: &World| -> Vec<[u32; 2]> {
        w.bodies()
            .iter()
            .map(|(_, body)| [body.pose.x.to_bits(), body.pose.y.to_bits()])
            .collect()
    };
    assert_eq!(poses(&a), poses(&b), "identical fixtures must replay identically");
}

// ─── Soft-body scenarios ──────────────────────────────────────

/// Signed triangle areas of each element's current configuration.
/// area / rest_area equals det F for a linear triangle element.
fn triangle_areas(world: &World, elements: &[[BodyId; 3]]) -> Vec<f32> {
    elements
        .iter()
        .map(|tri| {
            let p: Vec<Vec2> = tri
                .iter()
                .map(|&id| world.body(id).unwrap().position())
                .collect();
            0.5 * (p[1] - p[0]).perp_dot(p[2] - p[0])
        })
        .collect()
}

fn element_particles(world: &World) -> Vec<[BodyId; 3]> {
    world
        .energies()
        .map(|e| [e.particles()[0], e.particles()[1], e.particles()[2]])
        .collect()
}

fn jacobians(world: &World, elements: &[[BodyId; 3]], rest: &[f32]) -> Vec<f32> {
    triangle_areas(world, elements)
        .iter()
        .zip(rest)
        .map(|(area, rest_area)| area / rest_area)
        .collect()
}

#[test]
fn hex_cell_survives_floor_impact() {
    let mut world = World::default();
    world.add_body(marrow_body::Body::rectangle(
        Vec2::new(0.0, -5.0),
        0.0,
        Vec2::new(50.0, 2.0),
        0.0,
        0.6,
    ));
    fixtures::hex_cell(&mut world, Vec2::new(0.0, 0.0), 3.0, 1.0, 3000.0, 0.3).unwrap();

    let elements = element_particles(&world);
    let rest = triangle_areas(&world, &elements);

    // 10 simulated seconds; sample once the stiffness ramp has had
    // time to engage after impact.
    for step in 0..600 {
        world.step(DT);
        if step >= 120 && step % 60 == 0 {
            for j in jacobians(&world, &elements, &rest) {
                assert!(j.is_finite());
                assert!(j > 0.2, "element compressed past J = 0.2: {j}");
            }
        }
    }
    assert!(!world.is_urgent_stopped());

    for j in jacobians(&world, &elements, &rest) {
        assert!(j > 0.2, "final configuration must stay uninverted: {j}");
    }
}

#[test]
fn cantilever_tip_deflects_without_inverting() {
    let mut world = World::default();
    let ids = fixtures::cantilever_beam(
        &mut world,
        10,
        3,
        0.5,
        0.1,
        300.0,
        258.0,
        Vec2::new(-5.0, 2.0),
    )
    .unwrap();

    let elements = element_particles(&world);
    let rest = triangle_areas(&world, &elements);

    // Free tip = left column, bottom row.
    let tip = ids[3 * 11];
    let tip_start = world.body(tip).unwrap().pose.y;

    for _ in 0..120 {
        world.step(DT);
    }

    let tip_now = world.body(tip).unwrap().pose.y;
    assert!(
        tip_now < tip_start - 0.05,
        "free tip must sag under gravity: {tip_start} -> {tip_now}"
    );

    for (id, body) in world.bodies().iter() {
        assert!(body.pose.is_finite(), "body {id:?} went non-finite");
    }
    for j in jacobians(&world, &elements, &rest) {
        assert!(j > 0.0, "no element may invert, J = {j}");
    }
    assert!(!world.is_urgent_stopped());
}
