//! Integration tests for marrow-body.

use glam::{Vec2, Vec3};
use marrow_body::{Body, BodySet};
use marrow_types::{BodyId, ForceId};

// ─── Body Tests ───────────────────────────────────────────────

#[test]
fn rectangle_mass_properties() {
    let body = Body::rectangle(Vec2::ZERO, 0.0, Vec2::new(2.0, 4.0), 1.0, 0.5);
    assert_eq!(body.mass, 8.0);
    assert!((body.moment - 8.0 * 20.0 / 12.0).abs() < 1e-4);
    assert!((body.radius - 0.5 * 20.0_f32.sqrt()).abs() < 1e-5);
    assert!(!body.is_static());
}

#[test]
fn zero_density_is_static() {
    let mut body = Body::rectangle(Vec2::ZERO, 0.0, Vec2::new(50.0, 2.0), 0.0, 0.6);
    assert!(body.is_static());

    body.set_velocity(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(body.velocity, Vec3::ZERO, "static body velocity must stay zero");
}

#[test]
fn particle_mass_properties() {
    let body = Body::particle(Vec2::new(1.0, 2.0), 1.5);
    assert_eq!(body.mass, 1.5);
    assert_eq!(body.moment, 1.5);
    assert_eq!(body.radius, 0.0);
    assert_eq!(body.size, Vec2::ZERO);
    assert!(!body.is_static());
}

#[test]
fn friction_is_clamped() {
    let body = Body::rectangle(Vec2::ZERO, 0.0, Vec2::ONE, 1.0, 1.7);
    assert_eq!(body.friction, 1.0);
}

#[test]
fn local_to_world_rotates() {
    let body = Body::rectangle(
        Vec2::new(1.0, 0.0),
        std::f32::consts::FRAC_PI_2,
        Vec2::ONE,
        1.0,
        0.5,
    );
    let world = body.local_to_world(Vec2::new(1.0, 0.0));
    assert!((world - Vec2::new(1.0, 1.0)).length() < 1e-5);
}

#[test]
fn force_backrefs_attach_and_detach() {
    let mut body = Body::particle(Vec2::ZERO, 1.0);
    body.attach_force(ForceId(3));
    body.attach_force(ForceId(3)); // idempotent
    body.attach_force(ForceId(7));
    assert_eq!(body.forces, vec![ForceId(3), ForceId(7)]);

    body.detach_force(ForceId(3));
    assert_eq!(body.forces, vec![ForceId(7)]);
}

// ─── BodySet Tests ────────────────────────────────────────────

#[test]
fn set_insert_get_remove() {
    let mut set = BodySet::new();
    let a = set.insert(Body::particle(Vec2::ZERO, 1.0));
    let b = set.insert(Body::particle(Vec2::X, 2.0));

    assert_eq!(set.len(), 2);
    assert_eq!(set.get(b).unwrap().mass, 2.0);

    set.remove(a);
    assert_eq!(set.len(), 1);
    assert!(set.get(a).is_none());
    // Removal leaves a hole; the other id still resolves.
    assert!(set.get(b).is_some());
}

#[test]
fn set_ids_are_stable_slots() {
    let mut set = BodySet::new();
    let a = set.insert(Body::particle(Vec2::ZERO, 1.0));
    set.remove(a);
    let c = set.insert(Body::particle(Vec2::Y, 3.0));
    // New bodies take fresh slots, never the freed one.
    assert_ne!(a, c);
    assert_eq!(c, BodyId(1));
}

#[test]
fn set_iterates_in_insertion_order() {
    let mut set = BodySet::new();
    for i in 0..4 {
        set.insert(Body::particle(Vec2::new(i as f32, 0.0), 1.0));
    }
    let xs: Vec<f32> = set.iter().map(|(_, b)| b.pose.x).collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
}
