//! Integration tests for marrow-solver: seed scenarios, solver
//! invariants, and the step-loop laws.

use glam::{Vec2, Vec3};
use marrow_body::Body;
use marrow_force::{Force, Joint, Length};
use marrow_solver::{FixedStepper, World};
use marrow_telemetry::EventKind;
use marrow_types::constants::{PENALTY_MAX, PENALTY_MIN};
use marrow_types::BodyId;

const DT: f32 = 1.0 / 60.0;

fn world_with_floor() -> (World, BodyId) {
    let mut world = World::default();
    let floor = world.add_body(Body::rectangle(
        Vec2::new(0.0, -5.0),
        0.0,
        Vec2::new(50.0, 2.0),
        0.0,
        0.6,
    ));
    (world, floor)
}

fn run(world: &mut World, steps: u32) {
    for _ in 0..steps {
        world.step(DT);
    }
}

// ─── Seed scenario: falling box ───────────────────────────────

#[test]
fn falling_box_settles_on_floor() {
    let (mut world, _floor) = world_with_floor();
    world.set_post_stabilization(true);

    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    run(&mut world, 300);

    let b = world.body(body).unwrap();
    // Floor top at -4, half extent 0.5: rest center ≈ -3.5.
    assert!(
        (b.pose.y - (-3.5)).abs() < 0.1,
        "box should rest on the floor, y = {}",
        b.pose.y
    );
    assert!(b.pose.z.abs() < 0.05, "box should not tip, θ = {}", b.pose.z);
    assert!(
        b.velocity.length() < 0.1,
        "box should come to rest, v = {:?}",
        b.velocity
    );
    assert!(!world.is_urgent_stopped());
}

#[test]
fn falling_box_never_tunnels() {
    let (mut world, _floor) = world_with_floor();
    world.set_post_stabilization(true);

    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, 5.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    run(&mut world, 600);
    let b = world.body(body).unwrap();
    assert!(b.pose.y > -4.2, "box fell through the floor: y = {}", b.pose.y);
    assert!(b.velocity.length() < 0.2);
}

// ─── Seed scenario: two-box stack ─────────────────────────────

#[test]
fn two_box_stack_comes_to_rest() {
    let (mut world, _floor) = world_with_floor();
    world.set_post_stabilization(true);

    let lower = world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.0),
        0.0,
        Vec2::splat(2.0),
        1.0,
        0.5,
    ));
    let upper = world.add_body(Body::rectangle(
        Vec2::new(0.0, -1.0),
        0.0,
        Vec2::splat(2.0),
        1.0,
        0.5,
    ));

    run(&mut world, 300);

    for id in [lower, upper] {
        let b = world.body(id).unwrap();
        assert!(
            b.velocity.length() < 5.0e-2,
            "stack must settle, v = {:?}",
            b.velocity
        );
    }

    // Two persistent manifolds (floor-lower, lower-upper), two
    // contacts each.
    let manifolds: Vec<_> = world
        .forces()
        .filter(|(_, f)| f.contact_count() > 0)
        .collect();
    assert_eq!(manifolds.len(), 2, "expected floor and stack manifolds");
    for (_, m) in &manifolds {
        assert_eq!(m.contact_count(), 2);
    }
}

#[test]
fn resting_contact_warm_starts_penalties() {
    let (mut world, _floor) = world_with_floor();
    world.set_post_stabilization(true);

    world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.4),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    run(&mut world, 60);

    let mut saw_contact_rows = false;
    for (_, force) in world.forces() {
        if force.contact_count() == 0 {
            continue;
        }
        saw_contact_rows = true;
        for row in force.rows().rows() {
            if !row.is_active() {
                continue;
            }
            assert!(
                row.penalty > PENALTY_MIN,
                "warm-started penalty should exceed the floor"
            );
        }
    }
    assert!(saw_contact_rows, "resting box must keep a manifold");
}

// ─── Solver invariants after stepping ─────────────────────────

#[test]
fn row_bounds_hold_after_steps() {
    let (mut world, _floor) = world_with_floor();
    for i in 0..3 {
        world.add_body(Body::rectangle(
            Vec2::new(i as f32 * 0.8 - 1.0, -3.0 + 1.1 * i as f32),
            0.1 * i as f32,
            Vec2::splat(1.0),
            1.0,
            0.5,
        ));
    }

    run(&mut world, 120);

    for (_, force) in world.forces() {
        for row in force.rows().rows() {
            if !row.is_active() {
                continue;
            }
            assert!(row.penalty >= PENALTY_MIN - 1e-6);
            assert!(row.penalty <= PENALTY_MAX.min(row.stiffness) + 1e-6);
            assert!(row.lambda >= row.fmin - 1e-4);
            assert!(row.lambda <= row.fmax + 1e-4);
        }
    }
}

#[test]
fn coulomb_cone_bounds_tangent_duals() {
    let (mut world, _floor) = world_with_floor();
    world.set_post_stabilization(true);

    // A slightly offset stack so friction actually works.
    world.add_body(Body::rectangle(
        Vec2::new(0.2, -3.2),
        0.05,
        Vec2::splat(1.5),
        1.0,
        0.5,
    ));

    run(&mut world, 240);

    for (_, force) in world.forces() {
        if force.contact_count() == 0 {
            continue;
        }
        let rows = force.rows().rows();
        for i in 0..force.contact_count() {
            let normal = rows[2 * i].lambda;
            let tangent = rows[2 * i + 1].lambda;
            // µ = √(0.5·0.6); the cone uses the current normal dual.
            let mu = (0.5_f32 * 0.6).sqrt();
            assert!(
                tangent.abs() <= mu * normal.abs() + 1e-3,
                "|λt| = {} must stay inside the cone µ|λn| = {}",
                tangent.abs(),
                mu * normal.abs()
            );
        }
    }
}

#[test]
fn poses_stay_finite() {
    let (mut world, _floor) = world_with_floor();
    for i in 0..4 {
        world.add_body(Body::rectangle(
            Vec2::new(-1.5 + i as f32, 2.0 + 1.2 * i as f32),
            0.3 * i as f32,
            Vec2::splat(1.0),
            1.0,
            0.4,
        ));
    }

    run(&mut world, 600);

    for (_, b) in world.bodies().iter() {
        assert!(b.pose.is_finite(), "pose went non-finite: {:?}", b.pose);
        assert!(b.velocity.is_finite());
    }
    assert!(!world.is_urgent_stopped());
}

// ─── Seed scenario: pendulum ──────────────────────────────────

#[test]
fn pendulum_preserves_length_and_swings() {
    let mut world = World::default();
    let anchor = world.add_body(Body::rectangle(
        Vec2::ZERO,
        0.0,
        Vec2::splat(0.2),
        0.0,
        0.0,
    ));
    let bob = world.add_body(Body::particle(Vec2::new(5.0, 0.0), 1.0));

    let rope = Length::new(
        world.bodies(),
        anchor,
        bob,
        Vec2::ZERO,
        Vec2::ZERO,
        0.0,
        5.0,
    )
    .unwrap();
    world.add_force(Box::new(rope));

    let mut lowest = 0.0_f32;
    let mut rebound = -10.0_f32;
    let mut passed_bottom = false;

    for step in 0..300 {
        world.step(DT);
        let p = world.body(bob).unwrap().position();

        let dist = p.length();
        // The penalty ramps up over the first dozen steps; after that
        // the rope must hold its length tightly.
        let tolerance = if step < 30 { 0.25 } else { 0.1 };
        assert!(
            (dist - 5.0).abs() < tolerance,
            "rope length must hold, got {dist} at step {step}"
        );

        if p.y < lowest {
            lowest = p.y;
        }
        if p.x < 0.0 {
            passed_bottom = true;
        }
        if passed_bottom && p.y > rebound {
            rebound = p.y;
        }
    }

    assert!(lowest < -4.0, "bob must swing down, lowest = {lowest}");
    assert!(passed_bottom, "bob must pass under the anchor");
    assert!(
        rebound > -3.0,
        "bob must recover most of its height, rebound = {rebound}"
    );
}

// ─── Seed scenario: fracture ──────────────────────────────────

#[test]
fn overloaded_joint_fractures_and_releases() {
    let mut world = World::default();

    let anchor = world.add_body(Body::rectangle(
        Vec2::ZERO,
        0.0,
        Vec2::splat(1.0),
        0.0,
        0.5,
    ));
    let arm = world.add_body(Body::rectangle(
        Vec2::new(2.0, 0.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    let joint = Joint::new(
        world.bodies(),
        Some(anchor),
        arm,
        Vec2::new(0.5, 0.0),
        Vec2::new(-1.5, 0.0),
        Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        Some(0.5),
    )
    .unwrap();
    let joint_id = world.add_force(Box::new(joint));

    run(&mut world, 240);

    let force = world.force(joint_id).expect("fractured joints persist");
    assert!(
        force.is_disabled(),
        "gravity torque must trip the fracture threshold"
    );
    for row in force.rows().rows() {
        assert_eq!(row.stiffness, 0.0);
        assert_eq!(row.lambda, 0.0);
        assert_eq!(row.penalty, 0.0);
    }

    // With the joint dormant the arm is unsupported and falls.
    let y = world.body(arm).unwrap().pose.y;
    assert!(y < -1.0, "released arm must fall, y = {y}");
}

// ─── Step-loop behavior ───────────────────────────────────────

#[test]
fn paused_world_does_not_advance() {
    let (mut world, _floor) = world_with_floor();
    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, 5.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    world.set_paused(true);
    run(&mut world, 30);
    assert_eq!(world.body(body).unwrap().pose.y, 5.0);
    assert_eq!(world.step_count(), 0);

    world.set_paused(false);
    run(&mut world, 30);
    assert!(world.body(body).unwrap().pose.y < 5.0);
}

#[test]
fn step_limit_latches_urgent_stop() {
    let (mut world, _floor) = world_with_floor();
    world.set_step_limit(Some(5));
    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, 5.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    run(&mut world, 10);
    assert!(world.is_urgent_stopped());
    assert_eq!(world.step_count(), 5);

    let frozen = world.body(body).unwrap().pose;
    run(&mut world, 10);
    assert_eq!(world.body(body).unwrap().pose, frozen, "urgent stop is latched");
}

#[test]
fn deterministic_replay_is_bit_exact() {
    let build = || {
        let (mut world, _floor) = world_with_floor();
        for i in 0..3 {
            world.add_body(Body::rectangle(
                Vec2::new(-1.0 + i as f32, 0.0 + 1.1 * i as f32),
                0.2 * i as f32,
                Vec2::splat(1.0),
                1.0,
                0.5,
            ));
        }
        world
    };

    let mut first = build();
    let mut second = build();
    run(&mut first, 120);
    run(&mut second, 120);

    let poses_a: Vec<[u32; 3]> = first
        .bodies()
        .iter()
        .map(|(_, b)| [b.pose.x.to_bits(), b.pose.y.to_bits(), b.pose.z.to_bits()])
        .collect();
    let poses_b: Vec<[u32; 3]> = second
        .bodies()
        .iter()
        .map(|(_, b)| [b.pose.x.to_bits(), b.pose.y.to_bits(), b.pose.z.to_bits()])
        .collect();

    assert_eq!(poses_a, poses_b, "identical runs must agree bit-for-bit");
}

#[test]
fn telemetry_reports_steps_and_contacts() {
    use std::sync::{Arc, Mutex};

    /// Sink that shares its buffer with the test.
    struct SharedSink(Arc<Mutex<Vec<marrow_telemetry::SimulationEvent>>>);
    impl marrow_telemetry::EventSink for SharedSink {
        fn handle(&mut self, event: &marrow_telemetry::SimulationEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
        fn name(&self) -> &str {
            "shared_sink"
        }
    }

    let (mut world, _floor) = world_with_floor();
    world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.95),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    let buffer = Arc::new(Mutex::new(Vec::new()));
    world
        .events_mut()
        .add_sink(Box::new(SharedSink(Arc::clone(&buffer))));

    run(&mut world, 5);
    world.events_mut().flush();

    let events = buffer.lock().unwrap();
    let begins = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::StepBegin))
        .count();
    let ends = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::StepEnd { .. }))
        .count();
    assert_eq!(begins, 5);
    assert_eq!(ends, 5);

    // The overlapping box produces a manifold report with contacts.
    assert!(events.iter().any(|e| matches!(
        e.kind,
        EventKind::ContactDetection { contacts, .. } if contacts > 0
    )));
}

#[test]
fn stepper_caps_catchup_substeps() {
    let (mut world, _floor) = world_with_floor();
    world.add_body(Body::rectangle(
        Vec2::new(0.0, 2.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    let mut stepper = FixedStepper::new();
    // A huge frame gap must clamp to the substep cap and discard the
    // excess instead of spiraling.
    let ran = stepper.advance(&mut world, 10.0);
    assert_eq!(ran, 5);
    assert_eq!(world.step_count(), 5);

    // A normal frame advances exactly once.
    let ran = stepper.advance(&mut world, DT);
    assert_eq!(ran, 1);
}

#[test]
fn stepper_culls_out_of_bounds_bodies() {
    let mut world = World::default();
    let stray = world.add_body(Body::rectangle(
        Vec2::new(0.0, 299.5),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));
    // Launch it upward, out of the limit box.
    world
        .body_mut(stray)
        .unwrap()
        .set_velocity(Vec3::new(0.0, 120.0, 0.0));

    let mut stepper = FixedStepper::new();
    for _ in 0..120 {
        stepper.advance(&mut world, DT);
    }
    assert!(world.body(stray).is_none(), "wayward body must be culled");
}

#[test]
fn drag_joint_follows_anchor() {
    let (mut world, _floor) = world_with_floor();
    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.4),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));

    let drag = world.begin_drag(body, Vec2::new(0.0, -3.4)).unwrap();
    assert!(world.body(body).unwrap().is_dragged);

    // Pull the anchor sideways and upward; the box must follow.
    for i in 0..120 {
        let t = (i + 1) as f32 / 120.0;
        world.update_drag(drag, Vec2::new(4.0 * t, -3.4 + 2.0 * t), Vec3::ZERO);
        world.step(DT);
    }
    let p = world.body(body).unwrap().position();
    assert!(
        (p - Vec2::new(4.0, -1.4)).length() < 1.0,
        "dragged box should track the pointer, got {p:?}"
    );

    world.end_drag(drag);
    assert!(!world.body(body).unwrap().is_dragged);
    assert!(world.force(drag).is_none());
}

#[test]
fn destroying_a_body_unlinks_its_forces() {
    let (mut world, floor) = world_with_floor();
    let body = world.add_body(Body::rectangle(
        Vec2::new(0.0, -3.4),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));
    run(&mut world, 10);

    assert!(world.forces().count() > 0, "manifold expected before removal");
    world.remove_body(body);

    assert_eq!(world.forces().count(), 0, "manifold must die with the body");
    assert!(world
        .body(floor)
        .unwrap()
        .forces
        .is_empty(), "floor back-references must be detached");
}
