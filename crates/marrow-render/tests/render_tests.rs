//! Integration tests for marrow-render.

use glam::Vec2;
use marrow_body::Body;
use marrow_render::{HeadlessRenderer, JsonFrameExporter, RenderFrame, Renderer};
use marrow_solver::World;

fn small_world() -> World {
    let mut world = World::default();
    world.add_body(Body::rectangle(
        Vec2::new(0.0, -5.0),
        0.0,
        Vec2::new(50.0, 2.0),
        0.0,
        0.6,
    ));
    world.add_body(
        Body::rectangle(Vec2::new(0.0, -3.95), 0.0, Vec2::splat(1.0), 1.0, 0.5)
            .with_color(0x4080ff),
    );
    world
}

#[test]
fn frame_captures_bodies_and_contacts() {
    let mut world = small_world();
    world.step(1.0 / 60.0);

    let frame = RenderFrame::capture(&world);
    assert_eq!(frame.bodies.len(), 2);
    assert_eq!(frame.step, 1);
    assert!(
        !frame.contacts.is_empty(),
        "overlapping bodies must produce contact points"
    );

    let colors: Vec<u32> = frame.bodies.iter().map(|b| b.color).collect();
    assert!(colors.contains(&0x4080ff));
}

#[test]
fn frame_preserves_line_thickness_tags() {
    let mut world = World::default();
    let a = world.add_body(Body::rectangle(
        Vec2::ZERO,
        0.0,
        Vec2::splat(1.0),
        0.0,
        0.5,
    ));
    let b = world.add_body(Body::rectangle(
        Vec2::new(3.0, 0.0),
        0.0,
        Vec2::splat(1.0),
        1.0,
        0.5,
    ));
    let joint = marrow_force::Joint::new(
        world.bodies(),
        Some(a),
        b,
        Vec2::ZERO,
        Vec2::ZERO,
        glam::Vec3::splat(f32::INFINITY),
        None,
    )
    .unwrap();
    world.add_force(Box::new(joint));

    world.step(1.0 / 60.0);
    let frame = RenderFrame::capture(&world);

    // Hard joints render as strong lines (thickness ≥ 0.5).
    assert!(frame.lines.iter().any(|l| l.thickness >= 0.5));
}

#[test]
fn headless_renderer_counts_frames() {
    let mut world = small_world();
    let mut renderer = HeadlessRenderer::new();

    for _ in 0..4 {
        world.step(1.0 / 60.0);
        renderer.submit_frame(&RenderFrame::capture(&world)).unwrap();
    }
    renderer.finalize().unwrap();
    assert_eq!(renderer.frame_count(), 4);
}

#[test]
fn json_exporter_writes_frames() {
    let mut world = small_world();
    let path = std::env::temp_dir().join("marrow_render_test.json");
    let mut exporter = JsonFrameExporter::new(path.to_str().unwrap());

    for _ in 0..3 {
        world.step(1.0 / 60.0);
        exporter.submit_frame(&RenderFrame::capture(&world)).unwrap();
    }
    exporter.finalize().unwrap();
    assert_eq!(exporter.frame_count(), 3);

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["frames"].as_array().unwrap().len(), 3);
    assert_eq!(value["frames"][0]["bodies"].as_array().unwrap().len(), 2);

    std::fs::remove_file(&path).ok();
}
