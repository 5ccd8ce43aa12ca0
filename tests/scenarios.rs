//! End-to-end scenarios against the public API surface, one per numbered
//! scenario in spec.md §8. Each module's own unit tests already cover these
//! at the type level; this file exercises them the way a host embedding the
//! crate actually would, through `forgecore::` re-exports only.

use forgecore::{
    audio, AnimationAsset, AnimationClip, AnimationFrame, AttachmentFormat, Batch2DRenderer, Camera,
    Framebuffer, NullRendererBackend, RendererError, SourceRect, System, SystemScheduler,
    TextureHandle, VertexArrayHandle, World,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[test]
fn scenario_1_world_basics() {
    let world = World::new();
    let e1 = world.create_entity("Alpha");
    let _e2 = world.create_entity("Beta");

    world.add_component(e1.id(), Position { x: 10.0, y: 20.0, z: 0.0 }).unwrap();
    assert_eq!(world.view::<Position>(), vec![(e1.id(), Position { x: 10.0, y: 20.0, z: 0.0 })]);

    world.destroy_entity(e1.id());
    assert!(world.view::<Position>().is_empty());
}

#[test]
fn scenario_2_scheduler_priorities() {
    use std::cell::RefCell;
    use std::rc::Rc;

    struct TraceSystem {
        id: i32,
        priority: i32,
        trace: Rc<RefCell<Vec<String>>>,
    }

    macro_rules! trace_system {
        ($name:ident) => {
            struct $name(TraceSystem);
            impl System for $name {
                fn priority(&self) -> i32 {
                    self.0.priority
                }
                fn on_init(&mut self) {
                    self.0.trace.borrow_mut().push(format!("init:{}", self.0.id));
                }
                fn on_update(&mut self, _dt: f32, _world: &World) {
                    self.0.trace.borrow_mut().push(format!("update:{}", self.0.id));
                }
                fn on_shutdown(&mut self) {
                    self.0.trace.borrow_mut().push(format!("shutdown:{}", self.0.id));
                }
            }
        };
    }
    trace_system!(First);
    trace_system!(Second);
    trace_system!(Third);

    let trace = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = SystemScheduler::new();
    scheduler.register(First(TraceSystem { id: 1, priority: 3, trace: trace.clone() }), false).unwrap();
    scheduler.register(Second(TraceSystem { id: 2, priority: 1, trace: trace.clone() }), false).unwrap();
    scheduler.register(Third(TraceSystem { id: 3, priority: 2, trace: trace.clone() }), false).unwrap();

    let world = World::new();
    scheduler.initialize().unwrap();
    scheduler.update(0.016, &world).unwrap();
    scheduler.shutdown().unwrap();

    assert_eq!(
        *trace.borrow(),
        vec!["init:2", "init:3", "init:1", "update:2", "update:3", "update:1", "shutdown:1", "shutdown:3", "shutdown:2"]
    );
}

#[test]
fn scenario_3_batch_flush_at_cap() {
    let mut renderer = Batch2DRenderer::new(
        NullRendererBackend::default(),
        VertexArrayHandle(1),
        VertexArrayHandle(2),
        TextureHandle(0),
    );
    renderer.begin_scene(glam::Mat4::IDENTITY);
    for _ in 0..10_001 {
        renderer.draw_quad(glam::Mat4::IDENTITY, glam::Vec4::ONE, -1).unwrap();
    }
    renderer.end_scene().unwrap();

    let draws = &renderer.backend().indexed_draws;
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].1, 60_000);
    assert_eq!(draws[1].1, 6);
}

#[test]
fn scenario_4_texture_slot_exhaustion() {
    let mut renderer = Batch2DRenderer::new(
        NullRendererBackend::default(),
        VertexArrayHandle(1),
        VertexArrayHandle(2),
        TextureHandle(0),
    );
    renderer.begin_scene(glam::Mat4::IDENTITY);
    for n in 1..=17u64 {
        renderer
            .draw_textured_quad(glam::Mat4::IDENTITY, TextureHandle(n), glam::Vec4::ONE, 1.0, -1)
            .unwrap();
    }
    renderer.end_scene().unwrap();

    let draws = &renderer.backend().indexed_draws;
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].1, 16 * 6);
    assert_eq!(draws[1].1, 6);
}

#[test]
fn scenario_5_camera_aspect() {
    let mut camera = Camera::orthographic(10.0, -1.0, 1.0);
    camera.set_viewport_size(1920, 1080);
    assert!((camera.aspect() - 1920.0 / 1080.0).abs() < 1e-4);

    camera.set_viewport_size(0, 1080);
    assert!((camera.aspect() - 1920.0 / 1080.0).abs() < 1e-4);
}

#[test]
fn scenario_6_animation_round_trip() {
    let frames: Vec<AnimationFrame> = (0..4)
        .map(|i| AnimationFrame::new(SourceRect { x: i as f32 * 16.0, y: 0.0, width: 16.0, height: 16.0 }))
        .collect();
    let asset = AnimationAsset::new(vec![AnimationClip::new("walk", 8.0, frames)]);
    let mut player = forgecore::AnimationPlayer::new();
    player.play("walk");

    for expected in [1, 2, 3, 0] {
        player.advance(0.125, &asset);
        assert_eq!(player.current_frame(), expected);
    }
    player.advance(0.125, &asset);
    assert_eq!(player.current_frame(), 1);
}

#[test]
fn scenario_7_audio_conversions() {
    assert!((audio::db_to_linear(0.0) - 1.0).abs() < 1e-4);
    assert!((audio::db_to_linear(-6.0) - 0.5012).abs() < 1e-2);
    assert!((audio::semitones_to_pitch(12.0) - 2.0).abs() < 1e-4);
    assert!((audio::linear_to_db(0.0) - (-80.0)).abs() < 1e-2);
}

#[test]
fn scenario_8_framebuffer_picking() {
    let mut framebuffer =
        Framebuffer::create(vec![AttachmentFormat::Rgba8, AttachmentFormat::RedInteger, AttachmentFormat::Depth24Stencil8], 800, 600)
            .unwrap();
    framebuffer.bind();
    framebuffer.clear_attachment(1, -1).unwrap();
    framebuffer.write_entity_id(1, 100, 100, 42).unwrap();

    assert_eq!(framebuffer.read_pixel(1, 100, 100).unwrap(), 42);
    assert_eq!(framebuffer.read_pixel(1, 400, 300).unwrap(), -1);
    assert!(matches!(framebuffer.read_pixel(1, -1, 100), Err(RendererError::PixelReadOutOfRange { .. })));
}
