//! Built-in systems (§4.O): 2D rendering, 3D rendering, animation playback,
//! and audio auto-play, each a thin adapter from the scheduler's per-tick
//! call into the corresponding renderer/playback type.
//!
//! Grounded in the teacher's `systems/render.rs` and `systems/animation.rs`
//! (`tick_animations`), which already split "gather state from the world"
//! from "hand it to a renderer/player" the same way; this module keeps that
//! split but drives it through [`crate::world::World`] queries instead of the
//! teacher's fixed entity-array scan.

use std::any::TypeId;

use glam::{Mat4, Vec3};

use crate::components::AnimationComponent;
use crate::audio::AudioSource;
use crate::batch2d::Batch2DRenderer;
use crate::camera::Camera;
use crate::components::{MeshRendererComponent, SpriteRenderer};
use crate::mesh_renderer::MeshRenderer3D;
use crate::renderer::api::RendererBackend;
use crate::renderer::resources::TextureFactory;
use crate::scheduler::System;
use crate::transform::Transform;
use crate::world::{World, WorldEvent};

/// The first primary camera's view-projection matrix and world-space
/// position, or `None` if no camera is marked primary.
fn primary_camera_frustum(world: &World) -> Option<(Mat4, Vec3)> {
    world.ids_with_component::<Camera>().into_iter().find_map(|id| {
        world
            .with_component_mut::<Camera, _>(id, |camera| {
                camera.is_primary().then(|| (camera.view_projection_matrix(), camera.position()))
            })
            .ok()
            .flatten()
    })
}

/// [`World::active_camera_override`]'s camera if one is set and still
/// holds a [`Camera`] component, falling back to [`primary_camera_frustum`]
/// otherwise (§4.D: edit mode renders through an explicit editor camera).
fn active_camera_frustum(world: &World) -> Option<(Mat4, Vec3)> {
    if let Some(id) = world.active_camera_override() {
        if let Ok(frustum) =
            world.with_component_mut::<Camera, _>(id, |camera| (camera.view_projection_matrix(), camera.position()))
        {
            return Some(frustum);
        }
    }
    primary_camera_frustum(world)
}

/// Draws every entity holding a [`Transform`] and a [`SpriteRenderer`]
/// through a [`Batch2DRenderer`]. Edit-capable (§4.D: "only rendering
/// systems marked as edit-capable" run under `on_update_edit`).
pub struct RenderingSystem2D<B: RendererBackend> {
    renderer: Batch2DRenderer<B>,
}

impl<B: RendererBackend> RenderingSystem2D<B> {
    pub fn new(renderer: Batch2DRenderer<B>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Batch2DRenderer<B> {
        &self.renderer
    }
}

impl<B: RendererBackend + 'static> System for RenderingSystem2D<B> {
    fn priority(&self) -> i32 {
        40
    }

    fn on_update(&mut self, _dt: f32, world: &World) {
        let view_projection = active_camera_frustum(world).map(|(vp, _)| vp).unwrap_or(Mat4::IDENTITY);
        self.renderer.begin_scene(view_projection);

        let mut sprites: Vec<(i32, Transform, SpriteRenderer)> = world
            .view::<Transform>()
            .into_iter()
            .filter_map(|(id, transform)| {
                world.try_get_component::<SpriteRenderer>(id).map(|sprite| (id, transform, sprite))
            })
            .collect();
        // Back-to-front by layer; stable sort keeps entity-registration order
        // within a layer (SPEC_FULL.md "Render layers").
        sprites.sort_by_key(|(_, _, sprite)| sprite.layer);

        for (id, transform, sprite) in sprites {
            let model = transform.model_matrix();
            let result = match sprite.texture {
                Some(texture) => {
                    self.renderer.draw_textured_quad(model, texture, sprite.tint, sprite.tiling_factor, id)
                }
                None => self.renderer.draw_quad(model, sprite.tint, id),
            };
            if let Err(err) = result {
                log::warn!("2D draw failed for entity {id}: {err}");
            }
        }

        if let Err(err) = self.renderer.end_scene() {
            log::warn!("2D batch flush failed: {err}");
        }
    }

    fn is_edit_capable(&self) -> bool {
        true
    }
}

/// Draws every entity holding a [`Transform`] and a [`MeshRendererComponent`]
/// through a [`MeshRenderer3D`].
pub struct RenderingSystem3D<B: RendererBackend> {
    renderer: MeshRenderer3D<B>,
    texture_factory: TextureFactory,
}

impl<B: RendererBackend> RenderingSystem3D<B> {
    pub fn new(renderer: MeshRenderer3D<B>) -> Self {
        Self { renderer, texture_factory: TextureFactory::new() }
    }

    pub fn renderer(&self) -> &MeshRenderer3D<B> {
        &self.renderer
    }

    pub fn texture_factory(&self) -> &TextureFactory {
        &self.texture_factory
    }

    pub fn texture_factory_mut(&mut self) -> &mut TextureFactory {
        &mut self.texture_factory
    }
}

impl<B: RendererBackend + 'static> System for RenderingSystem3D<B> {
    fn priority(&self) -> i32 {
        50
    }

    fn on_update(&mut self, _dt: f32, world: &World) {
        let (view_projection, view_position) = active_camera_frustum(world).unwrap_or((Mat4::IDENTITY, Vec3::ZERO));
        self.renderer.begin_scene(view_projection, view_position);

        for id in world.group2::<Transform, MeshRendererComponent>() {
            let Ok(transform) = world.get_component::<Transform>(id) else { continue };
            let Some(mesh_renderer) = world.try_get_component::<MeshRendererComponent>(id) else { continue };
            let mut mesh = mesh_renderer.mesh.borrow_mut();
            let model = transform.model_matrix();
            if let Err(err) =
                self.renderer.draw_model(model, &mut mesh, mesh_renderer.overrides, &self.texture_factory, id)
            {
                log::warn!("3D draw failed for entity {id}: {err}");
            }
        }

        self.renderer.end_scene();
    }
}

/// Advances every [`AnimationComponent`] by `dt` each tick.
#[derive(Debug, Default)]
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn priority(&self) -> i32 {
        20
    }

    fn on_update(&mut self, dt: f32, world: &World) {
        for id in world.ids_with_component::<AnimationComponent>() {
            let Ok((events, source_rect)) = world.with_component_mut::<AnimationComponent, _>(id, |component| {
                let previous_frame = component.player.current_frame();
                let events = component.advance(dt);
                let frame_changed = component.player.current_frame() != previous_frame;
                let source_rect = frame_changed.then(|| component.current_source_rect()).flatten();
                (events, source_rect)
            }) else {
                continue;
            };
            for event in events {
                log::debug!("entity {id} animation event: {event}");
            }
            // §4.N: the animation is the only writer of the sprite's atlas
            // rect; it never reads the sprite back.
            if let Some(source_rect) = source_rect {
                let _ = world.with_component_mut::<SpriteRenderer, _>(id, |sprite| {
                    sprite.source_rect = Some(source_rect);
                });
            }
        }
    }
}

/// Auto-plays any [`AudioSource`] added with `play_on_awake` set, by
/// draining the world's mutation queue each tick (§9: "model this as a
/// world-level callback queue drained at the end of each mutation").
#[derive(Debug, Default)]
pub struct AudioSystem;

impl System for AudioSystem {
    fn priority(&self) -> i32 {
        60
    }

    fn on_update(&mut self, _dt: f32, world: &World) {
        let audio_source_kind = TypeId::of::<AudioSource>();
        for event in world.drain_events() {
            let WorldEvent::ComponentAdded(id, kind) = event else { continue };
            if kind != audio_source_kind {
                continue;
            }
            let _ = world.with_component_mut::<AudioSource, _>(id, |source| {
                if source.play_on_awake {
                    source.play();
                }
            });
        }
    }
}
