//! Built-in renderable/animatable component kinds (§4.O's systems consume
//! these; §3 lists their fields).
//!
//! `MeshRendererComponent` and `AnimationComponent` wrap their GPU/playback
//! state in `Rc<RefCell<_>>`/`Rc<_>` so that a component fetched by value via
//! [`crate::world::World::view`] still shares the same mesh GPU handle and
//! animation asset across every entity instancing it, the way the teacher's
//! `SpriteComponent` shares an `AtlasId` rather than owning decoded pixels.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec4;

use crate::animation::{AnimationAsset, AnimationPlayer, SourceRect};
use crate::layer::RenderLayer;
use crate::mesh::Mesh;
use crate::mesh_renderer::MeshRendererOverrides;
use crate::renderer::resources::TextureHandle;

/// A 2D sprite drawn by the batch renderer (§3: "texture, tint, tiling
/// factor"). `texture` is `None` for an untextured color quad.
///
/// `source_rect` is the sub-texture atlas rectangle an attached
/// [`AnimationComponent`] writes on every frame change (§4.N: "the renderer
/// component is the *only* writable surface" an animation drives); leave it
/// `None` for a sprite that samples its whole texture. `layer` is a draw-order
/// bucket (SPEC_FULL.md "Render layers"); sprites within the same layer draw
/// in entity-registration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRenderer {
    pub texture: Option<TextureHandle>,
    pub tint: Vec4,
    pub tiling_factor: f32,
    pub source_rect: Option<SourceRect>,
    pub layer: RenderLayer,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self { texture: None, tint: Vec4::ONE, tiling_factor: 1.0, source_rect: None, layer: RenderLayer::default() }
    }
}

/// A 3D mesh drawn by [`crate::mesh_renderer::MeshRenderer3D`], sharing its
/// mesh (and that mesh's lazily-created GPU handle) with every entity
/// instancing the same asset.
#[derive(Clone)]
pub struct MeshRendererComponent {
    pub mesh: Rc<RefCell<Mesh>>,
    pub overrides: MeshRendererOverrides,
}

impl MeshRendererComponent {
    pub fn new(mesh: Rc<RefCell<Mesh>>) -> Self {
        Self { mesh, overrides: MeshRendererOverrides::default() }
    }
}

/// Per-entity animation playback sharing one immutable clip set.
#[derive(Clone)]
pub struct AnimationComponent {
    pub asset: Rc<AnimationAsset>,
    pub player: AnimationPlayer,
}

impl AnimationComponent {
    pub fn new(asset: Rc<AnimationAsset>) -> Self {
        Self { asset, player: AnimationPlayer::new() }
    }

    /// Advance playback by `dt`, returning any event labels the frame it
    /// newly entered carries. Takes `&mut self` so the call can split the
    /// borrow between `self.player` and `self.asset` instead of requiring the
    /// caller to hold both separately.
    pub fn advance(&mut self, dt: f32) -> Vec<String> {
        self.player.advance(dt, &self.asset)
    }

    /// The atlas rectangle of the current frame, for writing into a
    /// [`SpriteRenderer::source_rect`] (§4.N).
    pub fn current_source_rect(&self) -> Option<SourceRect> {
        let clip = self.asset.clip(self.player.current_clip()?)?;
        clip.frames.get(self.player.current_frame() as usize).map(|frame| frame.source_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationClip, AnimationFrame, SourceRect};

    #[test]
    fn sprite_renderer_defaults_to_untextured_white_tint() {
        let sprite = SpriteRenderer::default();
        assert!(sprite.texture.is_none());
        assert_eq!(sprite.tint, Vec4::ONE);
        assert_eq!(sprite.tiling_factor, 1.0);
    }

    #[test]
    fn mesh_renderer_component_shares_gpu_handle_across_clones() {
        let mesh = Rc::new(RefCell::new(Mesh::new(Vec::new(), Vec::new(), Default::default())));
        let component = MeshRendererComponent::new(mesh.clone());
        let cloned = component.clone();
        mesh.borrow_mut().ensure_gpu_initialized(|_, _| crate::renderer::resources::VertexArrayHandle(1));
        assert!(cloned.mesh.borrow().is_gpu_initialized());
    }

    #[test]
    fn animation_component_advance_uses_its_own_asset() {
        let frames = vec![AnimationFrame::new(SourceRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }); 2];
        let asset = Rc::new(AnimationAsset::new(vec![AnimationClip::new("idle", 8.0, frames)]));
        let mut component = AnimationComponent::new(asset);
        component.player.play("idle");
        component.advance(0.125);
        assert_eq!(component.player.current_frame(), 1);
    }
}
