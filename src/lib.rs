//! `forgecore`: the ECS kernel, system scheduler, camera/transform math, and
//! 2D/3D renderer core shared by every scene in the engine.

pub mod animation;
pub mod audio;
pub mod batch2d;
pub mod camera;
pub mod components;
pub mod constants;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod layer;
pub mod mesh;
pub mod mesh_renderer;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod systems;
pub mod timestep;
pub mod transform;
pub mod world;

pub use animation::{AnimationAsset, AnimationClip, AnimationFrame, AnimationPlayer, SourceRect};
pub use audio::{AudioListener, AudioSource, PlaybackState};
pub use batch2d::{Batch2DRenderer, LineVertex, QuadVertex};
pub use camera::{Camera, Projection};
pub use components::{AnimationComponent, MeshRendererComponent, SpriteRenderer};
pub use error::{AudioError, RendererError, ResourceError, SchedulerError, WorldError};
pub use framebuffer::{AttachmentFormat, Framebuffer};
pub use input::{InputSnapshot, KeyCode, MouseButton};
pub use layer::RenderLayer;
pub use mesh::{MaterialHints, Mesh, MeshVertex};
pub use mesh_renderer::{MeshRenderer3D, MeshRendererOverrides, ModelDrawUniforms, PhongLight};
pub use renderer::api::{NullRendererBackend, RendererBackend};
pub use renderer::resources::{
    IndexBufferHandle, ShaderFactory, ShaderHandle, TextureFactory, TextureHandle, TextureParams,
    VertexArrayHandle, VertexBufferHandle,
};
pub use scene::{Scene, SceneConfig, SceneState};
pub use scheduler::{System, SystemScheduler};
pub use systems::{AnimationSystem, AudioSystem, RenderingSystem2D, RenderingSystem3D};
pub use timestep::FixedTimestep;
pub use transform::Transform;
pub use world::{Component, ComponentRegistry, Entity, World, WorldConfig, WorldEvent};
