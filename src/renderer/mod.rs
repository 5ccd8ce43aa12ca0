//! Renderer API abstraction and GPU resource factories (§4.F, §4.G).

pub mod api;
pub mod resources;

pub use api::{NullRendererBackend, RendererBackend};
pub use resources::{
    ShaderFactory, ShaderHandle, TextureFactory, TextureHandle, TextureParams, VertexArrayHandle,
    VertexBufferHandle, IndexBufferHandle,
};
