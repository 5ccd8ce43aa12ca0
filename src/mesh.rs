//! CPU-side triangle mesh data and its lazy GPU resource lifecycle (§3 Mesh,
//! §4.I).

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::renderer::resources::VertexArrayHandle;

/// One 3D mesh vertex, laid out for direct GPU upload via `bytemuck`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub entity_id: i32,
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2, entity_id: i32) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
            entity_id,
        }
    }
}

/// File paths the host resolves into textures; unset fields fall back to
/// defaults at draw time (§4.I: diffuse override, else mesh's own diffuse,
/// else the default white texture).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialHints {
    pub diffuse: Option<String>,
    pub specular: Option<String>,
    pub normal: Option<String>,
    pub height: Option<String>,
}

/// A CPU-side triangle mesh whose GPU vertex array is created lazily on
/// first draw.
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    pub material: MaterialHints,
    gpu_handle: Option<VertexArrayHandle>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>, material: MaterialHints) -> Self {
        Self { vertices, indices, material, gpu_handle: None }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_gpu_initialized(&self) -> bool {
        self.gpu_handle.is_some()
    }

    /// Create the GPU vertex array on first call; subsequent calls return
    /// the same handle without re-uploading.
    pub fn ensure_gpu_initialized(&mut self, allocate: impl FnOnce(&[MeshVertex], &[u32]) -> VertexArrayHandle) -> VertexArrayHandle {
        if let Some(handle) = self.gpu_handle {
            return handle;
        }
        let handle = allocate(&self.vertices, &self.indices);
        self.gpu_handle = Some(handle);
        handle
    }

    pub fn gpu_handle(&self) -> Option<VertexArrayHandle> {
        self.gpu_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let vertices = vec![
            MeshVertex::new(Vec3::new(0.0, 0.0, 0.0), Vec3::Z, Vec2::new(0.0, 0.0), 7),
            MeshVertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z, Vec2::new(1.0, 0.0), 7),
            MeshVertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, Vec2::new(0.0, 1.0), 7),
        ];
        Mesh::new(vertices, vec![0, 1, 2], MaterialHints::default())
    }

    #[test]
    fn gpu_resources_are_created_lazily_and_cached() {
        let mut mesh = triangle();
        assert!(!mesh.is_gpu_initialized());

        let mut allocations = 0;
        let handle_a = mesh.ensure_gpu_initialized(|_, _| {
            allocations += 1;
            VertexArrayHandle(42)
        });
        let handle_b = mesh.ensure_gpu_initialized(|_, _| {
            allocations += 1;
            VertexArrayHandle(99)
        });

        assert_eq!(handle_a, handle_b);
        assert_eq!(allocations, 1);
        assert!(mesh.is_gpu_initialized());
    }

    #[test]
    fn index_count_matches_index_list_length() {
        let mesh = triangle();
        assert_eq!(mesh.index_count(), 3);
    }
}
