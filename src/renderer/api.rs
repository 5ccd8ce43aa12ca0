//! Backend-neutral renderer command surface (§4.F, §6).
//!
//! The trait is the capability set a concrete backend (OpenGL/WebGPU/etc.)
//! must implement; this crate never hardcodes one, per §9's redesign note
//! on interface-based polymorphism ("resolve the backend once at scene
//! start" rather than dispatching per call). [`NullRendererBackend`] is a
//! reference implementation used by tests and headless hosts.

use crate::error::RendererError;
use crate::renderer::resources::VertexArrayHandle;

/// Operations every renderer backend must supply (§6: "Renderer backend").
pub trait RendererBackend {
    /// Enable alpha blending (`src_alpha`, `one_minus_src_alpha`) and depth
    /// testing (`less_equal`). Called once, at scene start.
    fn init(&mut self) -> Result<(), RendererError>;

    fn set_clear_color(&mut self, rgba: [f32; 4]) -> Result<(), RendererError>;

    fn clear(&mut self) -> Result<(), RendererError>;

    /// Issue an indexed triangle draw. If `index_count` is `None`, the
    /// backend uses the vertex array's bound index buffer's full count.
    fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: Option<u32>) -> Result<(), RendererError>;

    fn draw_lines(&mut self, vertex_array: VertexArrayHandle, vertex_count: u32) -> Result<(), RendererError>;

    /// Accepts `1.0`; backends may clamp wider values silently.
    fn set_line_width(&mut self, width: f32) -> Result<(), RendererError>;
}

/// Records every call instead of touching a GPU. Used by this crate's own
/// tests (§8 scenarios 3/4/8) and by hosts that want to run the core
/// headless (e.g. under CI without a display).
#[derive(Debug, Default)]
pub struct NullRendererBackend {
    pub clear_color: [f32; 4],
    pub clear_calls: u32,
    pub indexed_draws: Vec<(VertexArrayHandle, u32)>,
    pub line_draws: Vec<(VertexArrayHandle, u32)>,
    pub line_width: f32,
    pub initialized: bool,
}

impl RendererBackend for NullRendererBackend {
    fn init(&mut self) -> Result<(), RendererError> {
        self.initialized = true;
        self.line_width = 1.0;
        Ok(())
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) -> Result<(), RendererError> {
        self.clear_color = rgba;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RendererError> {
        self.clear_calls += 1;
        Ok(())
    }

    fn draw_indexed(&mut self, vertex_array: VertexArrayHandle, index_count: Option<u32>) -> Result<(), RendererError> {
        self.indexed_draws.push((vertex_array, index_count.unwrap_or(0)));
        Ok(())
    }

    fn draw_lines(&mut self, vertex_array: VertexArrayHandle, vertex_count: u32) -> Result<(), RendererError> {
        self.line_draws.push((vertex_array, vertex_count));
        Ok(())
    }

    fn set_line_width(&mut self, width: f32) -> Result<(), RendererError> {
        self.line_width = width;
        Ok(())
    }
}
