//! Rendering constants shared by the 2D batch renderer and GPU factories.
//!
//! Mirrors the teacher's static-constants-class pattern (`RenderingConstants`
//! in the source system), collapsed into module-level `const`s per the
//! "static utility classes" design note.

/// Maximum number of quads accumulated before a batch must flush.
pub const MAX_QUADS: usize = 10_000;
/// Vertices per quad (4) times `MAX_QUADS`.
pub const MAX_VERTICES: usize = MAX_QUADS * 4;
/// Indices per quad (6) times `MAX_QUADS`.
pub const MAX_INDICES: usize = MAX_QUADS * 6;
/// Fixed-size texture slot table used by the quad shader's sampler array:
/// slot 0 is reserved for the white fallback texture, leaving 16 slots for
/// distinct bound textures per batch.
pub const MAX_TEXTURE_SLOTS: usize = 17;
/// Maximum number of line segments accumulated before a flush.
pub const MAX_LINES: usize = 10_000;
/// Vertices per line segment (2) times `MAX_LINES`.
pub const MAX_LINE_VERTICES: usize = MAX_LINES * 2;
/// Slot reserved for the 1x1 opaque-white fallback texture.
pub const WHITE_TEXTURE_SLOT: u32 = 0;
/// Upper bound (in each dimension) on a framebuffer attachment.
pub const MAX_FRAMEBUFFER_SIZE: u32 = 8192;
/// Z-spacing applied between stacked tile-map layers.
pub const TILE_LAYER_Z_SPACING: f32 = 0.01;
/// Default tiling factor for a textured quad with no explicit tiling.
pub const DEFAULT_TILING_FACTOR: f32 = 1.0;
/// Sentinel value written to an integer attachment for "no entity here".
pub const NO_ENTITY_SENTINEL: i32 = -1;
/// Raw pixel bytes of the default 1x1 opaque-white texture.
pub const WHITE_TEXTURE_PIXELS: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
