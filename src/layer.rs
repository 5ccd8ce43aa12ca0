//! Render layer ordering for the 2D batch renderer (SPEC_FULL.md
//! "Supplemented features"): §4.H leaves draw order unspecified beyond
//! submission order, so sprites additionally carry an optional sort key.
//!
//! Grounded in the teacher's `components/layer.rs`, kept as the same
//! six-variant back-to-front ordering.

/// Draw-order bucket for a [`crate::components::SpriteRenderer`]. Entities
/// are drawn back-to-front: `Background` first, `Ui` last. Within a layer,
/// submission order (entity registration order) decides draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    Terrain = 1,
    #[default]
    Objects = 2,
    Foreground = 3,
    Vfx = 4,
    Ui = 5,
}

impl RenderLayer {
    pub const COUNT: usize = 6;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Background),
            1 => Some(Self::Terrain),
            2 => Some(Self::Objects),
            3 => Some(Self::Foreground),
            4 => Some(Self::Vfx),
            5 => Some(Self::Ui),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
