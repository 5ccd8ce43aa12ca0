//! Off-screen render targets with entity-ID picking (§3 Framebuffer, §4.J).

use crate::constants::{MAX_FRAMEBUFFER_SIZE, NO_ENTITY_SENTINEL};
use crate::error::RendererError;

/// A closed set of attachment pixel formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentFormat {
    Rgba8,
    /// Signed 32-bit integer attachment, used for entity-ID picking.
    RedInteger,
    Depth24Stencil8,
}

impl AttachmentFormat {
    fn is_integer(self) -> bool {
        matches!(self, AttachmentFormat::RedInteger)
    }

    fn is_color(self) -> bool {
        matches!(self, AttachmentFormat::Rgba8 | AttachmentFormat::RedInteger)
    }
}

/// One framebuffer attachment slot, holding its own CPU-side mirror of the
/// pixel data so `read_pixel`/`clear_attachment` work without a bound GPU
/// context (a real backend additionally owns a texture/renderbuffer handle
/// per attachment; this core only specifies the format and lifecycle).
struct Attachment {
    format: AttachmentFormat,
    integer_pixels: Vec<i32>,
}

impl Attachment {
    fn new(format: AttachmentFormat, width: u32, height: u32) -> Self {
        let integer_pixels = if format.is_integer() {
            vec![NO_ENTITY_SENTINEL; (width * height) as usize]
        } else {
            Vec::new()
        };
        Self { format, integer_pixels }
    }
}

/// An off-screen render target composed of one or more attachments.
pub struct Framebuffer {
    width: u32,
    height: u32,
    descriptor: Vec<AttachmentFormat>,
    attachments: Vec<Attachment>,
    bound: bool,
}

impl Framebuffer {
    /// Allocate and attach each attachment per `descriptor`, validating
    /// dimensions and overall completeness.
    pub fn create(descriptor: Vec<AttachmentFormat>, width: u32, height: u32) -> Result<Self, RendererError> {
        validate_dimensions(width, height)?;
        if descriptor.is_empty() || !descriptor.iter().any(|f| f.is_color()) {
            return Err(RendererError::FramebufferIncomplete);
        }
        let attachments = descriptor.iter().map(|&format| Attachment::new(format, width, height)).collect();
        Ok(Self { width, height, descriptor, attachments, bound: false })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Make this the active render target.
    pub fn bind(&mut self) {
        self.bound = true;
    }

    /// Restore the default target.
    pub fn unbind(&mut self) {
        self.bound = false;
    }

    /// Release all attachments and recreate them at the new size using the
    /// stored descriptor. A no-op if the size is unchanged. Fails if either
    /// dimension is zero or exceeds [`MAX_FRAMEBUFFER_SIZE`].
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        validate_dimensions(width, height)?;
        self.attachments = self
            .descriptor
            .iter()
            .map(|&format| Attachment::new(format, width, height))
            .collect();
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel-perfect read from an integer attachment. Requires the
    /// framebuffer to be bound.
    pub fn read_pixel(&self, attachment_index: usize, x: i32, y: i32) -> Result<i32, RendererError> {
        let attachment = self
            .attachments
            .get(attachment_index)
            .filter(|a| a.format.is_integer())
            .ok_or(RendererError::PixelReadOutOfRange { x, y, width: self.width, height: self.height })?;
        let index = self
            .index_of(x, y)
            .ok_or(RendererError::PixelReadOutOfRange { x, y, width: self.width, height: self.height })?;
        Ok(attachment.integer_pixels[index])
    }

    /// Write `value` into every texel of an integer attachment, e.g. `-1`
    /// for "no entity here".
    pub fn clear_attachment(&mut self, attachment_index: usize, value: i32) -> Result<(), RendererError> {
        let attachment = self
            .attachments
            .get_mut(attachment_index)
            .filter(|a| a.format.is_integer())
            .ok_or(RendererError::FramebufferIncomplete)?;
        attachment.integer_pixels.fill(value);
        Ok(())
    }

    /// Write `entity_id` to a single texel of an integer attachment.
    /// Exercised by the 2D/3D renderers when they rasterize a fragment that
    /// carries an entity id; this core does not rasterize triangles itself,
    /// so callers stand in for the backend's fragment shader.
    pub fn write_entity_id(&mut self, attachment_index: usize, x: u32, y: u32, entity_id: i32) -> Result<(), RendererError> {
        let width = self.width;
        let height = self.height;
        let attachment = self
            .attachments
            .get_mut(attachment_index)
            .filter(|a| a.format.is_integer())
            .ok_or(RendererError::PixelReadOutOfRange { x: x as i32, y: y as i32, width, height })?;
        if x >= width || y >= height {
            return Err(RendererError::PixelReadOutOfRange { x: x as i32, y: y as i32, width, height });
        }
        let index = y as usize * width as usize + x as usize;
        attachment.integer_pixels[index] = entity_id;
        Ok(())
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), RendererError> {
    if width == 0 || height == 0 || width > MAX_FRAMEBUFFER_SIZE || height > MAX_FRAMEBUFFER_SIZE {
        return Err(RendererError::DimensionOutOfRange { width, height, max: MAX_FRAMEBUFFER_SIZE });
    }
    Ok(())
}
