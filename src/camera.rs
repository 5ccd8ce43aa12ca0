//! Camera model (§4.E): orthographic and perspective projections with
//! lazily-cached, dirty-flag-invalidated view/projection/view-projection
//! matrices.
//!
//! Grounded in the teacher's `Camera2D` (`renderer/camera.rs`): same
//! `set_viewport_size`-drives-aspect shape and the same bounds/follow
//! conveniences (kept per SPEC_FULL.md's supplemented-features section),
//! but rebuilt around the source's actual projection math (two variants,
//! not just orthographic) and around explicit cache invalidation instead of
//! always recomputing, since the spec makes the caching behavior itself a
//! tested property.

use glam::{Mat4, Vec2, Vec3};

use crate::transform::compose_trs;

/// Which projection a [`Camera`] uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// `size` is the half-height of the visible area in world units; the
    /// half-width is `size * aspect`.
    Orthographic { size: f32, near: f32, far: f32 },
    /// `fov_y` in radians.
    Perspective { fov_y: f32, near: f32, far: f32 },
}

/// An orthographic or perspective camera with TRS placement and cached
/// derived matrices.
///
/// Every setter compares the incoming value against the current one and
/// only marks the cache dirty on an actual change (§3: "Setting a field to
/// its current value must not invalidate the cache").
pub struct Camera {
    projection: Projection,
    aspect: f32,
    fixed_aspect_ratio: bool,
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    primary: bool,
    bounds: Option<[f32; 4]>,

    projection_dirty: bool,
    view_dirty: bool,
    cached_projection: Mat4,
    cached_view: Mat4,
    cached_view_projection: Mat4,
}

impl Camera {
    pub fn orthographic(size: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Orthographic { size, near, far })
    }

    pub fn perspective(fov_y: f32, near: f32, far: f32) -> Self {
        Self::new(Projection::Perspective { fov_y, near, far })
    }

    fn new(projection: Projection) -> Self {
        Self {
            projection,
            aspect: 1.0,
            fixed_aspect_ratio: false,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            primary: false,
            bounds: None,
            projection_dirty: true,
            view_dirty: true,
            cached_projection: Mat4::IDENTITY,
            cached_view: Mat4::IDENTITY,
            cached_view_projection: Mat4::IDENTITY,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub fn fixed_aspect_ratio(&self) -> bool {
        self.fixed_aspect_ratio
    }

    pub fn set_fixed_aspect_ratio(&mut self, fixed: bool) {
        self.fixed_aspect_ratio = fixed;
    }

    /// Update the aspect ratio from a viewport size. A zero width or height
    /// is a no-op: no division by zero, no cache invalidation. Has no
    /// effect if [`Self::fixed_aspect_ratio`] is set (§4.D: `on_viewport_resize`
    /// only updates cameras with the flag unset).
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || self.fixed_aspect_ratio {
            return;
        }
        let aspect = width as f32 / height as f32;
        self.set_aspect(aspect);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if self.aspect != aspect {
            self.aspect = aspect;
            self.projection_dirty = true;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.view_dirty = true;
        }
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        if self.rotation != rotation {
            self.rotation = rotation;
            self.view_dirty = true;
        }
    }

    /// Convenience for 2D cameras, which only ever rotate about Z.
    pub fn set_rotation_z(&mut self, radians: f32) {
        self.set_rotation(Vec3::new(self.rotation.x, self.rotation.y, radians));
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        if self.scale != scale {
            self.scale = scale;
            self.view_dirty = true;
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) {
        if self.projection != projection {
            self.projection = projection;
            self.projection_dirty = true;
        }
    }

    fn recompute_projection(&mut self) {
        if !self.projection_dirty {
            return;
        }
        self.cached_projection = match self.projection {
            Projection::Orthographic { size, near, far } => {
                let half_height = size;
                let half_width = size * self.aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far)
            }
            Projection::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh(fov_y, self.aspect, near, far)
            }
        };
        self.projection_dirty = false;
    }

    fn recompute_view(&mut self) {
        if !self.view_dirty {
            return;
        }
        let model = compose_trs(self.position, self.rotation, self.scale);
        self.cached_view = model.inverse();
        self.view_dirty = false;
    }

    /// The cached projection matrix, recomputing it first if dirty.
    pub fn projection_matrix(&mut self) -> Mat4 {
        self.recompute_projection();
        self.cached_projection
    }

    /// The cached view matrix (inverse of the camera's model matrix),
    /// recomputing it first if dirty.
    pub fn view_matrix(&mut self) -> Mat4 {
        self.recompute_view();
        self.cached_view
    }

    /// `projection * view`, recomputing either factor first if dirty
    /// (§4.E: multiplication convention is fixed as projection x view).
    pub fn view_projection_matrix(&mut self) -> Mat4 {
        self.recompute_projection();
        self.recompute_view();
        self.cached_view_projection = self.cached_projection * self.cached_view;
        self.cached_view_projection
    }

    // -- Supplemented 2D camera conveniences, ported from the teacher's
    // Camera2D for the orthographic case (SPEC_FULL.md "Camera bounds/follow
    // helpers"). --

    /// Restrict the camera center (xy of position) to stay within a world
    /// rectangle, clamping immediately.
    pub fn set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.bounds = Some([min.x, min.y, max.x, max.y]);
        self.clamp_to_bounds();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    fn half_extent(&self) -> Vec2 {
        match self.projection {
            Projection::Orthographic { size, .. } => Vec2::new(size * self.aspect, size),
            Projection::Perspective { .. } => Vec2::ZERO,
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some([min_x, min_y, max_x, max_y]) = self.bounds else { return };
        let half = self.half_extent();
        let bounds_w = max_x - min_x;
        let bounds_h = max_y - min_y;
        let mut position = self.position;
        position.x = if half.x * 2.0 >= bounds_w {
            (min_x + max_x) / 2.0
        } else {
            position.x.clamp(min_x + half.x, max_x - half.x)
        };
        position.y = if half.y * 2.0 >= bounds_h {
            (min_y + max_y) / 2.0
        } else {
            position.y.clamp(min_y + half.y, max_y - half.y)
        };
        self.set_position(position);
    }

    /// Snap the camera center to `target`, honoring bounds.
    pub fn look_at(&mut self, target: Vec2) {
        self.set_position(Vec3::new(target.x, target.y, self.position.z));
        self.clamp_to_bounds();
    }

    /// Whether a world-space point falls within the orthographic viewport.
    /// Always `true` for a perspective camera (no well-defined 2D extent).
    pub fn is_visible(&self, point: Vec2) -> bool {
        match self.projection {
            Projection::Orthographic { size, .. } => {
                let half = self.half_extent();
                let center = Vec2::new(self.position.x, self.position.y);
                point.x >= center.x - half.x
                    && point.x <= center.x + half.x
                    && point.y >= center.y - half.y
                    && point.y <= center.y + half.y
                    && size > 0.0
            }
            Projection::Perspective { .. } => true,
        }
    }
}
