//! Error taxonomy.
//!
//! One `thiserror` enum per family named in the error-handling design:
//! programmer-error conditions (`WorldError`, `SchedulerError`) are meant
//! to be unrecoverable and propagate to the host; transient backend and
//! asset-loading failures (`RendererError`, `ResourceError`) are logged
//! by the call site and do not abort the running scene.

use std::any::TypeId;

/// Errors raised by [`crate::world::World`] entity/component operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorldError {
    #[error("entity {0} already has a component of this type")]
    DuplicateComponent(i32),
    #[error("entity {0} has no component of this type")]
    MissingComponent(i32),
    #[error("entity {0} does not exist")]
    EntityNotFound(i32),
}

/// Errors raised by [`crate::scheduler::SystemScheduler`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulerError {
    #[error("system {0:?} is already registered")]
    DuplicateSystem(TypeId),
    #[error("scheduler has not been initialized")]
    NotInitialized,
    #[error("scheduler has already been initialized")]
    AlreadyInitialized,
    #[error("no such system registered")]
    UnknownSystem,
}

/// Errors raised by the renderer API abstraction (§4.F) and its backends.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RendererError {
    #[error("backend call failed with code {0}")]
    BackendCallFailed(i32),
    #[error("shader compilation failed: {0}")]
    ShaderCompileFailed(String),
    #[error("shader link failed: {0}")]
    ShaderLinkFailed(String),
    #[error("framebuffer is incomplete")]
    FramebufferIncomplete,
    #[error("dimension out of range: {width}x{height} (max {max})")]
    DimensionOutOfRange { width: u32, height: u32, max: u32 },
    #[error("pixel read out of range: ({x}, {y}) not within {width}x{height}")]
    PixelReadOutOfRange { x: i32, y: i32, width: u32, height: u32 },
}

/// Errors raised while resolving assets (textures, meshes) into GPU resources.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResourceError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),
    #[error("invalid asset format: {0}")]
    InvalidAssetFormat(String),
    #[error("component of type {0:?} cannot be cloned")]
    UnclonableComponent(TypeId),
}

/// Errors raised by audio source validation (§4.M).
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum AudioError {
    #[error("invalid volume {0} (must be in [0, 1])")]
    InvalidVolume(f32),
    #[error("invalid pitch {0} (must be in (0, 4])")]
    InvalidPitch(f32),
}

impl From<ResourceError> for RendererError {
    fn from(err: ResourceError) -> Self {
        RendererError::BackendCallFailed(match err {
            ResourceError::AssetNotFound(_) => 1,
            ResourceError::InvalidAssetFormat(_) => 2,
            ResourceError::UnclonableComponent(_) => 3,
        })
    }
}
