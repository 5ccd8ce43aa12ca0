//! GPU resource factories and their caches (§4.G).
//!
//! Grounded in `nethercore-zx/src/graphics/pipeline/cache.rs`'s
//! `PipelineCache`: a `HashMap`-backed cache keyed by a content-identifying
//! key, with `get_or_create_*` entry points and explicit release. This
//! module generalizes that shape into one small [`ResourceCache`] reused by
//! every factory, since shader/texture/buffer caching in §4.G differs only
//! in the key type and the creation closure.
//!
//! No concrete GPU backend crate is adopted here (§4.F's "resolve the
//! backend once at scene start" plus the Non-goals' silence on any specific
//! graphics API): handles are opaque integers a real backend would map to
//! its own objects, and [`NullTextureFactory`] etc. provide an
//! always-succeeds in-memory implementation usable in tests and headless
//! hosts.

use std::collections::HashMap;
use std::hash::Hash;

use crate::constants::WHITE_TEXTURE_PIXELS;
use crate::error::ResourceError;

macro_rules! handle_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u64);
    };
}

handle_type!(ShaderHandle);
handle_type!(TextureHandle);
handle_type!(VertexBufferHandle);
handle_type!(IndexBufferHandle);
handle_type!(VertexArrayHandle);

/// A cache-by-key resource table shared by every factory in this module.
///
/// Duplicate `get_or_create` calls for the same key return the
/// already-cached handle (§4.G: "duplicate creates return the cached
/// handle"); `release` is idempotent.
struct ResourceCache<K, H> {
    next_handle: u64,
    by_key: HashMap<K, H>,
    live: HashMap<u64, K>,
}

impl<K: Eq + Hash + Clone, H: Copy + From<u64> + Into<u64>> ResourceCache<K, H> {
    fn new() -> Self {
        Self { next_handle: 1, by_key: HashMap::new(), live: HashMap::new() }
    }

    fn get_or_create(&mut self, key: K, create: impl FnOnce(H) -> Result<(), ResourceError>) -> Result<H, ResourceError> {
        if let Some(&handle) = self.by_key.get(&key) {
            return Ok(handle);
        }
        let raw = self.next_handle;
        self.next_handle += 1;
        let handle = H::from(raw);
        create(handle)?;
        self.by_key.insert(key.clone(), handle);
        self.live.insert(raw, key);
        Ok(handle)
    }

    fn release(&mut self, handle: H) {
        let raw: u64 = handle.into();
        if let Some(key) = self.live.remove(&raw) {
            self.by_key.remove(&key);
        }
    }

    fn is_live(&self, handle: H) -> bool {
        self.live.contains_key(&handle.into())
    }
}

impl From<u64> for ShaderHandle {
    fn from(v: u64) -> Self {
        ShaderHandle(v)
    }
}
impl From<ShaderHandle> for u64 {
    fn from(v: ShaderHandle) -> Self {
        v.0
    }
}
impl From<u64> for TextureHandle {
    fn from(v: u64) -> Self {
        TextureHandle(v)
    }
}
impl From<TextureHandle> for u64 {
    fn from(v: TextureHandle) -> Self {
        v.0
    }
}
impl From<u64> for VertexBufferHandle {
    fn from(v: u64) -> Self {
        VertexBufferHandle(v)
    }
}
impl From<VertexBufferHandle> for u64 {
    fn from(v: VertexBufferHandle) -> Self {
        v.0
    }
}
impl From<u64> for IndexBufferHandle {
    fn from(v: u64) -> Self {
        IndexBufferHandle(v)
    }
}
impl From<IndexBufferHandle> for u64 {
    fn from(v: IndexBufferHandle) -> Self {
        v.0
    }
}
impl From<u64> for VertexArrayHandle {
    fn from(v: u64) -> Self {
        VertexArrayHandle(v)
    }
}
impl From<VertexArrayHandle> for u64 {
    fn from(v: VertexArrayHandle) -> Self {
        v.0
    }
}

/// Minification/magnification filter and wrap mode, fixed per §4.G's file
/// texture contract (linear min, nearest mag, repeat wrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
}

/// In-memory texture factory: caches by absolute path for file-backed
/// textures, eagerly creates the default 1x1 white texture, and validates
/// `set_data` against the allocated size (§4.G).
pub struct TextureFactory {
    cache: ResourceCache<String, TextureHandle>,
    params: HashMap<u64, TextureParams>,
    white_texture: TextureHandle,
}

impl TextureFactory {
    pub fn new() -> Self {
        let mut cache: ResourceCache<String, TextureHandle> = ResourceCache::new();
        let mut params = HashMap::new();
        let white_texture = cache
            .get_or_create("@@white".to_string(), |handle: TextureHandle| {
                params.insert(handle.into(), TextureParams { width: 1, height: 1, mip_levels: 1 });
                Ok(())
            })
            .expect("white texture creation is infallible");
        Self { cache, params, white_texture }
    }

    /// The default 1x1 opaque-white texture, created eagerly and never
    /// evicted.
    pub fn white_texture(&self) -> TextureHandle {
        self.white_texture
    }

    /// Create (or fetch the cached handle for) a texture decoded from a
    /// file path. Decoding itself is the host's job (§1 Out of scope);
    /// this factory only manages the handle lifecycle and cache.
    pub fn create_from_file(&mut self, path: &str, width: u32, height: u32) -> Result<TextureHandle, ResourceError> {
        let mip_levels = mip_level_count(width, height);
        let mut params = std::mem::take(&mut self.params);
        let handle = self.cache.get_or_create(path.to_string(), |handle| {
            params.insert(handle.into(), TextureParams { width, height, mip_levels });
            Ok(())
        });
        self.params = params;
        handle
    }

    /// Allocate `RGBA8` storage of the given size, keyed by a synthetic key
    /// so repeated calls with identical dimensions still produce distinct
    /// textures (blank render targets are not deduplicated by content).
    pub fn create_from_size(&mut self, width: u32, height: u32) -> Result<TextureHandle, ResourceError> {
        let key = format!("@@blank:{}x{}:{}", width, height, self.cache.next_handle);
        let mut params = std::mem::take(&mut self.params);
        let handle = self.cache.get_or_create(key, |handle| {
            params.insert(handle.into(), TextureParams { width, height, mip_levels: 1 });
            Ok(())
        });
        self.params = params;
        handle
    }

    /// Upload raw pixel bytes. Fails unless `bytes.len() == width * height * 4`.
    pub fn set_data(&mut self, handle: TextureHandle, bytes: &[u8], width: u32, height: u32) -> Result<(), ResourceError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ResourceError::InvalidAssetFormat(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                bytes.len()
            )));
        }
        if !self.cache.is_live(handle) {
            return Err(ResourceError::AssetNotFound(format!("texture handle {:?}", handle)));
        }
        self.params.insert(handle.into(), TextureParams { width, height, mip_levels: 1 });
        Ok(())
    }

    pub fn params(&self, handle: TextureHandle) -> Option<TextureParams> {
        self.params.get(&handle.into()).copied()
    }

    pub fn release(&mut self, handle: TextureHandle) {
        if handle == self.white_texture {
            return;
        }
        self.params.remove(&handle.into());
        self.cache.release(handle);
    }
}

impl Default for TextureFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn mip_level_count(width: u32, height: u32) -> u32 {
    let max_dim = width.max(height).max(1);
    (32 - max_dim.leading_zeros()).min(9)
}

/// Shader program factory, cache-keyed by `(vertex_path, fragment_path)`.
pub struct ShaderFactory {
    cache: ResourceCache<(String, String), ShaderHandle>,
}

impl ShaderFactory {
    pub fn new() -> Self {
        Self { cache: ResourceCache::new() }
    }

    /// Create (or fetch) a shader program. `compile` is invoked only on a
    /// cache miss and models the backend's actual compile+link step;
    /// returning `Err` surfaces as [`ResourceError::InvalidAssetFormat`]
    /// carrying the backend's log.
    pub fn get_or_create(
        &mut self,
        vertex_path: &str,
        fragment_path: &str,
        compile: impl FnOnce() -> Result<(), String>,
    ) -> Result<ShaderHandle, ResourceError> {
        self.cache.get_or_create((vertex_path.to_string(), fragment_path.to_string()), |_| {
            compile().map_err(ResourceError::InvalidAssetFormat)
        })
    }

    pub fn release(&mut self, handle: ShaderHandle) {
        self.cache.release(handle);
    }
}

impl Default for ShaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// White-texture bytes as specified in §6: the only byte-exact file-format
/// contract this core carries.
pub fn white_texture_pixels() -> [u8; 4] {
    WHITE_TEXTURE_PIXELS
}
