//! Texture decoding and caching for materials.
//!
//! Texture bytes come from a [`ResourceFetcher`], asynchronously. The
//! [`TextureCache`] memoizes requests by resource name: the first request
//! starts a fetch, every later request for the same name shares it, and all of
//! them observe the same result when it lands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{self, LocalBoxFuture, Shared};
use futures::FutureExt;
use image::ImageFormat;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unknown file: {0}")]
    NotFound(String),

    #[error("Failed to fetch '{path}': {message}")]
    Fetch { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Outcome shared by every requester of one texture.
pub type SharedTextureResult = Result<Arc<Texture>, Arc<TextureError>>;

/// A pending or completed texture request. Clones observe the same fetch.
pub type TextureFuture = Shared<LocalBoxFuture<'static, SharedTextureResult>>;

/// Future returned by a [`ResourceFetcher`].
pub type FetchFuture = LocalBoxFuture<'static, TextureResult<Vec<u8>>>;

/// Texture file types the cache knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFileType {
    Png,
    Jpeg,
    Tga,
}

impl TextureFileType {
    /// Determine the file type from the resource name's extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(TextureFileType::Png),
            "jpg" | "jpeg" => Some(TextureFileType::Jpeg),
            "tga" => Some(TextureFileType::Tga),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            TextureFileType::Png => ImageFormat::Png,
            TextureFileType::Jpeg => ImageFormat::Jpeg,
            TextureFileType::Tga => ImageFormat::Tga,
        }
    }
}

/// How a texture's color channels are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Values exactly as stored in the file
    #[default]
    Raw,
    /// RGB converted from sRGB to linear
    Linear,
}

/// A decoded texture.
///
/// Decoding keeps the file's values; color maps are converted with
/// [`Texture::to_linear`] when they are bound.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (0-1 range), row-major order
    pub pixels: Vec<[f32; 4]>,

    pub color_space: ColorSpace,

    /// Resource name the texture was requested under
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            color_space: ColorSpace::Raw,
            path: path.into(),
        }
    }

    /// Copy with RGB converted from sRGB to linear. Alpha is left alone.
    pub fn to_linear(&self) -> Texture {
        if self.color_space == ColorSpace::Linear {
            return self.clone();
        }
        let pixels = self
            .pixels
            .iter()
            .map(|&[r, g, b, a]| [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a])
            .collect();
        Texture {
            width: self.width,
            height: self.height,
            pixels,
            color_space: ColorSpace::Linear,
            path: self.path.clone(),
        }
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Decode fetched bytes into a texture.
pub fn decode_texture(
    bytes: &[u8],
    file_type: TextureFileType,
    path: &str,
) -> TextureResult<Texture> {
    let img = image::load_from_memory_with_format(bytes, file_type.image_format())?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| p.0.map(|channel| channel as f32 / 255.0))
        .collect();

    Ok(Texture::new(width, height, pixels, path))
}

/// Convert an sRGB-encoded value to linear.
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Source of texture bytes.
///
/// Implementations return immediately; the returned future resolves once the
/// bytes are available.
pub trait ResourceFetcher {
    fn fetch(&self, path: &str) -> FetchFuture;
}

/// Reads texture files from disk, relative to an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl ResourceFetcher for FileFetcher {
    fn fetch(&self, path: &str) -> FetchFuture {
        let full_path = self.resolve_path(path);
        async move {
            std::fs::read(&full_path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    TextureError::NotFound(full_path.display().to_string())
                }
                _ => TextureError::Io(e),
            })
        }
        .boxed_local()
    }
}

/// Memoizing texture cache.
///
/// At most one fetch is ever started per resource name; failures are cached
/// too, so a missing file is reported once rather than re-fetched.
pub struct TextureCache {
    fetcher: Box<dyn ResourceFetcher>,

    /// Requests by resource name
    textures: HashMap<String, TextureFuture>,

    /// Number of fetches started
    fetch_count: usize,
}

impl TextureCache {
    /// Create an empty cache over a fetcher.
    pub fn new(fetcher: impl ResourceFetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            textures: HashMap::new(),
            fetch_count: 0,
        }
    }

    /// Request a texture by resource name.
    ///
    /// Returns immediately. The returned future completes when the shared
    /// fetch does; unknown file types are rejected without fetching.
    pub fn request(&mut self, path: &str) -> TextureFuture {
        if let Some(existing) = self.textures.get(path) {
            return existing.clone();
        }

        let request: TextureFuture = match TextureFileType::from_path(path) {
            Some(file_type) => {
                self.fetch_count += 1;
                let fetch = self.fetcher.fetch(path);
                let path = path.to_string();
                async move {
                    let bytes = fetch.await.map_err(Arc::new)?;
                    let texture = decode_texture(&bytes, file_type, &path).map_err(Arc::new)?;
                    log::debug!(
                        "Loaded texture: {} ({}x{}, {:.1} KB)",
                        path,
                        texture.width,
                        texture.height,
                        texture.size_bytes() as f32 / 1024.0
                    );
                    Ok::<_, Arc<TextureError>>(Arc::new(texture))
                }
                .boxed_local()
                .shared()
            }
            None => {
                log::warn!("Unknown filetype for texture '{}'", path);
                let error = Arc::new(TextureError::UnsupportedFormat(path.to_string()));
                future::ready(Err(error)).boxed_local().shared()
            }
        };

        self.textures.insert(path.to_string(), request.clone());
        request
    }

    /// Get a successfully loaded texture without requesting it.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        match self.textures.get(path)?.peek()? {
            Ok(texture) => Some(texture.clone()),
            Err(_) => None,
        }
    }

    /// Check if a texture has been requested.
    pub fn is_cached(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Number of fetches started since creation.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// Get the number of requested textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Forget every request. In-flight fetches keep running for whoever
    /// still holds their futures.
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Get total memory usage of loaded textures.
    pub fn total_size_bytes(&self) -> usize {
        self.textures
            .values()
            .filter_map(|request| request.peek())
            .filter_map(|result| result.as_ref().ok())
            .map(|texture| texture.size_bytes())
            .sum()
    }
}

/// Poll a texture request once without blocking.
pub fn poll_texture(request: &TextureFuture) -> Option<SharedTextureResult> {
    request.clone().now_or_never()
}
