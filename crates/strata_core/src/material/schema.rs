//! The renderer-side physical material.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::texture::Texture;

/// Texture-bearing slots on [`PhysicalMaterial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Map,
    ClearcoatMap,
    ClearcoatRoughnessMap,
    EmissiveMap,
    AoMap,
    RoughnessMap,
    MetalnessMap,
    NormalMap,
    AlphaMap,
}

impl TextureSlot {
    pub fn name(&self) -> &'static str {
        match self {
            TextureSlot::Map => "map",
            TextureSlot::ClearcoatMap => "clearcoatMap",
            TextureSlot::ClearcoatRoughnessMap => "clearcoatRoughnessMap",
            TextureSlot::EmissiveMap => "emissiveMap",
            TextureSlot::AoMap => "aoMap",
            TextureSlot::RoughnessMap => "roughnessMap",
            TextureSlot::MetalnessMap => "metalnessMap",
            TextureSlot::NormalMap => "normalMap",
            TextureSlot::AlphaMap => "alphaMap",
        }
    }

    /// Slots holding sRGB color rather than data.
    pub fn is_color(&self) -> bool {
        matches!(self, TextureSlot::Map | TextureSlot::EmissiveMap)
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar and color fields a literal parameter can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialField {
    Color,
    Emissive,
    Clearcoat,
    ClearcoatRoughness,
    Ior,
    Metalness,
    Opacity,
    Roughness,
}

/// Texture addressing outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl WrapMode {
    /// Convert a `wrapS`/`wrapT` token. Missing or unknown tokens repeat.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("clamp") => WrapMode::ClampToEdge,
            Some("mirror") => WrapMode::MirroredRepeat,
            Some("repeat") | None => WrapMode::Repeat,
            Some(other) => {
                log::warn!("Unknown wrap mode '{}', using repeat", other);
                WrapMode::Repeat
            }
        }
    }
}

/// Which channels of a texture a slot samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelFormat {
    Red,
    #[default]
    Rgb,
    Rgba,
}

impl ChannelFormat {
    /// Channel format from a texture node output name (`r`, `rgb`, `rgba`).
    pub fn from_output_name(output: &str) -> Self {
        match output {
            "r" => ChannelFormat::Red,
            "rgba" => ChannelFormat::Rgba,
            _ => ChannelFormat::Rgb,
        }
    }
}

/// A loaded texture attached to a material slot.
#[derive(Clone, Debug)]
pub struct BoundTexture {
    pub texture: Arc<Texture>,
    pub format: ChannelFormat,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

/// PBR material in the host renderer's schema.
#[derive(Clone, Debug)]
pub struct PhysicalMaterial {
    pub name: String,

    /// Base color (RGB, 0-1)
    pub color: Vec3,

    pub emissive: Vec3,

    /// Metallic factor (0=dielectric, 1=metal)
    pub metalness: f32,

    /// Roughness factor (0=smooth, 1=rough)
    pub roughness: f32,

    pub clearcoat: f32,
    pub clearcoat_roughness: f32,

    /// Index of refraction
    pub ior: f32,

    /// Opacity (0=transparent, 1=opaque)
    pub opacity: f32,

    pub transparent: bool,

    /// Multiply the base color by the geometry's `color` attribute
    pub vertex_colors: bool,

    pub double_sided: bool,

    maps: HashMap<TextureSlot, BoundTexture>,

    /// Bumped whenever the renderer needs to re-upload the material
    version: u64,
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            metalness: 0.0,
            roughness: 1.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            ior: 1.5,
            opacity: 1.0,
            transparent: false,
            vertex_colors: false,
            double_sided: false,
            maps: HashMap::new(),
            version: 0,
        }
    }
}

impl PhysicalMaterial {
    /// Create a new material with just a name and base color.
    pub fn new(name: impl Into<String>, color: Vec3) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    /// The material meshes use until something is bound.
    pub fn default_material(color: Vec3) -> Self {
        Self {
            double_sided: true,
            ..Self::new("DefaultMaterial", color)
        }
    }

    pub fn map(&self, slot: TextureSlot) -> Option<&BoundTexture> {
        self.maps.get(&slot)
    }

    /// Attach or clear a slot.
    pub fn set_map(&mut self, slot: TextureSlot, texture: Option<BoundTexture>) {
        match texture {
            Some(texture) => {
                self.maps.insert(slot, texture);
            }
            None => {
                self.maps.remove(&slot);
            }
        }
        self.mark_needs_update();
    }

    /// Check if this material uses any textures.
    pub fn has_textures(&self) -> bool {
        !self.maps.is_empty()
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive.length_squared() > 0.0 || self.maps.contains_key(&TextureSlot::EmissiveMap)
    }

    pub fn mark_needs_update(&mut self) {
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
