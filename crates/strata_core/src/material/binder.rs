//! Maps a resolved shading network onto [`PhysicalMaterial`].
//!
//! Literals are written straight onto the material. Connected texture
//! parameters become [`TextureBinding`]s that the caller resolves through the
//! texture cache; binding never waits on a fetch.

use std::sync::Arc;

use glam::Vec3;

use super::network::{ParamValue, Parameter, ShadingNetwork};
use super::schema::{
    BoundTexture, ChannelFormat, MaterialField, PhysicalMaterial, TextureSlot, WrapMode,
};
use super::{MaterialError, MaterialResult};
use crate::texture::Texture;
use crate::tokens::Tokens;

/// A texture the material wants in one of its slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    pub slot: TextureSlot,
    /// Resource name from the texture node's `file` parameter
    pub file: String,
    pub format: ChannelFormat,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

impl TextureBinding {
    /// Attach a loaded texture. Color slots sample linear values, so their
    /// texture is converted from sRGB; data maps keep the file's values.
    pub fn bind(&self, texture: Arc<Texture>) -> BoundTexture {
        let texture = if self.slot.is_color() {
            Arc::new(texture.to_linear())
        } else {
            texture
        };
        BoundTexture {
            texture,
            format: self.format,
            wrap_s: self.wrap_s,
            wrap_t: self.wrap_t,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    /// No main node; the mesh keeps the shared default material
    Default,
    Resolved {
        material: PhysicalMaterial,
        textures: Vec<TextureBinding>,
    },
}

/// Resolve a finalized network into a material plus pending texture bindings.
pub fn resolve_network(network: &ShadingNetwork, name: &str, tokens: &Tokens) -> Resolution {
    let Some(main) = network.main_node(tokens.main_node_marker) else {
        log::debug!("Material {} has no main node, using default", name);
        return Resolution::Default;
    };

    for parameter in main.param_names() {
        if !tokens.is_supported_parameter(parameter) {
            log::warn!("Unsupported material parameter '{}' on {}", parameter, name);
        }
    }

    let mut material = PhysicalMaterial::new(name, Vec3::ONE);
    let mut textures: Vec<TextureBinding> = Vec::new();

    for (parameter, slot) in tokens.texture_parameters() {
        let Some(Parameter::Connected(upstream)) = main.param(parameter) else {
            continue;
        };

        let Some(texture_node) = network.node(&upstream.node) else {
            // Nothing to sample; the slot stays empty
            log::debug!("{}: upstream node {} for {} is missing", name, upstream.node, parameter);
            continue;
        };

        let Some(file) = texture_node.literal(tokens.file).and_then(ParamValue::as_str) else {
            log::warn!("{}: texture node {} has no file", name, texture_node.path);
            continue;
        };

        if slot == TextureSlot::AlphaMap {
            let diffuse = textures
                .iter_mut()
                .find(|b| b.slot == TextureSlot::Map && b.file == file);
            match diffuse {
                Some(diffuse) if upstream.output == "a" => {
                    diffuse.format = ChannelFormat::Rgba;
                    material.transparent = true;
                }
                _ => log::warn!("Separate alpha channel is currently not supported"),
            }
            continue;
        }

        let wrap = |token: &str| {
            WrapMode::from_token(texture_node.literal(token).and_then(ParamValue::as_str))
        };

        textures.push(TextureBinding {
            slot,
            file: file.to_string(),
            format: ChannelFormat::from_output_name(&upstream.output),
            wrap_s: wrap(tokens.wrap_s),
            wrap_t: wrap(tokens.wrap_t),
        });
    }

    for (parameter, field) in tokens.literal_parameters() {
        let Some(Parameter::Literal(value)) = main.param(parameter) else {
            continue;
        };
        if let Err(e) = apply_literal(&mut material, parameter, field, value) {
            log::warn!("{}: {}", name, e);
        }
    }

    Resolution::Resolved { material, textures }
}

/// Write one literal onto the material.
pub fn apply_literal(
    material: &mut PhysicalMaterial,
    parameter: &str,
    field: MaterialField,
    value: &ParamValue,
) -> MaterialResult<()> {
    let color = || {
        value
            .as_vec3()
            .map(Vec3::from_array)
            .ok_or_else(|| MaterialError::ExpectedColor {
                parameter: parameter.to_string(),
            })
    };
    let scalar = || {
        value.as_f32().ok_or_else(|| MaterialError::ExpectedScalar {
            parameter: parameter.to_string(),
        })
    };

    match field {
        MaterialField::Color => material.color = color()?,
        MaterialField::Emissive => material.emissive = color()?,
        MaterialField::Clearcoat => material.clearcoat = scalar()?,
        MaterialField::ClearcoatRoughness => material.clearcoat_roughness = scalar()?,
        MaterialField::Ior => material.ior = scalar()?,
        MaterialField::Metalness => material.metalness = scalar()?,
        MaterialField::Roughness => material.roughness = scalar()?,
        MaterialField::Opacity => {
            material.opacity = scalar()?;
            if material.opacity < 1.0 {
                material.transparent = true;
            }
        }
    }
    Ok(())
}
