//! Name registry for prim types, primvars, and shading parameters.
//!
//! Built once by the scene sync adapter and passed by reference to everything
//! that needs to recognise a name.

use std::collections::HashMap;

use crate::material::{MaterialField, TextureSlot};

/// What a primvar name is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimvarRole {
    /// Positions, delivered through `update_points`
    Points,
    /// Normals, delivered through `update_normals`
    Normals,
    DisplayColor,
    Uv,
    Unsupported,
}

/// Render-object kinds the adapter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimKind {
    Mesh,
    Material,
    Light,
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct Tokens {
    primvars: HashMap<&'static str, PrimvarRole>,
    prims: HashMap<&'static str, PrimKind>,

    /// Connectable parameters in binding order. Diffuse must come before
    /// opacity so the alpha channel can reuse the diffuse map.
    texture_slots: Vec<(&'static str, TextureSlot)>,

    literal_fields: Vec<(&'static str, MaterialField)>,

    /// Parameter that marks a node as the network's main surface node
    pub main_node_marker: &'static str,

    /// Texture node parameter naming the resource
    pub file: &'static str,
    pub wrap_s: &'static str,
    pub wrap_t: &'static str,
}

impl Tokens {
    pub fn new() -> Self {
        let primvars = HashMap::from([
            ("points", PrimvarRole::Points),
            ("normals", PrimvarRole::Normals),
            ("displayColor", PrimvarRole::DisplayColor),
            ("st", PrimvarRole::Uv),
            ("st0", PrimvarRole::Uv),
            ("st_0", PrimvarRole::Uv),
            ("UVMap", PrimvarRole::Uv),
            ("uv", PrimvarRole::Uv),
        ]);

        let prims = HashMap::from([
            ("mesh", PrimKind::Mesh),
            ("material", PrimKind::Material),
            ("light", PrimKind::Light),
            ("distantLight", PrimKind::Light),
            ("domeLight", PrimKind::Light),
            ("rectLight", PrimKind::Light),
            ("sphereLight", PrimKind::Light),
            ("diskLight", PrimKind::Light),
            ("cylinderLight", PrimKind::Light),
        ]);

        let texture_slots = vec![
            ("diffuseColor", TextureSlot::Map),
            ("clearcoat", TextureSlot::ClearcoatMap),
            ("clearcoatRoughness", TextureSlot::ClearcoatRoughnessMap),
            ("emissiveColor", TextureSlot::EmissiveMap),
            ("occlusion", TextureSlot::AoMap),
            ("roughness", TextureSlot::RoughnessMap),
            ("metallic", TextureSlot::MetalnessMap),
            ("normal", TextureSlot::NormalMap),
            ("opacity", TextureSlot::AlphaMap),
        ];

        let literal_fields = vec![
            ("clearcoat", MaterialField::Clearcoat),
            ("clearcoatRoughness", MaterialField::ClearcoatRoughness),
            ("diffuseColor", MaterialField::Color),
            ("emissiveColor", MaterialField::Emissive),
            ("ior", MaterialField::Ior),
            ("metallic", MaterialField::Metalness),
            ("opacity", MaterialField::Opacity),
            ("roughness", MaterialField::Roughness),
        ];

        Self {
            primvars,
            prims,
            texture_slots,
            literal_fields,
            main_node_marker: "diffuseColor",
            file: "file",
            wrap_s: "wrapS",
            wrap_t: "wrapT",
        }
    }

    pub fn primvar_role(&self, name: &str) -> PrimvarRole {
        self.primvars
            .get(name)
            .copied()
            .unwrap_or(PrimvarRole::Unsupported)
    }

    pub fn prim_kind(&self, type_id: &str) -> PrimKind {
        self.prims
            .get(type_id)
            .copied()
            .unwrap_or(PrimKind::Unsupported)
    }

    /// Map slot a connected parameter binds to.
    pub fn texture_slot(&self, parameter: &str) -> Option<TextureSlot> {
        self.texture_slots
            .iter()
            .find(|(name, _)| *name == parameter)
            .map(|(_, slot)| *slot)
    }

    /// Material field a literal parameter is written to.
    pub fn literal_field(&self, parameter: &str) -> Option<MaterialField> {
        self.literal_fields
            .iter()
            .find(|(name, _)| *name == parameter)
            .map(|(_, field)| *field)
    }

    pub fn texture_parameters(&self) -> impl Iterator<Item = (&'static str, TextureSlot)> + '_ {
        self.texture_slots.iter().copied()
    }

    pub fn literal_parameters(&self) -> impl Iterator<Item = (&'static str, MaterialField)> + '_ {
        self.literal_fields.iter().copied()
    }

    pub fn is_supported_parameter(&self, parameter: &str) -> bool {
        self.texture_slot(parameter).is_some() || self.literal_field(parameter).is_some()
    }
}

impl Default for Tokens {
    fn default() -> Self {
        Self::new()
    }
}
