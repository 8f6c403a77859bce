//! Host renderer objects the adapter writes into.
//!
//! These mirror a typical scene-graph renderer: a mesh owns a geometry made of
//! named flat attributes and refers to a material.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use strata_core::PhysicalMaterial;
use strata_math::{as_vectors, Aabb};

use crate::MaterialHandle;

/// Name of the attribute bounds are computed from.
pub const POSITION: &str = "position";

/// A flat attribute: `item_size` floats per element.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferAttribute {
    data: Vec<f32>,
    item_size: usize,
}

impl BufferAttribute {
    pub fn new(data: Vec<f32>, item_size: usize) -> Self {
        Self { data, item_size }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }

    /// Raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BufferGeometry {
    attributes: HashMap<String, BufferAttribute>,
    bounds: Aabb,
    version: u64,
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an attribute wholesale.
    pub fn set_attribute(&mut self, name: &str, data: Vec<f32>, item_size: usize) {
        if name == POSITION {
            self.bounds = compute_bounds(&data);
        }
        self.attributes
            .insert(name.to_string(), BufferAttribute::new(data, item_size));
        self.version += 1;
    }

    /// Drop an attribute. Removing `position` empties the bounds.
    pub fn remove_attribute(&mut self, name: &str) -> Option<BufferAttribute> {
        let removed = self.attributes.remove(name)?;
        if name == POSITION {
            self.bounds = Aabb::EMPTY;
        }
        self.version += 1;
        Some(removed)
    }

    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Bounding box of the current `position` attribute.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Incremented on every attribute write.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Compute axis-aligned bounding box from flat xyz positions.
fn compute_bounds(positions: &[f32]) -> Aabb {
    match as_vectors::<3, f32>(positions) {
        Ok(points) => Aabb::from_points(points.iter().map(|p| Vec3::from(*p))),
        Err(e) => {
            log::warn!("Cannot compute bounds: {}", e);
            Aabb::EMPTY
        }
    }
}

/// Which material a mesh renders with.
#[derive(Clone, Debug, Default)]
pub enum MaterialBinding {
    /// The adapter's shared default material
    #[default]
    Default,
    /// A copy of the default owned by this mesh (display color edits)
    Private(Box<PhysicalMaterial>),
    /// A material sprim; falls back to the default while it is unresolved
    Network(MaterialHandle),
}

#[derive(Clone, Debug)]
pub struct HostMesh {
    pub name: String,
    pub geometry: BufferGeometry,
    pub material: MaterialBinding,

    /// World transform
    pub matrix: Mat4,

    /// False once the transform is driven externally
    pub matrix_auto_update: bool,

    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl HostMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: BufferGeometry::new(),
            material: MaterialBinding::Default,
            matrix: Mat4::IDENTITY,
            matrix_auto_update: true,
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}
