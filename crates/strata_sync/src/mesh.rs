//! Mesh rprims.
//!
//! A [`HydraMesh`] keeps the primvar buffers it was given alongside the host
//! mesh it drives. Any change to a buffer or to the index list re-expands the
//! affected channels into the host geometry.

use strata_core::attribute::{topology_indices, AttributeBuffer, AttributeResult, Interpolation};
use strata_math::{mat4_from_hydra, Vec3f};

use crate::host::{HostMesh, POSITION};

/// Geometry channels driven by primvars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Normal,
    Color,
    Uv,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Position, Channel::Normal, Channel::Color, Channel::Uv];

    /// Host geometry attribute the channel writes.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Channel::Position => POSITION,
            Channel::Normal => "normal",
            Channel::Color => "color",
            Channel::Uv => "uv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HydraMesh {
    pub id: String,
    pub instancer_id: Option<String>,
    pub host: HostMesh,

    points: Option<AttributeBuffer>,
    normals: Option<AttributeBuffer>,
    colors: Option<AttributeBuffer>,
    uvs: Option<AttributeBuffer>,
    indices: Vec<u32>,

    /// Geometry version at the last commit
    committed_version: u64,
}

impl HydraMesh {
    pub fn new(id: impl Into<String>, instancer_id: Option<String>) -> Self {
        let id = id.into();
        Self {
            host: HostMesh::new(id.clone()),
            id,
            instancer_id,
            points: None,
            normals: None,
            colors: None,
            uvs: None,
            indices: Vec::new(),
            committed_version: 0,
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn point_count(&self) -> Option<usize> {
        self.points.as_ref().map(AttributeBuffer::element_count)
    }

    pub fn buffer(&self, channel: Channel) -> Option<&AttributeBuffer> {
        match channel {
            Channel::Position => self.points.as_ref(),
            Channel::Normal => self.normals.as_ref(),
            Channel::Color => self.colors.as_ref(),
            Channel::Uv => self.uvs.as_ref(),
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut Option<AttributeBuffer> {
        match channel {
            Channel::Position => &mut self.points,
            Channel::Normal => &mut self.normals,
            Channel::Color => &mut self.colors,
            Channel::Uv => &mut self.uvs,
        }
    }

    /// Replace the per-point positions.
    pub fn update_points(&mut self, points: &[f32]) -> AttributeResult<()> {
        let buffer = AttributeBuffer::new(points.to_vec(), 3, Interpolation::Vertex)?;
        self.set_buffer(Channel::Position, buffer)
    }

    /// Replace the per-point normals, normalizing each one when `epsilon` is
    /// given. Normals shorter than `epsilon` become zero.
    pub fn update_normals(&mut self, normals: &[f32], epsilon: Option<f32>) -> AttributeResult<()> {
        let mut values = normals.to_vec();
        if let Some(epsilon) = epsilon {
            for chunk in values.chunks_exact_mut(3) {
                let mut normal = Vec3f::new([chunk[0], chunk[1], chunk[2]]);
                normal.normalize(epsilon);
                chunk.copy_from_slice(normal.as_slice());
            }
        }
        let buffer = AttributeBuffer::new(values, 3, Interpolation::Vertex)?;
        self.set_buffer(Channel::Normal, buffer)
    }

    /// Replace the topology and re-expand every channel against it.
    ///
    /// A channel that no longer fits the new topology is skipped with a
    /// warning; the others are still updated.
    pub fn update_indices(&mut self, indices: &[i32]) -> AttributeResult<()> {
        self.indices = topology_indices(indices)?;
        for channel in Channel::ALL {
            if let Err(e) = self.update_order(channel) {
                log::warn!("{}: cannot reorder {}: {}", self.id, channel.attribute_name(), e);
            }
        }
        Ok(())
    }

    pub fn set_transform(&mut self, matrix: &[f32; 16]) {
        self.host.matrix = mat4_from_hydra(matrix);
        self.host.matrix_auto_update = false;
    }

    pub fn set_uv(&mut self, uvs: AttributeBuffer) -> AttributeResult<()> {
        self.set_buffer(Channel::Uv, uvs)
    }

    pub fn set_vertex_colors(&mut self, colors: AttributeBuffer) -> AttributeResult<()> {
        self.set_buffer(Channel::Color, colors)
    }

    /// Store a channel's buffer and expand it.
    ///
    /// New points change the point count every vertex channel is checked
    /// against, so the other channels are expanded again too.
    fn set_buffer(&mut self, channel: Channel, buffer: AttributeBuffer) -> AttributeResult<()> {
        *self.slot(channel) = Some(buffer);
        let result = self.update_order(channel);
        if channel == Channel::Position {
            for other in Channel::ALL.into_iter().filter(|c| *c != channel) {
                if let Err(e) = self.update_order(other) {
                    log::warn!("{}: cannot reorder {}: {}", self.id, other.attribute_name(), e);
                }
            }
        }
        result
    }

    /// Expand one channel's buffer into the host geometry.
    ///
    /// Does nothing until both the buffer and (for vertex data) the index
    /// list are present. On failure the channel's host attribute is removed
    /// so the geometry never mixes corner counts.
    pub fn update_order(&mut self, channel: Channel) -> AttributeResult<()> {
        match self.expand_channel(channel) {
            Ok(Some((values, dimension))) => {
                self.host
                    .geometry
                    .set_attribute(channel.attribute_name(), values, dimension);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.host.geometry.remove_attribute(channel.attribute_name());
                Err(e)
            }
        }
    }

    fn expand_channel(&self, channel: Channel) -> AttributeResult<Option<(Vec<f32>, usize)>> {
        let Some(buffer) = self.buffer(channel) else {
            return Ok(None);
        };

        match buffer.interpolation() {
            Interpolation::Vertex => {
                if let Some(point_count) = self.point_count() {
                    buffer.validate(point_count, self.indices.len())?;
                }
            }
            Interpolation::FaceVarying if !self.indices.is_empty() => {
                buffer.validate(0, self.indices.len())?;
            }
            _ => {}
        }

        Ok(buffer
            .expand(&self.indices)?
            .map(|values| (values, buffer.dimension())))
    }

    /// Per-frame barrier. Updates are applied eagerly, so this only reports
    /// whether the geometry changed since the previous commit.
    pub fn commit(&mut self) -> bool {
        let version = self.host.geometry.version();
        let changed = version != self.committed_version;
        self.committed_version = version;
        changed
    }
}
