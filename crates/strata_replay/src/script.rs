//! JSON call scripts.

use std::collections::HashMap;

use serde::Deserialize;
use strata_core::material::{Connection, ParamValue};
use strata_sync::{FrameStats, MaterialHandle, MeshHandle, SceneSync, SyncConfig};

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: SyncConfig,
    pub calls: Vec<Call>,
}

/// One delegate call. Prims are addressed by path.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Call {
    CreateRPrim {
        type_id: String,
        id: String,
        #[serde(default)]
        instancer_id: Option<String>,
    },
    CreateSPrim { type_id: String, id: String },
    CreateBPrim { type_id: String, id: String },
    RemoveRPrim { id: String },
    RemoveSPrim { id: String },
    SetTransform { id: String, matrix: [f32; 16] },
    UpdatePoints { id: String, points: Vec<f32> },
    UpdateNormals { id: String, normals: Vec<f32> },
    UpdateIndices { id: String, indices: Vec<i32> },
    UpdatePrimvar {
        id: String,
        name: String,
        data: Vec<f32>,
        dimension: usize,
        interpolation: String,
    },
    SetMaterial { id: String, material_id: String },
    UpdateNode {
        id: String,
        path: String,
        #[serde(default)]
        params: HashMap<String, ParamValue>,
    },
    UpdateFinished {
        id: String,
        #[serde(default)]
        connections: Vec<Connection>,
    },
    Commit,
}

#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub calls: usize,
    /// Calls addressing a prim that does not exist
    pub skipped: usize,
    pub frames: Vec<FrameStats>,
}

fn mesh(sync: &SceneSync, id: &str) -> Option<MeshHandle> {
    let handle = sync.mesh_handle(id);
    if handle.is_none() {
        log::warn!("No mesh {}", id);
    }
    handle
}

fn material(sync: &SceneSync, id: &str) -> Option<MaterialHandle> {
    let handle = sync.material_handle(id);
    if handle.is_none() {
        log::warn!("No material {}", id);
    }
    handle
}

/// Run every call in order. A final commit is made if the script does not
/// end with one.
pub fn replay(sync: &mut SceneSync, calls: &[Call]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for call in calls {
        summary.calls += 1;
        let applied = match call {
            Call::CreateRPrim {
                type_id,
                id,
                instancer_id,
            } => {
                sync.create_rprim(type_id, id, instancer_id.as_deref());
                true
            }
            Call::CreateSPrim { type_id, id } => {
                sync.create_sprim(type_id, id);
                true
            }
            Call::CreateBPrim { type_id, id } => {
                sync.create_bprim(type_id, id);
                true
            }
            Call::RemoveRPrim { id } => mesh(sync, id).map(|h| sync.remove_rprim(h)).is_some(),
            Call::RemoveSPrim { id } => {
                material(sync, id).map(|h| sync.remove_sprim(h)).is_some()
            }
            Call::SetTransform { id, matrix } => mesh(sync, id)
                .map(|h| sync.set_transform(h, matrix))
                .is_some(),
            Call::UpdatePoints { id, points } => mesh(sync, id)
                .map(|h| sync.update_points(h, points))
                .is_some(),
            Call::UpdateNormals { id, normals } => mesh(sync, id)
                .map(|h| sync.update_normals(h, normals))
                .is_some(),
            Call::UpdateIndices { id, indices } => mesh(sync, id)
                .map(|h| sync.update_indices(h, indices))
                .is_some(),
            Call::UpdatePrimvar {
                id,
                name,
                data,
                dimension,
                interpolation,
            } => mesh(sync, id)
                .map(|h| sync.update_primvar(h, name, data, *dimension, interpolation))
                .is_some(),
            Call::SetMaterial { id, material_id } => mesh(sync, id)
                .map(|h| sync.set_material(h, material_id))
                .is_some(),
            Call::UpdateNode { id, path, params } => material(sync, id)
                .map(|h| sync.update_node(h, path, params.clone()))
                .is_some(),
            Call::UpdateFinished { id, connections } => material(sync, id)
                .map(|h| sync.update_finished(h, connections))
                .is_some(),
            Call::Commit => {
                summary.frames.push(sync.commit_resources());
                true
            }
        };
        if !applied {
            summary.skipped += 1;
        }
    }

    if !matches!(calls.last(), Some(Call::Commit)) {
        summary.frames.push(sync.commit_resources());
    }

    summary
}
