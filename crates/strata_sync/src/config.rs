//! Adapter configuration.

use std::path::PathBuf;

use glam::Vec3;
use serde::Deserialize;

/// Settings for [`SceneSync`](crate::SceneSync).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// Normals shorter than this are zeroed instead of normalized
    pub normalize_epsilon: f32,

    /// Normalize incoming normals before they reach the geometry
    pub normalize_normals: bool,

    /// Color of the shared default material
    pub default_color: [f32; 3],

    /// Base color of a default material switched to vertex colors
    pub vertex_color_base: [f32; 3],

    /// Directory relative texture paths are resolved against
    pub texture_base_dir: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            normalize_epsilon: 1e-10,
            normalize_normals: true,
            default_color: [1.0, 0.161, 0.592],
            vertex_color_base: [1.0, 1.0, 1.0],
            texture_base_dir: None,
        }
    }
}

impl SyncConfig {
    pub fn default_color(&self) -> Vec3 {
        Vec3::from_array(self.default_color)
    }

    pub fn vertex_color_base(&self) -> Vec3 {
        Vec3::from_array(self.vertex_color_base)
    }
}
