//! Strata Sync - render delegate adapter.
//!
//! Turns hydra-style imaging calls (create a prim, update its points, bind a
//! material, finalize a shading network, ...) into state on a host renderer's
//! meshes and materials.
//!
//! ```ignore
//! let mut sync = SceneSync::new(SyncConfig::default(), FileFetcher::default());
//! let mesh = sync.create_rprim("mesh", "/World/Quad", None).unwrap();
//! sync.update_points(mesh, &points);
//! sync.update_indices(mesh, &indices);
//! let stats = sync.commit_resources();
//! ```

pub mod config;
pub mod delegate;
pub mod host;
pub mod material;
pub mod mesh;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a mesh rprim owned by [`SceneSync`].
    pub struct MeshHandle;

    /// Handle to a material sprim owned by [`SceneSync`].
    pub struct MaterialHandle;
}

pub use config::SyncConfig;
pub use delegate::{FrameStats, SceneSync};
pub use host::{BufferAttribute, BufferGeometry, HostMesh, MaterialBinding};
pub use material::{HydraMaterial, TextureProgress};
pub use mesh::{Channel, HydraMesh};
