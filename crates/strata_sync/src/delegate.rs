//! The render delegate: entry points called by the scene-description engine.
//!
//! Calls arrive serially on one thread. Everything except texture loading is
//! applied immediately; textures are requested during `update_finished` and
//! attached when [`SceneSync::poll_textures`] or
//! [`SceneSync::commit_resources`] finds them complete.

use std::collections::HashMap;

use glam::Vec3;
use slotmap::SlotMap;
use strata_core::attribute::{AttributeBuffer, Interpolation};
use strata_core::material::{Connection, ParamValue, PhysicalMaterial};
use strata_core::texture::{FileFetcher, ResourceFetcher, TextureCache};
use strata_core::tokens::{PrimKind, PrimvarRole};
use strata_core::Tokens;

use crate::config::SyncConfig;
use crate::host::MaterialBinding;
use crate::material::{HydraMaterial, TextureProgress};
use crate::mesh::HydraMesh;
use crate::{MaterialHandle, MeshHandle};

/// Summary of one `commit_resources` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub meshes: usize,
    pub materials: usize,
    /// Meshes whose geometry changed since the previous commit
    pub meshes_updated: usize,
    pub textures: TextureProgress,
}

pub struct SceneSync {
    config: SyncConfig,
    tokens: Tokens,
    textures: TextureCache,
    default_material: PhysicalMaterial,

    meshes: SlotMap<MeshHandle, HydraMesh>,
    materials: SlotMap<MaterialHandle, HydraMaterial>,
    mesh_ids: HashMap<String, MeshHandle>,
    material_ids: HashMap<String, MaterialHandle>,

    frame: u64,
}

impl SceneSync {
    pub fn new(config: SyncConfig, fetcher: impl ResourceFetcher + 'static) -> Self {
        let default_material = PhysicalMaterial::default_material(config.default_color());
        Self {
            config,
            tokens: Tokens::new(),
            textures: TextureCache::new(fetcher),
            default_material,
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            mesh_ids: HashMap::new(),
            material_ids: HashMap::new(),
            frame: 0,
        }
    }

    /// Adapter reading textures from disk under `config.texture_base_dir`.
    pub fn with_file_fetcher(config: SyncConfig) -> Self {
        let fetcher = FileFetcher::new(config.texture_base_dir.clone());
        Self::new(config, fetcher)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.textures
    }

    pub fn default_material(&self) -> &PhysicalMaterial {
        &self.default_material
    }

    // ---- Creation ----

    /// Create a renderable prim. Only meshes are supported.
    pub fn create_rprim(
        &mut self,
        type_id: &str,
        id: &str,
        instancer_id: Option<&str>,
    ) -> Option<MeshHandle> {
        log::debug!("Creating RPrim: {} {}", type_id, id);
        match self.tokens.prim_kind(type_id) {
            PrimKind::Mesh => {}
            PrimKind::Light => {
                log::warn!("Lights are not supported, ignoring {} ({})", id, type_id);
                return None;
            }
            _ => {
                log::warn!("Unsupported rprim type '{}' for {}", type_id, id);
                return None;
            }
        }

        if let Some(old) = self.mesh_ids.remove(id) {
            log::debug!("Replacing existing mesh {}", id);
            self.meshes.remove(old);
        }

        let mesh = HydraMesh::new(id, instancer_id.map(str::to_string));
        let handle = self.meshes.insert(mesh);
        self.mesh_ids.insert(id.to_string(), handle);
        Some(handle)
    }

    /// Create a state prim. Only materials are supported.
    pub fn create_sprim(&mut self, type_id: &str, id: &str) -> Option<MaterialHandle> {
        log::debug!("Creating SPrim: {} {}", type_id, id);
        match self.tokens.prim_kind(type_id) {
            PrimKind::Material => {}
            PrimKind::Light => {
                log::warn!("Lights are not supported, ignoring {} ({})", id, type_id);
                return None;
            }
            _ => {
                log::warn!("Unsupported sprim type '{}' for {}", type_id, id);
                return None;
            }
        }

        if let Some(old) = self.material_ids.remove(id) {
            log::debug!("Replacing existing material {}", id);
            self.materials.remove(old);
        }

        let handle = self.materials.insert(HydraMaterial::new(id));
        self.material_ids.insert(id.to_string(), handle);
        Some(handle)
    }

    /// Buffer prims carry no renderer state here.
    pub fn create_bprim(&mut self, type_id: &str, id: &str) {
        log::debug!("Creating BPrim: {} {}", type_id, id);
    }

    pub fn remove_rprim(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(handle) {
            self.mesh_ids.remove(&mesh.id);
        }
    }

    /// Remove a material. Meshes bound to it fall back to the default, and
    /// its in-flight texture requests are dropped.
    pub fn remove_sprim(&mut self, handle: MaterialHandle) {
        if let Some(material) = self.materials.remove(handle) {
            self.material_ids.remove(&material.id);
        }
    }

    // ---- Meshes ----

    pub fn set_transform(&mut self, handle: MeshHandle, matrix: &[f32; 16]) {
        if let Some(mesh) = self.mesh(handle) {
            mesh.set_transform(matrix);
        }
    }

    pub fn update_points(&mut self, handle: MeshHandle, points: &[f32]) {
        if let Some(mesh) = self.mesh(handle) {
            if let Err(e) = mesh.update_points(points) {
                log::warn!("{}: cannot reorder points: {}", mesh.id, e);
            }
        }
    }

    pub fn update_normals(&mut self, handle: MeshHandle, normals: &[f32]) {
        let epsilon = self
            .config
            .normalize_normals
            .then_some(self.config.normalize_epsilon);
        if let Some(mesh) = self.mesh(handle) {
            if let Err(e) = mesh.update_normals(normals, epsilon) {
                log::warn!("{}: cannot reorder normals: {}", mesh.id, e);
            }
        }
    }

    pub fn update_indices(&mut self, handle: MeshHandle, indices: &[i32]) {
        if let Some(mesh) = self.mesh(handle) {
            if let Err(e) = mesh.update_indices(indices) {
                log::warn!("{}: ignoring indices: {}", mesh.id, e);
            }
        }
    }

    /// Apply a named primvar.
    ///
    /// `points` and `normals` have dedicated entry points and are ignored
    /// here.
    pub fn update_primvar(
        &mut self,
        handle: MeshHandle,
        name: &str,
        data: &[f32],
        dimension: usize,
        interpolation: &str,
    ) {
        let role = self.tokens.primvar_role(name);
        match role {
            PrimvarRole::Points | PrimvarRole::Normals => return,
            PrimvarRole::Unsupported => {
                log::warn!("Unsupported primvar '{}'", name);
                return;
            }
            PrimvarRole::DisplayColor | PrimvarRole::Uv => {}
        }

        let buffer = interpolation
            .parse::<Interpolation>()
            .and_then(|interpolation| AttributeBuffer::new(data.to_vec(), dimension, interpolation));
        let buffer = match buffer {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("Ignoring primvar '{}': {}", name, e);
                return;
            }
        };

        match role {
            PrimvarRole::DisplayColor => self.update_display_color(handle, buffer),
            _ if buffer.interpolation() == Interpolation::Constant => {
                log::warn!("Unsupported uv interpolation type 'constant'");
            }
            _ => {
                if let Some(mesh) = self.mesh(handle) {
                    if let Err(e) = mesh.set_uv(buffer) {
                        log::warn!("{}: cannot reorder uv: {}", mesh.id, e);
                    }
                }
            }
        }
    }

    fn update_display_color(&mut self, handle: MeshHandle, buffer: AttributeBuffer) {
        if !self.meshes.contains_key(handle) {
            log::warn!("Unknown mesh handle");
            return;
        }
        match buffer.interpolation() {
            Interpolation::Constant => {
                let Some(value) = buffer.constant_value() else {
                    return;
                };
                let Ok(color) = <[f32; 3]>::try_from(value).map(Vec3::from_array) else {
                    log::warn!("displayColor needs 3 components, got {}", value.len());
                    return;
                };
                if let Some((material, _)) = self.material_for_edit(handle) {
                    material.color = color;
                    material.mark_needs_update();
                }
            }
            Interpolation::Vertex => {
                let white = self.config.vertex_color_base();
                if let Some((material, private)) = self.material_for_edit(handle) {
                    if private {
                        material.color = white;
                    }
                    material.vertex_colors = true;
                    material.mark_needs_update();
                }
                if let Some(mesh) = self.mesh(handle) {
                    if let Err(e) = mesh.set_vertex_colors(buffer) {
                        log::warn!("{}: cannot reorder displayColor: {}", mesh.id, e);
                    }
                }
            }
            Interpolation::FaceVarying => {
                log::warn!("Unsupported displayColor interpolation type 'facevarying'");
            }
        }
    }

    /// The material a mesh's display color edits should land on.
    ///
    /// A resolved network material is edited in place. Anything else is
    /// replaced by a private copy of the default material first. The flag is
    /// true for private materials.
    fn material_for_edit(&mut self, handle: MeshHandle) -> Option<(&mut PhysicalMaterial, bool)> {
        let mesh = self.meshes.get_mut(handle)?;

        if let MaterialBinding::Network(material) = mesh.host.material {
            if let Some(material) = self
                .materials
                .get_mut(material)
                .and_then(HydraMaterial::material_mut)
            {
                return Some((material, false));
            }
        }

        if !matches!(mesh.host.material, MaterialBinding::Private(_)) {
            let mut private = self.default_material.clone();
            private.name = format!("{}/DefaultMaterial", mesh.id);
            mesh.host.material = MaterialBinding::Private(Box::new(private));
        }

        match &mut mesh.host.material {
            MaterialBinding::Private(material) => Some((material.as_mut(), true)),
            _ => None,
        }
    }

    /// Bind a material sprim by path.
    pub fn set_material(&mut self, handle: MeshHandle, material_id: &str) {
        let material = self.material_ids.get(material_id).copied();
        let Some(mesh) = self.meshes.get_mut(handle) else {
            log::warn!("Unknown mesh handle");
            return;
        };
        match material {
            Some(material) => mesh.host.material = MaterialBinding::Network(material),
            None => {
                log::warn!("{}: unknown material {}, using default", mesh.id, material_id);
                mesh.host.material = MaterialBinding::Default;
            }
        }
    }

    // ---- Materials ----

    pub fn update_node(
        &mut self,
        handle: MaterialHandle,
        path: &str,
        params: HashMap<String, ParamValue>,
    ) {
        match self.materials.get_mut(handle) {
            Some(material) => material.update_node(path, params),
            None => log::warn!("Unknown material handle for node {}", path),
        }
    }

    /// Finalize a material's network and request its textures.
    pub fn update_finished(&mut self, handle: MaterialHandle, connections: &[Connection]) {
        let Some(material) = self.materials.get_mut(handle) else {
            log::warn!("Unknown material handle");
            return;
        };
        let requested = material.update_finished(connections, &self.tokens, &mut self.textures);
        log::debug!("{}: resolved with {} texture request(s)", material.id, requested);
    }

    /// Attach every completed texture to its material.
    pub fn poll_textures(&mut self) -> TextureProgress {
        let mut progress = TextureProgress::default();
        for material in self.materials.values_mut() {
            progress += material.apply_completed_textures();
        }
        progress
    }

    /// End-of-frame barrier.
    pub fn commit_resources(&mut self) -> FrameStats {
        self.frame += 1;
        let meshes_updated = self
            .meshes
            .values_mut()
            .map(HydraMesh::commit)
            .filter(|changed| *changed)
            .count();
        let textures = self.poll_textures();

        let stats = FrameStats {
            frame: self.frame,
            meshes: self.meshes.len(),
            materials: self.materials.len(),
            meshes_updated,
            textures,
        };
        log::info!(
            "Frame {}: {} meshes ({} updated), {} materials, textures {} applied / {} failed / {} discarded / {} pending",
            stats.frame,
            stats.meshes,
            stats.meshes_updated,
            stats.materials,
            textures.applied,
            textures.failed,
            textures.discarded,
            textures.pending
        );
        stats
    }

    // ---- Queries ----

    fn mesh(&mut self, handle: MeshHandle) -> Option<&mut HydraMesh> {
        let mesh = self.meshes.get_mut(handle);
        if mesh.is_none() {
            log::warn!("Unknown mesh handle");
        }
        mesh
    }

    pub fn mesh_ref(&self, handle: MeshHandle) -> Option<&HydraMesh> {
        self.meshes.get(handle)
    }

    pub fn material_ref(&self, handle: MaterialHandle) -> Option<&HydraMaterial> {
        self.materials.get(handle)
    }

    pub fn mesh_handle(&self, id: &str) -> Option<MeshHandle> {
        self.mesh_ids.get(id).copied()
    }

    pub fn material_handle(&self, id: &str) -> Option<MaterialHandle> {
        self.material_ids.get(id).copied()
    }

    /// The material a mesh renders with right now.
    pub fn effective_material(&self, handle: MeshHandle) -> Option<&PhysicalMaterial> {
        let mesh = self.meshes.get(handle)?;
        let material = match &mesh.host.material {
            MaterialBinding::Default => &self.default_material,
            MaterialBinding::Private(material) => material.as_ref(),
            MaterialBinding::Network(material) => self
                .materials
                .get(*material)
                .and_then(HydraMaterial::material)
                .unwrap_or(&self.default_material),
        };
        Some(material)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &HydraMesh)> {
        self.meshes.iter()
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &HydraMaterial)> {
        self.materials.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::channel::oneshot;
    use futures::FutureExt;
    use strata_core::material::TextureSlot;
    use strata_core::texture::{FetchFuture, TextureError, TextureResult};

    use super::*;
    use crate::mesh::Channel;

    const QUAD_POINTS: [f32; 12] = [
        -430.0, -145.0, 0.0, //
        430.0, -145.0, 0.0, //
        430.0, 145.0, 0.0, //
        -430.0, 145.0, 0.0,
    ];

    type Senders = Rc<RefCell<Vec<oneshot::Sender<TextureResult<Vec<u8>>>>>>;

    /// Counts fetches and holds them until released.
    #[derive(Clone, Default)]
    struct HeldFetcher {
        fetched: Rc<RefCell<Vec<String>>>,
        senders: Senders,
    }

    impl HeldFetcher {
        fn release_all(&self) {
            for sender in self.senders.borrow_mut().drain(..) {
                let _ = sender.send(Ok(png()));
            }
        }
    }

    impl ResourceFetcher for HeldFetcher {
        fn fetch(&self, path: &str) -> FetchFuture {
            let (tx, rx) = oneshot::channel();
            self.fetched.borrow_mut().push(path.to_string());
            self.senders.borrow_mut().push(tx);
            async move { rx.await.unwrap_or_else(|_| Err(TextureError::NotFound("dropped".into()))) }
                .boxed_local()
        }
    }

    fn png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sync() -> (SceneSync, HeldFetcher) {
        init_logging();
        let fetcher = HeldFetcher::default();
        (SceneSync::new(SyncConfig::default(), fetcher.clone()), fetcher)
    }

    fn quad(sync: &mut SceneSync) -> MeshHandle {
        let mesh = sync.create_rprim("mesh", "/World/Quad", None).unwrap();
        sync.update_points(mesh, &QUAD_POINTS);
        sync.update_indices(mesh, &[0, 1, 2, 3]);
        mesh
    }

    fn textured_material(sync: &mut SceneSync, id: &str, file: &str) -> MaterialHandle {
        let material = sync.create_sprim("material", id).unwrap();
        sync.update_node(material, "/surface", HashMap::new());
        sync.update_node(
            material,
            "/tex",
            HashMap::from([("file".to_string(), ParamValue::String(file.into()))]),
        );
        sync.update_finished(
            material,
            &[Connection {
                input_id: "/tex".into(),
                input_name: "rgb".into(),
                output_id: "/surface".into(),
                output_name: "diffuseColor".into(),
            }],
        );
        material
    }

    fn position(sync: &SceneSync, mesh: MeshHandle) -> Vec<f32> {
        sync.mesh_ref(mesh)
            .and_then(|m| m.host.geometry.attribute("position"))
            .map(|a| a.data().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_quad_positions_in_order() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        assert_eq!(position(&sync, mesh), QUAD_POINTS.to_vec());
    }

    #[test]
    fn test_points_and_normals_primvars_are_noops() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let version = sync.mesh_ref(mesh).unwrap().host.geometry.version();

        sync.update_primvar(mesh, "points", &[0.0; 12], 3, "vertex");
        sync.update_primvar(mesh, "normals", &[0.0; 12], 3, "vertex");

        let geometry = &sync.mesh_ref(mesh).unwrap().host.geometry;
        assert_eq!(geometry.version(), version);
        assert!(geometry.attribute("normal").is_none());
        assert_eq!(position(&sync, mesh), QUAD_POINTS.to_vec());
    }

    #[test]
    fn test_lights_are_ignored() {
        let (mut sync, _) = sync();
        assert!(sync.create_sprim("sphereLight", "/World/Key").is_none());
        assert!(sync.create_rprim("basisCurves", "/World/Hair", None).is_none());
        sync.create_bprim("renderBuffer", "/aov");
        assert_eq!(sync.commit_resources().materials, 0);
    }

    #[test]
    fn test_shared_texture_is_fetched_once() {
        let (mut sync, fetcher) = sync();
        let a = textured_material(&mut sync, "/World/A", "wood.png");
        let b = textured_material(&mut sync, "/World/B", "wood.png");
        assert_eq!(fetcher.fetched.borrow().len(), 1);

        let stats = sync.commit_resources();
        assert_eq!(stats.textures.pending, 2);

        fetcher.release_all();
        let stats = sync.commit_resources();
        assert_eq!(stats.textures.applied, 2);

        let map_a = sync.material_ref(a).unwrap().material().unwrap().map(TextureSlot::Map).unwrap();
        let map_b = sync.material_ref(b).unwrap().material().unwrap().map(TextureSlot::Map).unwrap();
        assert!(Arc::ptr_eq(&map_a.texture, &map_b.texture));
    }

    #[test]
    fn test_removed_material_drops_its_textures() {
        let (mut sync, fetcher) = sync();
        let mesh = quad(&mut sync);
        let material = textured_material(&mut sync, "/World/Mat", "wood.png");
        sync.set_material(mesh, "/World/Mat");
        sync.remove_sprim(material);

        fetcher.release_all();
        let stats = sync.commit_resources();
        assert_eq!(stats.textures, TextureProgress::default());
        assert!(sync.material_ref(material).is_none());
        assert_eq!(sync.effective_material(mesh).unwrap().name, "DefaultMaterial");
    }

    #[test]
    fn test_literal_material_binding() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let material = sync.create_sprim("material", "/World/Blue").unwrap();
        sync.update_node(
            material,
            "/surface",
            HashMap::from([(
                "diffuseColor".to_string(),
                ParamValue::Vector(vec![0.0, 0.0, 1.0]),
            )]),
        );
        sync.update_finished(material, &[]);
        sync.set_material(mesh, "/World/Blue");

        let bound = sync.effective_material(mesh).unwrap();
        assert_eq!(bound.color, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(sync.texture_cache().fetch_count(), 0);
    }

    #[test]
    fn test_unresolved_material_uses_default() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let material = sync.create_sprim("material", "/World/Empty").unwrap();
        sync.update_node(material, "/tex", HashMap::new());
        sync.update_finished(material, &[]);
        sync.set_material(mesh, "/World/Empty");

        let bound = sync.effective_material(mesh).unwrap();
        assert_eq!(bound.color, sync.config().default_color());

        sync.set_material(mesh, "/World/Missing");
        assert!(matches!(
            sync.mesh_ref(mesh).unwrap().host.material,
            MaterialBinding::Default
        ));
    }

    #[test]
    fn test_constant_display_color_copies_default() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        sync.update_primvar(mesh, "displayColor", &[0.2, 0.4, 0.6], 3, "constant");

        let bound = sync.effective_material(mesh).unwrap();
        assert_eq!(bound.color, Vec3::new(0.2, 0.4, 0.6));
        // The shared default is untouched
        assert_eq!(sync.default_material().color, sync.config().default_color());
        assert!(sync
            .mesh_ref(mesh)
            .unwrap()
            .host
            .geometry
            .attribute("color")
            .is_none());
    }

    #[test]
    fn test_vertex_display_color() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let colors = [
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, //
            1.0, 1.0, 1.0,
        ];
        sync.update_primvar(mesh, "displayColor", &colors, 3, "vertex");

        let bound = sync.effective_material(mesh).unwrap();
        assert!(bound.vertex_colors);
        assert_eq!(bound.color, Vec3::ONE);

        let color = sync.mesh_ref(mesh).unwrap().host.geometry.attribute("color").unwrap();
        assert_eq!(color.data(), &colors);
    }

    #[test]
    fn test_unsupported_display_color_and_interpolation() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        sync.update_primvar(mesh, "displayColor", &[1.0; 12], 3, "facevarying");
        sync.update_primvar(mesh, "displayColor", &[1.0; 3], 3, "uniform");
        sync.update_primvar(mesh, "velocities", &[1.0; 12], 3, "vertex");

        assert!(matches!(
            sync.mesh_ref(mesh).unwrap().host.material,
            MaterialBinding::Default
        ));
    }

    #[test]
    fn test_uv_primvar_aliases() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        sync.update_primvar(mesh, "st", &uvs, 2, "vertex");
        let uv = sync.mesh_ref(mesh).unwrap().host.geometry.attribute("uv").unwrap();
        assert_eq!(uv.item_size(), 2);
        assert_eq!(uv.data(), &uvs);

        sync.update_primvar(mesh, "UVMap", &[0.5; 8], 2, "faceVarying");
        let uv = sync.mesh_ref(mesh).unwrap().host.geometry.attribute("uv").unwrap();
        assert_eq!(uv.data(), &[0.5; 8]);
    }

    #[test]
    fn test_constant_uv_is_ignored() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        sync.update_primvar(mesh, "st", &uvs, 2, "vertex");

        sync.update_primvar(mesh, "st", &[0.5, 0.5], 2, "constant");
        let quad = sync.mesh_ref(mesh).unwrap();
        assert_eq!(quad.buffer(Channel::Uv).unwrap().interpolation(), Interpolation::Vertex);
        assert_eq!(quad.host.geometry.attribute("uv").unwrap().data(), &uvs);
    }

    #[test]
    fn test_transform_is_transposed() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);
        let mut m = [0.0f32; 16];
        for i in 0..4 {
            m[i * 5] = 1.0;
        }
        m[12] = 1.0;
        m[13] = 2.0;
        m[14] = 3.0;
        sync.set_transform(mesh, &m);

        let matrix = sync.mesh_ref(mesh).unwrap().host.matrix;
        let moved = matrix.transform_point3(Vec3::ZERO);
        assert_eq!(moved, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_commit_counts_updated_meshes() {
        let (mut sync, _) = sync();
        let mesh = quad(&mut sync);

        let first = sync.commit_resources();
        assert_eq!(first.frame, 1);
        assert_eq!(first.meshes, 1);
        assert_eq!(first.meshes_updated, 1);

        assert_eq!(sync.commit_resources().meshes_updated, 0);
        sync.update_points(mesh, &QUAD_POINTS);
        assert_eq!(sync.commit_resources().meshes_updated, 1);
    }

    #[test]
    fn test_recreated_prim_invalidates_old_handle() {
        let (mut sync, _) = sync();
        let old = sync.create_rprim("mesh", "/World/Quad", None).unwrap();
        let new = sync.create_rprim("mesh", "/World/Quad", None).unwrap();
        assert!(sync.mesh_ref(old).is_none());
        assert_eq!(sync.mesh_handle("/World/Quad"), Some(new));

        // Calls through a stale handle are ignored
        sync.update_points(old, &QUAD_POINTS);
        sync.update_primvar(old, "displayColor", &[0.0, 1.0, 0.0], 3, "constant");
        assert!(matches!(
            sync.mesh_ref(new).unwrap().host.material,
            MaterialBinding::Default
        ));
        sync.remove_rprim(new);
        assert_eq!(sync.mesh_handle("/World/Quad"), None);
    }
}
