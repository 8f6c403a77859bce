//! Material sprims.
//!
//! A material collects shading nodes until its network is finalized, then
//! resolves to a [`PhysicalMaterial`] and requests its textures. Texture
//! completions are applied on a later poll; completions that belong to an
//! older resolution of the network are dropped.

use std::collections::HashMap;

use strata_core::material::{
    resolve_network, Connection, ParamValue, PhysicalMaterial, Resolution,
    ShadingNetwork, TextureBinding,
};
use strata_core::texture::{poll_texture, TextureCache, TextureFuture};
use strata_core::Tokens;

struct PendingTexture {
    binding: TextureBinding,
    future: TextureFuture,
    /// Resolution the request was made for
    generation: u64,
}

/// Outcome of draining completed texture requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureProgress {
    pub applied: usize,
    pub failed: usize,
    /// Completed after their material was resolved again
    pub discarded: usize,
    pub pending: usize,
}

impl std::ops::AddAssign for TextureProgress {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.failed += other.failed;
        self.discarded += other.discarded;
        self.pending += other.pending;
    }
}

pub struct HydraMaterial {
    pub id: String,
    network: ShadingNetwork,
    /// `None` until resolved, and when the network has no main node
    material: Option<PhysicalMaterial>,
    generation: u64,
    pending: Vec<PendingTexture>,
}

impl HydraMaterial {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            network: ShadingNetwork::new(),
            material: None,
            generation: 0,
            pending: Vec::new(),
        }
    }

    pub fn update_node(&mut self, path: &str, params: HashMap<String, ParamValue>) {
        log::debug!("{}: updating node {}", self.id, path);
        self.network.update_node(path, params);
    }

    /// Finalize the network and start fetching its textures.
    ///
    /// Returns the number of texture requests made.
    pub fn update_finished(
        &mut self,
        connections: &[Connection],
        tokens: &Tokens,
        cache: &mut TextureCache,
    ) -> usize {
        self.network.finalize(connections);
        self.generation += 1;

        match resolve_network(&self.network, &self.id, tokens) {
            Resolution::Default => {
                self.material = None;
                0
            }
            Resolution::Resolved { material, textures } => {
                self.material = Some(material);
                let requested = textures.len();
                for binding in textures {
                    let future = cache.request(&binding.file);
                    self.pending.push(PendingTexture {
                        binding,
                        future,
                        generation: self.generation,
                    });
                }
                requested
            }
        }
    }

    /// Apply every texture request that has completed.
    pub fn apply_completed_textures(&mut self) -> TextureProgress {
        let mut progress = TextureProgress::default();
        let generation = self.generation;
        let material = &mut self.material;
        let id = &self.id;

        self.pending.retain(|pending| {
            let Some(result) = poll_texture(&pending.future) else {
                return true;
            };

            let binding = &pending.binding;
            if pending.generation != generation {
                log::debug!("{}: discarding stale texture {}", id, binding.file);
                progress.discarded += 1;
                return false;
            }

            match (result, material.as_mut()) {
                (Ok(texture), Some(material)) => {
                    material.set_map(binding.slot, Some(binding.bind(texture)));
                    progress.applied += 1;
                }
                (Ok(_), None) => progress.discarded += 1,
                (Err(e), _) => {
                    log::warn!("{}: failed to load texture {}: {}", id, binding.file, e);
                    progress.failed += 1;
                }
            }
            false
        });

        progress.pending = self.pending.len();
        progress
    }

    /// The resolved material, or `None` if meshes should use the default.
    pub fn material(&self) -> Option<&PhysicalMaterial> {
        self.material.as_ref()
    }

    pub fn material_mut(&mut self) -> Option<&mut PhysicalMaterial> {
        self.material.as_mut()
    }

    pub fn network(&self) -> &ShadingNetwork {
        &self.network
    }

    /// Bumped on every finalize.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_textures(&self) -> usize {
        self.pending.len()
    }
}
