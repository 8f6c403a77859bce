//! Strata Core - data model behind the scene sync adapter.
//!
//! This crate provides:
//!
//! - **Attribute buffers**: per-point / face-varying primvar data and the
//!   topology gather that expands it for the renderer
//! - **Material networks**: shading nodes, connections, and the binder that
//!   maps a network onto the physical material schema
//! - **Textures**: decoding plus a memoizing cache over an asynchronous
//!   resource fetcher
//! - **Tokens**: the name registry shared by all of the above
//!
//! # Example
//!
//! ```ignore
//! use strata_core::attribute::{AttributeBuffer, Interpolation};
//!
//! let points = AttributeBuffer::new(flat_points, 3, Interpolation::Vertex)?;
//! let expanded = points.expand(&indices)?;
//! ```

pub mod attribute;
pub mod material;
pub mod texture;
pub mod tokens;

// Re-export commonly used types
pub use attribute::{AttributeBuffer, Interpolation};
pub use material::{Connection, MaterialNode, ParamValue, PhysicalMaterial, ShadingNetwork};
pub use texture::{FileFetcher, ResourceFetcher, Texture, TextureCache};
pub use tokens::Tokens;
