//! Material networks and their mapping onto the renderer's material schema.

mod binder;
mod network;
mod schema;

use thiserror::Error;

pub use binder::{apply_literal, resolve_network, Resolution, TextureBinding};
pub use network::{
    Connection, Downstream, MaterialNode, NetworkState, ParamValue, Parameter, ShadingNetwork,
    Upstream,
};
pub use schema::{
    BoundTexture, ChannelFormat, MaterialField, PhysicalMaterial, TextureSlot, WrapMode,
};

/// Errors converting a literal parameter onto a material field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    #[error("Parameter '{parameter}' expects a 3 or 4 component color")]
    ExpectedColor { parameter: String },

    #[error("Parameter '{parameter}' expects a scalar")]
    ExpectedScalar { parameter: String },
}

pub type MaterialResult<T> = Result<T, MaterialError>;
