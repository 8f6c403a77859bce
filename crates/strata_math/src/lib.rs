//! Strata math - typed vectors for scene synchronization.
//!
//! This crate provides:
//!
//! - **`Scalar`**: the numeric kinds a vector can hold (`f32`, `f64`)
//! - **`Axis`**: direction tags used to build unit vectors
//! - **`Vector<N, S>`**: a fixed-size vector whose dimension is part of the type
//! - **`Aabb`** and matrix helpers used by the render side
//!
//! glam is re-exported for the renderer-facing types (`Vec3`, `Mat4`).

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod axis;
mod matrix;
mod scalar;
mod vector;

pub use aabb::Aabb;
pub use axis::Axis;
pub use matrix::{mat4_from_hydra, mat4_from_slice};
pub use scalar::Scalar;
pub use vector::{as_vectors, Vector};

use thiserror::Error;

/// Errors raised by checked math-layer accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Index {index} out of range for dimension {dimension}")]
    IndexOutOfRange { index: usize, dimension: usize },

    #[error("Expected {expected} components, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type MathResult<T> = Result<T, MathError>;

/// Two-component single precision vector.
pub type Vec2f = Vector<2, f32>;
/// Three-component single precision vector.
pub type Vec3f = Vector<3, f32>;
/// Four-component single precision vector.
pub type Vec4f = Vector<4, f32>;
/// Two-component double precision vector.
pub type Vec2d = Vector<2, f64>;
/// Three-component double precision vector.
pub type Vec3d = Vector<3, f64>;
/// Four-component double precision vector.
pub type Vec4d = Vector<4, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_have_expected_dimension() {
        assert_eq!(Vec2f::DIMENSION, 2);
        assert_eq!(Vec3d::DIMENSION, 3);
        assert_eq!(Vec4f::DIMENSION, 4);
    }

    #[test]
    fn test_glam_roundtrip() {
        let v = Vec3f::new([1.0, 2.0, 3.0]);
        let g: Vec3 = v.into();
        assert_eq!(g, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3f::from(g), v);
    }
}
