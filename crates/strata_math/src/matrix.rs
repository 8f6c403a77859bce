// Matrix conversion at the scene-description boundary.
//
// Hydra hands over 4x4 matrices as 16 values written row by row, in the
// row-vector convention (translation in the last row). glam stores columns
// and uses column vectors. Transposing for the convention and reading rows as
// columns cancel out, so the values map over unchanged.

use glam::Mat4;

use crate::{MathError, MathResult};

/// Convert a hydra matrix (16 values, row-major, row-vector convention)
/// into a glam `Mat4`.
pub fn mat4_from_hydra(m: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(m)
}

/// Slice form of [`mat4_from_hydra`]; the slice must hold 16 values.
pub fn mat4_from_slice(m: &[f32]) -> MathResult<Mat4> {
    let array: &[f32; 16] = m.try_into().map_err(|_| MathError::LengthMismatch {
        expected: 16,
        actual: m.len(),
    })?;
    Ok(mat4_from_hydra(array))
}
