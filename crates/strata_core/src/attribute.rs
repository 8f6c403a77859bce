//! Primvar attribute buffers and the topology gather.
//!
//! Hydra sends per-point data (one value per point) alongside a face-vertex
//! index list. The renderer wants one value per face corner, so per-point data
//! is "gathered" through the indices. Face-varying data is already expanded and
//! constant data is a single value that never reaches the geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported number of components per element.
pub const MAX_DIMENSION: usize = 4;

/// Errors raised while validating or expanding attribute data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Unknown interpolation mode '{0}'")]
    UnknownInterpolation(String),

    #[error("Unsupported attribute dimension {0} (expected 1 to 4)")]
    UnsupportedDimension(usize),

    #[error("Buffer of {len} values is not a multiple of dimension {dimension}")]
    RaggedBuffer { len: usize, dimension: usize },

    #[error("Index {index} out of range for {element_count} elements")]
    IndexOutOfRange { index: usize, element_count: usize },

    #[error("Negative index {0} in topology")]
    NegativeIndex(i32),

    #[error("{interpolation} data has {actual} elements, expected {expected}")]
    ElementCountMismatch {
        interpolation: Interpolation,
        expected: usize,
        actual: usize,
    },
}

pub type AttributeResult<T> = Result<T, AttributeError>;

/// How a primvar's values map onto geometry elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// One value for the whole primitive
    Constant,
    /// One value per point, indexed through the topology
    Vertex,
    /// One value per face corner, already expanded
    FaceVarying,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Constant => "constant",
            Interpolation::Vertex => "vertex",
            Interpolation::FaceVarying => "facevarying",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = AttributeError;

    fn from_str(s: &str) -> AttributeResult<Self> {
        match s {
            "constant" => Ok(Interpolation::Constant),
            "vertex" => Ok(Interpolation::Vertex),
            "facevarying" | "faceVarying" => Ok(Interpolation::FaceVarying),
            other => Err(AttributeError::UnknownInterpolation(other.to_string())),
        }
    }
}

fn check_dimension(dimension: usize) -> AttributeResult<()> {
    if (1..=MAX_DIMENSION).contains(&dimension) {
        Ok(())
    } else {
        Err(AttributeError::UnsupportedDimension(dimension))
    }
}

/// Convert a hydra index list to unsigned indices.
pub fn topology_indices(indices: &[i32]) -> AttributeResult<Vec<u32>> {
    indices
        .iter()
        .map(|&i| u32::try_from(i).map_err(|_| AttributeError::NegativeIndex(i)))
        .collect()
}

/// Expand per-point data through a face-vertex index list.
///
/// For every index, the `dimension` components of that element are appended
/// to the output, so the result holds `indices.len() * dimension` values.
pub fn gather(attribute: &[f32], indices: &[u32], dimension: usize) -> AttributeResult<Vec<f32>> {
    check_dimension(dimension)?;

    let element_count = attribute.len() / dimension;
    let mut values = Vec::with_capacity(indices.len() * dimension);

    for &index in indices {
        let index = index as usize;
        if index >= element_count {
            return Err(AttributeError::IndexOutOfRange {
                index,
                element_count,
            });
        }
        let start = dimension * index;
        values.extend_from_slice(&attribute[start..start + dimension]);
    }

    Ok(values)
}

/// Gather when both inputs are present; otherwise do nothing.
///
/// A missing attribute or an empty/missing index list is not an error: the
/// channel simply has nothing to show yet.
pub fn reorder(
    attribute: Option<&[f32]>,
    indices: Option<&[u32]>,
    dimension: usize,
) -> AttributeResult<Option<Vec<f32>>> {
    match (attribute, indices) {
        (Some(attribute), Some(indices)) if !indices.is_empty() => {
            gather(attribute, indices, dimension).map(Some)
        }
        _ => Ok(None),
    }
}

/// A flat primvar buffer tagged with its dimension and interpolation.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeBuffer {
    values: Vec<f32>,
    dimension: usize,
    interpolation: Interpolation,
}

impl AttributeBuffer {
    /// Create a buffer; the value count must be a multiple of `dimension`.
    pub fn new(
        values: Vec<f32>,
        dimension: usize,
        interpolation: Interpolation,
    ) -> AttributeResult<Self> {
        check_dimension(dimension)?;
        if values.len() % dimension != 0 {
            return Err(AttributeError::RaggedBuffer {
                len: values.len(),
                dimension,
            });
        }
        Ok(Self {
            values,
            dimension,
            interpolation,
        })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Number of elements (values / dimension).
    pub fn element_count(&self) -> usize {
        self.values.len() / self.dimension
    }

    /// The single value of a constant buffer.
    pub fn constant_value(&self) -> Option<&[f32]> {
        match self.interpolation {
            Interpolation::Constant => self.values.get(..self.dimension),
            _ => None,
        }
    }

    /// Check the element count against the primitive it belongs to.
    ///
    /// `face_vertex_count` is the sum of the face-vertex counts, i.e. the
    /// length of the index list.
    pub fn validate(&self, point_count: usize, face_vertex_count: usize) -> AttributeResult<()> {
        let expected = match self.interpolation {
            Interpolation::Constant => 1,
            Interpolation::Vertex => point_count,
            Interpolation::FaceVarying => face_vertex_count,
        };
        let actual = self.element_count();
        if actual == expected {
            Ok(())
        } else {
            Err(AttributeError::ElementCountMismatch {
                interpolation: self.interpolation,
                expected,
                actual,
            })
        }
    }

    /// Produce renderer-ready face-corner data.
    ///
    /// Vertex data is gathered through `indices` (nothing happens while the
    /// index list is empty), face-varying data is passed through, and constant
    /// data yields `None` because it belongs on the material instead.
    pub fn expand(&self, indices: &[u32]) -> AttributeResult<Option<Vec<f32>>> {
        match self.interpolation {
            Interpolation::Constant => Ok(None),
            Interpolation::FaceVarying => Ok(Some(self.values.clone())),
            Interpolation::Vertex => {
                reorder(Some(self.values.as_slice()), Some(indices), self.dimension)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_POINTS: [f32; 12] = [
        -430.0, -145.0, 0.0, //
        430.0, -145.0, 0.0, //
        430.0, 145.0, 0.0, //
        -430.0, 145.0, 0.0,
    ];

    #[test]
    fn test_gather_identity_order() {
        let result = gather(&QUAD_POINTS, &[0, 1, 2, 3], 3).unwrap();
        assert_eq!(result, QUAD_POINTS.to_vec());

        // Re-running with identical inputs is deterministic
        let again = gather(&QUAD_POINTS, &[0, 1, 2, 3], 3).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_gather_triangulated_quad() {
        let result = gather(&QUAD_POINTS, &[0, 1, 2, 0, 2, 3], 3).unwrap();
        assert_eq!(result.len(), 18);
        assert_eq!(&result[9..12], &QUAD_POINTS[0..3]);
        assert_eq!(&result[15..18], &QUAD_POINTS[9..12]);
    }

    #[test]
    fn test_gather_two_components() {
        let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0];
        let result = gather(&uvs, &[2, 0], 2).unwrap();
        assert_eq!(result, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_gather_rejects_out_of_range() {
        let err = gather(&QUAD_POINTS, &[0, 4], 3).unwrap_err();
        assert_eq!(
            err,
            AttributeError::IndexOutOfRange {
                index: 4,
                element_count: 4
            }
        );
    }

    #[test]
    fn test_gather_rejects_bad_dimension() {
        assert_eq!(
            gather(&QUAD_POINTS, &[0], 0),
            Err(AttributeError::UnsupportedDimension(0))
        );
        assert!(gather(&QUAD_POINTS, &[0], 5).is_err());
    }

    #[test]
    fn test_reorder_is_noop_without_inputs() {
        let points = &QUAD_POINTS[..];
        assert_eq!(reorder(None, Some(&[0u32, 1][..]), 3), Ok(None));
        assert_eq!(reorder(Some(points), None, 3), Ok(None));
        assert_eq!(reorder(Some(points), Some(&[][..]), 3), Ok(None));
    }

    #[test]
    fn test_topology_indices() {
        assert_eq!(topology_indices(&[0, 1, 2]), Ok(vec![0, 1, 2]));
        assert_eq!(
            topology_indices(&[0, -1]),
            Err(AttributeError::NegativeIndex(-1))
        );
    }

    #[test]
    fn test_interpolation_parse() {
        assert_eq!("vertex".parse::<Interpolation>(), Ok(Interpolation::Vertex));
        assert_eq!(
            "facevarying".parse::<Interpolation>(),
            Ok(Interpolation::FaceVarying)
        );
        assert!("uniform".parse::<Interpolation>().is_err());

        let parsed: Interpolation = serde_json::from_str("\"constant\"").unwrap();
        assert_eq!(parsed, Interpolation::Constant);
    }

    #[test]
    fn test_buffer_rejects_ragged_values() {
        let err = AttributeBuffer::new(vec![1.0, 2.0], 3, Interpolation::Vertex).unwrap_err();
        assert_eq!(err, AttributeError::RaggedBuffer { len: 2, dimension: 3 });
    }

    #[test]
    fn test_buffer_validate() {
        let vertex = AttributeBuffer::new(QUAD_POINTS.to_vec(), 3, Interpolation::Vertex).unwrap();
        assert!(vertex.validate(4, 6).is_ok());
        assert!(vertex.validate(3, 6).is_err());

        let face_varying =
            AttributeBuffer::new(vec![0.0; 12], 2, Interpolation::FaceVarying).unwrap();
        assert!(face_varying.validate(4, 6).is_ok());
        assert!(face_varying.validate(4, 4).is_err());

        let constant = AttributeBuffer::new(vec![1.0, 0.0, 0.0], 3, Interpolation::Constant).unwrap();
        assert!(constant.validate(4, 6).is_ok());
        assert_eq!(constant.constant_value(), Some(&[1.0, 0.0, 0.0][..]));
    }

    #[test]
    fn test_buffer_expand_by_interpolation() {
        let indices = [0, 2];

        let vertex = AttributeBuffer::new(vec![1.0, 2.0, 3.0], 1, Interpolation::Vertex).unwrap();
        assert_eq!(vertex.expand(&indices), Ok(Some(vec![1.0, 3.0])));
        assert_eq!(vertex.expand(&[]), Ok(None));

        let face_varying =
            AttributeBuffer::new(vec![7.0, 8.0], 1, Interpolation::FaceVarying).unwrap();
        assert_eq!(face_varying.expand(&indices), Ok(Some(vec![7.0, 8.0])));

        let constant = AttributeBuffer::new(vec![5.0], 1, Interpolation::Constant).unwrap();
        assert_eq!(constant.expand(&indices), Ok(None));
    }
}
