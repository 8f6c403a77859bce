/// A direction tag used to address vector components and build unit vectors.
///
/// An axis is only meaningful for vectors whose dimension is greater than its
/// ordinal: `W` exists for 4D vectors, `Z` for 3D and 4D, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    /// Every axis in ordinal order.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::W];

    /// Component index addressed by this axis.
    #[inline]
    pub const fn ordinal(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }

    /// Axis for a component index, if one exists.
    pub fn from_ordinal(ordinal: usize) -> Option<Axis> {
        Self::ALL.get(ordinal).copied()
    }

    /// Returns true if this axis addresses a component of an N-dimensional vector.
    #[inline]
    pub const fn is_valid_for(self, dimension: usize) -> bool {
        self.ordinal() < dimension
    }

    /// The axes of a 2D, 3D or 4D vector.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is not 2, 3 or 4.
    pub fn for_dimension(dimension: usize) -> &'static [Axis] {
        assert!(
            (2..=4).contains(&dimension),
            "axes are declared for dimensions 2, 3 and 4, not {dimension}"
        );
        &Self::ALL[..dimension]
    }
}
