use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Numeric kind stored in a [`Vector`](crate::Vector).
///
/// Implemented once for each floating point type instead of generating a
/// separate vector type per scalar.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + 'static
{
    const ZERO: Self;
    const ONE: Self;

    /// Square root, used by vector length.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Lossy conversion from `f64` (tolerances, literals).
    fn from_f64(value: f64) -> Self;

    /// Conversion to `f64` for reporting.
    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline]
                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }

                #[inline]
                fn abs(self) -> Self {
                    <$t>::abs(self)
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar!(f32, f64);
