//! Fixed-size vectors with the dimension carried in the type.
//!
//! `Vector<N, S>` replaces a family of per-arity vector types. Adding a
//! `Vector<3, f32>` to a `Vector<2, f32>` does not compile, so dimension
//! mismatches never reach runtime.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, DVec3, DVec4, Vec2, Vec3, Vec4};

use crate::{Axis, MathError, MathResult, Scalar};

/// An N-component vector of scalar kind `S`.
///
/// This is a value type: it is `Copy` and every operation other than
/// [`set`](Vector::set) and [`normalize`](Vector::normalize) returns a new vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vector<const N: usize, S: Scalar>([S; N]);

impl<const N: usize, S: Scalar> Vector<N, S> {
    /// Number of components.
    pub const DIMENSION: usize = N;

    /// Create a vector from an explicit component list.
    #[inline]
    pub const fn new(components: [S; N]) -> Self {
        Self(components)
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self([S::ZERO; N])
    }

    /// Broadcast a single value into every component.
    #[inline]
    pub fn splat(value: S) -> Self {
        Self([value; N])
    }

    /// The unit vector along `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `axis` does not exist for this dimension (e.g. `Axis::W` on a
    /// 3D vector). This is a programming error, not a data error.
    pub fn unit(axis: Axis) -> Self {
        assert!(
            axis.is_valid_for(N),
            "axis {axis:?} is out of range for a {N}-dimensional vector"
        );
        let mut v = Self::zero();
        v.0[axis.ordinal()] = S::ONE;
        v
    }

    /// The axes addressing this vector's components.
    pub fn axes() -> &'static [Axis] {
        Axis::for_dimension(N)
    }

    /// Build a vector from a slice that must hold exactly N values.
    pub fn from_slice(values: &[S]) -> MathResult<Self> {
        let components: [S; N] = values.try_into().map_err(|_| MathError::LengthMismatch {
            expected: N,
            actual: values.len(),
        })?;
        Ok(Self(components))
    }

    /// Checked component read.
    pub fn get(&self, index: usize) -> MathResult<S> {
        self.0
            .get(index)
            .copied()
            .ok_or(MathError::IndexOutOfRange {
                index,
                dimension: N,
            })
    }

    /// Checked component write.
    pub fn set(&mut self, index: usize, value: S) -> MathResult<()> {
        match self.0.get_mut(index) {
            Some(component) => {
                *component = value;
                Ok(())
            }
            None => Err(MathError::IndexOutOfRange {
                index,
                dimension: N,
            }),
        }
    }

    #[inline]
    pub fn components(&self) -> &[S; N] {
        &self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[S] {
        &self.0
    }

    #[inline]
    pub fn into_array(self) -> [S; N] {
        self.0
    }

    /// Apply `f` to every component.
    pub fn map(self, f: impl Fn(S) -> S) -> Self {
        Self(self.0.map(f))
    }

    pub fn dot(&self, other: &Self) -> S {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(S::ZERO, |acc, (a, b)| acc + *a * *b)
    }

    pub fn length_squared(&self) -> S {
        self.dot(self)
    }

    /// Euclidean norm.
    pub fn length(&self) -> S {
        self.length_squared().sqrt()
    }

    /// Scale this vector to unit length in place and return its previous length.
    ///
    /// If the length is below `eps` every component is set to zero instead.
    /// The previous length is returned in both cases.
    pub fn normalize(&mut self, eps: S) -> S {
        let length = self.length();
        if length < eps {
            *self = Self::zero();
        } else {
            *self /= length;
        }
        length
    }

    /// Copying form of [`normalize`](Vector::normalize).
    pub fn normalized(mut self, eps: S) -> Self {
        self.normalize(eps);
        self
    }

    /// The component of `self` parallel to `onto`.
    ///
    /// Projecting onto the zero vector yields the zero vector.
    pub fn projection(&self, onto: &Self) -> Self {
        let denominator = onto.dot(onto);
        if denominator == S::ZERO {
            return Self::zero();
        }
        *onto * (self.dot(onto) / denominator)
    }

    /// The component of `self` perpendicular to `onto`.
    pub fn complement(&self, onto: &Self) -> Self {
        *self - self.projection(onto)
    }

    /// Component-wise comparison within `tolerance`.
    pub fn is_close(&self, other: &Self, tolerance: S) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (*a - *b).abs() <= tolerance)
    }
}

impl<S: Scalar> Vector<3, S> {
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        Self([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }
}

impl<const N: usize, S: Scalar> Default for Vector<N, S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize, S: Scalar> From<[S; N]> for Vector<N, S> {
    fn from(components: [S; N]) -> Self {
        Self(components)
    }
}

impl<const N: usize, S: Scalar> From<Vector<N, S>> for [S; N] {
    fn from(v: Vector<N, S>) -> Self {
        v.0
    }
}

impl<const N: usize, S: Scalar> Index<usize> for Vector<N, S> {
    type Output = S;

    #[inline]
    fn index(&self, index: usize) -> &S {
        &self.0[index]
    }
}

impl<const N: usize, S: Scalar> IndexMut<usize> for Vector<N, S> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut S {
        &mut self.0[index]
    }
}

impl<const N: usize, S: Scalar> Index<Axis> for Vector<N, S> {
    type Output = S;

    #[inline]
    fn index(&self, axis: Axis) -> &S {
        &self.0[axis.ordinal()]
    }
}

impl<const N: usize, S: Scalar> Add for Vector<N, S> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize, S: Scalar> AddAssign for Vector<N, S> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const N: usize, S: Scalar> Sub for Vector<N, S> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize, S: Scalar> SubAssign for Vector<N, S> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl<const N: usize, S: Scalar> Mul<S> for Vector<N, S> {
    type Output = Self;

    fn mul(mut self, rhs: S) -> Self {
        self *= rhs;
        self
    }
}

impl<const N: usize, S: Scalar> MulAssign<S> for Vector<N, S> {
    fn mul_assign(&mut self, rhs: S) {
        for a in &mut self.0 {
            *a *= rhs;
        }
    }
}

impl<const N: usize, S: Scalar> Div<S> for Vector<N, S> {
    type Output = Self;

    fn div(mut self, rhs: S) -> Self {
        self /= rhs;
        self
    }
}

impl<const N: usize, S: Scalar> DivAssign<S> for Vector<N, S> {
    fn div_assign(&mut self, rhs: S) {
        for a in &mut self.0 {
            *a /= rhs;
        }
    }
}

impl<const N: usize, S: Scalar> Neg for Vector<N, S> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

impl<const N: usize> Mul<Vector<N, f32>> for f32 {
    type Output = Vector<N, f32>;

    fn mul(self, rhs: Vector<N, f32>) -> Vector<N, f32> {
        rhs * self
    }
}

impl<const N: usize> Mul<Vector<N, f64>> for f64 {
    type Output = Vector<N, f64>;

    fn mul(self, rhs: Vector<N, f64>) -> Vector<N, f64> {
        rhs * self
    }
}

// SAFETY: `Vector` is `repr(transparent)` over `[f32; N]` / `[f64; N]`,
// both of which are `Pod` for every N.
unsafe impl<const N: usize> Zeroable for Vector<N, f32> {}
unsafe impl<const N: usize> Pod for Vector<N, f32> {}
unsafe impl<const N: usize> Zeroable for Vector<N, f64> {}
unsafe impl<const N: usize> Pod for Vector<N, f64> {}

/// View a flat component buffer as a slice of N-dimensional vectors.
///
/// Fails if the buffer length is not a multiple of N.
pub fn as_vectors<const N: usize, S>(flat: &[S]) -> MathResult<&[Vector<N, S>]>
where
    S: Scalar + Pod,
    Vector<N, S>: Pod,
{
    if flat.len() % N != 0 {
        return Err(MathError::LengthMismatch {
            expected: flat.len().next_multiple_of(N),
            actual: flat.len(),
        });
    }
    Ok(bytemuck::cast_slice(flat))
}

macro_rules! impl_glam_conversions {
    ($($n:literal, $s:ty, $glam:ty);* $(;)?) => {
        $(
            impl From<Vector<$n, $s>> for $glam {
                #[inline]
                fn from(v: Vector<$n, $s>) -> Self {
                    <$glam>::from_array(v.0)
                }
            }

            impl From<$glam> for Vector<$n, $s> {
                #[inline]
                fn from(v: $glam) -> Self {
                    Self(v.to_array())
                }
            }
        )*
    };
}

impl_glam_conversions! {
    2, f32, Vec2;
    3, f32, Vec3;
    4, f32, Vec4;
    2, f64, DVec2;
    3, f64, DVec3;
    4, f64, DVec4;
}

#[cfg(test)]
mod tests {
    use super::*;

    type V2 = Vector<2, f32>;
    type V3 = Vector<3, f32>;
    type V4 = Vector<4, f64>;

    #[test]
    fn test_constructors() {
        assert_eq!(V3::default(), V3::new([0.0, 0.0, 0.0]));
        assert_eq!(V3::splat(2.0), V3::new([2.0, 2.0, 2.0]));
        assert_eq!(V3::from([1.0, 2.0, 3.0]).into_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_unit_vectors_have_single_one() {
        fn check<const N: usize>() {
            for &axis in Vector::<N, f32>::axes() {
                let v = Vector::<N, f32>::unit(axis);
                let ones = v.as_slice().iter().filter(|c| **c == 1.0).count();
                let zeros = v.as_slice().iter().filter(|c| **c == 0.0).count();
                assert_eq!(ones, 1);
                assert_eq!(zeros, N - 1);
                assert_eq!(v[axis], 1.0);
            }
        }
        check::<2>();
        check::<3>();
        check::<4>();
    }

    #[test]
    #[should_panic]
    fn test_unit_rejects_axis_outside_dimension() {
        let _ = V3::unit(Axis::W);
    }

    #[test]
    fn test_checked_access() {
        let mut v = V2::new([1.0, 2.0]);
        assert_eq!(v.get(1), Ok(2.0));
        assert_eq!(
            v.get(2),
            Err(MathError::IndexOutOfRange {
                index: 2,
                dimension: 2
            })
        );

        v.set(0, 5.0).unwrap();
        assert_eq!(v[0], 5.0);
        assert!(v.set(3, 1.0).is_err());
        assert_eq!(v, V2::new([5.0, 2.0]));
    }

    #[test]
    fn test_from_slice_length_check() {
        assert!(V3::from_slice(&[1.0, 2.0, 3.0]).is_ok());
        assert_eq!(
            V3::from_slice(&[1.0, 2.0]),
            Err(MathError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = V3::new([1.0, 2.0, 3.0]);
        let b = V3::new([4.0, 5.0, 6.0]);
        assert_eq!(a + b, V3::new([5.0, 7.0, 9.0]));
        assert_eq!(b - a, V3::splat(3.0));
        assert_eq!(a * 2.0, V3::new([2.0, 4.0, 6.0]));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, V3::new([2.0, 2.5, 3.0]));
        assert_eq!(-a, V3::new([-1.0, -2.0, -3.0]));
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn test_cross() {
        let x = V3::unit(Axis::X);
        let y = V3::unit(Axis::Y);
        assert_eq!(x.cross(&y), V3::unit(Axis::Z));
    }

    #[test]
    fn test_length() {
        let v = V3::new([3.0, 4.0, 0.0]);
        assert!((v.length() - 5.0).abs() < 0.001);
        assert!((v.length_squared() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_unit_length() {
        let mut v = V4::new([1.0, 2.0, 3.0, 4.0]);
        let before = v.length();
        let returned = v.normalize(1e-10);
        assert!((returned - before).abs() < 1e-12);
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_degenerate_zeroes() {
        let mut v = V3::new([1e-6, 0.0, 0.0]);
        let returned = v.normalize(1e-3);
        assert!((returned - 1e-6).abs() < 1e-9);
        assert_eq!(v, V3::zero());

        let mut zero = V3::zero();
        assert_eq!(zero.normalize(1e-10), 0.0);
        assert_eq!(zero, V3::zero());
    }

    #[test]
    fn test_projection_plus_complement() {
        let samples = [
            (V3::new([1.0, 2.0, 3.0]), V3::new([0.0, 1.0, 0.0])),
            (V3::new([-4.0, 0.5, 2.0]), V3::new([1.0, 1.0, 1.0])),
            (V3::new([10.0, -3.0, 7.5]), V3::new([0.3, -2.0, 4.0])),
        ];
        for (v, onto) in samples {
            let sum = v.projection(&onto) + v.complement(&onto);
            assert!(sum.is_close(&v, 1e-4), "{sum:?} != {v:?}");
            // The complement is orthogonal to the projection axis
            assert!(v.complement(&onto).dot(&onto).abs() < 1e-3);
        }
    }

    #[test]
    fn test_projection_onto_zero() {
        let v = V3::new([1.0, 2.0, 3.0]);
        assert_eq!(v.projection(&V3::zero()), V3::zero());
        assert_eq!(v.complement(&V3::zero()), v);
    }

    #[test]
    fn test_as_vectors() {
        let flat = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let vectors = as_vectors::<3, f32>(&flat).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], V3::new([4.0, 5.0, 6.0]));

        assert!(as_vectors::<4, f32>(&flat).is_err());
    }
}
