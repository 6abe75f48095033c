use super::{primitive::impl_storage, Real, Scalar, Vector};
use nalgebra::SVector;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Location in `N`-dimensional space.
///
/// A point has the same storage as a [`Vector`] of the same dimension, but
/// transforms with the full affine transform including the translation.
/// Only the operations that are meaningful for positions are provided:
/// the difference of two points is a vector, and a point can be offset by a
/// vector. Use [`Point::coords`] when the position vector is really wanted.
#[derive(Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        transparent,
        bound(
            serialize = "S: Scalar + serde::Serialize",
            deserialize = "S: Scalar + serde::Deserialize<'de>"
        )
    )
)]
#[repr(transparent)]
pub struct Point<S, const N: usize>(pub(crate) SVector<S, N>);

impl_storage!(Point<S, const N: usize>, N, "point");

impl<S: Scalar> Point<S, 2> {
    /// Creates a new 2D point.
    #[inline]
    pub fn new(x: S, y: S) -> Self { Self(SVector::from([x, y])) }
}

impl<S: Scalar> Point<S, 3> {
    /// Creates a new 3D point.
    #[inline]
    pub fn new(x: S, y: S, z: S) -> Self { Self(SVector::from([x, y, z])) }
}

impl<S: Scalar> Point<S, 4> {
    /// Creates a new 4D point.
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self { Self(SVector::from([x, y, z, w])) }
}

impl<S: Scalar, const N: usize> Point<S, N> {
    /// The origin of the coordinate system.
    #[inline]
    pub fn origin() -> Self { Self::zeros() }

    /// Position vector of the point, i.e. `self - origin`.
    #[inline]
    pub fn coords(&self) -> Vector<S, N> { Vector(self.0) }

    /// Point located at `origin + v`.
    #[inline]
    pub fn from_coords(v: Vector<S, N>) -> Self { Self(v.0) }
}

impl<S: Real, const N: usize> Point<S, N> {
    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Self) -> S { (*other - *self).norm() }

    /// Squared euclidean distance between two points.
    pub fn distance_squared(&self, other: &Self) -> S { (*other - *self).norm_squared() }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(&self, other: &Self, t: S) -> Self { *self + (*other - *self) * t }
}

impl<S: Scalar, const N: usize> Sub for Point<S, N> {
    type Output = Vector<S, N>;

    #[inline]
    fn sub(self, rhs: Self) -> Vector<S, N> { Vector(self.0.zip_map(&rhs.0, |a, b| a - b)) }
}

impl<S: Scalar, const N: usize> Add<Vector<S, N>> for Point<S, N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Vector<S, N>) -> Self { Self(self.0.zip_map(&rhs.0, |a, b| a + b)) }
}

impl<S: Scalar, const N: usize> Sub<Vector<S, N>> for Point<S, N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Vector<S, N>) -> Self { Self(self.0.zip_map(&rhs.0, |a, b| a - b)) }
}

impl<S: Scalar, const N: usize> AddAssign<Vector<S, N>> for Point<S, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Vector<S, N>) { *self = *self + rhs; }
}

impl<S: Scalar, const N: usize> SubAssign<Vector<S, N>> for Point<S, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector<S, N>) { *self = *self - rhs; }
}
