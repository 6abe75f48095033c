use super::{
    primitive::{impl_linear_ops, impl_storage},
    Real, Scalar,
};
use nalgebra::SVector;

/// Free displacement or direction in `N`-dimensional space.
///
/// Under an affine or projective transform a vector only sees the linear
/// part: translations leave it unchanged. See
/// [`Transform::apply`](crate::math::Transform::apply).
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
pub struct Vector<S, const N: usize>(pub(crate) SVector<S, N>);

impl_storage!(Vector<S, const N: usize>, N, "vector");
impl_linear_ops!(Vector<S, const N: usize>);

impl<S: Scalar> Vector<S, 2> {
    /// Creates a new 2D vector.
    #[inline]
    pub fn new(x: S, y: S) -> Self { Self(SVector::from([x, y])) }
}

impl<S: Scalar> Vector<S, 3> {
    /// Creates a new 3D vector.
    #[inline]
    pub fn new(x: S, y: S, z: S) -> Self { Self(SVector::from([x, y, z])) }
}

impl<S: Scalar> Vector<S, 4> {
    /// Creates a new 4D vector.
    #[inline]
    pub fn new(x: S, y: S, z: S, w: S) -> Self { Self(SVector::from([x, y, z, w])) }
}

impl<S: Real> Vector<S, 3> {
    /// Cross product, following the right-hand rule.
    #[inline]
    pub fn cross(&self, rhs: &Self) -> Self { Self(self.0.cross(&rhs.0)) }
}

impl<S: Real, const N: usize> Vector<S, N> {
    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool { self.0.iter().all(|c| c.is_finite()) }
}
