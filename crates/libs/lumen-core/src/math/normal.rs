use super::{
    primitive::{impl_linear_ops, impl_storage},
    Real, Scalar, Vector,
};
use nalgebra::SVector;

/// Surface normal.
///
/// A normal is a covector: when the surface it is attached to is transformed
/// by `T`, the normal must be transformed by the inverse transpose of the
/// linear part of `T`. This is why it is not a [`Vector`], even though both
/// share the same storage. Normals only arise from 2D surfaces embedded in
/// 3D space, hence the fixed dimension.
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
pub struct Normal<S = f32>(pub(crate) SVector<S, 3>);

impl_storage!(Normal<S>, 3, "normal");
impl_linear_ops!(Normal<S>);

impl<S: Scalar> Normal<S> {
    /// Creates a new normal.
    #[inline]
    pub fn new(x: S, y: S, z: S) -> Self { Self(SVector::from([x, y, z])) }

    /// Pairs the normal with a vector.
    ///
    /// For a unit normal and a unit direction this is the cosine of the
    /// angle between them.
    #[inline]
    pub fn dot_vector(&self, v: &Vector<S, 3>) -> S {
        self.0.x * v.0.x + self.0.y * v.0.y + self.0.z * v.0.z
    }
}

impl<S: Real> Normal<S> {
    /// Flips the normal so that it lies in the same hemisphere as `v`.
    pub fn face_forward(&self, v: &Vector<S, 3>) -> Self {
        if self.dot_vector(v) < S::zero() {
            Self(-self.0)
        } else {
            *self
        }
    }
}
