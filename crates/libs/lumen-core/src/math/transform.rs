use super::{display_matrix, Normal, Point, Real, Vector};
use crate::error::TransformError;
use nalgebra::{Matrix4, Rotation3, Unit, Vector3, Vector4};
use std::{
    fmt::{Display, Formatter},
    ops::Mul,
};

/// Homogeneous 4x4 transform, stored together with its inverse.
///
/// Vectors, points and normals all go through [`Transform::apply`], and each
/// of them picks the rule matching its semantics (see [`Transformable`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform<S: Real> {
    matrix: Matrix4<S>,
    inverse: Matrix4<S>,
}

/// Geometric quantity that knows how to be mapped by a [`Transform`].
pub trait Transformable<S: Real>: Sized {
    /// Returns the transformed value.
    fn transform_by(&self, transform: &Transform<S>) -> Self;
}

impl<S: Real> Transform<S> {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    /// Creates a transform from a matrix, computing its inverse.
    pub fn from_matrix(matrix: Matrix4<S>) -> Result<Self, TransformError> {
        match matrix.try_inverse() {
            Some(inverse) => Ok(Self { matrix, inverse }),
            None => {
                log::debug!("refusing to build a transform from a singular matrix");
                Err(TransformError::Singular)
            },
        }
    }

    /// Creates a transform from a matrix and its known inverse.
    ///
    /// The pair is trusted; no check is performed.
    pub fn from_matrix_inverse(matrix: Matrix4<S>, inverse: Matrix4<S>) -> Self {
        Self { matrix, inverse }
    }

    /// Translation by `delta`.
    pub fn translate(delta: &Vector<S, 3>) -> Self {
        Self {
            matrix: Matrix4::new_translation(delta.as_inner()),
            inverse: Matrix4::new_translation(&-delta.into_inner()),
        }
    }

    /// Non-uniform scaling along the coordinate axes.
    ///
    /// All factors must be non-zero.
    pub fn scale(factors: &Vector<S, 3>) -> Result<Self, TransformError> {
        if factors.iter().any(|f| *f == S::zero()) {
            return Err(TransformError::Singular);
        }
        let inv = Vector3::new(
            S::one() / factors.x,
            S::one() / factors.y,
            S::one() / factors.z,
        );
        Ok(Self {
            matrix: Matrix4::new_nonuniform_scaling(factors.as_inner()),
            inverse: Matrix4::new_nonuniform_scaling(&inv),
        })
    }

    /// Counter-clockwise rotation of `angle` radians around `axis`.
    pub fn rotate(axis: &Vector<S, 3>, angle: S) -> Self {
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis.into_inner()), angle);
        Self {
            matrix: rotation.to_homogeneous(),
            inverse: rotation.inverse().to_homogeneous(),
        }
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.inverse,
            inverse: self.matrix,
        }
    }

    /// Homogeneous matrix of the transform.
    pub fn matrix(&self) -> &Matrix4<S> { &self.matrix }

    /// Homogeneous matrix of the inverse transform.
    pub fn inverse_matrix(&self) -> &Matrix4<S> { &self.inverse }

    /// Applies the transform to a vector, point or normal.
    #[inline]
    pub fn apply<T: Transformable<S>>(&self, value: &T) -> T { value.transform_by(self) }
}

impl<S: Real> Default for Transform<S> {
    fn default() -> Self { Self::identity() }
}

impl<S: Real> Mul for Transform<S> {
    type Output = Self;

    /// `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        Self {
            matrix: self.matrix * rhs.matrix,
            inverse: rhs.inverse * self.inverse,
        }
    }
}

impl<S: Real> Display for Transform<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", display_matrix(&self.matrix))
    }
}

impl<S: Real> Transformable<S> for Vector<S, 3> {
    /// Vectors only see the linear part of the transform.
    fn transform_by(&self, transform: &Transform<S>) -> Self {
        Vector::from(transform.matrix.fixed_view::<3, 3>(0, 0) * self.0)
    }
}

impl<S: Real> Transformable<S> for Point<S, 3> {
    /// Points see the whole transform, followed by the homogeneous divide.
    fn transform_by(&self, transform: &Transform<S>) -> Self {
        let h = transform.matrix * Vector4::new(self.0.x, self.0.y, self.0.z, S::one());
        Point::from(h.xyz() / h.w)
    }
}

impl<S: Real> Transformable<S> for Normal<S> {
    /// Normals are mapped by the inverse transpose of the linear part.
    fn transform_by(&self, transform: &Transform<S>) -> Self {
        Normal::from(transform.inverse.fixed_view::<3, 3>(0, 0).transpose() * self.0)
    }
}
