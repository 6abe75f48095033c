use super::{Normal, Real, Vector};

/// Completes the set `{a}` to a right-handed orthonormal basis `{a, b, c}`.
///
/// `a` must be of unit length. This is not checked: a non-unit input silently
/// yields a basis that is not orthonormal.
///
/// The auxiliary axis is chosen from the dominant of the first two
/// components of `a`, so that the normalisation never divides by a length
/// close to zero when `a` is (nearly) aligned with a coordinate axis.
pub fn coordinate_system<S: Real>(a: &Vector<S, 3>, b: &mut Vector<S, 3>, c: &mut Vector<S, 3>) {
    let (x, y, z) = (a.x, a.y, a.z);
    *c = if x.abs() > y.abs() {
        let inv_len = S::one() / (x * x + z * z).sqrt();
        Vector::<S, 3>::new(z * inv_len, S::zero(), -x * inv_len)
    } else {
        let inv_len = S::one() / (y * y + z * z).sqrt();
        Vector::<S, 3>::new(S::zero(), z * inv_len, -y * inv_len)
    };
    *b = c.cross(a);
}

/// Value-returning form of [`coordinate_system`].
pub fn coordinate_system_of<S: Real>(a: &Vector<S, 3>) -> (Vector<S, 3>, Vector<S, 3>) {
    let mut b = Vector::zeros();
    let mut c = Vector::zeros();
    coordinate_system(a, &mut b, &mut c);
    (b, c)
}

/// Orthonormal shading frame with tangents `s`, `t` and normal `n`.
///
/// Local coordinates put the normal along the z-axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<S: Real> {
    /// First tangent.
    pub s: Vector<S, 3>,
    /// Second tangent.
    pub t: Vector<S, 3>,
    /// Normal direction.
    pub n: Normal<S>,
}

impl<S: Real> Frame<S> {
    /// Creates a frame from three mutually orthogonal unit vectors.
    pub fn new(s: Vector<S, 3>, t: Vector<S, 3>, n: Normal<S>) -> Self { Self { s, t, n } }

    /// Builds a frame around a unit normal.
    pub fn from_normal(n: &Normal<S>) -> Self {
        let (s, t) = coordinate_system_of(&Vector::from(n.into_inner()));
        Self { s, t, n: *n }
    }

    /// Expresses a world-space vector in the local frame.
    pub fn to_local(&self, v: &Vector<S, 3>) -> Vector<S, 3> {
        Vector::<S, 3>::new(v.dot(&self.s), v.dot(&self.t), self.n.dot_vector(v))
    }

    /// Expresses a local vector in world space.
    pub fn to_world(&self, v: &Vector<S, 3>) -> Vector<S, 3> {
        self.s * v.x + self.t * v.y + Vector::from(self.n.into_inner()) * v.z
    }

    /// Cosine of the angle between a local direction and the normal.
    #[inline]
    pub fn cos_theta(v: &Vector<S, 3>) -> S { v.z }

    /// Squared sine of the angle between a local direction and the normal.
    #[inline]
    pub fn sin_theta2(v: &Vector<S, 3>) -> S { (S::one() - v.z * v.z).max(S::zero()) }

    /// Sine of the angle between a local direction and the normal.
    #[inline]
    pub fn sin_theta(v: &Vector<S, 3>) -> S { Self::sin_theta2(v).sqrt() }
}
