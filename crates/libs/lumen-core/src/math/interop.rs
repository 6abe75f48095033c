//! Conversions between the single precision primitives and `glam`, which
//! the GPU-facing side of the renderer works with.
//!
//! Semantics are kept: a `glam::Vec3` coming from a point is only turned back
//! into a point by an explicit `Point3f::from`.

use super::{Normal3f, Point2f, Point3f, Vector2f, Vector3f, Vector4f};

macro_rules! impl_glam_conversions {
    ($($t:ty => $g:ty),* $(,)?) => {
        $(
            impl From<$t> for $g {
                #[inline]
                fn from(value: $t) -> Self {
                    <$g>::from_slice(value.as_slice())
                }
            }

            impl From<$g> for $t {
                #[inline]
                fn from(value: $g) -> Self {
                    <$t>::from(::nalgebra::SVector::from(value.to_array()))
                }
            }
        )*
    };
}

impl_glam_conversions!(
    Vector2f => glam::Vec2,
    Vector3f => glam::Vec3,
    Vector4f => glam::Vec4,
    Point2f => glam::Vec2,
    Point3f => glam::Vec3,
    Normal3f => glam::Vec3,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let v = Vector3f::new(1.0, 2.0, 3.0);
        let g: glam::Vec3 = v.into();
        assert_eq!(g, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3f::from(g), v);

        let p = Point2f::new(-1.0, 0.5);
        assert_eq!(Point2f::from(glam::Vec2::from(p)), p);

        let n = Normal3f::new(0.0, 0.0, 1.0);
        assert_eq!(glam::Vec3::from(n), glam::Vec3::Z);

        let w = Vector4f::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(glam::Vec4::from(w).w, 4.0);
    }
}
