//! Geometric primitives.
//!
//! Points, vectors and normals are distinct in lumen, because they transform
//! differently under homogeneous coordinate transformations. All three wrap
//! the same `nalgebra` column storage, which remains reachable through
//! `Deref`, `From` and the `from_column`/`into_inner` pair, so they can be
//! handed to generic linear algebra. What they cannot do is silently stand in
//! for one another.

mod fmt;
mod frame;
#[cfg(feature = "glam")]
mod interop;
mod normal;
mod point;
mod primitive;
mod scalar;
mod transform;
mod vector;

pub use fmt::*;
pub use frame::*;
pub use normal::*;
pub use point::*;
pub use scalar::*;
pub use transform::*;
pub use vector::*;

/// Declares the fixed-size aliases of vectors and points for each scalar
/// type, e.g. `Vector3f` or `Point2i`.
macro_rules! impl_type_aliases {
    ($($suffix:ident => $t:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = "1D vector of `" $t "`."]
                pub type [<Vector1 $suffix>] = Vector<$t, 1>;
                #[doc = "2D vector of `" $t "`."]
                pub type [<Vector2 $suffix>] = Vector<$t, 2>;
                #[doc = "3D vector of `" $t "`."]
                pub type [<Vector3 $suffix>] = Vector<$t, 3>;
                #[doc = "4D vector of `" $t "`."]
                pub type [<Vector4 $suffix>] = Vector<$t, 4>;
                #[doc = "1D point of `" $t "`."]
                pub type [<Point1 $suffix>] = Point<$t, 1>;
                #[doc = "2D point of `" $t "`."]
                pub type [<Point2 $suffix>] = Point<$t, 2>;
                #[doc = "3D point of `" $t "`."]
                pub type [<Point3 $suffix>] = Point<$t, 3>;
                #[doc = "4D point of `" $t "`."]
                pub type [<Point4 $suffix>] = Point<$t, 4>;
            )*
        }
    };
}

impl_type_aliases!(f => f32, d => f64, i => i32, u => u32);

/// Single precision surface normal.
pub type Normal3f = Normal<f32>;
/// Double precision surface normal.
pub type Normal3d = Normal<f64>;
