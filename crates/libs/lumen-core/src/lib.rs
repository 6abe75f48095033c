//! # lumen-core
//! Geometric primitives for the lumen renderer.
//!
//! [`Vector`](math::Vector), [`Point`](math::Point) and
//! [`Normal`](math::Normal) share the same `nalgebra` storage but are
//! distinct types, because each of them transforms differently under a
//! homogeneous [`Transform`](math::Transform):
//!
//! - vectors only see the linear part,
//! - points see the whole transform,
//! - normals see the inverse transpose of the linear part.
//!
//! Passing one where another is expected is a compile error; conversions at
//! the storage level are always spelled out.

#![warn(missing_docs)]

pub mod error;
pub mod math;

pub use error::TransformError;
