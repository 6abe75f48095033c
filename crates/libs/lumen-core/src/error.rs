//! Error types of the geometric primitive library.

/// Failure to build a [`Transform`](crate::math::Transform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The matrix has no inverse, so normals could not be transformed.
    #[error("Transform matrix is singular")]
    Singular,
}
