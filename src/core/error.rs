//! Errors which abort the processing of a single primitive.
//!
//! Degenerate geometry never ends up here (it is handled locally by
//! the bound and parameterization code) and neither do policy limits
//! like a too large grid (those just make a primitive not diceable).

// others
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiceError {
    #[error("grid of {expected} vertices can't take {found} values for \"{name}\"")]
    GridSizeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unknown coordinate system \"{0}\"")]
    UnknownSpace(String),
    #[error("bad parameter declaration \"{0}\"")]
    BadDeclaration(String),
    #[error("parameter \"{name}\" is not of type {expected}")]
    ParameterTypeMismatch { name: String, expected: String },
    #[error("parameter \"{name}\" needs {expected} values, got {found}")]
    ValueCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("point cloud without any points")]
    EmptyPointCloud,
}
