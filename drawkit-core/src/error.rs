//! Error types for geometry and data-model operations.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur while building geometry or converting inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// An n-gon needs at least one side.
    #[error("Invalid side count: {0}")]
    InvalidSideCount(u32),

    /// A flat angle array must hold exactly three values.
    #[error("Invalid array length for Vector3D conversion: {0}")]
    InvalidAngleArray(usize),

    /// Grid cells must have a positive size.
    #[error("Invalid grid cell size: {0}")]
    InvalidCellSize(f64),

    /// A value was not finite or otherwise unusable.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}
