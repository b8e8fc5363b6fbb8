//! Drawing engine error types.

use drawkit_core::GeometryError;
use thiserror::Error;

/// Result type for drawing operations.
pub type DrawResult<T> = Result<T, DrawError>;

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Failure reported by a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Surface error: {0}")]
pub struct SurfaceError(pub String);

impl SurfaceError {
    /// Create a surface error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while drawing or tracing draw calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// A drawing operation was issued before a surface was bound.
    #[error("No context bound; call set_context first")]
    NoContextBound,

    /// A traced call ended with a different method than the one on top of the stack.
    #[error("Method stack is not in sync")]
    StackOutOfSync {
        /// Method on top of the stack, if any.
        expected: Option<String>,
        /// Method that ended.
        found: String,
    },

    /// Root calls were traced before the analyzer was started.
    #[error("Analyzer was not started")]
    NotStarted,

    /// More root calls than the configured threshold without completing.
    #[error("Analyzer seems to be in an endless loop")]
    EndlessLoop,

    /// An argument was outside its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The surface rejected an operation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Geometry could not be built.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl DrawError {
    /// Whether this error signals a misuse of the tracing API.
    ///
    /// Fatal errors propagate to the caller of a traced operation; all other
    /// errors are attached to the current call frame and drawing continues.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::StackOutOfSync { .. } | Self::NotStarted | Self::EndlessLoop
        )
    }

    /// Stable numeric code reported alongside the message.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::NoContextBound => 1,
            Self::StackOutOfSync { .. } => 2,
            Self::NotStarted => 3,
            Self::EndlessLoop => 4,
            Self::InvalidArgument(_) => 5,
            Self::Surface(_) => 6,
            Self::Geometry(_) => 7,
        }
    }
}
