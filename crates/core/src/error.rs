//! Error types for the instanton lab core.

use thiserror::Error;

/// Errors produced by field and engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two fields had incompatible dimensions for an element-wise operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// An (x, y) coordinate was outside the field bounds.
    #[error("index ({x}, {y}) out of bounds for field of size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A selector tag (potential family, seed shape, policy) was not recognized.
    #[error("unsupported {kind}: '{name}'")]
    UnsupportedVariant { kind: &'static str, name: String },

    /// A numeric parameter was outside its accepted domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The field contains non-finite values and the stability policy halts.
    #[error("field diverged at step {step}: {cells} non-finite cells")]
    Diverged { step: u64, cells: usize },

    /// Filesystem or encoding failure while exporting data.
    #[error("i/o error: {0}")]
    Io(String),
}
