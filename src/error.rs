//! Error types.
//!
//! Every error is raised before the commit step of a pass, so a caller that
//! sees one can assume the surface was not modified.

use enough::StopReason;
use thiserror::Error;

use crate::limits::LimitExceeded;

/// Errors produced by a pixel pass.
///
/// Fallible transforms used with the `try_*` entry points return their own
/// error type `E: From<ProcessError>`; those errors pass through untouched
/// and never appear here.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ProcessError {
    /// The requested region cannot be used.
    #[error("invalid region: {0}")]
    InvalidRegion(#[from] InvalidRegion),

    /// The transform removed the color of the pixel it was called for.
    #[error("transform discarded the color of pixel ({x}, {y})")]
    CallbackContractViolation {
        /// Column of the offending pixel, relative to the region.
        x: u32,
        /// Row of the offending pixel, relative to the region.
        y: u32,
    },

    /// The stop token fired before the pass committed.
    #[error("pass cancelled: {0:?}")]
    Cancelled(StopReason),

    /// The fitted region exceeds the configured [`PassLimits`](crate::PassLimits).
    #[error(transparent)]
    Limit(#[from] LimitExceeded),

    /// A `width × height` RGBA8 buffer would not fit in memory.
    #[error("a {width}x{height} pixel buffer overflows the address space")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A pixel buffer did not have the expected length.
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    BufferLength {
        /// `width * height * 4`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

/// Why a region was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidRegion {
    /// A new surface was requested without a region to size it.
    #[error("a region is required when no canvas is supplied")]
    Missing,
    /// A new surface was requested with a non-zero `x`.
    #[error("region.x must be 0 when no canvas is supplied, got {0}")]
    NonZeroX(i32),
    /// A new surface was requested with a non-zero `y`.
    #[error("region.y must be 0 when no canvas is supplied, got {0}")]
    NonZeroY(i32),
    /// A new surface was requested with a negative size.
    #[error("cannot create a {width}x{height} canvas")]
    NegativeSize {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
}
