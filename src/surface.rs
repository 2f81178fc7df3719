//! Host surface abstraction.
//!
//! A [`PixelSurface`] is whatever owns the real pixels: a browser canvas
//! bridge, a window framebuffer, or the in-memory [`RgbaCanvas`](crate::RgbaCanvas).
//! The pipeline only needs four things from it.
//!
//! # Contract
//!
//! - Buffers are RGBA8, tightly packed, row-major: `rect.width × 4` bytes
//!   per row, `rect.height` rows, no padding.
//! - [`read_pixels()`](PixelSurface::read_pixels) returns exactly
//!   `rect.width × rect.height × 4` bytes. Pixels outside the surface read as
//!   transparent black.
//! - [`commit_pixels()`](PixelSurface::commit_pixels) writes the buffer
//!   with its top-left corner at `(rect.x, rect.y)`. Pixels falling outside
//!   the surface are dropped.
//! - [`create()`](PixelSurface::create) returns a surface whose pixels are
//!   all zero, or an error if one of that size cannot exist.

use alloc::vec::Vec;

use crate::error::ProcessError;
use crate::region::{Dimensions, Rect};

/// A pixel store the pipeline can snapshot and commit to.
///
/// # Object safety
///
/// The trait is object-safe; [`create()`](PixelSurface::create) is excluded
/// from the vtable. Use `&mut dyn PixelSurface` for filter passes.
pub trait PixelSurface {
    /// Size of the surface.
    fn dimensions(&self) -> Dimensions;

    /// Copy the pixels under `rect` into a new buffer.
    fn read_pixels(&self, rect: Rect) -> Vec<u8>;

    /// Write `pixels` back with their top-left corner at `(rect.x, rect.y)`.
    ///
    /// `pixels.len()` equals `rect.width × rect.height × 4`.
    fn commit_pixels(&mut self, pixels: &[u8], rect: Rect);

    /// Allocate a zero-initialized surface.
    fn create(width: u32, height: u32) -> Result<Self, ProcessError>
    where
        Self: Sized;
}
