//! Region fitting and buffered per-pixel passes over RGBA surfaces.
//!
//! This crate provides one primitive: run a caller-supplied transform over
//! every pixel of a rectangle, then write the results back in one batch.
//!
//! - [`fit()`] / [`fit_with()`] — clamp a requested [`Region`] to a canvas
//! - [`PixelProcessor`] — configured pass runner (fit mode, limits, cancellation)
//! - [`filter()`] / [`paint()`] / [`paint_new()`] — passes with default settings
//! - [`PixelContext`] — what the transform sees for each pixel
//! - [`PixelSurface`] — the host pixel store a pass reads from and commits to
//! - [`RgbaCanvas`] — in-memory RGBA8 surface
//! - [`PassLimits`] — size caps checked before any pixel is read
//!
//! Transforms read neighbors through [`PixelContext::pixel()`], which always
//! returns pre-pass values, so convolution-style effects do not depend on
//! iteration order. A pass that fails for any reason leaves the surface
//! untouched.
//!
//! ```
//! use pixelproc::{filter, Region, RgbaCanvas, Rgba};
//!
//! let mut canvas = RgbaCanvas::new(10, 10).unwrap();
//! filter(&mut canvas, Some(Region::new(-2, 3, 5, 4)), |ctx| {
//!     ctx.set_color(Rgba::new(255, 0, 0, 255));
//! })
//! .unwrap();
//!
//! assert_eq!(canvas.pixel(2, 3), Some(Rgba::new(255, 0, 0, 255)));
//! assert_eq!(canvas.pixel(3, 3), Some(Rgba::new(0, 0, 0, 0)));
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod canvas;
mod context;
mod error;
mod limits;
mod pipeline;
mod region;
mod surface;

pub use canvas::RgbaCanvas;
pub use context::PixelContext;
pub use error::{InvalidRegion, ProcessError};
pub use limits::{LimitExceeded, PassLimits};
pub use pipeline::{PixelProcessor, filter, paint, paint_new};
pub use region::{Dimensions, FitMode, Rect, Region, fit, fit_with};
pub use surface::PixelSurface;

// Re-exports for surface implementors and users.
pub use enough::{Stop, StopReason, Unstoppable};
pub use imgref::{ImgRef, ImgVec};
pub use rgb;
pub use rgb::Rgba;
