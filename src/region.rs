//! Region fitting.
//!
//! A [`Region`] is whatever rectangle the caller asked for. It may start at
//! negative coordinates or run past the canvas edges. [`fit()`] clamps it to
//! the canvas so the pipeline only ever touches real pixels.
//!
//! ```text
//!   requested            canvas
//!   ┌─────────┐────────────────────┐
//!   │  ░░░░░░ │▓▓▓▓▓▓              │
//!   │  ░░░░░░ │▓▓▓▓▓▓              │
//!   └─────────┘────────────────────┘
//!     dropped   kept (fitted region)
//! ```

use crate::error::ProcessError;

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The region covering the whole canvas.
    pub fn full_region(self) -> Region {
        Region::sized(saturate(self.width as i64), saturate(self.height as i64))
    }
}

/// A requested or fitted rectangle.
///
/// Coordinates are signed: before fitting, `x`/`y` may be negative and the
/// size may run past the canvas. After [`fit()`], `x` and `y` are never
/// negative and `x + width` never exceeds the canvas width. A fitted
/// region whose request lay entirely outside the canvas can end up with a
/// negative width or height; such a region is [empty](Region::is_empty).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Region {
    /// Create a region at `(x, y)`.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a region anchored at the origin.
    pub const fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether the region covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Unsigned extent of the region, with negative coordinates and sizes
    /// collapsed to zero.
    pub fn extent(&self) -> Rect {
        if self.is_empty() {
            return Rect::new(self.x.max(0) as u32, self.y.max(0) as u32, 0, 0);
        }
        Rect::new(
            self.x.max(0) as u32,
            self.y.max(0) as u32,
            self.width as u32,
            self.height as u32,
        )
    }
}

/// Unsigned rectangle handed to a [`PixelSurface`](crate::PixelSurface).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered, or `None` if it overflows `usize`.
    pub const fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Length in bytes of an RGBA8 buffer for this rectangle.
    ///
    /// Returns `None` when the length overflows or exceeds `isize::MAX`,
    /// the largest allocation Rust permits.
    pub const fn byte_len(&self) -> Option<usize> {
        match self.pixel_count() {
            Some(pixels) => match pixels.checked_mul(4) {
                Some(bytes) if bytes <= isize::MAX as usize => Some(bytes),
                _ => None,
            },
            None => None,
        }
    }

    /// [`byte_len()`](Self::byte_len), or [`ProcessError::InvalidDimensions`].
    pub(crate) fn require_byte_len(&self) -> Result<usize, ProcessError> {
        self.byte_len().ok_or(ProcessError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })
    }
}

/// How [`fit_with()`] treats the bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FitMode {
    /// Clamp all four edges.
    #[default]
    Clamped,
    /// Clamp the left, top and right edges only.
    ///
    /// The height is never checked against the canvas height, so a fitted
    /// region may extend below the canvas. Surfaces are expected to read
    /// transparent black there and drop writes, as
    /// [`RgbaCanvas`](crate::RgbaCanvas) does.
    Legacy,
}

/// Fit `region` inside a `canvas_width × canvas_height` canvas.
///
/// Equivalent to [`fit_with`]`(FitMode::Clamped, ..)`. Never fails; a
/// region entirely outside the canvas yields an empty result.
///
/// ```
/// use pixelproc::{fit, Region};
///
/// let fitted = fit(10, 10, Region::new(-2, 3, 5, 4));
/// assert_eq!(fitted, Region::new(0, 3, 3, 4));
/// ```
pub fn fit(canvas_width: u32, canvas_height: u32, region: Region) -> Region {
    fit_with(FitMode::Clamped, canvas_width, canvas_height, region)
}

/// Fit `region` inside a `canvas_width × canvas_height` canvas using `mode`.
pub fn fit_with(mode: FitMode, canvas_width: u32, canvas_height: u32, region: Region) -> Region {
    let cw = i64::from(canvas_width);
    let ch = i64::from(canvas_height);
    let mut x = i64::from(region.x);
    let mut y = i64::from(region.y);
    let mut width = i64::from(region.width);
    let mut height = i64::from(region.height);

    if x < 0 {
        width += x;
        x = 0;
    }
    if x + width > cw {
        width = cw - x;
    }
    if y < 0 {
        height += y;
        y = 0;
    }
    if x + width > cw {
        width = cw - x;
    }
    if mode == FitMode::Clamped && y + height > ch {
        height = ch - y;
    }

    let fitted = Region::new(saturate(x), saturate(y), saturate(width), saturate(height));
    log::trace!("fit {region:?} into {canvas_width}x{canvas_height} ({mode:?}) -> {fitted:?}");
    fitted
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
