//! Per-pixel context handed to transforms.

use rgb::Rgba;

use crate::region::{Dimensions, Region};

/// What a transform sees for the pixel it is called for.
///
/// One context is built per pass and reused for every pixel; the pipeline
/// overwrites [`x()`](Self::x), [`y()`](Self::y) and the color before each
/// call. [`pixel()`](Self::pixel) always reads the snapshot taken before the
/// pass started, so a transform never observes colors written earlier in the
/// same pass.
///
/// The color may be replaced or edited freely. Removing it with
/// [`take_color()`](Self::take_color) and not putting one back aborts the
/// pass with [`ProcessError::CallbackContractViolation`](crate::ProcessError::CallbackContractViolation).
#[derive(Debug)]
pub struct PixelContext<'a> {
    canvas: Dimensions,
    region: Region,
    x: u32,
    y: u32,
    color: Option<Rgba<u8>>,
    snapshot: &'a [u8],
    stride: usize,
}

impl<'a> PixelContext<'a> {
    pub(crate) fn new(canvas: Dimensions, region: Region, snapshot: &'a [u8], width: u32) -> Self {
        Self {
            canvas,
            region,
            x: 0,
            y: 0,
            color: None,
            snapshot,
            stride: width as usize,
        }
    }

    pub(crate) fn seek(&mut self, x: u32, y: u32, offset: usize) {
        self.x = x;
        self.y = y;
        self.color = read_rgba(self.snapshot, offset);
    }

    /// Size of the whole canvas.
    pub fn canvas(&self) -> Dimensions {
        self.canvas
    }

    /// The fitted region being processed.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Column of the current pixel, relative to the region.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Row of the current pixel, relative to the region.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Current color, or `None` if the transform removed it.
    pub fn color(&self) -> Option<Rgba<u8>> {
        self.color
    }

    /// Mutable access to the current color.
    pub fn color_mut(&mut self) -> Option<&mut Rgba<u8>> {
        self.color.as_mut()
    }

    /// Replace the current color.
    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = Some(color);
    }

    /// Remove the current color, leaving the context without one.
    pub fn take_color(&mut self) -> Option<Rgba<u8>> {
        self.color.take()
    }

    /// Original color at `(x, y)` relative to the region.
    ///
    /// Returns `None` outside the region. Never reflects changes made
    /// during the current pass.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let rows = self.snapshot.len() / 4 / self.stride.max(1);
        if x as usize >= self.stride || y as usize >= rows {
            return None;
        }
        read_rgba(self.snapshot, (y as usize * self.stride + x as usize) * 4)
    }
}

fn read_rgba(buf: &[u8], offset: usize) -> Option<Rgba<u8>> {
    buf.get(offset..offset + 4)
        .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
}
