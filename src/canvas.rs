//! In-memory RGBA8 surface.
//!
//! [`RgbaCanvas`] is the reference [`PixelSurface`]: an owned, tightly
//! packed `width × height` grid of [`Rgba<u8>`]. It follows browser canvas
//! semantics at its edges: reads outside the canvas yield transparent
//! black and writes outside it are dropped.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imgref::{ImgRef, ImgVec};
use rgb::{ComponentBytes, Rgba};

use crate::error::ProcessError;
use crate::region::{Dimensions, Rect};
use crate::surface::PixelSurface;

const TRANSPARENT: Rgba<u8> = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Owned RGBA8 pixel surface.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaCanvas {
    pixels: Vec<Rgba<u8>>,
    width: u32,
    height: u32,
}

impl RgbaCanvas {
    /// Create a transparent black canvas.
    ///
    /// Fails with [`ProcessError::InvalidDimensions`] if the pixel buffer
    /// size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, ProcessError> {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create a canvas where every pixel is `color`.
    ///
    /// Fails with [`ProcessError::InvalidDimensions`] if the pixel buffer
    /// size overflows.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Result<Self, ProcessError> {
        let len = Rect::new(0, 0, width, height).require_byte_len()? / 4;
        Ok(Self {
            pixels: vec![color; len],
            width,
            height,
        })
    }

    /// Wrap raw RGBA8 bytes.
    ///
    /// Fails with [`ProcessError::InvalidDimensions`] if the size overflows,
    /// and with [`ProcessError::BufferLength`] unless
    /// `bytes.len() == width * height * 4`.
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ProcessError> {
        let expected = Rect::new(0, 0, width, height).require_byte_len()?;
        if bytes.len() != expected {
            return Err(ProcessError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Copy the pixels of an [`ImgRef`], dropping any stride padding.
    pub fn from_img(img: ImgRef<'_, Rgba<u8>>) -> Self {
        Self {
            pixels: img.pixels().collect(),
            width: img.width() as u32,
            height: img.height() as u32,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgba<u8>] {
        &self.pixels
    }

    /// All pixels as raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// Borrow the canvas as an [`ImgRef`].
    pub fn as_img(&self) -> ImgRef<'_, Rgba<u8>> {
        ImgRef::new(self.pixels.as_slice(), self.width as usize, self.height as usize)
    }

    /// Convert into an owned [`ImgVec`].
    pub fn into_img(self) -> ImgVec<Rgba<u8>> {
        ImgVec::new(self.pixels, self.width as usize, self.height as usize)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

impl PixelSurface for RgbaCanvas {
    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    fn read_pixels(&self, rect: Rect) -> Vec<u8> {
        let mut out = Vec::with_capacity(rect.byte_len().unwrap_or_default());
        for dy in 0..rect.height {
            for dx in 0..rect.width {
                let color = rect
                    .x
                    .checked_add(dx)
                    .zip(rect.y.checked_add(dy))
                    .and_then(|(x, y)| self.pixel(x, y))
                    .unwrap_or(TRANSPARENT);
                out.extend_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        }
        out
    }

    fn commit_pixels(&mut self, pixels: &[u8], rect: Rect) {
        let row_bytes = rect.width as usize * 4;
        if row_bytes == 0 {
            return;
        }
        for (dy, row) in pixels.chunks_exact(row_bytes).enumerate() {
            let Some(y) = u32::try_from(dy).ok().and_then(|dy| rect.y.checked_add(dy)) else {
                break;
            };
            if y >= self.height {
                break;
            }
            for (dx, p) in row.chunks_exact(4).enumerate() {
                let Some(x) = u32::try_from(dx).ok().and_then(|dx| rect.x.checked_add(dx)) else {
                    break;
                };
                if x >= self.width {
                    break;
                }
                self.set_pixel(x, y, Rgba::new(p[0], p[1], p[2], p[3]));
            }
        }
    }

    fn create(width: u32, height: u32) -> Result<Self, ProcessError> {
        Self::new(width, height)
    }
}

impl From<ImgVec<Rgba<u8>>> for RgbaCanvas {
    fn from(img: ImgVec<Rgba<u8>>) -> Self {
        Self::from_img(img.as_ref())
    }
}

impl fmt::Debug for RgbaCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RgbaCanvas({}x{})", self.width, self.height)
    }
}
