//! The read-transform-commit pixel pass.
//!
//! A pass snapshots the pixels under a fitted region, calls the transform
//! once per pixel in row-major order, buffers every resulting color, and
//! only then commits the whole region back to the surface. Nothing is
//! written until every pixel has been visited, so any failure leaves the
//! surface exactly as it was.
//!
//! # Usage
//!
//! ```
//! use pixelproc::{PixelProcessor, PassLimits, Region, RgbaCanvas, Rgba};
//!
//! let mut canvas = RgbaCanvas::filled(8, 8, Rgba::new(10, 20, 30, 255)).unwrap();
//! let processor = PixelProcessor::new().with_limits(PassLimits::none().with_max_pixels(1 << 20));
//!
//! // Invert the top-left quarter.
//! let done = processor
//!     .filter(&mut canvas, Some(Region::new(-4, -4, 8, 8)), |ctx| {
//!         if let Some(c) = ctx.color_mut() {
//!             c.r = 255 - c.r;
//!             c.g = 255 - c.g;
//!             c.b = 255 - c.b;
//!         }
//!     })
//!     .unwrap();
//!
//! assert_eq!(done, Region::new(0, 0, 4, 4));
//! assert_eq!(canvas.pixel(0, 0), Some(Rgba::new(245, 235, 225, 255)));
//! assert_eq!(canvas.pixel(4, 4), Some(Rgba::new(10, 20, 30, 255)));
//! ```

use alloc::vec;
use alloc::vec::Vec;

use enough::{Stop, Unstoppable};
use rgb::Rgba;

use crate::context::PixelContext;
use crate::error::{InvalidRegion, ProcessError};
use crate::limits::PassLimits;
use crate::region::{Dimensions, FitMode, Rect, Region, fit_with};
use crate::surface::PixelSurface;

/// A color waiting to be committed.
#[derive(Clone, Copy, Debug)]
struct PendingColor {
    offset: usize,
    color: Rgba<u8>,
}

/// Runs pixel passes with a fixed configuration.
///
/// The processor is cheap to build and holds no pixel state; it can be
/// reused for any number of passes. The installed [`Stop`] token is checked
/// before the snapshot is taken, at the start of every row, and once more
/// right before commit.
#[derive(Clone, Copy)]
pub struct PixelProcessor<'a> {
    fit_mode: FitMode,
    limits: PassLimits,
    stop: &'a dyn Stop,
}

impl Default for PixelProcessor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelProcessor<'static> {
    /// Processor with clamped fitting, no limits, and no cancellation.
    pub fn new() -> Self {
        Self {
            fit_mode: FitMode::Clamped,
            limits: PassLimits::none(),
            stop: &Unstoppable,
        }
    }
}

impl<'a> PixelProcessor<'a> {
    /// Choose how requested regions are fitted to the canvas.
    pub fn with_fit_mode(mut self, mode: FitMode) -> Self {
        self.fit_mode = mode;
        self
    }

    /// Apply pass limits.
    pub fn with_limits(mut self, limits: PassLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Install a cancellation token.
    pub fn with_stop<'b>(self, stop: &'b dyn Stop) -> PixelProcessor<'b> {
        PixelProcessor {
            fit_mode: self.fit_mode,
            limits: self.limits,
            stop,
        }
    }

    /// Fit mode in use.
    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    /// Limits in use.
    pub fn limits(&self) -> &PassLimits {
        &self.limits
    }

    /// Fit `region` to `canvas` with this processor's [`FitMode`].
    pub fn fit(&self, canvas: Dimensions, region: Region) -> Region {
        fit_with(self.fit_mode, canvas.width, canvas.height, region)
    }

    /// Run `transform` over a region of an existing surface.
    ///
    /// `region` defaults to the whole surface and is fitted before use.
    /// Returns the fitted region that was processed.
    pub fn filter<S, F>(
        &self,
        surface: &mut S,
        region: Option<Region>,
        mut transform: F,
    ) -> Result<Region, ProcessError>
    where
        S: PixelSurface + ?Sized,
        F: FnMut(&mut PixelContext<'_>),
    {
        self.try_filter(surface, region, |ctx| {
            transform(ctx);
            Ok(())
        })
    }

    /// [`filter()`](Self::filter) with a fallible transform.
    ///
    /// Errors returned by `transform` abort the pass and are returned
    /// unchanged.
    pub fn try_filter<S, F, E>(
        &self,
        surface: &mut S,
        region: Option<Region>,
        transform: F,
    ) -> Result<Region, E>
    where
        S: PixelSurface + ?Sized,
        F: FnMut(&mut PixelContext<'_>) -> Result<(), E>,
        E: From<ProcessError>,
    {
        let canvas = surface.dimensions();
        let requested = region.unwrap_or_else(|| canvas.full_region());
        let fitted = self.fit(canvas, requested);
        let rect = fitted.extent();
        let len = self.check(rect)?;

        log::debug!("filter pass over {fitted:?} on {}x{} canvas", canvas.width, canvas.height);
        let snapshot = surface.read_pixels(rect);
        if snapshot.len() != len {
            return Err(ProcessError::BufferLength {
                expected: len,
                actual: snapshot.len(),
            }
            .into());
        }
        let pixels = self.run(canvas, fitted, rect, snapshot, transform)?;
        surface.commit_pixels(&pixels, rect);
        Ok(fitted)
    }

    /// Paint onto an existing surface.
    ///
    /// Same as [`filter()`](Self::filter).
    pub fn paint<S, F>(
        &self,
        surface: &mut S,
        region: Option<Region>,
        transform: F,
    ) -> Result<Region, ProcessError>
    where
        S: PixelSurface + ?Sized,
        F: FnMut(&mut PixelContext<'_>),
    {
        self.filter(surface, region, transform)
    }

    /// [`paint()`](Self::paint) with a fallible transform.
    pub fn try_paint<S, F, E>(
        &self,
        surface: &mut S,
        region: Option<Region>,
        transform: F,
    ) -> Result<Region, E>
    where
        S: PixelSurface + ?Sized,
        F: FnMut(&mut PixelContext<'_>) -> Result<(), E>,
        E: From<ProcessError>,
    {
        self.try_filter(surface, region, transform)
    }

    /// Paint into a freshly created surface sized to `region`.
    ///
    /// There is no canvas to fit against, so `region` is used as given. It
    /// must be present, start at `(0, 0)`, and have a non-negative size;
    /// otherwise the call fails with [`ProcessError::InvalidRegion`].
    pub fn paint_new<S, F>(&self, region: Option<Region>, mut transform: F) -> Result<S, ProcessError>
    where
        S: PixelSurface,
        F: FnMut(&mut PixelContext<'_>),
    {
        self.try_paint_new(region, |ctx| {
            transform(ctx);
            Ok(())
        })
    }

    /// [`paint_new()`](Self::paint_new) with a fallible transform.
    pub fn try_paint_new<S, F, E>(&self, region: Option<Region>, transform: F) -> Result<S, E>
    where
        S: PixelSurface,
        F: FnMut(&mut PixelContext<'_>) -> Result<(), E>,
        E: From<ProcessError>,
    {
        let region = validate_new_region(region).map_err(ProcessError::from)?;
        let rect = region.extent();
        let len = self.check(rect)?;

        log::debug!("paint pass into new {}x{} canvas", rect.width, rect.height);
        let canvas = Dimensions::new(rect.width, rect.height);
        let snapshot = vec![0u8; len];
        let pixels = self.run(canvas, region, rect, snapshot, transform)?;
        let mut surface = S::create(rect.width, rect.height)?;
        surface.commit_pixels(&pixels, rect);
        Ok(surface)
    }

    /// Pre-pass checks. Returns the snapshot length in bytes.
    fn check(&self, rect: Rect) -> Result<usize, ProcessError> {
        self.limits.check_dimensions(rect.width, rect.height)?;
        let len = rect.require_byte_len()?;
        self.stop.check().map_err(ProcessError::Cancelled)?;
        Ok(len)
    }

    /// Visit every pixel of `snapshot`, then apply the results to it.
    fn run<F, E>(
        &self,
        canvas: Dimensions,
        region: Region,
        rect: Rect,
        mut snapshot: Vec<u8>,
        mut transform: F,
    ) -> Result<Vec<u8>, E>
    where
        F: FnMut(&mut PixelContext<'_>) -> Result<(), E>,
        E: From<ProcessError>,
    {
        let mut pending = Vec::with_capacity(snapshot.len() / 4);
        {
            let mut ctx = PixelContext::new(canvas, region, &snapshot, rect.width);
            for y in 0..rect.height {
                self.stop.check().map_err(ProcessError::Cancelled)?;
                for x in 0..rect.width {
                    let offset = (y as usize * rect.width as usize + x as usize) * 4;
                    ctx.seek(x, y, offset);
                    transform(&mut ctx)?;
                    let Some(color) = ctx.color() else {
                        log::warn!("transform discarded the color at ({x}, {y}), aborting pass");
                        return Err(ProcessError::CallbackContractViolation { x, y }.into());
                    };
                    pending.push(PendingColor { offset, color });
                }
            }
        }
        self.stop.check().map_err(ProcessError::Cancelled)?;

        log::debug!("committing {} pixels", pending.len());
        for PendingColor { offset, color } in pending {
            snapshot[offset..offset + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Ok(snapshot)
    }
}

impl core::fmt::Debug for PixelProcessor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelProcessor")
            .field("fit_mode", &self.fit_mode)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

fn validate_new_region(region: Option<Region>) -> Result<Region, InvalidRegion> {
    let region = region.ok_or(InvalidRegion::Missing)?;
    if region.x != 0 {
        return Err(InvalidRegion::NonZeroX(region.x));
    }
    if region.y != 0 {
        return Err(InvalidRegion::NonZeroY(region.y));
    }
    if region.width < 0 || region.height < 0 {
        return Err(InvalidRegion::NegativeSize {
            width: region.width,
            height: region.height,
        });
    }
    Ok(region)
}

/// Run a filter pass with the default [`PixelProcessor`].
pub fn filter<S, F>(surface: &mut S, region: Option<Region>, transform: F) -> Result<Region, ProcessError>
where
    S: PixelSurface + ?Sized,
    F: FnMut(&mut PixelContext<'_>),
{
    PixelProcessor::new().filter(surface, region, transform)
}

/// Paint onto an existing surface with the default [`PixelProcessor`].
pub fn paint<S, F>(surface: &mut S, region: Option<Region>, transform: F) -> Result<Region, ProcessError>
where
    S: PixelSurface + ?Sized,
    F: FnMut(&mut PixelContext<'_>),
{
    PixelProcessor::new().paint(surface, region, transform)
}

/// Paint into a new surface with the default [`PixelProcessor`].
pub fn paint_new<S, F>(region: Option<Region>, transform: F) -> Result<S, ProcessError>
where
    S: PixelSurface,
    F: FnMut(&mut PixelContext<'_>),
{
    PixelProcessor::new().paint_new(region, transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RgbaCanvas;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicU32, Ordering};
    use enough::StopReason;

    const RED: Rgba<u8> = Rgba {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    fn gradient(width: u32, height: u32) -> RgbaCanvas {
        let mut canvas = RgbaCanvas::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                canvas.set_pixel(x, y, Rgba::new(x as u8 * 10, y as u8 * 10, 7, 200));
            }
        }
        canvas
    }

    /// Cancels after `check()` has been called `budget` times.
    struct CancelAfter {
        budget: AtomicU32,
    }

    impl Stop for CancelAfter {
        fn check(&self) -> Result<(), StopReason> {
            let left = self.budget.load(Ordering::Relaxed);
            if left == 0 {
                return Err(StopReason::Cancelled);
            }
            self.budget.store(left - 1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[derive(Debug, PartialEq)]
    enum MyError {
        Boom(u32, u32),
        Process,
    }

    impl From<ProcessError> for MyError {
        fn from(_: ProcessError) -> Self {
            MyError::Process
        }
    }

    #[test]
    fn identity_is_bit_exact() {
        let mut canvas = gradient(6, 5);
        let before = canvas.clone();
        let done = filter(&mut canvas, None, |_| {}).unwrap();
        assert_eq!(done, Region::sized(6, 5));
        assert_eq!(canvas, before);
    }

    #[test]
    fn solid_fill_stays_inside_region() {
        let mut canvas = gradient(8, 8);
        let before = canvas.clone();
        filter(&mut canvas, Some(Region::new(2, 3, 4, 2)), |ctx| ctx.set_color(RED)).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (3..5).contains(&y);
                let expected = if inside { Some(RED) } else { before.pixel(x, y) };
                assert_eq!(canvas.pixel(x, y), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn neighbor_reads_see_original_values() {
        let mut canvas = gradient(8, 8);
        let original = canvas.pixel(0, 0);
        let mut seen = None;
        filter(&mut canvas, None, |ctx| {
            if (ctx.x(), ctx.y()) == (0, 0) {
                ctx.set_color(RED);
            }
            if (ctx.x(), ctx.y()) == (5, 5) {
                seen = ctx.pixel(0, 0);
            }
        })
        .unwrap();

        assert_eq!(seen, original);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
    }

    #[test]
    fn box_blur_is_order_independent() {
        // Horizontal 3-tap average; pixels on the edge keep their value.
        let mut canvas = RgbaCanvas::new(5, 1).unwrap();
        for (x, r) in [0u8, 90, 0, 90, 0].into_iter().enumerate() {
            canvas.set_pixel(x as u32, 0, Rgba::new(r, 0, 0, 255));
        }
        filter(&mut canvas, None, |ctx| {
            let (x, y) = (ctx.x(), ctx.y());
            if x == 0 || x == 4 {
                return;
            }
            let sum: u32 = [x - 1, x, x + 1]
                .iter()
                .filter_map(|&nx| ctx.pixel(nx, y))
                .map(|c| u32::from(c.r))
                .sum();
            if let Some(c) = ctx.color_mut() {
                c.r = (sum / 3) as u8;
            }
        })
        .unwrap();

        let reds: Vec<u8> = canvas.pixels().iter().map(|c| c.r).collect();
        assert_eq!(reds, [0, 30, 60, 30, 0]);
    }

    #[test]
    fn visits_row_major_with_region_context() {
        let mut canvas = RgbaCanvas::new(10, 10).unwrap();
        let mut visits = Vec::new();
        filter(&mut canvas, Some(Region::new(-2, 3, 5, 2)), |ctx| {
            assert_eq!(ctx.canvas(), Dimensions::new(10, 10));
            assert_eq!(ctx.region(), Region::new(0, 3, 3, 2));
            visits.push((ctx.x(), ctx.y()));
        })
        .unwrap();
        assert_eq!(visits, [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn empty_region_visits_nothing() {
        let mut canvas = gradient(4, 4);
        let before = canvas.clone();
        let mut calls = 0;
        let done = filter(&mut canvas, Some(Region::new(10, 10, 3, 3)), |_| calls += 1).unwrap();
        assert!(done.is_empty());
        assert_eq!(calls, 0);
        assert_eq!(canvas, before);
    }

    #[test]
    fn discarded_color_aborts_without_commit() {
        let mut canvas = gradient(4, 4);
        let before = canvas.clone();
        let err = filter(&mut canvas, None, |ctx| {
            ctx.set_color(RED);
            if (ctx.x(), ctx.y()) == (2, 1) {
                ctx.take_color();
            }
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ProcessError::CallbackContractViolation { x: 2, y: 1 }
        ));
        assert_eq!(canvas, before);
    }

    #[test]
    fn transform_error_propagates_unchanged() {
        let mut canvas = gradient(4, 4);
        let before = canvas.clone();
        let err = PixelProcessor::new()
            .try_filter(&mut canvas, None, |ctx| {
                ctx.set_color(RED);
                if ctx.y() == 2 {
                    return Err(MyError::Boom(ctx.x(), ctx.y()));
                }
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err, MyError::Boom(0, 2));
        assert_eq!(canvas, before);
    }

    #[test]
    fn pipeline_errors_convert_into_caller_error() {
        let mut canvas = gradient(2, 2);
        let err = PixelProcessor::new()
            .try_filter(&mut canvas, None, |ctx| {
                ctx.take_color();
                Ok::<(), MyError>(())
            })
            .unwrap_err();
        assert_eq!(err, MyError::Process);
    }

    #[test]
    fn paint_new_rejects_offset_origin() {
        let err = paint_new::<RgbaCanvas, _>(Some(Region::new(1, 0, 4, 4)), |_| {}).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidRegion(InvalidRegion::NonZeroX(1))
        ));

        let err = paint_new::<RgbaCanvas, _>(Some(Region::new(0, -1, 4, 4)), |_| {}).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidRegion(InvalidRegion::NonZeroY(-1))
        ));
    }

    #[test]
    fn paint_new_requires_region() {
        let err = paint_new::<RgbaCanvas, _>(None, |_| {}).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidRegion(InvalidRegion::Missing)
        ));

        let err = paint_new::<RgbaCanvas, _>(Some(Region::sized(-1, 3)), |_| {}).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidRegion(InvalidRegion::NegativeSize { width: -1, height: 3 })
        ));
    }

    #[test]
    fn paint_new_starts_transparent() {
        let mut first = None;
        let canvas: RgbaCanvas = paint_new(Some(Region::sized(3, 2)), |ctx| {
            if first.is_none() {
                first = ctx.color();
            }
            assert_eq!(ctx.canvas(), Dimensions::new(3, 2));
            let shade = (ctx.x() * 50 + ctx.y()) as u8;
            ctx.set_color(Rgba::new(shade, 0, 0, 255));
        })
        .unwrap();

        assert_eq!(first, Some(Rgba::new(0, 0, 0, 0)));
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 2);
        assert_eq!(canvas.pixel(2, 1), Some(Rgba::new(101, 0, 0, 255)));
    }

    #[test]
    fn paint_on_existing_defaults_to_whole_canvas() {
        let mut canvas = gradient(3, 3);
        let done = paint(&mut canvas, None, |ctx| ctx.set_color(RED)).unwrap();
        assert_eq!(done, Region::sized(3, 3));
        assert!(canvas.pixels().iter().all(|&c| c == RED));
    }

    #[test]
    fn legacy_fit_overhangs_bottom_edge() {
        let mut canvas = gradient(4, 4);
        let mut calls = 0;
        let done = PixelProcessor::new()
            .with_fit_mode(FitMode::Legacy)
            .filter(&mut canvas, Some(Region::new(0, 2, 4, 4)), |ctx| {
                calls += 1;
                if ctx.y() >= 2 {
                    assert_eq!(ctx.color(), Some(Rgba::new(0, 0, 0, 0)));
                }
                ctx.set_color(RED);
            })
            .unwrap();

        assert_eq!(done, Region::new(0, 2, 4, 4));
        assert_eq!(calls, 16);
        assert_eq!(canvas.pixel(0, 3), Some(RED));
        assert_eq!(canvas.pixel(0, 1), gradient(4, 4).pixel(0, 1));
    }

    #[test]
    fn limits_reject_before_reading() {
        let mut canvas = gradient(4, 4);
        let before = canvas.clone();
        let err = PixelProcessor::new()
            .with_limits(PassLimits::none().with_max_pixels(8))
            .filter(&mut canvas, None, |ctx| ctx.set_color(RED))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Limit(_)));
        assert_eq!(canvas, before);

        // A smaller region passes the same limits.
        PixelProcessor::new()
            .with_limits(PassLimits::none().with_max_pixels(8))
            .filter(&mut canvas, Some(Region::sized(4, 2)), |ctx| ctx.set_color(RED))
            .unwrap();
        assert_eq!(canvas.pixel(3, 1), Some(RED));
    }

    #[test]
    fn cancellation_mid_pass_leaves_canvas_untouched() {
        let mut canvas = gradient(4, 4);
        let before = canvas.clone();
        // One check before the pass, then one per row: cancel on the third row.
        let stop = CancelAfter {
            budget: AtomicU32::new(3),
        };
        let mut calls = 0;
        let err = PixelProcessor::new()
            .with_stop(&stop)
            .filter(&mut canvas, None, |ctx| {
                calls += 1;
                ctx.set_color(RED);
            })
            .unwrap_err();

        assert!(matches!(err, ProcessError::Cancelled(StopReason::Cancelled)));
        assert_eq!(calls, 8);
        assert_eq!(canvas, before);
    }

    #[test]
    fn dyn_surface_is_accepted() {
        let mut canvas = gradient(2, 2);
        let surface: &mut dyn PixelSurface = &mut canvas;
        filter(surface, None, |ctx| ctx.set_color(RED)).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(RED));
    }

    #[test]
    fn short_snapshot_is_rejected() {
        struct Truncating(RgbaCanvas);

        impl PixelSurface for Truncating {
            fn dimensions(&self) -> Dimensions {
                self.0.dimensions()
            }
            fn read_pixels(&self, rect: Rect) -> Vec<u8> {
                let mut bytes = self.0.read_pixels(rect);
                bytes.pop();
                bytes
            }
            fn commit_pixels(&mut self, pixels: &[u8], rect: Rect) {
                self.0.commit_pixels(pixels, rect)
            }
            fn create(width: u32, height: u32) -> Result<Self, ProcessError> {
                RgbaCanvas::new(width, height).map(Truncating)
            }
        }

        let mut surface = Truncating(gradient(2, 2));
        let err = filter(&mut surface, None, |_| {}).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::BufferLength {
                expected: 16,
                actual: 15
            }
        ));
    }

    /// Reports a huge size but must never be read, written, or allocated.
    #[derive(Debug)]
    struct Unreadable {
        dims: Dimensions,
    }

    impl PixelSurface for Unreadable {
        fn dimensions(&self) -> Dimensions {
            self.dims
        }
        fn read_pixels(&self, _rect: Rect) -> Vec<u8> {
            panic!("pixels read from an oversized surface");
        }
        fn commit_pixels(&mut self, _pixels: &[u8], _rect: Rect) {
            panic!("pixels committed to an oversized surface");
        }
        fn create(_width: u32, _height: u32) -> Result<Self, ProcessError> {
            panic!("oversized surface created");
        }
    }

    #[test]
    fn paint_new_oversized_region_is_an_error() {
        let mut calls = 0;
        let err = paint_new::<RgbaCanvas, _>(Some(Region::sized(i32::MAX, i32::MAX)), |_| calls += 1)
            .unwrap_err();
        assert!(matches!(
            err,
            ProcessError::InvalidDimensions {
                width: 0x7fff_ffff,
                height: 0x7fff_ffff
            }
        ));
        assert_eq!(calls, 0);

        let err = PixelProcessor::new()
            .try_paint_new::<Unreadable, _, MyError>(Some(Region::sized(i32::MAX, i32::MAX)), |_| {
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, MyError::Process);
    }

    #[test]
    fn legacy_filter_with_unbounded_height_is_an_error() {
        let mut surface = Unreadable {
            dims: Dimensions::new(u32::MAX, 1),
        };
        let mut calls = 0;
        let err = PixelProcessor::new()
            .with_fit_mode(FitMode::Legacy)
            .filter(&mut surface, Some(Region::sized(i32::MAX, i32::MAX)), |_| calls += 1)
            .unwrap_err();
        assert!(matches!(err, ProcessError::InvalidDimensions { .. }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn paint_new_respects_limits() {
        static CREATED: AtomicU32 = AtomicU32::new(0);

        #[derive(Debug)]
        struct Counted(RgbaCanvas);

        impl PixelSurface for Counted {
            fn dimensions(&self) -> Dimensions {
                self.0.dimensions()
            }
            fn read_pixels(&self, rect: Rect) -> Vec<u8> {
                self.0.read_pixels(rect)
            }
            fn commit_pixels(&mut self, pixels: &[u8], rect: Rect) {
                self.0.commit_pixels(pixels, rect)
            }
            fn create(width: u32, height: u32) -> Result<Self, ProcessError> {
                CREATED.fetch_add(1, Ordering::Relaxed);
                RgbaCanvas::new(width, height).map(Counted)
            }
        }

        let processor = PixelProcessor::new().with_limits(PassLimits::none().with_max_pixels(8));
        let mut calls = 0;
        let err = processor
            .paint_new::<Counted, _>(Some(Region::sized(4, 4)), |_| calls += 1)
            .unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Limit(crate::LimitExceeded::Pixels { actual: 16, max: 8 })
        ));
        assert_eq!(calls, 0);
        assert_eq!(CREATED.load(Ordering::Relaxed), 0);

        let err = processor
            .with_limits(PassLimits::none().with_max_width(3))
            .try_paint_new::<Counted, _, MyError>(Some(Region::sized(4, 1)), |_| Ok(()))
            .unwrap_err();
        assert_eq!(err, MyError::Process);
        assert_eq!(CREATED.load(Ordering::Relaxed), 0);

        let painted = processor
            .paint_new::<Counted, _>(Some(Region::sized(4, 2)), |ctx| ctx.set_color(RED))
            .unwrap();
        assert_eq!(CREATED.load(Ordering::Relaxed), 1);
        assert_eq!(painted.0.pixel(3, 1), Some(RED));
    }
}
