// src/plot.rs

//! `RasterPlot`: owns the canvas, bounds, coloring rule and point backlog,
//! and sequences render passes over them.

use crate::bounding_box::{self, PixelBox};
use crate::bounds::Bounds;
use crate::cancellation::CancelToken;
use crate::canvas::Canvas;
use crate::color::{Argb, PixelFormat};
use crate::coloring::ColoringRule;
use crate::config::{default_thread_count, PlotConfig};
use crate::error::{RasterError, Result};
use crate::mapping::{CoordinateMapper, Resolution};
use crate::rasterizer::{render_pass, PassInputs, PassReport, RenderMode};
use log::{debug, info, warn};
use std::path::Path;

/// A plot plane: a pixel canvas over a rectangle of the plane, plus the data
/// and coloring used to fill it.
///
/// Render passes take `&mut self`, so bounds, rule and resolution cannot
/// change while workers are running. Worker threads live only for the
/// duration of one pass; dropping the plot leaves nothing running.
#[derive(Debug)]
pub struct RasterPlot {
    canvas: Canvas,
    mapper: CoordinateMapper,
    rule: ColoringRule,
    chunks: Vec<Vec<f32>>,
    max_threads: usize,
    cancel: CancelToken,
}

impl RasterPlot {
    /// Default bounds `(-1, -1, 1, 1)` and the default coloring rule.
    pub fn new(resolution: Resolution) -> Result<Self> {
        Self::with_rule(resolution, Bounds::default(), ColoringRule::default())
    }

    pub fn with_rule(resolution: Resolution, bounds: Bounds, rule: ColoringRule) -> Result<Self> {
        Self::build(
            resolution,
            bounds,
            rule,
            default_thread_count(),
            PixelFormat::default(),
        )
    }

    /// Validates the whole config before allocating the canvas.
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        config.validate()?;
        Self::build(
            config.resolution,
            config.bounds,
            ColoringRule::constant(Argb::TRANSPARENT, config.back_color),
            config.effective_max_threads(),
            config.pixel_format,
        )
    }

    fn build(
        resolution: Resolution,
        bounds: Bounds,
        rule: ColoringRule,
        max_threads: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        if max_threads == 0 {
            return Err(RasterError::InvalidThreadCount);
        }
        let mapper = CoordinateMapper::new(bounds, resolution)?;
        let canvas = Canvas::new(resolution, format, rule.back_color())?;
        debug!("RasterPlot {}x{} over {:?}", resolution.width, resolution.height, bounds);
        Ok(Self {
            canvas,
            mapper,
            rule,
            chunks: Vec::new(),
            max_threads,
            cancel: CancelToken::new(),
        })
    }

    // --- Point data ---

    /// Queue a chunk of interleaved `x, y` coordinates.
    ///
    /// Odd-length chunks are dropped with a warning and `false` is returned.
    pub fn put_chunk(&mut self, points: impl Into<Vec<f32>>) -> bool {
        match self.try_put_chunk(points) {
            Ok(()) => true,
            Err(e) => {
                warn!("dropping point chunk: {e}");
                false
            }
        }
    }

    /// Like [`put_chunk`](Self::put_chunk), but reports odd-length chunks.
    pub fn try_put_chunk(&mut self, points: impl Into<Vec<f32>>) -> Result<()> {
        let points = points.into();
        if points.len() % 2 != 0 {
            return Err(RasterError::OddChunk { len: points.len() });
        }
        self.chunks.push(points);
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Vec<f32>] {
        &self.chunks
    }

    /// Empty the backlog. Rendering never does this on its own.
    pub fn clear_data(&mut self) -> &mut Self {
        self.chunks.clear();
        self
    }

    // --- Render passes ---

    /// Fill every pixel from the coloring rule.
    pub fn render_solid(&mut self) -> Result<PassReport> {
        self.render(RenderMode::Solid)
    }

    /// Plot every queued chunk.
    pub fn render_chunks(&mut self) -> Result<PassReport> {
        self.render(RenderMode::Chunks)
    }

    /// Reset the canvas to the rule's back color.
    pub fn clear_plot(&mut self) -> Result<PassReport> {
        self.render(RenderMode::Clear)
    }

    fn render(&mut self, mode: RenderMode) -> Result<PassReport> {
        let inputs = PassInputs {
            mapper: &self.mapper,
            rule: &self.rule,
            chunks: &self.chunks,
            max_threads: self.max_threads,
            cancel: &self.cancel,
        };
        render_pass(mode, &mut self.canvas, inputs)
    }

    /// Handle for cancelling passes from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    // --- Configuration ---

    pub fn coloring_rule(&self) -> &ColoringRule {
        &self.rule
    }

    pub fn set_coloring_rule(&mut self, rule: ColoringRule) -> &mut Self {
        self.rule = rule;
        self
    }

    pub fn bounds(&self) -> &Bounds {
        self.mapper.bounds()
    }

    /// Fails on degenerate bounds, leaving the current bounds in place.
    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<()> {
        self.mapper = CoordinateMapper::new(bounds, self.canvas.resolution())?;
        Ok(())
    }

    pub fn resolution(&self) -> Resolution {
        self.canvas.resolution()
    }

    /// Reallocate the canvas, filled with the back color.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        let mapper = CoordinateMapper::new(*self.bounds(), resolution)?;
        self.canvas = Canvas::new(resolution, self.canvas.format(), self.rule.back_color())?;
        self.mapper = mapper;
        Ok(())
    }

    pub fn max_thread_count(&self) -> usize {
        self.max_threads
    }

    pub fn set_max_thread_count(&mut self, max_threads: usize) -> Result<()> {
        if max_threads == 0 {
            return Err(RasterError::InvalidThreadCount);
        }
        self.max_threads = max_threads;
        Ok(())
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.canvas.format()
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) -> &mut Self {
        self.canvas.set_format(format);
        self
    }

    // --- Canvas access ---

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn plane_to_pixel(&self, x: f32, y: f32) -> (i64, i64) {
        self.mapper.plane_to_pixel(x, y)
    }

    pub fn pixel_to_plane(&self, px: usize, py: usize) -> (f32, f32) {
        self.mapper.pixel_to_plane(px, py)
    }

    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.canvas.save_ppm(path)
    }

    // --- Bounding box ---

    pub fn compute_pixel_bounding_box(&self) -> PixelBox {
        self.compute_pixel_bounding_box_with(self.rule.back_color())
    }

    pub fn compute_pixel_bounding_box_with(&self, back: Argb) -> PixelBox {
        bounding_box::find_pixel_box(&self.canvas, back)
    }

    /// Plane bounds of the drawn region.
    pub fn compute_bounding_box(&self) -> Bounds {
        self.compute_bounding_box_with(self.rule.back_color())
    }

    pub fn compute_bounding_box_with(&self, back: Argb) -> Bounds {
        self.compute_pixel_bounding_box_with(back)
            .to_bounds(self.bounds(), self.resolution())
    }

    /// Outline the drawn region in `box_color` and return its plane bounds.
    pub fn compute_and_draw_bounding_box(&mut self, box_color: Argb) -> Bounds {
        let bx = self.compute_pixel_bounding_box();
        self.canvas.draw_box(bx, box_color);
        bx.to_bounds(self.bounds(), self.resolution())
    }

    /// Tighten the bounds to the drawn region if that shrinks the area by
    /// more than `threshold`. Returns whether the bounds changed.
    pub fn apply_bounding_box(&mut self, threshold: f64) -> Result<bool> {
        self.apply_bounding_box_with(threshold, self.rule.back_color())
    }

    pub fn apply_bounding_box_with(&mut self, threshold: f64, back: Argb) -> Result<bool> {
        let tightened = self.compute_bounding_box_with(back);
        if !bounding_box::shrinks_by_more_than(self.bounds(), &tightened, threshold) {
            return Ok(false);
        }
        info!("tightening bounds {:?} -> {:?}", self.bounds(), tightened);
        self.set_bounds(tightened)?;
        Ok(true)
    }

    /// Set the bounds to the plane region under a pixel rectangle. Corners may
    /// come in any order; the box is clamped to the canvas.
    pub fn zoom_to_pixel_box(&mut self, bx: PixelBox) -> Result<()> {
        let bounds = bx.to_bounds(self.bounds(), self.resolution());
        self.set_bounds(bounds)
    }
}
