// src/bounding_box.rs

//! Smallest pixel rectangle that holds every drawn pixel.
//!
//! "Drawn" means `pixel != back_color`, compared as packed integers. Four
//! independent scans run concurrently, one per edge, each reading the
//! finished canvas and stopping at the first row or column with a drawn
//! pixel. A canvas with nothing drawn yields the full-canvas box.

use crate::bounds::Bounds;
use crate::canvas::Canvas;
use crate::color::Argb;
use crate::mapping::Resolution;
use log::warn;
use std::panic;
use std::thread;

/// Inclusive pixel rectangle `[x0, x1] × [y0, y1]`, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelBox {
    pub const fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box from two arbitrary corners.
    pub fn from_corners(a: (usize, usize), b: (usize, usize)) -> Self {
        Self::new(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    /// Box covering the whole canvas.
    pub const fn full(resolution: Resolution) -> Self {
        Self::new(0, 0, resolution.width - 1, resolution.height - 1)
    }

    pub const fn to_array(&self) -> [usize; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Corners in order and every coordinate inside the canvas.
    pub fn normalized(&self, resolution: Resolution) -> Self {
        let max_x = resolution.width.saturating_sub(1);
        let max_y = resolution.height.saturating_sub(1);
        Self::from_corners(
            (self.x0.min(max_x), self.y0.min(max_y)),
            (self.x1.min(max_x), self.y1.min(max_y)),
        )
    }

    /// Plane bounds covered by this box, given the bounds the canvas was
    /// rendered with.
    ///
    /// Each edge moves inward by the fraction of the resolution the box edge
    /// sits in from the canvas edge, so the full box maps back to `bounds`
    /// and a box around one pixel maps to exactly that pixel's cell. The box
    /// is [`normalized`](Self::normalized) first.
    pub fn to_bounds(&self, bounds: &Bounds, resolution: Resolution) -> Bounds {
        let bx = self.normalized(resolution);
        let w = resolution.width as f32;
        let h = resolution.height as f32;
        let (sx, sy) = (bounds.span_x(), bounds.span_y());
        let right_margin = resolution.width.saturating_sub(1 + bx.x1) as f32;
        let bottom_margin = resolution.height.saturating_sub(1 + bx.y1) as f32;
        Bounds::new(
            bounds.min_x + bx.x0 as f32 / w * sx,
            bounds.min_y + bottom_margin / h * sy,
            bounds.max_x - right_margin / w * sx,
            bounds.max_y - bx.y0 as f32 / h * sy,
        )
    }
}

/// Which side of the box a scan locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::MinX, Edge::MinY, Edge::MaxX, Edge::MaxY];
}

fn column_drawn(canvas: &Canvas, x: usize, back: Argb) -> bool {
    let w = canvas.width();
    // Bottom to top; only presence matters.
    canvas.pixels()[x..]
        .iter()
        .step_by(w)
        .rev()
        .any(|&p| p != back)
}

fn row_drawn(canvas: &Canvas, y: usize, back: Argb) -> bool {
    canvas.row(y).iter().any(|&p| p != back)
}

/// Locate one edge of the drawn region.
///
/// Falls back to the canvas edge (`0` for minima, `width - 1` /
/// `height - 1` for maxima) when nothing is drawn.
pub fn scan_edge(canvas: &Canvas, back: Argb, edge: Edge) -> usize {
    let (w, h) = (canvas.width(), canvas.height());
    match edge {
        Edge::MinX => (0..w).find(|&x| column_drawn(canvas, x, back)).unwrap_or(0),
        Edge::MaxX => (0..w)
            .rev()
            .find(|&x| column_drawn(canvas, x, back))
            .unwrap_or(w - 1),
        Edge::MinY => (0..h).find(|&y| row_drawn(canvas, y, back)).unwrap_or(0),
        Edge::MaxY => (0..h)
            .rev()
            .find(|&y| row_drawn(canvas, y, back))
            .unwrap_or(h - 1),
    }
}

/// Run the four edge scans concurrently and assemble the box.
pub fn find_pixel_box(canvas: &Canvas, back: Argb) -> PixelBox {
    let [x0, y0, x1, y1] = thread::scope(|s| {
        let handles = Edge::ALL.map(|edge| {
            let spawned = thread::Builder::new()
                .name(format!("bbox-{edge:?}"))
                .spawn_scoped(s, move || scan_edge(canvas, back, edge));
            (edge, spawned)
        });
        handles.map(|(edge, spawned)| match spawned {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload)),
            Err(e) => {
                warn!("bounding-box scan {edge:?} running inline: {e}");
                scan_edge(canvas, back, edge)
            }
        })
    });
    PixelBox::new(x0, y0, x1, y1)
}

/// Whether replacing `current` by `tightened` shrinks the area by more than
/// `threshold` (a fraction in `[0, 1)`).
pub fn shrinks_by_more_than(current: &Bounds, tightened: &Bounds, threshold: f64) -> bool {
    let ratio = f64::from(tightened.area()) / f64::from(current.area());
    1.0 - ratio > threshold
}
