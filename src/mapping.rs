// src/mapping.rs

//! Pixel ↔ plane coordinate mapping.
//!
//! ```text
//! planeX = minX + px * scaleX              scaleX = spanX / width
//! planeY = -(minY + py * scaleY)           scaleY = spanY / height
//!
//! px = floor((x - minX) / scaleX)
//! py = height - 1 - floor((y - minY) / scaleY)
//! ```
//!
//! Row 0 is the top of the image. The pixel → plane direction samples the
//! pixel's corner, not its center. For bounds symmetric about `y = 0` the two
//! directions are inverse to within one pixel of scale.

use crate::bounds::Bounds;
use crate::color::Argb;
use crate::error::{RasterError, Result};
use serde::{Deserialize, Serialize};

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::new(800, 600)
    }
}

impl Resolution {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Saturates for resolutions that fail [`validate`](Self::validate).
    pub const fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Pixel count, or `None` if the pixel buffer would not fit in memory
    /// addressing.
    pub fn checked_pixel_count(&self) -> Option<usize> {
        let count = self.width.checked_mul(self.height)?;
        let bytes = count.checked_mul(std::mem::size_of::<Argb>())?;
        (bytes <= isize::MAX as usize).then_some(count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.checked_pixel_count().is_none() {
            return Err(RasterError::DegenerateResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Scale factors derived from a validated `Bounds` and `Resolution`.
///
/// Rebuilt whenever either input changes; cheap to copy into every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    bounds: Bounds,
    resolution: Resolution,
    scale_x: f32,
    scale_y: f32,
}

impl CoordinateMapper {
    /// Fails with a degenerate-geometry error instead of producing
    /// infinite or NaN scale factors.
    pub fn new(bounds: Bounds, resolution: Resolution) -> Result<Self> {
        bounds.validate()?;
        resolution.validate()?;
        Ok(Self {
            bounds,
            resolution,
            scale_x: bounds.span_x() / resolution.width as f32,
            scale_y: bounds.span_y() / resolution.height as f32,
        })
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Plane units per pixel column.
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    /// Plane units per pixel row.
    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    #[inline]
    pub fn column_x(&self, px: usize) -> f32 {
        self.bounds.min_x + px as f32 * self.scale_x
    }

    #[inline]
    pub fn row_y(&self, py: usize) -> f32 {
        -(self.bounds.min_y + py as f32 * self.scale_y)
    }

    pub fn pixel_to_plane(&self, px: usize, py: usize) -> (f32, f32) {
        (self.column_x(px), self.row_y(py))
    }

    /// Unclamped inverse mapping; the result may lie outside the canvas.
    pub fn plane_to_pixel(&self, x: f32, y: f32) -> (i64, i64) {
        let px = ((x - self.bounds.min_x) / self.scale_x).floor() as i64;
        let from_bottom = ((y - self.bounds.min_y) / self.scale_y).floor() as i64;
        (px, self.resolution.height as i64 - 1 - from_bottom)
    }

    /// Canvas index a scatter point lands on, or `None` if the point is not
    /// strictly inside the bounds.
    ///
    /// A point just below `max_x` can round to `width` in `f32`; such points
    /// are clamped into the last column (likewise for rows).
    #[inline]
    pub fn plot_index(&self, x: f32, y: f32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let Resolution { width, height } = self.resolution;
        let col = (((x - self.bounds.min_x) / self.scale_x) as usize).min(width - 1);
        let from_bottom = (((y - self.bounds.min_y) / self.scale_y) as usize).min(height - 1);
        Some(col + (height - 1 - from_bottom) * width)
    }
}
