// src/bounds.rs

//! Axis-aligned rectangle in plane coordinates.

use crate::error::{RasterError, Result};
use serde::{Deserialize, Serialize};

/// The visible region of the plane.
///
/// A usable `Bounds` has `max_x > min_x` and `max_y > min_y`. Construction does
/// not enforce this; [`Bounds::validate`] does, and every setter on the plot
/// calls it before the value can reach a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::new(-1.0, -1.0, 1.0, 1.0)
    }
}

impl Bounds {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build from `[min_x, min_y, max_x, max_y]`.
    pub const fn from_array(b: [f32; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    pub const fn to_array(&self) -> [f32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn span_x(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn span_y(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f32 {
        self.span_x() * self.span_y()
    }

    /// Open-interval containment: points on any edge are outside.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }

    /// Reject bounds with zero, negative or NaN extent on either axis.
    pub fn validate(&self) -> Result<()> {
        // Written as negated comparisons so NaN fails too.
        if !(self.max_x > self.min_x) || !(self.max_y > self.min_y) {
            return Err(RasterError::DegenerateBounds {
                min_x: self.min_x,
                min_y: self.min_y,
                max_x: self.max_x,
                max_y: self.max_y,
            });
        }
        Ok(())
    }
}
