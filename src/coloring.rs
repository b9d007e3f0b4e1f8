// src/coloring.rs

//! Caller-supplied per-point coloring.

use crate::color::Argb;
use std::fmt;
use std::sync::Arc;

/// Signature of a coloring function: plane `(x, y)` to packed color.
pub type ColorFn = dyn Fn(f32, f32) -> Argb + Send + Sync;

/// A coloring function paired with the background color.
///
/// The function is called concurrently from every render worker. It must be
/// pure with respect to shared state: no interior mutability reachable from
/// more than one call. The type system only enforces `Send + Sync`; the
/// purity requirement is part of the contract.
///
/// Cloning is cheap and shares the function.
#[derive(Clone)]
pub struct ColoringRule {
    function: Arc<ColorFn>,
    back_color: Argb,
}

impl ColoringRule {
    pub fn new<F>(back_color: Argb, function: F) -> Self
    where
        F: Fn(f32, f32) -> Argb + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
            back_color,
        }
    }

    /// Every point gets `color`.
    pub fn constant(color: Argb, back_color: Argb) -> Self {
        Self::new(back_color, move |_, _| color)
    }

    #[inline]
    pub fn color_at(&self, x: f32, y: f32) -> Argb {
        (self.function)(x, y)
    }

    pub fn back_color(&self) -> Argb {
        self.back_color
    }

    pub fn set_back_color(&mut self, back_color: Argb) -> &mut Self {
        self.back_color = back_color;
        self
    }
}

impl Default for ColoringRule {
    /// White background; every point is transparent black.
    fn default() -> Self {
        Self::constant(Argb::TRANSPARENT, Argb::WHITE)
    }
}

impl fmt::Debug for ColoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColoringRule")
            .field("back_color", &self.back_color)
            .finish_non_exhaustive()
    }
}
