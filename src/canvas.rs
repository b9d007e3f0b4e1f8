// src/canvas.rs

//! The pixel buffer that render passes write into.
//!
//! Row-major, one packed [`Argb`] per pixel, row 0 at the top:
//!
//! ```text
//! index(x, y) = x + y * width
//! ```

use crate::bounding_box::PixelBox;
use crate::color::{Argb, PixelFormat};
use crate::error::Result;
use crate::mapping::Resolution;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::AtomicU32;

#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    resolution: Resolution,
    format: PixelFormat,
    pixels: Vec<Argb>,
}

impl Canvas {
    /// Allocate a canvas with every pixel set to `fill`.
    pub fn new(resolution: Resolution, format: PixelFormat, fill: Argb) -> Result<Self> {
        resolution.validate()?;
        Ok(Self {
            resolution,
            format,
            pixels: vec![fill; resolution.pixel_count()],
        })
    }

    pub fn width(&self) -> usize {
        self.resolution.width
    }

    pub fn height(&self) -> usize {
        self.resolution.height
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn set_format(&mut self, format: PixelFormat) {
        self.format = format;
    }

    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Argb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels[x + y * self.width()])
    }

    pub fn row(&self, y: usize) -> &[Argb] {
        let w = self.width();
        &self.pixels[y * w..(y + 1) * w]
    }

    pub fn fill(&mut self, color: Argb) {
        self.pixels.fill(color);
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Argb] {
        &mut self.pixels
    }

    /// View the buffer as atomics for passes whose writes are not
    /// partitioned by row.
    pub(crate) fn as_atomic(&mut self) -> &[AtomicU32] {
        let len = self.pixels.len();
        let ptr = self.pixels.as_mut_ptr() as *const AtomicU32;
        // SAFETY: `Argb` is repr(transparent) over `u32`, and `AtomicU32` has
        // the same size and alignment as `u32`. The exclusive borrow of
        // `self` guarantees no non-atomic access for the returned lifetime.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }

    /// Outline `bx` with one-pixel lines. Coordinates past the canvas edge
    /// are clamped.
    pub fn draw_box(&mut self, bx: PixelBox, color: Argb) {
        let (w, h) = (self.width(), self.height());
        let x0 = bx.x0.min(w - 1);
        let x1 = bx.x1.min(w - 1);
        let y0 = bx.y0.min(h - 1);
        let y1 = bx.y1.min(h - 1);

        for x in x0..=x1 {
            self.pixels[x + y0 * w] = color;
            self.pixels[x + y1 * w] = color;
        }
        for y in y0..=y1 {
            self.pixels[x0 + y * w] = color;
            self.pixels[x1 + y * w] = color;
        }
    }

    /// Pixels re-packed into the canvas's [`PixelFormat`].
    pub fn export_packed(&self) -> Vec<u32> {
        self.pixels.iter().map(|&c| self.format.pack(c)).collect()
    }

    /// Pixels as RGBA bytes, four per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba_bytes()).collect()
    }

    /// Write a binary PPM (P6). Alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "P6")?;
        writeln!(out, "{} {}", self.width(), self.height())?;
        writeln!(out, "255")?;
        for pixel in &self.pixels {
            out.write_all(&[pixel.r(), pixel.g(), pixel.b()])?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_ppm(BufWriter::new(file))
    }
}
