// src/config.rs

//! Configuration for a [`RasterPlot`](crate::plot::RasterPlot).
//!
//! Every field has a default, so a config file only needs the settings it
//! changes. Files are JSON:
//!
//! ```json
//! {
//!   "resolution": { "width": 1024, "height": 768 },
//!   "bounds": { "min_x": -2.0, "min_y": -1.5, "max_x": 1.0, "max_y": 1.5 },
//!   "max_threads": 8,
//!   "pixel_format": "rgb",
//!   "back_color": 4278190080
//! }
//! ```

use crate::bounds::Bounds;
use crate::color::{Argb, PixelFormat};
use crate::error::{RasterError, Result};
use crate::mapping::Resolution;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Canvas size in pixels.
    pub resolution: Resolution,
    /// Initial plane bounds.
    pub bounds: Bounds,
    /// Upper limit on render workers. `None` uses the host's core count.
    pub max_threads: Option<usize>,
    /// Layout used when the canvas is exported.
    pub pixel_format: PixelFormat,
    /// Background color of the default coloring rule.
    pub back_color: Argb,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            resolution: Resolution::default(),
            bounds: Bounds::default(),
            max_threads: None,
            pixel_format: PixelFormat::default(),
            back_color: Argb::WHITE,
        }
    }
}

impl PlotConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject geometry and thread settings no render pass could use.
    pub fn validate(&self) -> Result<()> {
        self.resolution.validate()?;
        self.bounds.validate()?;
        if self.max_threads == Some(0) {
            return Err(RasterError::InvalidThreadCount);
        }
        Ok(())
    }

    /// `max_threads`, or the host's available parallelism.
    pub fn effective_max_threads(&self) -> usize {
        self.max_threads.unwrap_or_else(default_thread_count)
    }
}

/// Host core count, or 1 if it cannot be determined.
pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
