// src/lib.rs

//! Multi-threaded rasterization of scatter points and scalar fields into a
//! packed-ARGB pixel buffer.
//!
//! ```no_run
//! use raster_plot::{Argb, ColoringRule, RasterPlot, Resolution};
//!
//! # fn main() -> raster_plot::Result<()> {
//! let mut plot = RasterPlot::new(Resolution::new(640, 480))?;
//! plot.set_coloring_rule(ColoringRule::new(Argb::WHITE, |x, y| {
//!     if x * x + y * y < 0.5 { Argb::BLACK } else { Argb::WHITE }
//! }));
//! plot.render_solid()?;
//!
//! plot.put_chunk(vec![0.1, 0.2, -0.3, 0.4]);
//! plot.render_chunks()?;
//! plot.save_ppm("plot.ppm")?;
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod bounds;
pub mod cancellation;
pub mod canvas;
pub mod color;
pub mod coloring;
pub mod config;
pub mod error;
pub mod mapping;
pub mod plot;
pub mod rasterizer;
pub mod work_pool;

pub use bounding_box::PixelBox;
pub use bounds::Bounds;
pub use cancellation::CancelToken;
pub use canvas::Canvas;
pub use color::{Argb, PixelFormat};
pub use coloring::ColoringRule;
pub use config::PlotConfig;
pub use error::{RasterError, Result};
pub use mapping::{CoordinateMapper, Resolution};
pub use plot::RasterPlot;
pub use rasterizer::{PassReport, RenderMode};
pub use work_pool::WorkPool;
