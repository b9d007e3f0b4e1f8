// src/error.rs

//! Error type shared by every fallible operation in the crate.

use std::io;
use thiserror::Error;

/// Failures surfaced by configuration, render passes and export.
///
/// Configuration errors (`DegenerateBounds`, `DegenerateResolution`,
/// `InvalidThreadCount`) are raised before any worker thread exists.
/// Pass errors (`WorkerPanicked`, `Cancelled`, `Spawn`) are raised only after
/// every worker of the pass has been joined.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("degenerate geometry: bounds ({min_x}, {min_y})..({max_x}, {max_y}) have no area")]
    DegenerateBounds {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },
    #[error("degenerate geometry: resolution {width}x{height} has no pixels")]
    DegenerateResolution { width: usize, height: usize },
    #[error("max thread count must be at least 1")]
    InvalidThreadCount,
    #[error("point chunk has odd length {len}")]
    OddChunk { len: usize },
    #[error("render worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },
    #[error("render pass cancelled")]
    Cancelled,
    #[error("failed to spawn render worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
