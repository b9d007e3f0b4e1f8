// src/rasterizer/mod.rs

//! # Parallel render passes
//!
//! A pass fills the canvas using several worker threads that race to claim
//! units from a shared [`WorkPool`]:
//!
//! ```text
//! IDLE ─► SIZING ─► RUNNING ─► DONE
//!          │          │          │
//!          │          │          └ join every worker, report first failure
//!          │          └ N workers: loop { claim unit; process unit }
//!          └ units = rows (SOLID, CLEAR) or chunks (CHUNKS)
//!            workers = min(max_threads, units)
//! ```
//!
//! ## Modes
//!
//! - **SOLID**: unit = one row. Every pixel gets `color_at(plane(x, y))`.
//! - **CLEAR**: unit = one row. Every pixel gets the back color.
//! - **CHUNKS**: unit = one point chunk. Each point strictly inside the bounds
//!   is written at its pixel with `color_at(x, y)`.
//!
//! ## Sharing the canvas
//!
//! Row passes hand out disjoint `&mut` row slices through [`RowPartition`].
//! The work pool gives each row index to one worker and the partition checks
//! that with a take-once flag, so each pixel is written exactly once without
//! any per-pixel locking.
//!
//! Chunk passes cannot be partitioned: two chunks may hit the same pixel.
//! The canvas is viewed as `[AtomicU32]` and written with relaxed stores.
//! When chunks overlap, the pixel ends up with whichever store lands last.
//! That order is unspecified across chunks; within a chunk, later points
//! overwrite earlier ones because one worker walks the chunk in order.
//!
//! Every write of a pass happens-before the pass returns (scoped join).
//!
//! ## Failure
//!
//! Workers check the abort flag and the [`CancelToken`] before each claim.
//! A panic inside the coloring function is caught, raises the abort flag and
//! is reported as [`RasterError::WorkerPanicked`] once all workers are done.
//! Canvas contents after a failed or cancelled pass are partial.

mod partition;

#[cfg(test)]
mod tests;

use crate::cancellation::CancelToken;
use crate::canvas::Canvas;
use crate::coloring::ColoringRule;
use crate::error::{RasterError, Result};
use crate::mapping::CoordinateMapper;
use crate::work_pool::WorkPool;
use log::{debug, error, trace};
use partition::RowPartition;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

const WORKER_STACK_SIZE: usize = 512 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Solid,
    Chunks,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassPhase {
    Sizing,
    Running,
    Done,
}

/// What a finished pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub mode: RenderMode,
    /// Units in the pool (rows or chunks).
    pub units: usize,
    /// Worker threads that ran.
    pub workers: usize,
    pub elapsed: Duration,
}

/// Read-only inputs of one pass.
///
/// Captured when the pass starts; nothing in here can change while workers
/// run.
#[derive(Clone, Copy)]
pub struct PassInputs<'a> {
    pub mapper: &'a CoordinateMapper,
    pub rule: &'a ColoringRule,
    pub chunks: &'a [Vec<f32>],
    pub max_threads: usize,
    pub cancel: &'a CancelToken,
}

/// Units a pass of `mode` will hand out.
pub fn unit_count(mode: RenderMode, canvas: &Canvas, chunks: &[Vec<f32>]) -> usize {
    match mode {
        RenderMode::Solid | RenderMode::Clear => canvas.height(),
        RenderMode::Chunks => chunks.len(),
    }
}

/// Run one complete pass over `canvas`.
pub fn render_pass(
    mode: RenderMode,
    canvas: &mut Canvas,
    inputs: PassInputs<'_>,
) -> Result<PassReport> {
    let started = Instant::now();
    log_phase(mode, PassPhase::Sizing);

    if inputs.max_threads == 0 {
        return Err(RasterError::InvalidThreadCount);
    }
    if inputs.cancel.is_cancelled() {
        return Err(RasterError::Cancelled);
    }

    let units = unit_count(mode, canvas, inputs.chunks);
    let workers = inputs.max_threads.min(units);
    let pool = WorkPool::new(units);
    debug!("{mode:?} pass: {units} units, {workers} workers");

    log_phase(mode, PassPhase::Running);
    let width = canvas.width();
    let mapper = inputs.mapper;
    let rule = inputs.rule;

    match mode {
        RenderMode::Solid => {
            let rows = RowPartition::new(canvas.pixels_mut(), width);
            run_workers(workers, &pool, inputs.cancel, |y| {
                let Some(row) = rows.take(y) else {
                    debug_assert!(false, "row {y} claimed twice");
                    return;
                };
                let plane_y = mapper.row_y(y);
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = rule.color_at(mapper.column_x(x), plane_y);
                }
            })?;
        }
        RenderMode::Clear => {
            let back = rule.back_color();
            let rows = RowPartition::new(canvas.pixels_mut(), width);
            run_workers(workers, &pool, inputs.cancel, |y| {
                if let Some(row) = rows.take(y) {
                    row.fill(back);
                }
            })?;
        }
        RenderMode::Chunks => {
            let cells = canvas.as_atomic();
            let chunks = inputs.chunks;
            run_workers(workers, &pool, inputs.cancel, |i| {
                for point in chunks[i].chunks_exact(2) {
                    let (x, y) = (point[0], point[1]);
                    if let Some(idx) = mapper.plot_index(x, y) {
                        cells[idx].store(rule.color_at(x, y).0, Ordering::Relaxed);
                    }
                }
            })?;
        }
    }

    log_phase(mode, PassPhase::Done);
    let report = PassReport {
        mode,
        units,
        workers,
        elapsed: started.elapsed(),
    };
    debug!("{mode:?} pass finished in {:?}", report.elapsed);
    Ok(report)
}

fn log_phase(mode: RenderMode, phase: PassPhase) {
    trace!("{mode:?} pass -> {phase:?}");
}

/// Spawn `workers` threads over `pool` and join them all.
///
/// With a single worker the loop runs on the calling thread.
fn run_workers<F>(workers: usize, pool: &WorkPool, cancel: &CancelToken, process: F) -> Result<()>
where
    F: Fn(usize) + Sync,
{
    let abort = AtomicBool::new(false);
    let failure: OnceLock<(usize, String)> = OnceLock::new();
    let work = |worker: usize| worker_loop(worker, pool, cancel, &abort, &failure, &process);

    if workers == 1 {
        work(0);
    } else if workers > 1 {
        let work = &work;
        thread::scope(|s| -> Result<()> {
            for worker in 0..workers {
                let spawned = thread::Builder::new()
                    .name(format!("raster-{worker}"))
                    .stack_size(WORKER_STACK_SIZE)
                    .spawn_scoped(s, move || work(worker));
                if let Err(e) = spawned {
                    // Workers already running stop at their next claim.
                    abort.store(true, Ordering::Relaxed);
                    return Err(RasterError::Spawn(e));
                }
            }
            Ok(())
        })?;
    }

    if let Some((worker, message)) = failure.into_inner() {
        return Err(RasterError::WorkerPanicked { worker, message });
    }
    if pool.remaining() > 0 {
        return Err(RasterError::Cancelled);
    }
    Ok(())
}

fn worker_loop<F>(
    worker: usize,
    pool: &WorkPool,
    cancel: &CancelToken,
    abort: &AtomicBool,
    failure: &OnceLock<(usize, String)>,
    process: &F,
) where
    F: Fn(usize),
{
    let mut processed = 0usize;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        while !abort.load(Ordering::Relaxed) && !cancel.is_cancelled() {
            let Some(unit) = pool.claim() else {
                break;
            };
            process(unit);
            processed += 1;
        }
    }));

    if let Err(payload) = outcome {
        abort.store(true, Ordering::Relaxed);
        let message = panic_message(payload.as_ref());
        error!("raster worker {worker} panicked after {processed} units: {message}");
        let _ = failure.set((worker, message));
        return;
    }
    trace!("raster worker {worker} processed {processed} units");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
