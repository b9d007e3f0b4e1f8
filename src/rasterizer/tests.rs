// src/rasterizer/tests.rs

use super::*;
use crate::bounds::Bounds;
use crate::color::{Argb, PixelFormat};
use crate::mapping::Resolution;
use std::sync::atomic::AtomicUsize;
use test_log::test;

struct Fixture {
    canvas: Canvas,
    mapper: CoordinateMapper,
    rule: ColoringRule,
    chunks: Vec<Vec<f32>>,
    cancel: CancelToken,
}

impl Fixture {
    fn new(bounds: Bounds, resolution: Resolution, rule: ColoringRule) -> Self {
        Self {
            canvas: Canvas::new(resolution, PixelFormat::Argb, rule.back_color()).unwrap(),
            mapper: CoordinateMapper::new(bounds, resolution).unwrap(),
            rule,
            chunks: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    fn run(&mut self, mode: RenderMode, max_threads: usize) -> Result<PassReport> {
        let inputs = PassInputs {
            mapper: &self.mapper,
            rule: &self.rule,
            chunks: &self.chunks,
            max_threads,
            cancel: &self.cancel,
        };
        render_pass(mode, &mut self.canvas, inputs)
    }
}

fn gradient_rule() -> ColoringRule {
    ColoringRule::new(Argb::WHITE, |x, y| {
        let r = ((x + 1.0) * 100.0) as u8;
        let g = ((y + 1.0) * 100.0) as u8;
        Argb::opaque(r, g, 7)
    })
}

#[test]
fn solid_with_constant_rule_fills_every_pixel() {
    let color = Argb::opaque(10, 20, 30);
    let mut f = Fixture::new(
        Bounds::default(),
        Resolution::new(37, 23),
        ColoringRule::constant(color, Argb::WHITE),
    );
    let report = f.run(RenderMode::Solid, 4).unwrap();
    assert_eq!(report.units, 23);
    assert_eq!(report.workers, 4);
    assert!(f.canvas.pixels().iter().all(|&p| p == color));
}

#[test]
fn solid_samples_pixel_to_plane_mapping() {
    let mut f = Fixture::new(Bounds::default(), Resolution::new(16, 8), gradient_rule());
    f.run(RenderMode::Solid, 3).unwrap();
    for y in 0..8 {
        for x in 0..16 {
            let (px, py) = f.mapper.pixel_to_plane(x, y);
            assert_eq!(f.canvas.pixel(x, y), Some(f.rule.color_at(px, py)));
        }
    }
}

#[test]
fn solid_passes_are_byte_identical() {
    let mut a = Fixture::new(Bounds::default(), Resolution::new(64, 48), gradient_rule());
    let mut b = Fixture::new(Bounds::default(), Resolution::new(64, 48), gradient_rule());
    a.run(RenderMode::Solid, 8).unwrap();
    b.run(RenderMode::Solid, 8).unwrap();
    assert_eq!(a.canvas.pixels(), b.canvas.pixels());
    assert_eq!(a.canvas.to_rgba_bytes(), b.canvas.to_rgba_bytes());
}

#[test]
fn worker_count_does_not_change_row_passes() {
    let mut reference = Fixture::new(Bounds::default(), Resolution::new(30, 10), gradient_rule());
    reference.run(RenderMode::Solid, 1).unwrap();

    for threads in [2, 3, 10, 64] {
        let mut f = Fixture::new(Bounds::default(), Resolution::new(30, 10), gradient_rule());
        let report = f.run(RenderMode::Solid, threads).unwrap();
        assert_eq!(report.workers, threads.min(10));
        assert_eq!(f.canvas.pixels(), reference.canvas.pixels(), "{threads} threads");

        f.run(RenderMode::Clear, threads).unwrap();
        assert!(f.canvas.pixels().iter().all(|&p| p == Argb::WHITE));
    }
}

#[test]
fn clear_resets_to_back_color() {
    let back = Argb::opaque(9, 9, 9);
    let mut f = Fixture::new(
        Bounds::default(),
        Resolution::new(20, 20),
        ColoringRule::constant(Argb::BLACK, back),
    );
    f.run(RenderMode::Solid, 4).unwrap();
    assert!(f.canvas.pixels().iter().all(|&p| p == Argb::BLACK));
    f.run(RenderMode::Clear, 4).unwrap();
    assert!(f.canvas.pixels().iter().all(|&p| p == back));
}

#[test]
fn single_point_lands_on_its_pixel_only() {
    let mut f = Fixture::new(
        Bounds::new(0.0, 0.0, 64.0, 64.0),
        Resolution::new(64, 64),
        ColoringRule::new(Argb::WHITE, |x, y| {
            Argb(0xFF00_0000 | ((x * 2.0) as u32) << 8 | (y * 2.0) as u32)
        }),
    );
    f.chunks.push(vec![10.5, 43.5]);
    let report = f.run(RenderMode::Chunks, 4).unwrap();
    assert_eq!(report.units, 1);
    assert_eq!(report.workers, 1);

    let expected = f.rule.color_at(10.5, 43.5);
    for y in 0..64 {
        for x in 0..64 {
            let want = if (x, y) == (10, 20) { expected } else { Argb::WHITE };
            assert_eq!(f.canvas.pixel(x, y), Some(want), "({x}, {y})");
        }
    }
}

#[test]
fn points_on_bounds_edges_are_dropped() {
    let mut f = Fixture::new(
        Bounds::new(0.0, 0.0, 8.0, 8.0),
        Resolution::new(8, 8),
        ColoringRule::constant(Argb::BLACK, Argb::WHITE),
    );
    f.chunks.push(vec![0.0, 4.0, 8.0, 4.0, 4.0, 0.0, 4.0, 8.0, -1.0, 4.0, 4.0, 9.0]);
    f.run(RenderMode::Chunks, 2).unwrap();
    assert!(f.canvas.pixels().iter().all(|&p| p == Argb::WHITE));
}

#[test]
fn later_points_in_a_chunk_win() {
    let mut f = Fixture::new(
        Bounds::new(0.0, 0.0, 4.0, 4.0),
        Resolution::new(4, 4),
        ColoringRule::new(Argb::WHITE, |x, _| {
            if x < 1.3 {
                Argb::BLACK
            } else {
                Argb::opaque(1, 1, 1)
            }
        }),
    );
    // Both points fall in pixel (1, 2).
    f.chunks.push(vec![1.2, 1.5, 1.4, 1.5]);
    f.run(RenderMode::Chunks, 1).unwrap();
    assert_eq!(f.canvas.pixel(1, 2), Some(Argb::opaque(1, 1, 1)));
}

#[test]
fn many_chunks_render_every_point() {
    let mut f = Fixture::new(
        Bounds::new(0.0, 0.0, 100.0, 100.0),
        Resolution::new(100, 100),
        ColoringRule::constant(Argb::BLACK, Argb::WHITE),
    );
    // One chunk per row, one point per pixel center.
    for row in 0..100 {
        let y = row as f32 + 0.5;
        let chunk: Vec<f32> = (0..100).flat_map(|col| [col as f32 + 0.5, y]).collect();
        f.chunks.push(chunk);
    }
    let report = f.run(RenderMode::Chunks, 6).unwrap();
    assert_eq!(report.units, 100);
    assert_eq!(report.workers, 6);
    assert!(f.canvas.pixels().iter().all(|&p| p == Argb::BLACK));
}

#[test]
fn empty_backlog_spawns_no_workers() {
    let mut f = Fixture::new(Bounds::default(), Resolution::new(4, 4), ColoringRule::default());
    let report = f.run(RenderMode::Chunks, 8).unwrap();
    assert_eq!(report.units, 0);
    assert_eq!(report.workers, 0);
}

#[test]
fn zero_threads_is_rejected() {
    let mut f = Fixture::new(Bounds::default(), Resolution::new(4, 4), ColoringRule::default());
    assert!(matches!(f.run(RenderMode::Solid, 0), Err(RasterError::InvalidThreadCount)));
}

#[test]
fn panicking_rule_aborts_and_reports() {
    let mut f = Fixture::new(
        Bounds::default(),
        Resolution::new(16, 64),
        ColoringRule::new(Argb::WHITE, |_, y| {
            if y < -0.5 {
                panic!("bad sample at y={y}");
            }
            Argb::BLACK
        }),
    );
    match f.run(RenderMode::Solid, 4) {
        Err(RasterError::WorkerPanicked { worker, message }) => {
            assert!(worker < 4);
            assert!(message.contains("bad sample"), "{message}");
        }
        other => panic!("expected worker panic, got {other:?}"),
    }
}

#[test]
fn cancelled_token_fails_before_spawning() {
    let mut f = Fixture::new(Bounds::default(), Resolution::new(4, 4), gradient_rule());
    f.cancel.cancel();
    assert!(matches!(f.run(RenderMode::Solid, 2), Err(RasterError::Cancelled)));
    assert!(f.canvas.pixels().iter().all(|&p| p == Argb::WHITE));
}

#[test]
fn cancel_mid_pass_stops_at_unit_boundary() {
    let rows_done = std::sync::Arc::new(AtomicUsize::new(0));
    let cancel = CancelToken::new();
    let counter = rows_done.clone();
    let remote = cancel.clone();
    let rule = ColoringRule::new(Argb::WHITE, move |x, _| {
        // First pixel of each row; cancel once a few rows have started.
        if x == -1.0 && counter.fetch_add(1, Ordering::SeqCst) == 3 {
            remote.cancel();
        }
        Argb::BLACK
    });
    let mut f = Fixture::new(Bounds::default(), Resolution::new(8, 200), rule);
    f.cancel = cancel;

    assert!(matches!(f.run(RenderMode::Solid, 2), Err(RasterError::Cancelled)));
    let started = rows_done.load(Ordering::SeqCst);
    assert!(started < 200, "{started} rows started");
}
