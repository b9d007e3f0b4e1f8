// src/main.rs

//! Demo: render a scalar field and a scatter plot, write both as PPM.
//!
//! Usage: `raster-plot [CONFIG.json] [OUT_PREFIX]`

use anyhow::Context;
use log::info;
use raster_plot::{Argb, ColoringRule, PlotConfig, RasterPlot};
use std::f32::consts::TAU;

const SPIRAL_ARMS: usize = 64;
const POINTS_PER_ARM: usize = 4096;
const AUTO_BOUNDS_THRESHOLD: f64 = 0.1;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PlotConfig::load(&path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => PlotConfig::default(),
    };
    let prefix = args.next().unwrap_or_else(|| "raster-plot".to_string());
    info!("Configuration: {config:?}");

    let mut plot = RasterPlot::from_config(&config).context("Invalid plot configuration")?;
    info!("Using up to {} render threads", plot.max_thread_count());

    // --- Scalar field ---
    plot.set_coloring_rule(ColoringRule::new(config.back_color, |x, y| {
        let v = ((x * 6.0).sin() * (y * 6.0).cos() * 0.5 + 0.5).clamp(0.0, 1.0);
        let level = (v * 255.0) as u8;
        Argb::opaque(level, 64, 255 - level)
    }));
    let report = plot.render_solid().context("Solid pass failed")?;
    info!("{report:?}");
    let field_path = format!("{prefix}-field.ppm");
    plot.save_ppm(&field_path)
        .with_context(|| format!("Failed to write {field_path}"))?;
    info!("Wrote {field_path}");

    // --- Scatter ---
    plot.set_coloring_rule(ColoringRule::new(config.back_color, |x, y| {
        let r = (x * x + y * y).sqrt().min(1.0);
        Argb::opaque((r * 255.0) as u8, 0, ((1.0 - r) * 255.0) as u8)
    }));
    for arm in 0..SPIRAL_ARMS {
        let phase = arm as f32 / SPIRAL_ARMS as f32 * TAU;
        let chunk: Vec<f32> = (0..POINTS_PER_ARM)
            .flat_map(|i| {
                let t = i as f32 / POINTS_PER_ARM as f32;
                let angle = phase + t * TAU;
                let radius = 0.6 * t;
                [radius * angle.cos(), radius * angle.sin()]
            })
            .collect();
        plot.put_chunk(chunk);
    }

    plot.clear_plot().context("Clear pass failed")?;
    plot.render_chunks().context("Chunk pass failed")?;
    if plot
        .apply_bounding_box(AUTO_BOUNDS_THRESHOLD)
        .context("Failed to tighten bounds")?
    {
        plot.clear_plot().context("Clear pass failed")?;
        let report = plot.render_chunks().context("Chunk pass failed")?;
        info!("{report:?}");
    }
    let drawn = plot.compute_and_draw_bounding_box(Argb::opaque(0, 200, 0));
    info!("Drawn region: {drawn:?}");

    let scatter_path = format!("{prefix}-scatter.ppm");
    plot.save_ppm(&scatter_path)
        .with_context(|| format!("Failed to write {scatter_path}"))?;
    info!("Wrote {scatter_path}");

    Ok(())
}
