//! Quick painting performance test

use std::time::Instant;

use image::{GrayImage, Luma};
use stroke_painter::{Brush, Canvas, Painter, PainterConfig, StageParams};

fn disk_brush(size: u32) -> Brush {
    let c = (size as f32 - 1.0) / 2.0;
    let template = GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        Luma([((1.0 - (dx * dx + dy * dy).sqrt() / (c + 1.0)).clamp(0.0, 1.0) * 255.0) as u8])
    });
    Brush::new(template).expect("brush")
}

fn rings_target(size: usize) -> Canvas {
    let c = size as f32 / 2.0;
    let data = (0..size * size)
        .map(|i| {
            let dx = (i % size) as f32 - c;
            let dy = (i / size) as f32 - c;
            let r = (dx * dx + dy * dy).sqrt();
            if (r / 12.0) as usize % 2 == 0 { 210 } else { 40 }
        })
        .collect();
    Canvas::from_raw(size, size, data).expect("target buffer")
}

fn main() {
    println!("=== Painting Performance Test ===\n");

    // Test different canvas sizes
    for size in [64, 128, 256] {
        println!("Canvas size: {}x{}", size, size);

        let config = PainterConfig {
            seed: 42,
            ..Default::default()
        };
        let params = StageParams {
            stages: 5,
            generations: 10,
            strokes: 10,
        };

        let start = Instant::now();
        let mut painter = Painter::new(config, rings_target(size), disk_brush(300))
            .expect("valid painter");
        painter.generate(&params).expect("painting succeeds");
        let elapsed = start.elapsed();

        let renders = params.stages * (params.generations + 1) * params.strokes;
        let history = painter.history();
        let errors = history.final_errors();

        println!("  Stages:         {}", history.stages.len());
        println!("  Renders:        {}", renders);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Renders/sec:    {:.1}", renders as f64 / elapsed.as_secs_f64());
        println!("  Accepted:       {}", history.total_accepted());
        println!("  Final error:    {}", errors.last().copied().unwrap_or(0));
        println!();
    }

    println!("=== Stroke Count Scaling (fixed 128x128 canvas) ===\n");

    for strokes in [5, 10, 20, 40] {
        let params = StageParams {
            stages: 2,
            generations: 5,
            strokes,
        };

        let start = Instant::now();
        let mut painter = Painter::new(
            PainterConfig {
                seed: 42,
                ..Default::default()
            },
            rings_target(128),
            disk_brush(300),
        )
        .expect("valid painter");
        painter.generate(&params).expect("painting succeeds");
        let elapsed = start.elapsed();

        let renders = params.stages * (params.generations + 1) * strokes;
        println!(
            "Strokes {}: {} renders in {:.2}s ({:.1} renders/sec)",
            strokes,
            renders,
            elapsed.as_secs_f64(),
            renders as f64 / elapsed.as_secs_f64()
        );
    }
}
