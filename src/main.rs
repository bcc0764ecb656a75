//! Stroke Painter CLI - Paint a target image from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use stroke_painter::{
    Painter,
    compute::{absolute_error, mean_error},
    io::{
        export_buffer, export_masks, load_brush, load_canvas, load_mask, save_canvas,
        save_history,
    },
    schema::{PainterConfig, StopReason},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 5 {
        eprintln!(
            "Usage: {} <config.json> <target> <brush> <out_dir> [mask]",
            args[0]
        );
        eprintln!();
        eprintln!("Paint a grayscale approximation of an image with brushstrokes.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to painter configuration file");
        eprintln!("  target       Image to approximate");
        eprintln!("  brush        Brush template (white paints, black is transparent)");
        eprintln!("  out_dir      Directory for stage frames, masks, result and history");
        eprintln!("  mask         Optional sampling mask overriding the stage schedule");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let target_path = PathBuf::from(&args[2]);
    let brush_path = PathBuf::from(&args[3]);
    let out_dir = PathBuf::from(&args[4]);
    let mask_path = args.get(5).map(PathBuf::from);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: PainterConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let target = load_canvas(&target_path).unwrap_or_else(|e| {
        eprintln!("Error loading target: {}", e);
        std::process::exit(1);
    });

    let brush = load_brush(&brush_path, config.brush_size).unwrap_or_else(|e| {
        eprintln!("Error loading brush: {}", e);
        std::process::exit(1);
    });

    let params = config.schedule;

    println!("Stroke Painter");
    println!("==============");
    println!("Target: {}x{}", target.width, target.height);
    println!(
        "Brush: {}x{}",
        brush.template().width(),
        brush.template().height()
    );
    println!(
        "Stages: {}, generations: {}, strokes: {}",
        params.stages, params.generations, params.strokes
    );
    println!("Seed: {}", config.seed);
    println!();

    let mut painter = Painter::new(config, target, brush).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    if let Some(mask_path) = mask_path {
        let mask = load_mask(&mask_path).unwrap_or_else(|e| {
            eprintln!("Error loading mask: {}", e);
            std::process::exit(1);
        });
        painter.set_sampling_mask(mask).unwrap_or_else(|e| {
            eprintln!("Invalid mask: {}", e);
            std::process::exit(1);
        });
        println!("Using sampling mask {}", mask_path.display());
    }

    println!("Painting...");
    let start = Instant::now();

    let reason = painter
        .generate_with_callback(&params, |progress| {
            if progress.generation == progress.total_generations {
                let elapsed = start.elapsed().as_secs_f32();
                println!(
                    "  Stage {}/{}: error={}, scale=[{:.3}, {:.3}], accepted={}, {:.1}s",
                    progress.stage + 1,
                    progress.total_stages,
                    progress.error,
                    progress.brush_bounds.0,
                    progress.brush_bounds.1,
                    progress.accepted,
                    elapsed
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Painting failed: {}", e);
            std::process::exit(1);
        });

    let elapsed = start.elapsed();
    let result = painter.latest();
    let error = absolute_error(result, painter.target());

    println!();
    if reason == StopReason::Cancelled {
        println!("Cancelled.");
    }
    println!(
        "Final error: {} ({:.2} per pixel)",
        error,
        mean_error(result, painter.target())
    );
    println!(
        "Accepted mutations: {}",
        painter.history().total_accepted()
    );
    println!("Time: {:.2}s", elapsed.as_secs_f32());

    let outputs = export_buffer(&out_dir, painter.buffer())
        .and_then(|frames| {
            export_masks(&out_dir, painter.masks())?;
            save_canvas(result, out_dir.join("result.png"))?;
            save_history(painter.history(), out_dir.join("history.json"))?;
            Ok(frames)
        })
        .unwrap_or_else(|e| {
            eprintln!("Error writing output: {}", e);
            std::process::exit(1);
        });

    println!(
        "Wrote {} frames, {} masks, result.png and history.json to {}",
        outputs.len(),
        painter.masks().len(),
        out_dir.display()
    );
}

fn print_example_config() {
    let config = PainterConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
