//! Benchmarks for stroke compositing and evolution.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};

use stroke_painter::{
    compute::{
        Brush, Canvas, Compositor, GradientField, SamplingField, SamplingStrategy,
        absolute_error,
        evolution::{StrokeOptimizer, generation_seed},
    },
    schema::Gene,
};

fn soft_brush(size: u32) -> Brush {
    let c = (size as f32 - 1.0) / 2.0;
    let template = GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        Luma([((1.0 - (dx * dx + dy * dy).sqrt() / (c + 1.0)).max(0.0) * 255.0) as u8])
    });
    Brush::new(template).unwrap()
}

fn radial_target(size: usize) -> Canvas {
    let c = size as f32 / 2.0;
    let data = (0..size * size)
        .map(|i| {
            let dx = (i % size) as f32 - c;
            let dy = (i / size) as f32 - c;
            let r = (dx * dx + dy * dy).sqrt() / c;
            ((1.0 - r).max(0.0) * 255.0) as u8
        })
        .collect();
    Canvas::from_raw(size, size, data).unwrap()
}

fn bench_render_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_all");
    let brush = soft_brush(300);

    for size in [128, 256, 512] {
        let compositor = Compositor::new(&brush, 0.7, 5);
        let base = Canvas::new(size, size);
        let genes: Vec<Gene> = (0..10)
            .map(|i| Gene {
                intensity: (i * 25) as u8,
                pos_y: (i * 37) % size,
                pos_x: (i * 53) % size,
                scale: 0.3 + 0.04 * i as f32,
                rotation: i as f32 * 36.0,
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| compositor.render_all(black_box(&genes), &base));
            },
        );
    }

    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("absolute_error");

    for size in [256, 1024] {
        let target = radial_target(size);
        let rendered = Canvas::filled(size, size, 90);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| absolute_error(black_box(&rendered), &target));
            },
        );
    }

    group.finish();
}

fn bench_sampling_field(c: &mut Criterion) {
    let target = radial_target(256).to_grid();

    c.bench_function("sampling_field_256", |b| {
        b.iter(|| SamplingField::from_gradient(black_box(&target), 0.1).unwrap());
    });
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_all");
    group.sample_size(10);

    let brush = soft_brush(300);
    for strokes in [5, 10, 20] {
        let target = radial_target(128);
        let gradient = GradientField::from_image(&target);
        let sampling = SamplingStrategy::Uniform;
        let mut optimizer = StrokeOptimizer::new(
            &target,
            &gradient,
            &sampling,
            &brush,
            Canvas::new(128, 128),
            (0.1, 0.3),
            5,
        )
        .unwrap();
        optimizer.init_random(strokes, 42);

        let mut generation = 0;
        group.bench_with_input(BenchmarkId::from_parameter(strokes), &strokes, |b, _| {
            b.iter(|| {
                generation += 1;
                optimizer.evolve_all(generation_seed(42, generation))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_all,
    bench_fitness,
    bench_sampling_field,
    bench_generation
);
criterion_main!(benches);
