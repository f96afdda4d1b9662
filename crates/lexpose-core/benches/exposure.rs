//! Benchmarks for lexpose-core exposure operations
//!
//! Run with: cargo bench -p lexpose-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lexpose_core::allocation::{allocate, ev_range_from_constraints};
use lexpose_core::auto_exposure::{auto_expose, sweep_candidates};
use lexpose_core::metering::{generate_weight_map, meter, weighted_luminance};
use lexpose_core::models::{AePriorities, Constraints, MeteringMode, Preference, SweepRange};
use lexpose_core::pipeline::{run_auto_exposure, ExposureRequest};
use lexpose_core::scenes::{generate_scene, SceneKind};

/// Benchmark metering telemetry on a center-weighted map
fn bench_metering(c: &mut Criterion) {
    let mut group = c.benchmark_group("metering");

    for size in [128, 512, 1024].iter() {
        let (width, height) = (*size, *size);
        group.throughput(Throughput::Elements((width * height) as u64));

        let scene = generate_scene(SceneKind::Gradient, width, height);
        let weights = generate_weight_map(&MeteringMode::default(), width, height);
        let luminance = weighted_luminance(&scene.rgba, &weights).unwrap();

        group.bench_with_input(
            BenchmarkId::new("meter", format!("{}x{}", width, height)),
            &luminance,
            |b, lum| {
                b.iter(|| meter(black_box(lum), black_box(weights.as_slice()), 0.01));
            },
        );
    }

    group.finish();
}

/// Benchmark the candidate sweep and the full selector
fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    let priorities = AePriorities::default();
    let range = SweepRange::default();

    for size in [128, 512].iter() {
        let (width, height) = (*size, *size);
        group.throughput(Throughput::Elements((width * height) as u64));

        let scene = generate_scene(SceneKind::Backlit, width, height);
        let weights = generate_weight_map(&MeteringMode::Matrix, width, height);
        let luminance = weighted_luminance(&scene.rgba, &weights).unwrap();

        group.bench_with_input(
            BenchmarkId::new("candidates", format!("{}x{}", width, height)),
            &luminance,
            |b, lum| {
                b.iter(|| {
                    sweep_candidates(
                        black_box(lum),
                        black_box(weights.as_slice()),
                        &range,
                        &priorities,
                    )
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("auto_expose", format!("{}x{}", width, height)),
            &luminance,
            |b, lum| {
                b.iter(|| auto_expose(black_box(lum), weights.as_slice(), &range, &priorities));
            },
        );
    }

    group.finish();
}

/// Benchmark allocation and the achievable range scan
fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");
    let constraints = Constraints::default();

    for preference in Preference::ALL {
        group.bench_function(BenchmarkId::new("allocate", preference), |b| {
            b.iter(|| allocate(black_box(2.4), &constraints, preference));
        });
        group.bench_function(BenchmarkId::new("range_scan", preference), |b| {
            b.iter(|| ev_range_from_constraints(black_box(&constraints), preference));
        });
    }

    group.finish();
}

/// Benchmark one full invocation (simulated capture)
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let request = ExposureRequest {
        preference: Preference::Shutter,
        ..ExposureRequest::default()
    };

    for size in [256, 1024].iter() {
        let (width, height) = (*size, *size);
        group.throughput(Throughput::Elements((width * height) as u64));

        let scene = generate_scene(SceneKind::Spotlit, width, height);
        let weights = generate_weight_map(&MeteringMode::default(), width, height);

        group.bench_with_input(
            BenchmarkId::new("run_auto_exposure", format!("{}x{}", width, height)),
            &scene.rgba,
            |b, rgba| {
                b.iter(|| run_auto_exposure(black_box(rgba), &weights, &request).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_metering,
    bench_sweep,
    bench_allocation,
    bench_pipeline
);
criterion_main!(benches);
