//! Benchmarks for grain operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use grain_core::{Clip, ClipInfo, Format, Frame, SampleLevels};
use grain_ops::blend::{blend_frames, blend_sample};
use grain_ops::filter::box_blur;
use grain_ops::geometry::fit_grain;
use grain_ops::overlay::overlay_frame;
use grain_ops::{synthesize, BlendMode, GrainParams, HashNoise};

fn gradient_frame(format: Format, width: u32, height: u32) -> Frame {
    let peak = SampleLevels::from_format(&format).peak;
    let planes = (0..format.num_planes())
        .map(|i| {
            let (pw, ph) = format.plane_dimensions(i, width, height);
            let data = (0..pw * ph)
                .map(|v| (v % pw) as f32 / pw as f32 * peak)
                .collect();
            grain_core::Plane::from_f32(&format, pw, ph, data).unwrap()
        })
        .collect();
    Frame::new(format, width, height, planes).unwrap()
}

/// Benchmark the per-sample formulas.
fn bench_blend_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend_sample");
    let levels = SampleLevels::from_format(&Format::YUV420P10);
    let values: Vec<f32> = (0..10000).map(|i| (i % 1024) as f32).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    for mode in BlendMode::ALL {
        group.bench_with_input(BenchmarkId::new(mode.name(), values.len()), &values, |b, v| {
            b.iter(|| {
                v.iter()
                    .zip(v.iter().rev())
                    .map(|(&x, &y)| blend_sample(black_box(x), black_box(y), mode, &levels))
                    .sum::<f32>()
            })
        });
    }

    group.finish();
}

/// Benchmark whole-frame blending and the subsampled overlay round trip.
fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");

    for (name, format) in [("yuv420p8", Format::YUV420P8), ("yuv444ps", Format::YUV444PS)] {
        let base = gradient_frame(format, 640, 360);
        let grain = gradient_frame(format, 640, 360);
        group.throughput(Throughput::Elements(640 * 360));

        group.bench_function(BenchmarkId::new("blend_overlay", name), |b| {
            b.iter(|| blend_frames(black_box(&grain), black_box(&base), BlendMode::Overlay).unwrap())
        });

        group.bench_function(BenchmarkId::new("overlay_frame_softlight", name), |b| {
            b.iter(|| overlay_frame(black_box(&base), black_box(&grain), 0.7, BlendMode::SoftLight).unwrap())
        });
    }

    group.finish();
}

/// Benchmark the box blur at blur-round-trip sizes.
fn bench_box_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_blur");
    let (w, h) = (1280, 720);
    let src: Vec<f32> = (0..w * h).map(|i| (i % 97) as f32).collect();
    group.throughput(Throughput::Elements((w * h) as u64));

    for radius in [1usize, 3, 7] {
        group.bench_with_input(BenchmarkId::new("radius", radius), &src, |b, s| {
            b.iter(|| box_blur(black_box(s), w, h, radius, 2).unwrap())
        });
    }

    group.finish();
}

/// Benchmark fitting a small grain clip to a longer, larger target.
fn bench_fit_grain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_grain");
    group.sample_size(20);

    let grain = Clip::repeat(gradient_frame(Format::YUV420P8, 256, 144), 4).unwrap();
    let target = ClipInfo {
        format: Format::YUV420P8,
        width: 640,
        height: 360,
        num_frames: 24,
    };

    for blur in [0u32, 2] {
        group.bench_with_input(BenchmarkId::new("blur", blur), &blur, |b, &blur| {
            b.iter(|| fit_grain(black_box(&grain), &target, 1.0, blur).unwrap())
        });
    }

    group.finish();
}

/// Benchmark hash-noise synthesis over a short clip.
fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    group.sample_size(20);

    let clip = Clip::repeat(gradient_frame(Format::YUV444PS, 640, 360), 8).unwrap();
    let params = GrainParams::default();
    group.throughput(Throughput::Elements(8));

    group.bench_function("hash_noise_8_frames", |b| {
        b.iter(|| synthesize(black_box(&clip), HashNoise, &params).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_blend_sample,
    bench_frames,
    bench_box_blur,
    bench_fit_grain,
    bench_synthesize,
);

criterion_main!(benches);
