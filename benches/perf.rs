use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tracking_heatmaps::distance::distance_estimate;
use tracking_heatmaps::filter::filter_in_play;
use tracking_heatmaps::heatmap::smoothed_heatmap;
use tracking_heatmaps::normalize::{PitchTransform, categorize};
use tracking_heatmaps::synth::{self, SynthMatch, SynthSpec};

fn sample_match() -> SynthMatch {
    synth::generate(&SynthSpec {
        frames_per_half: 25 * 60 * 2,
        seed: 3,
        ..SynthSpec::default()
    })
}

fn bench_filter(c: &mut Criterion) {
    let generated = sample_match();
    let capture = generated.capture_text();
    let halves = generated.metadata.halves();
    c.bench_function("filter_in_play", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(capture.len());
            let stats = filter_in_play(black_box(capture.as_bytes()), &mut out, halves).unwrap();
            black_box(stats.lines_kept);
        })
    });
}

fn bench_categorize(c: &mut Criterion) {
    let generated = sample_match();
    let capture = generated.capture_text();
    let transform = PitchTransform::new(
        generated.metadata.pitch,
        generated.metadata.tracking_area,
    );
    c.bench_function("categorize", |b| {
        b.iter(|| {
            let (tables, _) = categorize(black_box(capture.as_bytes()), &transform).unwrap();
            black_box(tables.players.len());
        })
    });
}

fn bench_distance(c: &mut Criterion) {
    // A two-player group against one player over a five-minute window.
    let group = (0..600)
        .map(|i| ((i % 100) as f64, (i % 60) as f64))
        .collect::<Vec<_>>();
    let single = (0..300)
        .map(|i| ((i % 80) as f64, (i % 50) as f64))
        .collect::<Vec<_>>();
    c.bench_function("distance_estimate", |b| {
        b.iter(|| {
            let d = distance_estimate(black_box(&group), black_box(&single), 5);
            black_box(d);
        })
    });
}

fn bench_heatmap(c: &mut Criterion) {
    let generated = sample_match();
    let pitch = generated.metadata.pitch;
    let transform = PitchTransform::new(pitch, generated.metadata.tracking_area);
    let points = generated
        .frames
        .iter()
        .flat_map(|frame| frame.players.iter().take(1))
        .map(|p| transform.to_pitch(p.x, p.y))
        .take(300)
        .collect::<Vec<_>>();
    c.bench_function("smoothed_heatmap", |b| {
        b.iter(|| {
            let grid = smoothed_heatmap(black_box(&points), pitch);
            black_box(grid.total());
        })
    });
}

criterion_group!(
    benches,
    bench_filter,
    bench_categorize,
    bench_distance,
    bench_heatmap
);
criterion_main!(benches);
