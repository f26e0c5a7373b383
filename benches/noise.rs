use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use noisefield::config::Parameters;
use noisefield::field::{Normalization, Region, sample_region};
use noisefield::simplex::Simplex;
use noisefield::Fbm;

fn kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplex");
    let noise = Simplex::new();
    group.bench_function("sample2", |b| {
        b.iter(|| noise.sample2(black_box(12.34), black_box(-56.78)))
    });
    group.bench_function("sample3", |b| {
        b.iter(|| noise.sample3(black_box(12.34), black_box(-56.78), black_box(0.5)))
    });
    group.bench_function("sample4", |b| {
        b.iter(|| {
            noise.sample4(
                black_box(12.34),
                black_box(-56.78),
                black_box(0.5),
                black_box(3.0),
            )
        })
    });
    group.finish();
}

fn fbm(c: &mut Criterion) {
    let mut group = c.benchmark_group("fbm");
    let noise = Simplex::new();
    for octaves in [1, 5, 16] {
        let fbm = Fbm::new(octaves, 2.0, 0.5).unwrap();
        group.bench_function(format!("signed2_{octaves}"), |b| {
            b.iter(|| fbm.signed2(&noise, black_box(0.1), black_box(0.1)))
        });
    }
    group.finish();
}

fn region(c: &mut Criterion) {
    let mut group = c.benchmark_group("region");
    let noise = Simplex::new();
    let params = Parameters {
        canvas_size: 320,
        octaves: 5,
        ..Parameters::default()
    };
    let fbm = params.validate().unwrap();
    let region = Region::canvas(&params, 0, 0);
    group
        .sample_size(10)
        .warm_up_time(std::time::Duration::from_millis(100))
        .measurement_time(std::time::Duration::from_secs(5));
    group.bench_function("canvas_320", |b| {
        b.iter(|| sample_region(&noise, &fbm, &region, Normalization::Signed))
    });
    group.bench_function("frame_320", |b| {
        b.iter(|| noisefield::render_frame(&noise, &params, 0, 0))
    });
    group.finish();
}

criterion_group!(benches, kernel, fbm, region);
criterion_main!(benches);
