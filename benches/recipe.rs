#![allow(clippy::unwrap_used)]
//! Benchmarks for applying preset recipes to print-sized images

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use retrocam::preset::FilterPreset;
use std::hint::black_box;

/// Gradient image the size of an exported photo at scale 2
fn gradient(side: u32) -> RgbaImage {
    let channel = |v: u32| u8::try_from(v % 256).unwrap();
    RgbaImage::from_fn(side, side, |x, y| {
        Rgba([channel(x), channel(y), channel(x + y), 255])
    })
}

fn bench_recipe_apply(c: &mut Criterion) {
    let source = gradient(400);
    let mut group = c.benchmark_group("recipe_apply");

    for preset in FilterPreset::ALL {
        let recipe = preset.recipe();
        group.bench_with_input(
            BenchmarkId::from_parameter(preset.identifier()),
            &recipe,
            |b, recipe| {
                b.iter_batched_ref(
                    || source.clone(),
                    |img| recipe.apply(black_box(img)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_recipe_pixel(c: &mut Criterion) {
    let recipe = FilterPreset::Cyber.recipe();

    c.bench_function("recipe_apply_pixel", |b| {
        b.iter(|| black_box(recipe.apply_pixel(black_box([120, 64, 200]))));
    });
}

criterion_group!(benches, bench_recipe_apply, bench_recipe_pixel);
criterion_main!(benches);
