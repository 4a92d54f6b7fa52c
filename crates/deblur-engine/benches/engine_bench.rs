// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the deblur-engine crate: the blur kernels on their
// own and a full corrector step on a small synthetic image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use deblur_core::config::{BlurSettings, ScheduleSettings};
use deblur_core::types::{BlurKind, StartWith};
use deblur_engine::blur::{self, BoxFilter, GaussianFilter};
use deblur_engine::{Corrector, CorrectorSettings};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 128x128 image with a bright square on a dark background.
fn synthetic_image() -> RgbImage {
    RgbImage::from_fn(128, 128, |x, y| {
        if (32..96).contains(&x) && (32..96).contains(&y) {
            Rgb([230, 220, 210])
        } else {
            Rgb([20, 30, 40])
        }
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark both kernels at a typical radius of 15.
fn bench_blur(c: &mut Criterion) {
    let img = synthetic_image();

    c.bench_function("box_blur r=15 (128x128)", |b| {
        b.iter(|| black_box(blur::blur(&BoxFilter, black_box(&img), 15, 1.0)));
    });
    c.bench_function("gaussian_blur r=15 (128x128)", |b| {
        b.iter(|| black_box(blur::blur(&GaussianFilter, black_box(&img), 15, 1.0)));
    });
}

/// Benchmark one full correction step, including the three blur passes and
/// the derived-image refresh that follow it.
fn bench_corrector_step(c: &mut Criterion) {
    let target = blur::blur(&BoxFilter, &synthetic_image(), 9, 1.0);
    let settings = CorrectorSettings {
        blur: BlurSettings {
            kind: BlurKind::Box,
            radius: 9,
            backprop_strength: 1.0,
        },
        schedule: ScheduleSettings::default(),
        start_with: StartWith::Average,
        show_relative_error: false,
    };
    let mut corrector = Corrector::seeded(settings, 42);
    corrector.set_target(Some(target));

    c.bench_function("corrector_step box r=9 (128x128)", |b| {
        b.iter(|| {
            corrector.step();
            black_box(corrector.error());
        });
    });
}

criterion_group!(benches, bench_blur, bench_corrector_step);
criterion_main!(benches);
