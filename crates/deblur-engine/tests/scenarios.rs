// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end behaviour of the corrector: convergence, reset semantics, and
// the undefined-target state.

use deblur_core::config::{BlurSettings, DeblurConfig, ScheduleSettings};
use deblur_core::types::{BlurKind, IntensityCurve, StartWith};
use deblur_engine::blur::{self, BoxFilter};
use deblur_engine::seed::initial_guess;
use deblur_engine::{Corrector, CorrectorSettings, UNDEFINED_ERROR};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn settings(kind: BlurKind, radius: i32, limit: u32, start: f32, end: f32) -> CorrectorSettings {
    CorrectorSettings {
        blur: BlurSettings {
            kind,
            radius,
            backprop_strength: 1.0,
        },
        schedule: ScheduleSettings {
            iteration_limit: limit,
            start_intensity: start,
            end_intensity: end,
            curve: IntensityCurve::Linear,
        },
        start_with: StartWith::Target,
        show_relative_error: false,
    }
}

/// 3x3 black image with a white center pixel.
fn bright_center() -> RgbImage {
    let mut img = RgbImage::new(3, 3);
    img.put_pixel(1, 1, Rgb([255, 255, 255]));
    img
}

#[test]
fn uniform_target_needs_no_correction() {
    for kind in BlurKind::ALL {
        let target = RgbImage::from_pixel(10, 10, Rgb([128, 128, 128]));
        let mut corrector = Corrector::seeded(settings(kind, 3, 100, 4.0, 1.0), 1);
        corrector.set_target(Some(target.clone()));
        assert_eq!(corrector.error(), 0.0);

        for _ in 0..25 {
            corrector.step();
            assert_eq!(corrector.error(), 0.0, "{kind}");
        }
        assert_eq!(corrector.output(), Some(&target));
    }
}

#[test]
fn bright_center_error_decreases_over_run() {
    for seed in [1, 2, 3] {
        let mut s = settings(BlurKind::Box, 3, 100, 4.0, 1.0);
        s.start_with = StartWith::Solid([128, 128, 128]);
        let mut corrector = Corrector::seeded(s, seed);
        corrector.set_target(Some(bright_center()));
        let initial = corrector.error();
        assert!(initial > 0.0);

        assert_eq!(corrector.run_to_limit(), 100);
        let last = corrector.error();
        assert!(
            last < initial,
            "seed {seed}: error went from {initial} to {last}"
        );
    }
}

#[test]
fn zero_iteration_limit_is_finished_immediately() {
    let mut corrector = Corrector::seeded(settings(BlurKind::Box, 3, 0, 3.0, 1.0), 1);
    assert!(corrector.is_finished_iterating());

    corrector.set_target(Some(bright_center()));
    assert!(corrector.is_finished_iterating());
    corrector.reset(true, true);
    assert!(corrector.is_finished_iterating());
    assert_eq!(corrector.run_to_limit(), 0);
}

#[test]
fn clearing_target_returns_to_undefined() {
    let mut corrector = Corrector::seeded(settings(BlurKind::Gaussian, 3, 10, 3.0, 1.0), 1);
    corrector.set_target(Some(bright_center()));
    corrector.step();
    assert!(corrector.error() >= 0.0);

    corrector.set_target(None);
    assert_eq!(corrector.error(), UNDEFINED_ERROR);
    assert!(corrector.error_image().is_none());
    assert!(corrector.output().is_none());
    assert_eq!(corrector.iteration(), 0);

    corrector.step();
    assert_eq!(corrector.iteration(), 0);
}

#[test]
fn full_reset_restores_initial_guess() {
    for start_with in [
        StartWith::Target,
        StartWith::Average,
        StartWith::Solid([200, 10, 10]),
    ] {
        let target = blur::blur(&BoxFilter, &bright_center(), 2, 1.0);
        let mut s = settings(BlurKind::Box, 3, 50, 4.0, 1.0);
        s.start_with = start_with;
        let mut corrector = Corrector::seeded(s, 4);
        corrector.set_target(Some(target.clone()));
        for _ in 0..5 {
            corrector.step();
        }

        corrector.reset(true, true);
        let expected = initial_guess(start_with, &target, &mut StdRng::seed_from_u64(0));
        assert_eq!(corrector.iteration(), 0);
        assert_eq!(corrector.output(), Some(&expected), "{start_with}");
    }
}

#[test]
fn refresh_preserves_state_and_error_value() {
    let mut s = settings(BlurKind::Box, 3, 50, 4.0, 1.0);
    s.start_with = StartWith::Noise;
    let mut corrector = Corrector::seeded(s, 12);
    corrector.set_target(Some(bright_center()));
    for _ in 0..3 {
        corrector.step();
    }
    let candidate = corrector.output().cloned();
    let error = corrector.error();
    let plain_image = corrector.error_image().cloned().expect("error image");

    corrector.set_show_relative_error(true);
    assert_eq!(corrector.iteration(), 3);
    assert_eq!(corrector.output().cloned(), candidate);
    assert_eq!(corrector.error(), error);
    if error > 0.0 {
        let stretched = corrector.error_image().expect("error image");
        assert_eq!(stretched.as_raw().iter().copied().max(), Some(255));
        assert_eq!(stretched.dimensions(), plain_image.dimensions());
    }
}

#[test]
fn steps_keep_samples_in_range_for_arbitrary_inputs() {
    let mut rng = StdRng::seed_from_u64(99);
    for round in 0..5 {
        let target = RgbImage::from_fn(9, 7, |_, _| Rgb(rng.random()));
        let mut s = settings(BlurKind::Gaussian, 1 + round, 20, 5.0, 5.0);
        s.start_with = StartWith::Noise;
        s.blur.backprop_strength = 1.5;
        let mut corrector = Corrector::seeded(s, round as u64);
        corrector.set_target(Some(target));
        for _ in 0..10 {
            corrector.step();
            let derived = corrector.derived().expect("derived images");
            assert!(corrector.error() >= 0.0 && corrector.error() <= 255.0);
            assert_eq!(derived.error_image.dimensions(), (9, 7));
        }
    }
}

#[test]
fn same_seed_reproduces_run() {
    let config = DeblurConfig::default();
    let mut a = Corrector::seeded(CorrectorSettings::from(&config), 77);
    let mut b = Corrector::seeded(CorrectorSettings::from(&config), 77);
    a.set_target(Some(bright_center()));
    b.set_target(Some(bright_center()));
    for _ in 0..10 {
        a.step();
        b.step();
    }
    assert_eq!(a.output(), b.output());
    assert_eq!(a.error(), b.error());
}
