// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Initial guesses for the candidate image.

use deblur_core::types::StartWith;
use image::{Rgb, RgbImage};
use rand::Rng;

/// Build the initial candidate for `target` according to `start_with`.
/// Only [`StartWith::Noise`] draws from `rng`.
pub fn initial_guess<R: Rng>(
    start_with: StartWith,
    target: &RgbImage,
    rng: &mut R,
) -> RgbImage {
    let (width, height) = target.dimensions();
    match start_with {
        StartWith::Target => target.clone(),
        StartWith::Noise => RgbImage::from_fn(width, height, |_, _| Rgb(rng.random())),
        StartWith::Average => RgbImage::from_pixel(width, height, average_color(target)),
        StartWith::Solid(rgb) => RgbImage::from_pixel(width, height, Rgb(rgb)),
    }
}

/// Per-channel mean color, rounded. Black for an empty image.
pub fn average_color(image: &RgbImage) -> Rgb<u8> {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return Rgb([0, 0, 0]);
    }
    let mut sums = [0u64; 3];
    for pixel in image.pixels() {
        for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(value);
        }
    }
    Rgb(sums.map(|sum| (sum as f64 / count as f64).round() as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_tone() -> RgbImage {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([0, 100, 255]));
        img.put_pixel(1, 1, Rgb([200, 100, 255]));
        img
    }

    #[test]
    fn target_guess_is_a_copy() {
        let target = two_tone();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(initial_guess(StartWith::Target, &target, &mut rng), target);
    }

    #[test]
    fn average_guess_fills_mean_color() {
        let target = two_tone();
        let mut rng = StdRng::seed_from_u64(1);
        let guess = initial_guess(StartWith::Average, &target, &mut rng);
        assert!(guess.pixels().all(|p| p.0 == [50, 100, 255]));
    }

    #[test]
    fn solid_guess_fills_color() {
        let target = two_tone();
        let mut rng = StdRng::seed_from_u64(1);
        let guess = initial_guess(StartWith::Solid([9, 8, 7]), &target, &mut rng);
        assert_eq!(guess.dimensions(), (2, 2));
        assert!(guess.pixels().all(|p| p.0 == [9, 8, 7]));
    }

    #[test]
    fn noise_guess_is_reproducible_per_seed() {
        let target = RgbImage::new(16, 16);
        let a = initial_guess(StartWith::Noise, &target, &mut StdRng::seed_from_u64(5));
        let b = initial_guess(StartWith::Noise, &target, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert_ne!(a, target);
    }

    #[test]
    fn average_of_empty_image_is_black() {
        assert_eq!(average_color(&RgbImage::new(0, 0)), Rgb([0, 0, 0]));
    }
}
