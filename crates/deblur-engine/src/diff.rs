// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Difference engine — signed per-sample differences split into two unsigned
// images, one per direction.

use deblur_core::error::{DeblurError, Result};
use image::{Rgb, RgbImage};
use imageproc::map::map_colors2;

/// Per-sample differences between an image and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalDiff {
    /// `target - image` where the image is darker than the target, else 0.
    pub shortfall: RgbImage,
    /// `image - target` where the image is brighter than the target, else 0.
    pub overshoot: RgbImage,
}

impl DirectionalDiff {
    /// Per-sample maximum of both directions. The two directions are never
    /// both non-zero, so this is also the absolute difference.
    pub fn combined(&self) -> RgbImage {
        map_colors2(&self.shortfall, &self.overshoot, |a: Rgb<u8>, b: Rgb<u8>| {
            Rgb([a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])])
        })
    }
}

/// Split the difference between `image` and `target` by direction.
///
/// Both images must have the same dimensions.
pub fn directional_diff(image: &RgbImage, target: &RgbImage) -> Result<DirectionalDiff> {
    if image.dimensions() != target.dimensions() {
        return Err(DeblurError::DimensionMismatch {
            expected: target.dimensions(),
            actual: image.dimensions(),
        });
    }

    let shortfall = map_colors2(image, target, |i: Rgb<u8>, t: Rgb<u8>| {
        Rgb([
            t[0].saturating_sub(i[0]),
            t[1].saturating_sub(i[1]),
            t[2].saturating_sub(i[2]),
        ])
    });
    let overshoot = map_colors2(image, target, |i: Rgb<u8>, t: Rgb<u8>| {
        Rgb([
            i[0].saturating_sub(t[0]),
            i[1].saturating_sub(t[1]),
            i[2].saturating_sub(t[2]),
        ])
    });

    Ok(DirectionalDiff {
        shortfall,
        overshoot,
    })
}

/// Like [`directional_diff`], but an absent input yields no difference.
pub fn directional_diff_opt(
    image: Option<&RgbImage>,
    target: Option<&RgbImage>,
) -> Result<Option<DirectionalDiff>> {
    match image.zip(target) {
        Some((image, target)) => directional_diff(image, target).map(Some),
        None => Ok(None),
    }
}

/// Mean over every sample of every channel. Zero for an empty image.
pub fn mean_sample(image: &RgbImage) -> f64 {
    let raw = image.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let total: u64 = raw.iter().map(|&v| u64::from(v)).sum();
    total as f64 / raw.len() as f64
}

/// Stretch `image` in place so its brightest sample becomes 255.
/// All-zero images are left untouched.
pub fn stretch_to_full_range(image: &mut RgbImage) {
    let max = image.as_raw().iter().copied().max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let scale = 255.0 / f32::from(max);
    for sample in image.iter_mut() {
        *sample = (f32::from(*sample) * scale).round().min(255.0) as u8;
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_image(rng: &mut StdRng, width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |_, _| Rgb(rng.random()))
    }

    #[test]
    fn differences_are_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let a = random_image(&mut rng, 6, 5);
            let b = random_image(&mut rng, 6, 5);
            let ab = directional_diff(&a, &b).unwrap();
            let ba = directional_diff(&b, &a).unwrap();
            assert_eq!(ab.shortfall, ba.overshoot);
            assert_eq!(ab.overshoot, ba.shortfall);
        }
    }

    #[test]
    fn differences_are_zero_where_comparison_fails() {
        let mut rng = StdRng::seed_from_u64(11);
        let image = random_image(&mut rng, 8, 8);
        let target = random_image(&mut rng, 8, 8);
        let diff = directional_diff(&image, &target).unwrap();

        for (((&i, &t), &short), &over) in image
            .iter()
            .zip(target.iter())
            .zip(diff.shortfall.iter())
            .zip(diff.overshoot.iter())
        {
            if i >= t {
                assert_eq!(short, 0);
            } else {
                assert_eq!(short, t - i);
            }
            if i <= t {
                assert_eq!(over, 0);
            } else {
                assert_eq!(over, i - t);
            }
        }
    }

    #[test]
    fn combined_is_absolute_difference() {
        let image = RgbImage::from_pixel(2, 1, Rgb([10, 200, 50]));
        let target = RgbImage::from_pixel(2, 1, Rgb([30, 100, 50]));
        let combined = directional_diff(&image, &target).unwrap().combined();
        assert_eq!(combined.get_pixel(0, 0).0, [20, 100, 0]);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let a = RgbImage::new(3, 3);
        let b = RgbImage::new(3, 4);
        assert!(matches!(
            directional_diff(&a, &b),
            Err(DeblurError::DimensionMismatch {
                expected: (3, 4),
                actual: (3, 3)
            })
        ));
    }

    #[test]
    fn undefined_input_yields_no_difference() {
        let a = RgbImage::new(2, 2);
        assert!(directional_diff_opt(None, Some(&a)).unwrap().is_none());
        assert!(directional_diff_opt(Some(&a), None).unwrap().is_none());
        assert!(directional_diff_opt(Some(&a), Some(&a)).unwrap().is_some());
    }

    #[test]
    fn mean_sample_averages_all_channels() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([30, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 30]));
        assert!((mean_sample(&img) - 10.0).abs() < 1e-12);
        assert_eq!(mean_sample(&RgbImage::new(0, 0)), 0.0);
    }

    #[test]
    fn stretch_scales_max_to_255() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([10, 20, 0]));
        img.put_pixel(1, 0, Rgb([51, 0, 0]));
        stretch_to_full_range(&mut img);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 0]);

        let mut black = RgbImage::new(2, 2);
        stretch_to_full_range(&mut black);
        assert_eq!(black, RgbImage::new(2, 2));
    }
}
