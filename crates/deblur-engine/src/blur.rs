// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blur operator — box and Gaussian smoothing kernels behind a small registry.
//
// Both kernels are applied as two separable 1-D passes accumulated in f32 and
// rounded once at the end. Samples outside the image replicate the nearest
// edge sample; the same border policy is used for the forward blur and for
// the backpropagation blur of the difference images.

use deblur_core::error::Result;
use deblur_core::types::BlurKind;
use image::{Rgb, RgbImage};
use tracing::trace;

const CHANNELS: usize = 3;

/// A smoothing kernel that can be applied to an RGB image.
pub trait BlurFilter: Send + Sync {
    /// Kind this filter is registered under.
    fn kind(&self) -> BlurKind;

    /// Blur `image` with a kernel sized by `radius` (always at least 1).
    /// Never mutates the input.
    fn convolve(&self, image: &RgbImage, radius: u32) -> RgbImage;
}

/// Mean filter over a square window of side `radius`.
///
/// Even sides are allowed; the window then extends one sample further
/// towards the top-left than towards the bottom-right.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxFilter;

impl BlurFilter for BoxFilter {
    fn kind(&self) -> BlurKind {
        BlurKind::Box
    }

    fn convolve(&self, image: &RgbImage, radius: u32) -> RgbImage {
        let side = radius.max(1) as usize;
        let kernel = vec![1.0 / side as f32; side];
        convolve_separable(image, &kernel, side / 2)
    }
}

/// Gaussian filter. Even radii are bumped to the next odd width and the
/// standard deviation is half the width.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianFilter;

impl BlurFilter for GaussianFilter {
    fn kind(&self) -> BlurKind {
        BlurKind::Gaussian
    }

    fn convolve(&self, image: &RgbImage, radius: u32) -> RgbImage {
        let width = if radius % 2 == 1 { radius } else { radius + 1 };
        let kernel = gaussian_kernel(width as usize, width as f32 / 2.0);
        convolve_separable(image, &kernel, kernel.len() / 2)
    }
}

// -- Registry -----------------------------------------------------------------

/// Filter registered for `kind`.
pub fn filter_for(kind: BlurKind) -> &'static dyn BlurFilter {
    match kind {
        BlurKind::Box => &BoxFilter,
        BlurKind::Gaussian => &GaussianFilter,
    }
}

/// Resolve a kernel by name, rejecting unknown names with
/// `UnsupportedBlurKind`.
pub fn lookup(name: &str) -> Result<&'static dyn BlurFilter> {
    let kind: BlurKind = name.parse()?;
    Ok(filter_for(kind))
}

/// Names of every registered kernel.
pub fn all_blur_names() -> Vec<&'static str> {
    BlurKind::ALL.iter().map(BlurKind::as_str).collect()
}

// -- Operator -----------------------------------------------------------------

/// Radius actually used for a blur pass: `round(strength * radius)`.
pub fn effective_radius(radius: i32, strength: f32) -> i32 {
    (strength * radius as f32).round() as i32
}

/// Blur `image` with `filter` at `radius` scaled by `strength`.
///
/// An effective radius of zero or below is the identity: the result is an
/// unmodified copy of the input.
pub fn blur(filter: &dyn BlurFilter, image: &RgbImage, radius: i32, strength: f32) -> RgbImage {
    let effective = effective_radius(radius, strength);
    if effective <= 0 {
        return image.clone();
    }
    trace!(kind = %filter.kind(), radius, strength, effective, "Blurring image");
    filter.convolve(image, effective as u32)
}

/// Normalized 1-D Gaussian weights of the given odd `width`.
fn gaussian_kernel(width: usize, sigma: f32) -> Vec<f32> {
    let center = (width / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..width)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Index into `0..len`, replicating the edge for out-of-range positions.
fn clamp_index(pos: isize, len: usize) -> usize {
    pos.clamp(0, len as isize - 1) as usize
}

/// Apply `kernel` horizontally then vertically. `anchor` is the kernel tap
/// aligned with the output sample.
fn convolve_separable(image: &RgbImage, kernel: &[f32], anchor: usize) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let (w, h) = (width as usize, height as usize);
    let src = image.as_raw();

    // Horizontal pass, kept unrounded.
    let mut horizontal = vec![[0f32; CHANNELS]; w * h];
    for y in 0..h {
        for x in 0..w {
            let acc = &mut horizontal[y * w + x];
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - anchor as isize, w);
                let base = (y * w + sx) * CHANNELS;
                for (c, sum) in acc.iter_mut().enumerate() {
                    *sum += src[base + c] as f32 * weight;
                }
            }
        }
    }

    // Vertical pass, rounded back to 8 bits.
    RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let mut acc = [0f32; CHANNELS];
        for (k, &weight) in kernel.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - anchor as isize, h);
            let row = &horizontal[sy * w + x];
            for (sum, &value) in acc.iter_mut().zip(row) {
                *sum += value * weight;
            }
        }
        Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

// -- Tests --------------------------------------------------------------------
