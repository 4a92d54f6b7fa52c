// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster import/export — loading images as 8-bit RGB buffers for the engine,
// saving engine outputs, and comparing results.

use std::path::Path;

use deblur_core::error::{DeblurError, Result};
use image::RgbImage;
use tracing::{debug, info, instrument};

/// Load an image from disk and convert it to 8-bit RGB.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        DeblurError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img.to_rgb8())
}

/// Write an image to a file. The format is inferred from the file extension.
pub fn save_rgb(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        DeblurError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    debug!(path = %path.as_ref().display(), "Image saved");
    Ok(())
}

/// Root-mean-square difference over every sample of two same-sized images.
pub fn rmse(a: &RgbImage, b: &RgbImage) -> Result<f64> {
    if a.dimensions() != b.dimensions() {
        return Err(DeblurError::DimensionMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        });
    }
    Ok(imageproc::stats::root_mean_squared_error(a, b))
}
