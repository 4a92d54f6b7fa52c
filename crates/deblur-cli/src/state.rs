// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session state — the images and corrector driven by a single run.

use deblur_core::config::DeblurConfig;
use deblur_core::error::Result;
use deblur_engine::blur;
use deblur_engine::raster;
use deblur_engine::{Corrector, CorrectorSettings};
use image::RgbImage;
use tracing::{info, warn};

/// Everything one run works on.
pub struct Session {
    /// Effective configuration.
    pub config: DeblurConfig,
    /// Unblurred reference, if known. Used to synthesize a target and to
    /// score the reconstruction; never read by the corrector.
    pub original: Option<RgbImage>,
    pub corrector: Corrector,
}

impl Session {
    /// Create a session with no images loaded.
    pub fn new(config: DeblurConfig) -> Self {
        let settings = CorrectorSettings::from(&config);
        let corrector = match config.seed {
            Some(seed) => Corrector::seeded(settings, seed),
            None => Corrector::new(settings),
        };
        Self {
            config,
            original: None,
            corrector,
        }
    }

    pub fn set_original_image(&mut self, image: RgbImage) {
        self.original = Some(image);
    }

    /// Install the blurred image the corrector reconstructs towards.
    pub fn set_blurred_image(&mut self, image: RgbImage) {
        if let Some(original) = &self.original {
            if original.dimensions() != image.dimensions() {
                warn!(
                    original = ?original.dimensions(),
                    target = ?image.dimensions(),
                    "Original and target sizes differ; reconstruction will not be scored"
                );
            }
        }
        self.corrector.set_target(Some(image));
    }

    /// Blur the original with the configured source blur and use the result
    /// as the target. Returns `false` when no original is loaded.
    pub fn blur_original(&mut self) -> bool {
        let Some(original) = &self.original else {
            return false;
        };
        let settings = self.config.blur;
        let target = blur::blur(
            blur::filter_for(settings.kind),
            original,
            settings.radius,
            1.0,
        );
        info!(kind = %settings.kind, radius = settings.radius, "Target synthesized from original");
        self.set_blurred_image(target);
        true
    }

    /// Run `steps` steps regardless of the iteration limit.
    pub fn step_n(&mut self, steps: u32) -> u32 {
        if self.corrector.output().is_none() {
            return 0;
        }
        for _ in 0..steps {
            self.corrector.step();
        }
        steps
    }

    /// Advance according to the configuration: `steps` forced steps when
    /// given, otherwise up to the limit when autoplay is on.
    pub fn advance(&mut self, steps: Option<u32>) -> u32 {
        match steps {
            Some(n) => self.step_n(n),
            None if self.config.autoplay => self.corrector.run_to_limit(),
            None => 0,
        }
    }

    /// RMSE between the reconstruction and the original, when both exist and
    /// have matching sizes.
    pub fn score(&self) -> Option<Result<f64>> {
        let original = self.original.as_ref()?;
        let output = self.corrector.output()?;
        if original.dimensions() != output.dimensions() {
            return None;
        }
        Some(raster::rmse(output, original))
    }
}
