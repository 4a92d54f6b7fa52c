// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Iterative corrector — owns the candidate image and nudges it towards an
// image whose blur matches the target, one randomized step at a time.
//
// ## Step
//
// 1. Blur the candidate with the assumed kernel.
// 2. Split its difference from the target into shortfall and overshoot.
// 3. Blur both differences again (backpropagation, radius scaled by the
//    backpropagation strength).
// 4. Add `blurred_shortfall * r * c` and subtract `blurred_overshoot * r * c`
//    from every sample, where `c` comes from the intensity schedule and `r`
//    is one uniform draw in [0, 1) shared by both terms of that sample.
// 5. Clamp to [0, 255] and recompute every derived image.

use deblur_core::config::{BlurSettings, DeblurConfig, ScheduleSettings};
use deblur_core::error::Result;
use deblur_core::types::StartWith;
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

use crate::blur::{self, BlurFilter};
use crate::diff::{self, DirectionalDiff};
use crate::schedule::IntensitySchedule;
use crate::seed;

/// Error value reported while no target or candidate is defined.
pub const UNDEFINED_ERROR: f64 = -1.0;

/// Everything the corrector needs to know besides the images themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectorSettings {
    /// Blur the target is assumed to have been produced with.
    pub blur: BlurSettings,
    pub schedule: ScheduleSettings,
    /// Initial guess used whenever the candidate is reseeded.
    pub start_with: StartWith,
    /// Stretch the error image to the full 0..=255 range for display.
    pub show_relative_error: bool,
}

impl Default for CorrectorSettings {
    fn default() -> Self {
        Self::from(&DeblurConfig::default())
    }
}

impl From<&DeblurConfig> for CorrectorSettings {
    fn from(config: &DeblurConfig) -> Self {
        Self {
            blur: config.deblur_blur,
            schedule: config.schedule,
            start_with: config.start_with,
            show_relative_error: config.show_relative_error,
        }
    }
}

/// Images derived from the current candidate and target.
///
/// Always computed as a whole and swapped in as a unit, so readers never see
/// a mix of old and new images.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedImages {
    pub blurred_candidate: RgbImage,
    pub shortfall: RgbImage,
    pub overshoot: RgbImage,
    pub blurred_shortfall: RgbImage,
    pub blurred_overshoot: RgbImage,
    /// Per-sample maximum of shortfall and overshoot, stretched when relative
    /// error display is enabled. Display only; never fed back into a step.
    pub error_image: RgbImage,
    /// Mean of the unstretched combined difference.
    pub error: f64,
}

impl DerivedImages {
    /// Compute every derived image for `candidate` against `target`.
    pub fn compute(
        candidate: &RgbImage,
        target: &RgbImage,
        filter: &dyn BlurFilter,
        blur_settings: &BlurSettings,
        show_relative_error: bool,
    ) -> Result<Self> {
        let blurred_candidate = blur::blur(filter, candidate, blur_settings.radius, 1.0);
        let difference = diff::directional_diff(&blurred_candidate, target)?;
        Ok(Self::from_difference(
            blurred_candidate,
            difference,
            filter,
            blur_settings,
            show_relative_error,
        ))
    }

    /// Finish the snapshot from an already blurred candidate and its
    /// difference to the target.
    fn from_difference(
        blurred_candidate: RgbImage,
        difference: DirectionalDiff,
        filter: &dyn BlurFilter,
        blur_settings: &BlurSettings,
        show_relative_error: bool,
    ) -> Self {
        let radius = blur_settings.radius;
        let strength = blur_settings.backprop_strength;

        let blurred_shortfall = blur::blur(filter, &difference.shortfall, radius, strength);
        let blurred_overshoot = blur::blur(filter, &difference.overshoot, radius, strength);

        let mut error_image = difference.combined();
        let error = diff::mean_sample(&error_image);
        if show_relative_error && error > 0.0 {
            diff::stretch_to_full_range(&mut error_image);
        }

        Self {
            blurred_candidate,
            shortfall: difference.shortfall,
            overshoot: difference.overshoot,
            blurred_shortfall,
            blurred_overshoot,
            error_image,
            error,
        }
    }
}

/// Apply one randomized correction to `candidate` in place.
///
/// Each sample moves by `(push - pull) * r * intensity`, with `r` drawn once
/// per sample, then is rounded and clamped to [0, 255].
pub fn apply_correction<R: Rng>(
    candidate: &mut RgbImage,
    push: &RgbImage,
    pull: &RgbImage,
    intensity: f32,
    rng: &mut R,
) {
    for ((sample, &up), &down) in candidate.iter_mut().zip(push.iter()).zip(pull.iter()) {
        let r: f32 = rng.random();
        let scale = r * intensity;
        let value = f32::from(*sample) + f32::from(up) * scale - f32::from(down) * scale;
        *sample = value.round().clamp(0.0, 255.0) as u8;
    }
}

/// Iterative error-feedback deblurring state machine.
///
/// Starts without a target; every query then returns `None` or
/// [`UNDEFINED_ERROR`] and [`step`](Self::step) does nothing. Installing a
/// target seeds the candidate and computes the derived images.
pub struct Corrector<R = StdRng> {
    settings: CorrectorSettings,
    filter: &'static dyn BlurFilter,
    target: Option<RgbImage>,
    candidate: Option<RgbImage>,
    derived: Option<DerivedImages>,
    iteration: u32,
    rng: R,
}

impl Corrector<StdRng> {
    /// Create a corrector seeded from the operating system.
    pub fn new(settings: CorrectorSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Create a corrector with a deterministic random stream.
    pub fn seeded(settings: CorrectorSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Corrector<R> {
    /// Create a corrector drawing from `rng`.
    pub fn with_rng(settings: CorrectorSettings, rng: R) -> Self {
        Self {
            filter: blur::filter_for(settings.blur.kind),
            settings,
            target: None,
            candidate: None,
            derived: None,
            iteration: 0,
            rng,
        }
    }

    // -- Commands -------------------------------------------------------------

    /// Install (or clear) the target, then reseed the candidate and restart
    /// the iteration count.
    #[instrument(skip_all, fields(dimensions = ?target.as_ref().map(|t| t.dimensions())))]
    pub fn set_target(&mut self, target: Option<RgbImage>) {
        info!("Target replaced");
        self.target = target;
        self.reset(true, true);
    }

    /// Reset the session.
    ///
    /// The candidate is reseeded from the target when `reseed_image` is set or
    /// no candidate exists yet; the iteration count returns to zero when
    /// `reset_iteration_count` is set. Derived images are always recomputed,
    /// so `reset(false, false)` refreshes the display without touching pixels.
    #[instrument(skip(self))]
    pub fn reset(&mut self, reset_iteration_count: bool, reseed_image: bool) {
        if reseed_image || self.candidate.is_none() {
            let start_with = self.settings.start_with;
            self.candidate = self
                .target
                .as_ref()
                .map(|target| seed::initial_guess(start_with, target, &mut self.rng));
            debug!(%start_with, "Candidate reseeded");
        }
        if reset_iteration_count {
            self.iteration = 0;
        }
        self.recompute_derived();
    }

    /// Reseed the candidate and restart counting from zero.
    pub fn restart(&mut self) {
        self.reset(true, true);
    }

    /// Recompute derived images only.
    pub fn refresh(&mut self) {
        self.reset(false, false);
    }

    /// Advance by one correction step. Does nothing without a candidate.
    ///
    /// Steps are still allowed once the iteration limit has been reached.
    pub fn step(&mut self) {
        if self.candidate.is_none() {
            return;
        }
        if self.derived.is_none() {
            self.recompute_derived();
        }
        let intensity = self.settings.schedule.correction_intensity(self.iteration);

        let (Some(candidate), Some(derived)) = (self.candidate.as_mut(), self.derived.as_ref())
        else {
            return;
        };
        apply_correction(
            candidate,
            &derived.blurred_shortfall,
            &derived.blurred_overshoot,
            intensity,
            &mut self.rng,
        );

        self.recompute_derived();
        self.iteration += 1;
        debug!(
            iteration = self.iteration,
            intensity,
            error = self.error(),
            "Average error per pixel"
        );
    }

    /// Step until the iteration limit is reached. Returns the number of steps
    /// taken; zero when already finished or without a candidate.
    pub fn run_to_limit(&mut self) -> u32 {
        let mut steps = 0;
        while self.candidate.is_some() && !self.is_finished_iterating() {
            self.step();
            steps += 1;
        }
        if steps > 0 {
            info!(steps, error = self.error(), "Iteration limit reached");
        }
        steps
    }

    // -- Configuration --------------------------------------------------------

    /// Change the assumed blur. Pixels are kept; derived images are refreshed.
    pub fn set_blur_settings(&mut self, blur: BlurSettings) {
        info!(kind = %blur.kind, radius = blur.radius, strength = blur.backprop_strength, "Blur settings changed");
        self.filter = blur::filter_for(blur.kind);
        self.settings.blur = blur;
        self.refresh();
    }

    /// Change the schedule. Takes effect from the next step.
    pub fn set_schedule_settings(&mut self, schedule: ScheduleSettings) {
        info!(
            iteration_limit = schedule.iteration_limit,
            start = schedule.start_intensity,
            end = schedule.end_intensity,
            "Schedule changed"
        );
        self.settings.schedule = schedule;
    }

    /// Toggle error-image stretching. The error value is unaffected.
    pub fn set_show_relative_error(&mut self, show: bool) {
        self.settings.show_relative_error = show;
        self.refresh();
    }

    /// Change the initial guess used by the next reseed.
    pub fn set_start_with(&mut self, start_with: StartWith) {
        self.settings.start_with = start_with;
    }

    // -- Queries --------------------------------------------------------------

    pub fn settings(&self) -> &CorrectorSettings {
        &self.settings
    }

    pub fn target(&self) -> Option<&RgbImage> {
        self.target.as_ref()
    }

    /// Current candidate.
    pub fn output(&self) -> Option<&RgbImage> {
        self.candidate.as_ref()
    }

    /// Candidate blurred with the assumed kernel.
    pub fn blurred_output(&self) -> Option<&RgbImage> {
        self.derived.as_ref().map(|d| &d.blurred_candidate)
    }

    /// Combined difference image for display.
    pub fn error_image(&self) -> Option<&RgbImage> {
        self.derived.as_ref().map(|d| &d.error_image)
    }

    /// Mean combined difference, or [`UNDEFINED_ERROR`].
    pub fn error(&self) -> f64 {
        self.derived.as_ref().map_or(UNDEFINED_ERROR, |d| d.error)
    }

    /// The full snapshot of derived images, if defined.
    pub fn derived(&self) -> Option<&DerivedImages> {
        self.derived.as_ref()
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn iteration_limit(&self) -> u32 {
        self.settings.schedule.iteration_limit()
    }

    pub fn is_finished_iterating(&self) -> bool {
        self.settings.schedule.is_finished(self.iteration)
    }

    // -- Internals ------------------------------------------------------------

    fn recompute_derived(&mut self) {
        let blurred_candidate = self
            .candidate
            .as_ref()
            .map(|candidate| blur::blur(self.filter, candidate, self.settings.blur.radius, 1.0));
        let difference = diff::directional_diff_opt(blurred_candidate.as_ref(), self.target.as_ref());
        self.derived = match (blurred_candidate, difference) {
            (Some(blurred_candidate), Ok(Some(difference))) => Some(DerivedImages::from_difference(
                blurred_candidate,
                difference,
                self.filter,
                &self.settings.blur,
                self.settings.show_relative_error,
            )),
            (_, Ok(_)) => None,
            (_, Err(err)) => {
                warn!(error = %err, "Derived images unavailable");
                None
            }
        };
    }
}

// -- Tests --------------------------------------------------------------------
