// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intensity scheduler — maps an iteration number to the magnitude of the
// random correction applied during that step.

use deblur_core::config::ScheduleSettings;
use deblur_core::types::IntensityCurve;

/// Source of per-iteration correction intensities.
pub trait IntensitySchedule {
    /// Iteration at which a run counts as finished.
    fn iteration_limit(&self) -> u32;

    /// Correction magnitude for `iteration`.
    fn correction_intensity(&self, iteration: u32) -> f32;

    /// A limit of zero means the run is finished from the start.
    fn is_finished(&self, iteration: u32) -> bool {
        iteration >= self.iteration_limit()
    }
}

impl IntensitySchedule for ScheduleSettings {
    fn iteration_limit(&self) -> u32 {
        self.iteration_limit
    }

    fn correction_intensity(&self, iteration: u32) -> f32 {
        if iteration >= self.iteration_limit {
            return self.end_intensity;
        }
        if iteration == 0 {
            return self.start_intensity;
        }
        // 0 < iteration < limit, so the limit is non-zero here.
        let progress = iteration as f32 / self.iteration_limit as f32;
        match self.curve {
            IntensityCurve::Linear => {
                self.start_intensity + progress * (self.end_intensity - self.start_intensity)
            }
        }
    }
}
