// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// deblur-engine — Iterative error-feedback deblurring.
//
// Provides the blur operator (box and Gaussian kernels behind a registry), the
// directional difference engine, the correction-intensity schedule, initial
// guess generation, raster import/export, and the corrector state machine
// that ties them together.

pub mod blur;
pub mod corrector;
pub mod diff;
pub mod raster;
pub mod schedule;
pub mod seed;

// Re-export the primary items so callers can use `deblur_engine::Corrector` etc.
pub use blur::{BlurFilter, BoxFilter, GaussianFilter};
pub use corrector::{Corrector, CorrectorSettings, DerivedImages, UNDEFINED_ERROR};
pub use diff::{DirectionalDiff, directional_diff};
pub use schedule::IntensitySchedule;
