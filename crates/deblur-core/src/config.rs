// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration value objects and their JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{BlurKind, IntensityCurve, StartWith};

/// Parameters of a blur pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    /// Kernel shape.
    pub kind: BlurKind,
    /// Kernel radius in pixels. Values that scale to zero or below disable
    /// the blur instead of being rejected.
    pub radius: i32,
    /// Multiplier applied to `radius` for the backpropagation blur of the
    /// difference images.
    pub backprop_strength: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            kind: BlurKind::Box,
            radius: 10,
            backprop_strength: 1.0,
        }
    }
}

/// Correction schedule: how hard each iteration nudges the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Iteration at which the run counts as finished. Zero means the run is
    /// finished from the start.
    pub iteration_limit: u32,
    pub start_intensity: f32,
    pub end_intensity: f32,
    pub curve: IntensityCurve,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            iteration_limit: 100,
            start_intensity: 3.0,
            end_intensity: 1.0,
            curve: IntensityCurve::Linear,
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeblurConfig {
    /// Blur used to synthesize a target from an unblurred original.
    pub blur: BlurSettings,
    /// Blur the corrector assumes was applied to the target.
    pub deblur_blur: BlurSettings,
    pub schedule: ScheduleSettings,
    /// Initial guess for the candidate image.
    pub start_with: StartWith,
    /// Rescale the error image so its brightest sample is 255.
    pub show_relative_error: bool,
    /// Step automatically until the iteration limit is reached.
    pub autoplay: bool,
    /// RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for DeblurConfig {
    fn default() -> Self {
        Self {
            blur: BlurSettings::default(),
            deblur_blur: BlurSettings::default(),
            schedule: ScheduleSettings::default(),
            start_with: StartWith::Target,
            show_relative_error: false,
            autoplay: true,
            seed: None,
        }
    }
}

impl DeblurConfig {
    /// Read a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Read a configuration, falling back to defaults when the file does not
    /// exist. Malformed files are still reported as errors.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}
