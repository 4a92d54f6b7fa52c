// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the deblur engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeblurError;

/// Smoothing kernel used by the blur operator.
///
/// Serialized as its lowercase name; unknown names are rejected with
/// [`DeblurError::UnsupportedBlurKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BlurKind {
    /// Mean filter over a square window.
    Box,
    /// Gaussian filter with an odd kernel width and sigma = width / 2.
    Gaussian,
}

impl BlurKind {
    /// Every registered kernel kind, in display order.
    pub const ALL: [BlurKind; 2] = [BlurKind::Box, BlurKind::Gaussian];

    /// Lowercase name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for BlurKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlurKind {
    type Err = DeblurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| DeblurError::UnsupportedBlurKind(s.to_string()))
    }
}

impl TryFrom<String> for BlurKind {
    type Error = DeblurError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BlurKind> for String {
    fn from(kind: BlurKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Shape of the correction-intensity schedule between the start and end
/// intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IntensityCurve {
    #[default]
    Linear,
}

impl IntensityCurve {
    pub const ALL: [IntensityCurve; 1] = [IntensityCurve::Linear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for IntensityCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntensityCurve {
    type Err = DeblurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|curve| curve.as_str() == name)
            .ok_or_else(|| DeblurError::UnsupportedCurveKind(s.to_string()))
    }
}

impl TryFrom<String> for IntensityCurve {
    type Error = DeblurError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IntensityCurve> for String {
    fn from(curve: IntensityCurve) -> Self {
        curve.as_str().to_string()
    }
}

/// Initial guess used when the candidate image is (re)seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartWith {
    /// Copy of the target image.
    #[default]
    Target,
    /// Uniformly random samples.
    Noise,
    /// Solid fill with the per-channel mean color of the target.
    Average,
    /// Solid fill with a fixed RGB color.
    Solid([u8; 3]),
}

/// Named colors accepted by [`StartWith::from_str`].
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
];

impl fmt::Display for StartWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => f.write_str("target"),
            Self::Noise => f.write_str("noise"),
            Self::Average => f.write_str("average"),
            Self::Solid([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for StartWith {
    type Err = DeblurError;

    /// Accepts `target`, `noise`, `average`, a color name, `#rrggbb`, or `r,g,b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeblurError::InvalidStartWith(s.to_string());
        let value = s.trim().to_ascii_lowercase();

        match value.as_str() {
            "target" => return Ok(Self::Target),
            "noise" => return Ok(Self::Noise),
            "average" => return Ok(Self::Average),
            _ => {}
        }

        if let Some(&(_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == value) {
            return Ok(Self::Solid(rgb));
        }

        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let mut rgb = [0u8; 3];
            for (i, channel) in rgb.iter_mut().enumerate() {
                *channel =
                    u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            }
            return Ok(Self::Solid(rgb));
        }

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() == 3 {
            let mut rgb = [0u8; 3];
            for (channel, part) in rgb.iter_mut().zip(&parts) {
                *channel = part.parse().map_err(|_| invalid())?;
            }
            return Ok(Self::Solid(rgb));
        }

        Err(invalid())
    }
}

impl TryFrom<String> for StartWith {
    type Error = DeblurError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StartWith> for String {
    fn from(start: StartWith) -> Self {
        start.to_string()
    }
}
