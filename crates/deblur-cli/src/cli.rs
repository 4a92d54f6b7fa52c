// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use deblur_core::config::DeblurConfig;
use deblur_core::types::{BlurKind, IntensityCurve, StartWith};

/// Deblur — reconstruct an image whose blur matches a blurred target
#[derive(Debug, Parser)]
#[command(name = "deblur")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Iteratively reconstruct an unblurred image
    Run(RunArgs),
    /// Blur an image with one of the registered kernels
    Blur(BlurArgs),
    /// List the registered blur kernels
    Blurs,
}

/// Arguments for `deblur run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Blurred image to reconstruct
    #[arg(short = 'f', long, required_unless_present = "original")]
    pub target: Option<PathBuf>,

    /// Unblurred original. Without --target it is blurred to produce the
    /// target; either way it is used to score the reconstruction.
    #[arg(long)]
    pub original: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Directory for the output images
    #[arg(short, long, default_value = "deblur-out")]
    pub out_dir: PathBuf,

    /// Also write shortfall/overshoot images and their blurred versions
    #[arg(long)]
    pub dump_all: bool,

    /// Assumed blur kernel
    #[arg(long)]
    pub blur: Option<BlurKind>,

    /// Assumed blur radius in pixels
    #[arg(short, long)]
    pub radius: Option<i32>,

    /// Radius multiplier for the backpropagation blur
    #[arg(long)]
    pub strength: Option<f32>,

    /// Kernel used to blur --original into a target
    #[arg(long)]
    pub source_blur: Option<BlurKind>,

    /// Radius used to blur --original into a target
    #[arg(long)]
    pub source_radius: Option<i32>,

    /// Iteration limit
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Correction intensity at the first iteration
    #[arg(long)]
    pub start_intensity: Option<f32>,

    /// Correction intensity at the iteration limit
    #[arg(long)]
    pub end_intensity: Option<f32>,

    /// Shape of the intensity schedule
    #[arg(long)]
    pub curve: Option<IntensityCurve>,

    /// Initial guess: target, noise, average, a color name, #rrggbb, or r,g,b
    #[arg(long)]
    pub start_with: Option<StartWith>,

    /// Stretch the error image so its brightest sample is white
    #[arg(long, overrides_with = "no_relative_error")]
    pub relative_error: bool,

    /// Show the error image unstretched, even if the config enables it
    #[arg(long, overrides_with = "relative_error")]
    pub no_relative_error: bool,

    /// Seed for the random corrections
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run exactly this many steps instead of stopping at the limit
    #[arg(long)]
    pub steps: Option<u32>,
}

impl RunArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_overrides(&self, config: &mut DeblurConfig) {
        if let Some(kind) = self.blur {
            config.deblur_blur.kind = kind;
        }
        if let Some(radius) = self.radius {
            config.deblur_blur.radius = radius;
        }
        if let Some(strength) = self.strength {
            config.deblur_blur.backprop_strength = strength;
        }
        if let Some(kind) = self.source_blur {
            config.blur.kind = kind;
        }
        if let Some(radius) = self.source_radius {
            config.blur.radius = radius;
        }
        if let Some(limit) = self.iterations {
            config.schedule.iteration_limit = limit;
        }
        if let Some(start) = self.start_intensity {
            config.schedule.start_intensity = start;
        }
        if let Some(end) = self.end_intensity {
            config.schedule.end_intensity = end;
        }
        if let Some(curve) = self.curve {
            config.schedule.curve = curve;
        }
        if let Some(start_with) = self.start_with {
            config.start_with = start_with;
        }
        if self.relative_error {
            config.show_relative_error = true;
        } else if self.no_relative_error {
            config.show_relative_error = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.steps.is_some() {
            config.autoplay = false;
        }
    }
}

/// Arguments for `deblur blur`.
#[derive(Debug, Args)]
pub struct BlurArgs {
    /// Image to blur
    pub input: PathBuf,

    /// Where to write the blurred image
    pub output: PathBuf,

    /// Blur kernel
    #[arg(long, default_value = "box")]
    pub kind: BlurKind,

    /// Blur radius in pixels
    #[arg(short, long, default_value_t = 10)]
    pub radius: i32,
}
