// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `deblur run` — load images, iterate the corrector, and export the results.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use deblur_core::config::DeblurConfig;
use deblur_engine::raster;
use image::RgbImage;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::state::Session;

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub steps: u32,
    pub iteration: u32,
    pub error: f64,
    /// RMSE against the original, when one was given.
    pub rmse: Option<f64>,
    pub written: Vec<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations={} steps={} error={:.3}",
            self.iteration, self.steps, self.error
        )?;
        if let Some(rmse) = self.rmse {
            write!(f, " rmse={rmse:.3}")?;
        }
        write!(f, " files={}", self.written.len())
    }
}

pub fn run(args: &RunArgs) -> anyhow::Result<RunSummary> {
    let mut config = match &args.config {
        Some(path) => DeblurConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeblurConfig::default(),
    };
    args.apply_overrides(&mut config);
    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("saving config {}", path.display()))?;
    }

    let mut session = Session::new(config);

    if let Some(path) = &args.original {
        let original =
            raster::load_rgb(path).with_context(|| format!("loading {}", path.display()))?;
        session.set_original_image(original);
    }
    match &args.target {
        Some(path) => {
            let target =
                raster::load_rgb(path).with_context(|| format!("loading {}", path.display()))?;
            session.set_blurred_image(target);
        }
        None => {
            if !session.blur_original() {
                bail!("no target image: pass --target or --original");
            }
        }
    }

    info!(
        iteration_limit = session.corrector.iteration_limit(),
        error = session.corrector.error(),
        "Starting reconstruction"
    );
    let steps = session.advance(args.steps);
    let iteration = session.corrector.iteration();
    let error = session.corrector.error();
    info!(iteration, error, "Average error per pixel");

    let rmse = match session.score() {
        Some(result) => Some(result.context("scoring against original")?),
        None => {
            if session.original.is_some() {
                warn!("Original could not be compared with the reconstruction");
            }
            None
        }
    };
    if let Some(rmse) = rmse {
        info!(rmse, "Distance from original");
    }

    let written = write_outputs(&session, &args.out_dir, args.dump_all)?;

    Ok(RunSummary {
        steps,
        iteration,
        error,
        rmse,
        written,
    })
}

/// Write every defined output image into `dir`.
fn write_outputs(session: &Session, dir: &Path, dump_all: bool) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let corrector = &session.corrector;
    let mut images: Vec<(&str, Option<&RgbImage>)> = vec![
        ("output.png", corrector.output()),
        ("blurred_output.png", corrector.blurred_output()),
        ("error.png", corrector.error_image()),
        ("target.png", corrector.target()),
    ];
    if dump_all {
        let derived = corrector.derived();
        images.extend([
            ("shortfall.png", derived.map(|d| &d.shortfall)),
            ("overshoot.png", derived.map(|d| &d.overshoot)),
            ("blurred_shortfall.png", derived.map(|d| &d.blurred_shortfall)),
            ("blurred_overshoot.png", derived.map(|d| &d.blurred_overshoot)),
        ]);
    }

    let mut written = Vec::new();
    for (name, image) in images {
        let Some(image) = image else {
            continue;
        };
        let path = dir.join(name);
        raster::save_rgb(image, &path)?;
        written.push(path);
    }
    info!(count = written.len(), dir = %dir.display(), "Outputs written");
    Ok(written)
}
