// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `deblur blur` — produce a blurred test image.

use anyhow::Context;
use deblur_engine::{blur, raster};
use tracing::info;

use crate::cli::BlurArgs;

pub fn run(args: &BlurArgs) -> anyhow::Result<()> {
    let image = raster::load_rgb(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let blurred = blur::blur(blur::filter_for(args.kind), &image, args.radius, 1.0);
    raster::save_rgb(&blurred, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        kind = %args.kind,
        radius = args.radius,
        output = %args.output.display(),
        "Blurred image written"
    );
    Ok(())
}
