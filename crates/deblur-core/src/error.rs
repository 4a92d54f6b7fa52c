// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the deblur engine.

use thiserror::Error;

/// Top-level error type for all deblur operations.
///
/// Operating on a corrector without a target is not an error: those calls
/// degrade to no-ops and sentinel values instead.
#[derive(Debug, Error)]
pub enum DeblurError {
    // -- Configuration errors --
    #[error("unsupported blur kind: {0}")]
    UnsupportedBlurKind(String),

    #[error("unsupported intensity curve: {0}")]
    UnsupportedCurveKind(String),

    #[error("unrecognized start-with value: {0}")]
    InvalidStartWith(String),

    // -- Image errors --
    #[error("image dimensions differ: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeblurError>;
