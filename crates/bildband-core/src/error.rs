// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildband.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Bildband operations.
///
/// `ImageProcessing` is the only recoverable variant: the page emitter records
/// it against the offending image and moves on. Everything else aborts the run.
#[derive(Debug, Error)]
pub enum BildbandError {
    // -- Request errors --
    #[error("{field} is required: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("no supported images found in {}", directory.display())]
    EmptyInput { directory: PathBuf },

    // -- Per-image errors --
    #[error("could not process image {name}: {detail}")]
    ImageProcessing { name: String, detail: String },

    // -- Output errors --
    #[error("output document error: {0}")]
    Sink(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BildbandError {
    /// Shorthand for a missing or malformed request field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a failure tied to one image.
    pub fn image(name: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::ImageProcessing {
            name: name.into(),
            detail: detail.to_string(),
        }
    }

    /// Whether the run can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ImageProcessing { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildbandError>;
