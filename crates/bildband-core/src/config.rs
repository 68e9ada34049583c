// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildbandError, Result};
use crate::{OrientationPolicy, PaperSize};

/// Page geometry used when placing images and captions. All values are in
/// PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height taken away from the page before fitting the image (caption band
    /// plus bottom margin).
    pub vertical_reserve: f64,
    /// Width taken away from the page before fitting the image.
    pub horizontal_reserve: f64,
    /// How far the centred image is pushed down to clear the captions.
    pub image_offset: f64,
    /// Distance from the top edge to the first caption line's baseline.
    pub heading_offset: f64,
    /// Distance from the top edge to the second caption line's baseline.
    pub subheading_offset: f64,
    /// Font size of the heading tier (document title, or the image name on
    /// pages after the first).
    pub heading_size: f64,
    /// Font size of the caption tier (image name under the title).
    pub caption_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_reserve: 120.0,
            horizontal_reserve: 80.0,
            image_offset: 20.0,
            heading_offset: 40.0,
            subheading_offset: 60.0,
            heading_size: 16.0,
            caption_size: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Check that this layout leaves room for an image on `paper` in both
    /// orientations and keeps every placement on the page.
    pub fn validate(&self, paper: PaperSize) -> Result<()> {
        let values = [
            ("vertical_reserve", self.vertical_reserve),
            ("horizontal_reserve", self.horizontal_reserve),
            ("image_offset", self.image_offset),
            ("heading_offset", self.heading_offset),
            ("subheading_offset", self.subheading_offset),
            ("heading_size", self.heading_size),
            ("caption_size", self.caption_size),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(BildbandError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.caption_size <= 0.0 || self.heading_size <= self.caption_size {
            return Err(BildbandError::Config(format!(
                "heading_size ({}) must be larger than caption_size ({}), and both positive",
                self.heading_size, self.caption_size
            )));
        }

        // The image may move down by at most half the vertical reserve, or its
        // bottom edge would leave the page.
        if self.image_offset * 2.0 > self.vertical_reserve {
            return Err(BildbandError::Config(format!(
                "image_offset ({}) must not exceed half of vertical_reserve ({})",
                self.image_offset, self.vertical_reserve
            )));
        }

        // Portrait has the narrowest width and landscape the shortest height.
        let portrait = paper.portrait();
        let landscape = paper.landscape();
        if portrait.width <= self.horizontal_reserve || landscape.height <= self.vertical_reserve {
            return Err(BildbandError::Config(format!(
                "paper {:?} ({:.1} x {:.1} pt) is too small for reserves of {} x {} pt",
                paper, portrait.width, portrait.height, self.horizontal_reserve, self.vertical_reserve
            )));
        }

        if self.subheading_offset > landscape.height || self.heading_offset > landscape.height {
            return Err(BildbandError::Config(
                "caption offsets place text above the page".into(),
            ));
        }

        Ok(())
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Paper used for every page; orientation decides which way round.
    pub paper_size: PaperSize,
    /// Orientation policy applied when the caller doesn't choose one.
    pub orientation: OrientationPolicy,
    /// Image and caption geometry.
    pub layout: LayoutConfig,
}

impl AppConfig {
    /// Load settings from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate(self.paper_size)
    }
}
