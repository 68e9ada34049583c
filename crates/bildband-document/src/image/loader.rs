// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loader — decode image files with the `image` crate and normalise
// their colour representation for embedding in a PDF.

use std::path::Path;

use bildband_core::ColorMode;
use bildband_core::error::{BildbandError, Result};
use image::{ColorType, DynamicImage};
use tracing::{debug, instrument};

/// Something that can turn an image file into pixels.
///
/// The pipeline only needs dimensions, the colour mode, and a way to reach an
/// 8-bit gray or RGB raster, so any decoder can stand in.
pub trait ImageLoader {
    fn open(&self, path: &Path) -> Result<DecodedImage>;
}

/// Decodes files from disk, guessing the format from the file contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ImageLoader for FileLoader {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn open(&self, path: &Path) -> Result<DecodedImage> {
        let name = display_name(path);
        let reader = image::ImageReader::open(path)
            .map_err(|err| BildbandError::image(&name, err))?
            .with_guessed_format()
            .map_err(|err| BildbandError::image(&name, err))?;
        let decoded = reader
            .decode()
            .map_err(|err| BildbandError::image(&name, err))?;

        debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            "Image decoded"
        );
        Ok(DecodedImage::from_dynamic(decoded))
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A decoded image together with the colour mode it was stored in.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    source_mode: ColorMode,
}

impl DecodedImage {
    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let source_mode = color_mode(image.color());
        Self { image, source_mode }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Colour mode of the file as decoded, before any normalisation.
    pub fn color_mode(&self) -> ColorMode {
        self.source_mode
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Whether [`normalized`](Self::normalized) would change the pixels.
    pub fn needs_conversion(&self) -> bool {
        !matches!(
            self.image,
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)
        )
    }

    /// Reduce the image to 8-bit gray or 8-bit RGB.
    ///
    /// Single-channel images stay single-channel; everything else that is
    /// not already 8-bit RGB (alpha, 16-bit, float) becomes 8-bit RGB.
    pub fn normalized(self) -> Self {
        if !self.needs_conversion() {
            return self;
        }
        let image = match self.source_mode {
            ColorMode::Gray => DynamicImage::ImageLuma8(self.image.to_luma8()),
            _ => DynamicImage::ImageRgb8(self.image.to_rgb8()),
        };
        debug!(from = ?self.source_mode, "Normalised colour mode");
        Self {
            image,
            source_mode: self.source_mode,
        }
    }

    /// Interleaved 8-bit samples, normalising first if needed.
    pub fn into_raster(self) -> Raster {
        let normalized = self.normalized();
        let (width, height) = (normalized.width(), normalized.height());
        let (pixels, channels) = match normalized.image {
            DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
            DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
            other => (other.to_rgb8().into_raw(), 3),
        };
        Raster {
            pixels,
            channels,
            width,
            height,
        }
    }
}

/// 8-bit gray (`channels == 1`) or RGB (`channels == 3`) pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub pixels: Vec<u8>,
    pub channels: u8,
    pub width: u32,
    pub height: u32,
}

fn color_mode(color: ColorType) -> ColorMode {
    match color {
        ColorType::L8 | ColorType::L16 => ColorMode::Gray,
        ColorType::La8 | ColorType::La16 => ColorMode::GrayAlpha,
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
        _ => ColorMode::Other,
    }
}
