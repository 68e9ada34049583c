// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildband: paper and page geometry, orientation
// policy, scanned image entries, and the per-run conversion outcome.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PDF points per millimetre (72 pt per inch, 25.4 mm per inch).
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height), portrait.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (width, height), portrait.
    ///
    /// North American sizes are defined in whole inches, so they use exact
    /// point values rather than the rounded millimetre table.
    pub fn dimensions_pt(&self) -> (f64, f64) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            _ => {
                let (w, h) = self.dimensions_mm();
                (w as f64 * POINTS_PER_MM, h as f64 * POINTS_PER_MM)
            }
        }
    }

    /// The paper with its short edge horizontal.
    pub fn portrait(&self) -> PageSize {
        let (w, h) = self.dimensions_pt();
        PageSize::new(w.min(h), w.max(h))
    }

    /// The paper rotated so its long edge is horizontal.
    pub fn landscape(&self) -> PageSize {
        self.portrait().rotated()
    }
}

/// Page orientation derived from a page's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

/// How page orientation is chosen for each image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationPolicy {
    /// Every page is portrait.
    Vertical,
    /// Every page is landscape.
    Horizontal,
    /// Landscape for images wider than tall, portrait otherwise.
    #[default]
    Automatic,
}

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Same paper, width and height swapped.
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Square pages count as portrait.
    pub fn orientation(&self) -> PageOrientation {
        if self.width > self.height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }
}

/// Axis-aligned rectangle in PDF points, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle lies entirely on the given page.
    pub fn fits_within(&self, page: PageSize) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= page.width && self.top() <= page.height
    }
}

/// Colour representation of a decoded image, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
    Other,
}

/// One image file found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name including extension, e.g. `Beach.JPG`.
    pub file_name: String,
    /// Display name used as the page caption (the file stem).
    pub name: String,
}

impl ImageEntry {
    /// Build an entry from a file path. Returns `None` for paths without a
    /// file name component.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        Some(Self {
            path: path.to_path_buf(),
            file_name,
            name,
        })
    }
}

/// What happened to a single image during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImageStatus {
    /// Drawn on `page` (1-indexed).
    Written { page: usize, page_size: PageSize },
    /// Left out of the document.
    Skipped { reason: String },
}

/// Per-image entry in the outcome log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub file_name: String,
    pub name: String,
    pub status: ImageStatus,
}

/// Aggregated result of a conversion run, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Where the document was saved. `None` when no page could be written.
    pub output_path: Option<PathBuf>,
    pub records: Vec<ImageRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for ConversionOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionOutcome {
    pub fn new() -> Self {
        Self {
            output_path: None,
            records: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_written(&mut self, entry: &ImageEntry, page: usize, page_size: PageSize) {
        self.records.push(ImageRecord {
            file_name: entry.file_name.clone(),
            name: entry.name.clone(),
            status: ImageStatus::Written { page, page_size },
        });
    }

    pub fn record_skipped(&mut self, entry: &ImageEntry, reason: impl Into<String>) {
        self.records.push(ImageRecord {
            file_name: entry.file_name.clone(),
            name: entry.name.clone(),
            status: ImageStatus::Skipped {
                reason: reason.into(),
            },
        });
    }

    /// Close the log. `output_path` is the saved document, if any.
    pub fn finish(&mut self, output_path: Option<PathBuf>) {
        self.output_path = output_path;
        self.finished_at = Some(Utc::now());
    }

    pub fn pages_written(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, ImageStatus::Written { .. }))
            .count()
    }

    /// Skipped images, in source order.
    pub fn failures(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, ImageStatus::Skipped { .. }))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// True when a document was saved and nothing was skipped.
    pub fn is_complete(&self) -> bool {
        self.output_path.is_some() && self.failure_count() == 0
    }

    /// End-of-run report: the output path (if any), then every skipped image
    /// with its reason.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        match &self.output_path {
            Some(path) => {
                let pages = self.pages_written();
                let noun = if pages == 1 { "page" } else { "pages" };
                let _ = writeln!(out, "PDF written to {} ({pages} {noun})", path.display());
            }
            None => {
                let _ = writeln!(out, "No PDF written: none of the images could be used");
            }
        }

        let skipped = self.failure_count();
        if skipped > 0 {
            let noun = if skipped == 1 { "image" } else { "images" };
            let _ = writeln!(out, "Skipped {skipped} {noun}:");
            for record in self.failures() {
                if let ImageStatus::Skipped { reason } = &record.status {
                    let _ = writeln!(out, "  - {}: {}", record.file_name, reason);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_matches_postscript_points() {
        let page = PaperSize::A4.portrait();
        assert!((page.width - 595.2756).abs() < 1e-3);
        assert!((page.height - 841.8898).abs() < 1e-3);
        assert_eq!(PaperSize::A4.landscape(), page.rotated());
    }

    #[test]
    fn custom_paper_portrait_puts_short_edge_first() {
        let paper = PaperSize::Custom {
            width_mm: 300,
            height_mm: 200,
        };
        let page = paper.portrait();
        assert!(page.width < page.height);
        assert_eq!(page.orientation(), PageOrientation::Portrait);
        assert_eq!(paper.landscape().orientation(), PageOrientation::Landscape);
    }

    #[test]
    fn square_page_is_portrait() {
        assert_eq!(
            PageSize::new(500.0, 500.0).orientation(),
            PageOrientation::Portrait
        );
    }

    #[test]
    fn entry_uses_stem_as_display_name() {
        let entry = ImageEntry::from_path("/photos/Beach Day.JPG").unwrap();
        assert_eq!(entry.file_name, "Beach Day.JPG");
        assert_eq!(entry.name, "Beach Day");
        assert!(ImageEntry::from_path("/").is_none());
    }

    #[test]
    fn rect_bounds_check() {
        let page = PageSize::new(100.0, 200.0);
        assert!(Rect::new(10.0, 10.0, 80.0, 180.0).fits_within(page));
        assert!(!Rect::new(30.0, 10.0, 80.0, 10.0).fits_within(page));
        assert!(!Rect::new(-1.0, 10.0, 10.0, 10.0).fits_within(page));
    }

    #[test]
    fn summary_lists_output_and_skips() {
        let a = ImageEntry::from_path("/in/a.png").unwrap();
        let b = ImageEntry::from_path("/in/b.png").unwrap();
        let mut outcome = ConversionOutcome::new();
        outcome.record_written(&a, 1, PaperSize::A4.portrait());
        outcome.record_skipped(&b, "unsupported colour type");
        outcome.finish(Some(PathBuf::from("/out/Report.pdf")));

        assert_eq!(outcome.pages_written(), 1);
        assert_eq!(outcome.failure_count(), 1);
        assert!(!outcome.is_complete());

        let summary = outcome.summary();
        assert!(summary.contains("/out/Report.pdf (1 page)"));
        assert!(summary.contains("Skipped 1 image:"));
        assert!(summary.contains("b.png: unsupported colour type"));
    }

    #[test]
    fn summary_without_output() {
        let a = ImageEntry::from_path("/in/a.png").unwrap();
        let mut outcome = ConversionOutcome::new();
        outcome.record_skipped(&a, "truncated");
        outcome.finish(None);
        assert!(outcome.summary().starts_with("No PDF written"));
        assert!(outcome.finished_at.is_some());
    }
}
