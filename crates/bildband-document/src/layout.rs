// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine — place one image and its captions on a page.
//
// Coordinates are PDF points with the origin at the bottom-left corner of the
// page, so "distance from the top" is expressed as `page_height - offset`.

use bildband_core::{LayoutConfig, PageSize, Rect};
use tracing::debug;

/// The two caption font tiers. Heading is always the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTier {
    /// Bold; the document title, or the image name on later pages.
    Heading,
    /// Regular; the image name printed under the title on the first page.
    Caption,
}

/// A single line of text centred on `center_x` with its baseline at
/// `baseline_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub tier: TextTier,
    pub font_size: f64,
    pub center_x: f64,
    pub baseline_y: f64,
}

/// Everything needed to draw one page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub page: PageSize,
    /// Where the image is drawn. Same aspect ratio as the source image.
    pub image_rect: Rect,
    /// Document title; only present on the first page.
    pub title: Option<TextPlacement>,
    /// Image display name; present on every page.
    pub caption: TextPlacement,
}

impl LayoutResult {
    /// Text lines in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextPlacement> {
        self.title.iter().chain(std::iter::once(&self.caption))
    }
}

/// Computes page layouts from a [`LayoutConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Width and height left for the image once the caption band and side
    /// margins are taken off the page.
    pub fn available_box(&self, page: PageSize) -> (f64, f64) {
        (
            page.width - self.config.horizontal_reserve,
            page.height - self.config.vertical_reserve,
        )
    }

    /// Lay out one page.
    ///
    /// The image is scaled to the largest size of its own aspect ratio that
    /// fits the available box, so it touches the box on at least one axis.
    /// It is centred horizontally and centred-then-lowered vertically.
    ///
    /// Both image dimensions must be non-zero.
    pub fn layout(
        &self,
        page: PageSize,
        image_width: u32,
        image_height: u32,
        is_first_page: bool,
        title_text: &str,
        caption_text: &str,
    ) -> LayoutResult {
        let (available_width, available_height) = self.available_box(page);
        let aspect = image_height as f64 / image_width as f64;

        let (draw_width, draw_height) = if aspect > available_height / available_width {
            // Taller than the box, proportionally.
            (available_height / aspect, available_height)
        } else {
            (available_width, available_width * aspect)
        };

        let x = (page.width - draw_width) / 2.0;
        let y = (page.height - draw_height) / 2.0 - self.config.image_offset;
        let image_rect = Rect::new(x, y, draw_width, draw_height);

        let center_x = page.width / 2.0;
        let heading_y = page.height - self.config.heading_offset;

        let (title, caption) = if is_first_page {
            let title = self.text(title_text, TextTier::Heading, center_x, heading_y);
            let caption = self.text(
                caption_text,
                TextTier::Caption,
                center_x,
                page.height - self.config.subheading_offset,
            );
            (Some(title), caption)
        } else {
            (None, self.text(caption_text, TextTier::Heading, center_x, heading_y))
        };

        debug!(
            page_w = page.width,
            page_h = page.height,
            x,
            y,
            draw_width,
            draw_height,
            is_first_page,
            "Page laid out"
        );

        LayoutResult {
            page,
            image_rect,
            title,
            caption,
        }
    }

    fn text(&self, text: &str, tier: TextTier, center_x: f64, baseline_y: f64) -> TextPlacement {
        let font_size = match tier {
            TextTier::Heading => self.config.heading_size,
            TextTier::Caption => self.config.caption_size,
        };
        TextPlacement {
            text: text.to_owned(),
            tier,
            font_size,
            center_x,
            baseline_y,
        }
    }
}
