// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation resolver — choose the page size for one image.

use bildband_core::{OrientationPolicy, PageSize, PaperSize};

/// Maps an orientation policy and an image's dimensions to a page size on a
/// fixed paper.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationResolver {
    paper: PaperSize,
}

impl OrientationResolver {
    pub fn new(paper: PaperSize) -> Self {
        Self { paper }
    }

    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    /// Page size for an image of `image_width` x `image_height` pixels.
    ///
    /// `Automatic` only looks at this image, so a document can mix portrait
    /// and landscape pages. Square images get portrait pages.
    pub fn resolve(&self, policy: OrientationPolicy, image_width: u32, image_height: u32) -> PageSize {
        match policy {
            OrientationPolicy::Vertical => self.paper.portrait(),
            OrientationPolicy::Horizontal => self.paper.landscape(),
            OrientationPolicy::Automatic if image_width > image_height => self.paper.landscape(),
            OrientationPolicy::Automatic => self.paper.portrait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildband_core::PageOrientation;

    fn orientation(policy: OrientationPolicy, w: u32, h: u32) -> PageOrientation {
        OrientationResolver::default().resolve(policy, w, h).orientation()
    }

    #[test]
    fn automatic_follows_image_shape() {
        assert_eq!(orientation(OrientationPolicy::Automatic, 800, 600), PageOrientation::Landscape);
        assert_eq!(orientation(OrientationPolicy::Automatic, 600, 800), PageOrientation::Portrait);
    }

    #[test]
    fn automatic_square_is_portrait() {
        assert_eq!(orientation(OrientationPolicy::Automatic, 800, 800), PageOrientation::Portrait);
    }

    #[test]
    fn fixed_policies_ignore_image_shape() {
        for (w, h) in [(800, 600), (600, 800), (1, 1)] {
            assert_eq!(orientation(OrientationPolicy::Vertical, w, h), PageOrientation::Portrait);
            assert_eq!(orientation(OrientationPolicy::Horizontal, w, h), PageOrientation::Landscape);
        }
    }

    #[test]
    fn uses_configured_paper() {
        let resolver = OrientationResolver::new(PaperSize::Letter);
        let page = resolver.resolve(OrientationPolicy::Horizontal, 10, 10);
        assert_eq!(page, PageSize::new(792.0, 612.0));
        assert_eq!(resolver.paper(), PaperSize::Letter);
    }
}
