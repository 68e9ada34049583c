// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress events emitted while pages are written.

use std::sync::Arc;

/// Receives progress events from the page emitter.
///
/// Every method has a no-op default so implementations only override what
/// they display. Events arrive on the converting thread, in page order.
pub trait ProgressObserver: Send + Sync {
    /// Called once before the first image is processed.
    fn on_run_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called after `name` was committed as page `page` (1-indexed).
    ///
    /// `index` is the image's 0-based position in the source listing.
    fn on_page_written(&self, page: usize, index: usize, total_images: usize, name: &str) {
        let _ = (page, index, total_images, name);
    }

    /// Called when an image is left out of the document.
    fn on_image_skipped(&self, index: usize, total_images: usize, name: &str, reason: &str) {
        let _ = (index, total_images, name, reason);
    }

    /// Called once the document has been saved, or abandoned because no
    /// image could be used. Not called when saving fails.
    fn on_run_complete(&self, pages_written: usize, skipped: usize) {
        let _ = (pages_written, skipped);
    }
}

/// Observer that ignores every event. Used when none is configured.
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// Shared observer handle as held by the pipeline.
pub type SharedProgress = Arc<dyn ProgressObserver>;
