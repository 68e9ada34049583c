// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal progress for a conversion run, drawn with indicatif.

use std::time::Duration;

use bildband_document::ProgressObserver;
use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Spinner that turns into a counter once the image count is known.
///
/// Skipped images are printed above the bar as they happen; the final
/// summary is left to the caller.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for SpinnerProgress {
    fn on_run_start(&self, total_images: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} images  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS);
        self.bar.set_length(total_images as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_page_written(&self, page: usize, _index: usize, _total_images: usize, name: &str) {
        self.bar.set_message(format!("page {page}: {name}"));
        self.bar.inc(1);
    }

    fn on_image_skipped(&self, _index: usize, _total_images: usize, name: &str, reason: &str) {
        self.bar.println(format!("  ✗ {name}: {reason}"));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _pages_written: usize, _skipped: usize) {
        self.bar.finish_and_clear();
    }
}

impl Drop for SpinnerProgress {
    // Fatal errors end the run without `on_run_complete`.
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
