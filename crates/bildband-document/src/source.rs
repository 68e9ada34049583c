// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image source — enumerate the supported image files of a directory in page
// order.

use std::cmp::Ordering;
use std::path::Path;

use bildband_core::ImageEntry;
use bildband_core::error::{BildbandError, Result};
use tracing::{debug, info, instrument};

/// File extensions accepted as images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "ico", "ppm", "pgm", "pbm", "pnm",
];

/// Whether `path` carries one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

/// Scans a directory for images.
pub struct ImageSource;

impl ImageSource {
    /// List the supported image files directly inside `directory`.
    ///
    /// Only regular files (or symlinks resolving to one) take part. The
    /// result is sorted by file name ignoring case, which is the page order.
    /// The listing is a snapshot: files added later are not picked up.
    #[instrument(skip_all, fields(directory = %directory.as_ref().display()))]
    pub fn list(directory: impl AsRef<Path>) -> Result<Vec<ImageEntry>> {
        let directory = directory.as_ref();
        let mut entries = Vec::new();

        for dir_entry in std::fs::read_dir(directory)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();

            if !is_supported(&path) {
                continue;
            }
            // `metadata` follows symlinks, so a link to a directory is dropped here.
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    debug!(path = %path.display(), "Skipping non-file entry");
                    continue;
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            }

            if let Some(entry) = ImageEntry::from_path(&path) {
                entries.push(entry);
            }
        }

        if entries.is_empty() {
            return Err(BildbandError::EmptyInput {
                directory: directory.to_path_buf(),
            });
        }

        entries.sort_by(page_order);
        info!(count = entries.len(), "Images found");
        Ok(entries)
    }
}

/// Case-insensitive name order. Names that only differ in case are ordered by
/// their exact text, and names that are not valid UTF-8 (and so display the
/// same) by their raw bytes, so the order never depends on directory
/// iteration.
fn page_order(a: &ImageEntry, b: &ImageEntry) -> Ordering {
    name_order(&a.file_name, &b.file_name)
        .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
}

fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
