// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildband-document — Turning a folder of images into a PDF.
//
// Scans a directory for supported images, picks a page size per image,
// lays the image and its captions out on the page, and streams the pages into
// a PDF sink. Individual images that fail are recorded and skipped.

pub mod emitter;
pub mod image;
pub mod layout;
pub mod orientation;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod source;

// Re-export the primary structs so callers can use `bildband_document::ConversionPipeline` etc.
pub use emitter::{PageEmitter, PreparedPage};
pub use image::loader::{DecodedImage, FileLoader, ImageLoader};
pub use layout::{LayoutEngine, LayoutResult, TextPlacement, TextTier};
pub use orientation::OrientationResolver;
pub use pdf::sink::{DocumentSink, PdfSink};
pub use pipeline::{ConversionPipeline, ConversionRequest};
pub use progress::{NoopProgress, ProgressObserver, SharedProgress};
pub use source::ImageSource;
