// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — folder of images in, one PDF out.
//
// validate request -> list images -> open PDF sink -> for each image:
// decode, pick page size, lay out, draw -> save.

use std::path::PathBuf;
use std::sync::Arc;

use bildband_core::error::{BildbandError, Result};
use bildband_core::{AppConfig, ConversionOutcome, ImageEntry, OrientationPolicy};
use tracing::{info, instrument};

use crate::emitter::{PageEmitter, PreparedPage};
use crate::image::loader::{FileLoader, ImageLoader};
use crate::layout::LayoutEngine;
use crate::orientation::OrientationResolver;
use crate::pdf::sink::PdfSink;
use crate::progress::{NoopProgress, SharedProgress};
use crate::source::ImageSource;

/// File extension of the produced document.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Everything a single run needs, captured once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub title: String,
    pub policy: OrientationPolicy,
}

impl ConversionRequest {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        title: impl Into<String>,
        policy: OrientationPolicy,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            title: title.into(),
            policy,
        }
    }

    /// Check the request without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(BildbandError::validation(
                "source_dir",
                "choose the folder containing the images",
            ));
        }
        if self.dest_dir.as_os_str().is_empty() {
            return Err(BildbandError::validation(
                "dest_dir",
                "choose the folder the PDF is saved to",
            ));
        }
        if self.title.trim().is_empty() {
            return Err(BildbandError::validation(
                "title",
                "the document title must not be empty",
            ));
        }
        if self.title.contains(['/', '\\']) {
            return Err(BildbandError::validation(
                "title",
                "the document title names the PDF file and must not contain '/' or '\\'",
            ));
        }
        Ok(())
    }

    /// `<dest_dir>/<title>.pdf`.
    pub fn output_path(&self) -> PathBuf {
        self.dest_dir
            .join(format!("{}.{}", self.title, DOCUMENT_EXTENSION))
    }
}

/// Runs conversions with a fixed paper size, layout, and image loader.
pub struct ConversionPipeline<L = FileLoader> {
    loader: L,
    resolver: OrientationResolver,
    engine: LayoutEngine,
    progress: SharedProgress,
}

impl Default for ConversionPipeline<FileLoader> {
    fn default() -> Self {
        Self {
            loader: FileLoader,
            resolver: OrientationResolver::default(),
            engine: LayoutEngine::default(),
            progress: Arc::new(NoopProgress),
        }
    }
}

impl ConversionPipeline<FileLoader> {
    /// Build a pipeline from validated settings.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: FileLoader,
            resolver: OrientationResolver::new(config.paper_size),
            engine: LayoutEngine::new(config.layout),
            progress: Arc::new(NoopProgress),
        })
    }
}

impl<L: ImageLoader> ConversionPipeline<L> {
    /// Swap the image decoder.
    pub fn with_loader<M: ImageLoader>(self, loader: M) -> ConversionPipeline<M> {
        ConversionPipeline {
            loader,
            resolver: self.resolver,
            engine: self.engine,
            progress: self.progress,
        }
    }

    /// Report progress to `progress`.
    pub fn with_progress(mut self, progress: SharedProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Convert `request.source_dir` into `<dest_dir>/<title>.pdf`.
    ///
    /// Fails before creating any output when the request is incomplete, the
    /// folder has no images, or the destination can't be opened. Images that
    /// can't be used are listed in the outcome instead.
    #[instrument(skip_all, fields(source = %request.source_dir.display(), title = %request.title))]
    pub fn run(&self, request: &ConversionRequest) -> Result<ConversionOutcome> {
        request.validate()?;

        let entries = ImageSource::list(&request.source_dir)?;
        let output = request.output_path();
        let sink = PdfSink::create(&output, &request.title)?;
        info!(
            images = entries.len(),
            policy = ?request.policy,
            output = %output.display(),
            "Starting conversion"
        );

        let emitter = PageEmitter::new(Arc::clone(&self.progress));
        let outcome = emitter.emit(
            &entries,
            |entry, is_first_page| self.prepare(entry, is_first_page, request),
            sink,
        )?;

        info!(
            pages = outcome.pages_written(),
            skipped = outcome.failure_count(),
            "Conversion finished"
        );
        Ok(outcome)
    }

    /// Decode one image and compute its page layout.
    pub fn prepare(
        &self,
        entry: &ImageEntry,
        is_first_page: bool,
        request: &ConversionRequest,
    ) -> Result<PreparedPage> {
        let image = self.loader.open(&entry.path).map_err(|err| match err {
            err @ BildbandError::ImageProcessing { .. } => err,
            other => BildbandError::image(&entry.name, other),
        })?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(BildbandError::image(
                &entry.name,
                format!("image has no area ({width}x{height})"),
            ));
        }

        let page = self.resolver.resolve(request.policy, width, height);
        let layout = self.engine.layout(
            page,
            width,
            height,
            is_first_page,
            &request.title,
            &entry.name,
        );
        Ok(PreparedPage { image, layout })
    }
}
