// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page emitter — write one page per image into a document sink, recording
// images that can't be used instead of aborting the run.

use std::sync::Arc;

use bildband_core::error::{BildbandError, Result};
use bildband_core::{ConversionOutcome, ImageEntry, PageSize};
use tracing::{info, instrument, warn};

use crate::image::loader::DecodedImage;
use crate::layout::LayoutResult;
use crate::pdf::sink::DocumentSink;
use crate::progress::{NoopProgress, SharedProgress};

/// A decoded image and the layout it will be drawn with.
#[derive(Debug, Clone)]
pub struct PreparedPage {
    pub image: DecodedImage,
    pub layout: LayoutResult,
}

/// Drives a [`DocumentSink`] through a whole run.
pub struct PageEmitter {
    progress: SharedProgress,
}

impl Default for PageEmitter {
    fn default() -> Self {
        Self::new(Arc::new(NoopProgress))
    }
}

impl PageEmitter {
    pub fn new(progress: SharedProgress) -> Self {
        Self { progress }
    }

    /// Write a page for every entry that `prepare` and the sink accept.
    ///
    /// `prepare` receives each entry and whether its page would be the first
    /// one in the document (so the title lands on the first page actually
    /// written). An error from `prepare` or from drawing skips that image:
    /// it is logged in the outcome, its partial page is discarded, and the
    /// next image is tried.
    ///
    /// If at least one page was written the sink is finalised and the
    /// outcome carries its path. Otherwise the sink is abandoned, nothing is
    /// saved, and the outcome has no output path. Only a failure to finalise
    /// is returned as an error.
    #[instrument(skip_all, fields(images = entries.len(), target = %sink.target().display()))]
    pub fn emit<S, F>(&self, entries: &[ImageEntry], mut prepare: F, mut sink: S) -> Result<ConversionOutcome>
    where
        S: DocumentSink,
        F: FnMut(&ImageEntry, bool) -> Result<PreparedPage>,
    {
        let total = entries.len();
        let mut outcome = ConversionOutcome::new();
        self.progress.on_run_start(total);

        for (index, entry) in entries.iter().enumerate() {
            let is_first_page = sink.pages_written() == 0;
            let drawn = prepare(entry, is_first_page).and_then(|page| draw_page(&mut sink, page));

            match drawn {
                Ok(page_size) => {
                    let page = sink.pages_written();
                    outcome.record_written(entry, page, page_size);
                    self.progress.on_page_written(page, index, total, &entry.name);
                }
                Err(err) => {
                    sink.discard_page();
                    let reason = skip_reason(&err);
                    warn!(image = %entry.file_name, reason = %reason, "Skipping image");
                    self.progress
                        .on_image_skipped(index, total, &entry.name, &reason);
                    outcome.record_skipped(entry, reason);
                }
            }
        }

        let pages = sink.pages_written();
        let skipped = outcome.failure_count();

        if pages == 0 {
            warn!(skipped, "No image could be used; nothing will be saved");
            sink.abandon();
            outcome.finish(None);
            self.progress.on_run_complete(pages, skipped);
            return Ok(outcome);
        }

        let target = sink.target().to_path_buf();
        sink.finalize()?;
        info!(pages, skipped, "Document finalised");
        outcome.finish(Some(target));
        self.progress.on_run_complete(pages, skipped);
        Ok(outcome)
    }
}

fn draw_page<S: DocumentSink>(sink: &mut S, page: PreparedPage) -> Result<PageSize> {
    let PreparedPage { image, layout } = page;
    sink.begin_page(layout.page)?;
    for text in layout.texts() {
        sink.draw_text(text)?;
    }
    sink.draw_image(image, layout.image_rect)?;
    sink.end_page()?;
    Ok(layout.page)
}

/// The outcome already names the image, so per-image errors only keep their
/// detail.
fn skip_reason(err: &BildbandError) -> String {
    match err {
        BildbandError::ImageProcessing { detail, .. } => detail.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::sync::Mutex;

    use super::*;
    use crate::layout::{LayoutEngine, TextPlacement};
    use crate::progress::ProgressObserver;
    use bildband_core::{ImageStatus, PaperSize, Rect};
    use image::{DynamicImage, RgbImage};

    /// Pixel width that makes [`RecordingSink::draw_image`] fail.
    const UNDRAWABLE_WIDTH: u32 = 13;

    #[derive(Default)]
    struct Log {
        committed: Vec<Vec<String>>,
        finalized: bool,
        abandoned: bool,
    }

    struct RecordingSink {
        log: Rc<RefCell<Log>>,
        current: Option<Vec<String>>,
        fail_finalize: bool,
        path: PathBuf,
    }

    impl RecordingSink {
        fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            let sink = Self {
                log: Rc::clone(&log),
                current: None,
                fail_finalize: false,
                path: PathBuf::from("/virtual/out.pdf"),
            };
            (sink, log)
        }
    }

    impl DocumentSink for RecordingSink {
        fn begin_page(&mut self, size: PageSize) -> Result<()> {
            self.current = Some(vec![format!("page {:?}", size.orientation())]);
            Ok(())
        }

        fn draw_text(&mut self, text: &TextPlacement) -> Result<()> {
            if let Some(ops) = self.current.as_mut() {
                ops.push(format!("text {:?} {}", text.tier, text.text));
            }
            Ok(())
        }

        fn draw_image(&mut self, image: DecodedImage, _rect: Rect) -> Result<()> {
            if image.width() == UNDRAWABLE_WIDTH {
                return Err(BildbandError::Sink("cannot embed image".into()));
            }
            if let Some(ops) = self.current.as_mut() {
                ops.push("image".into());
            }
            Ok(())
        }

        fn end_page(&mut self) -> Result<()> {
            let ops = self.current.take().expect("page started");
            self.log.borrow_mut().committed.push(ops);
            Ok(())
        }

        fn discard_page(&mut self) {
            self.current = None;
        }

        fn pages_written(&self) -> usize {
            self.log.borrow().committed.len()
        }

        fn target(&self) -> &Path {
            &self.path
        }

        fn finalize(self) -> Result<()> {
            if self.fail_finalize {
                return Err(BildbandError::Sink("disk full".into()));
            }
            self.log.borrow_mut().finalized = true;
            Ok(())
        }

        fn abandon(self) {
            self.log.borrow_mut().abandoned = true;
        }
    }

    fn entries(names: &[&str]) -> Vec<ImageEntry> {
        names
            .iter()
            .map(|n| ImageEntry::from_path(format!("/in/{n}.png")).unwrap())
            .collect()
    }

    /// Prepares pages from a fixed 40x30 image, failing for names in `bad`
    /// and producing an undrawable image for names in `undrawable`.
    fn preparer<'a>(
        bad: &'a [&'a str],
        undrawable: &'a [&'a str],
    ) -> impl FnMut(&ImageEntry, bool) -> Result<PreparedPage> + 'a {
        let engine = LayoutEngine::default();
        move |entry, is_first| {
            if bad.contains(&entry.name.as_str()) {
                return Err(BildbandError::image(&entry.name, "corrupt header"));
            }
            let width = if undrawable.contains(&entry.name.as_str()) {
                UNDRAWABLE_WIDTH
            } else {
                40
            };
            let image = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(width, 30)));
            let layout = engine.layout(PaperSize::A4.portrait(), width, 30, is_first, "Album", &entry.name);
            Ok(PreparedPage { image, layout })
        }
    }

    #[test]
    fn failures_are_skipped_and_order_kept() {
        let (sink, log) = RecordingSink::new();
        let list = entries(&["a", "b", "c", "d"]);

        let outcome = PageEmitter::default()
            .emit(&list, preparer(&["b", "d"], &[]), sink)
            .unwrap();

        assert_eq!(outcome.pages_written(), 2);
        let failed: Vec<&str> = outcome.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, ["b", "d"]);
        assert_eq!(outcome.output_path, Some(PathBuf::from("/virtual/out.pdf")));

        let log = log.borrow();
        assert!(log.finalized && !log.abandoned);
        assert_eq!(log.committed.len(), 2);
        assert!(log.committed[0].contains(&"text Caption a".to_string()));
        assert!(log.committed[1].contains(&"text Heading c".to_string()));

        match &outcome.records[2].status {
            ImageStatus::Written { page, .. } => assert_eq!(*page, 2),
            other => panic!("c should be on page 2, got {other:?}"),
        }
        match &outcome.records[1].status {
            ImageStatus::Skipped { reason } => assert_eq!(reason, "corrupt header"),
            other => panic!("b should be skipped, got {other:?}"),
        }
    }

    #[test]
    fn all_failures_abandon_the_sink() {
        let (sink, log) = RecordingSink::new();
        let list = entries(&["x", "y", "z"]);

        let outcome = PageEmitter::default()
            .emit(&list, preparer(&["x", "y", "z"], &[]), sink)
            .unwrap();

        assert_eq!(outcome.pages_written(), 0);
        assert_eq!(outcome.failure_count(), 3);
        assert!(outcome.output_path.is_none());
        let log = log.borrow();
        assert!(log.abandoned && !log.finalized);
    }

    #[test]
    fn title_goes_on_first_written_page() {
        let (sink, log) = RecordingSink::new();
        let list = entries(&["a", "b", "c"]);

        PageEmitter::default()
            .emit(&list, preparer(&["a"], &[]), sink)
            .unwrap();

        let log = log.borrow();
        assert_eq!(
            log.committed[0],
            ["page Portrait", "text Heading Album", "text Caption b", "image"]
        );
        assert_eq!(log.committed[1], ["page Portrait", "text Heading c", "image"]);
    }

    #[test]
    fn draw_failure_leaves_no_partial_page() {
        let (sink, log) = RecordingSink::new();
        let list = entries(&["a", "b", "c"]);

        let outcome = PageEmitter::default()
            .emit(&list, preparer(&[], &["b"]), sink)
            .unwrap();

        assert_eq!(outcome.pages_written(), 2);
        let log = log.borrow();
        let all_ops: Vec<&String> = log.committed.iter().flatten().collect();
        assert!(!all_ops.iter().any(|op| op.ends_with(" b")));
        match &outcome.records[1].status {
            ImageStatus::Skipped { reason } => assert!(reason.contains("cannot embed image")),
            other => panic!("b should be skipped, got {other:?}"),
        }
    }

    #[test]
    fn finalize_failure_is_fatal() {
        let (mut sink, _log) = RecordingSink::new();
        sink.fail_finalize = true;
        let list = entries(&["a"]);

        let err = PageEmitter::default()
            .emit(&list, preparer(&[], &[]), sink)
            .unwrap_err();
        assert!(matches!(err, BildbandError::Sink(_)));
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl ProgressObserver for EventLog {
        fn on_run_start(&self, total_images: usize) {
            self.0.lock().unwrap().push(format!("start {total_images}"));
        }
        fn on_page_written(&self, page: usize, index: usize, _total: usize, name: &str) {
            self.0.lock().unwrap().push(format!("page {page} from #{index} {name}"));
        }
        fn on_image_skipped(&self, index: usize, _total: usize, name: &str, _reason: &str) {
            self.0.lock().unwrap().push(format!("skip #{index} {name}"));
        }
        fn on_run_complete(&self, pages_written: usize, skipped: usize) {
            self.0.lock().unwrap().push(format!("done {pages_written}/{skipped}"));
        }
    }

    #[test]
    fn failed_save_does_not_report_completion() {
        let events = Arc::new(EventLog::default());
        let emitter = PageEmitter::new(events.clone());
        let (mut sink, _log) = RecordingSink::new();
        sink.fail_finalize = true;

        assert!(emitter.emit(&entries(&["a"]), preparer(&[], &[]), sink).is_err());

        let events = events.0.lock().unwrap();
        assert_eq!(*events, ["start 1", "page 1 from #0 a"]);
    }

    #[test]
    fn progress_events_follow_page_order() {
        let events = Arc::new(EventLog::default());
        let emitter = PageEmitter::new(events.clone());
        let (sink, _log) = RecordingSink::new();
        let list = entries(&["a", "b", "c"]);

        emitter.emit(&list, preparer(&["b"], &[]), sink).unwrap();

        let events = events.0.lock().unwrap();
        assert_eq!(
            *events,
            [
                "start 3",
                "page 1 from #0 a",
                "skip #1 b",
                "page 2 from #2 c",
                "done 2/1"
            ]
        );
    }
}
