// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF sink — assemble pages with `printpdf` 0.8 and save them to disk.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Pages are staged as drafts and only turned into ops
// (and images only registered with the document) once the page is complete,
// so a discarded page leaves nothing behind.
//
// Text is set in Helvetica / Helvetica-Bold using the font programs printpdf
// bundles for its builtin fonts. They are embedded as regular fonts so text
// is written by glyph id (any character the font covers renders, accents
// included) and measured with the fonts' own advance widths.

use std::path::{Path, PathBuf};

use bildband_core::error::{BildbandError, Result};
use bildband_core::{PageSize, Rect};
use printpdf::{
    BuiltinFont, FontId, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, RawImage, RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::loader::{DecodedImage, Raster};
use crate::layout::{TextPlacement, TextTier};

/// Destination for a sequence of pages.
///
/// Lifecycle: created empty, then any number of `begin_page` / draw /
/// `end_page` rounds, then consumed exactly once by `finalize` (persist) or
/// `abandon` (drop everything). A page that is begun but not ended can be
/// thrown away with `discard_page`.
pub trait DocumentSink {
    /// Start a page of the given size. An unfinished page is discarded first.
    fn begin_page(&mut self, size: PageSize) -> Result<()>;

    /// Draw one line of text centred on its anchor.
    fn draw_text(&mut self, text: &TextPlacement) -> Result<()>;

    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, image: DecodedImage, rect: Rect) -> Result<()>;

    /// Commit the current page.
    fn end_page(&mut self) -> Result<()>;

    /// Drop the current page, if any, without committing it.
    fn discard_page(&mut self);

    /// Pages committed so far.
    fn pages_written(&self) -> usize;

    /// Where the document will be saved.
    fn target(&self) -> &Path;

    /// Persist the document.
    fn finalize(self) -> Result<()>
    where
        Self: Sized;

    /// Release the sink without persisting anything.
    fn abandon(self)
    where
        Self: Sized;
}

/// Something drawn on a page that has not been committed yet.
enum DraftItem {
    Text(TextPlacement),
    Image(Raster, Rect),
}

struct PageDraft {
    size: PageSize,
    items: Vec<DraftItem>,
}

/// A font registered with the document, kept parsed for measuring text.
struct EmbeddedFont {
    id: FontId,
    parsed: ParsedFont,
}

impl EmbeddedFont {
    fn register(document: &mut PdfDocument, builtin: BuiltinFont) -> Result<Self> {
        let bytes = builtin.get_subset_font().bytes;
        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(&bytes, 0, &mut warnings).ok_or_else(|| {
            BildbandError::Sink(format!("cannot load the {builtin:?} font program"))
        })?;
        let id = document.add_font(&parsed);
        Ok(Self { id, parsed })
    }

    /// Advance width of `text` set at `font_size`, in points.
    ///
    /// Characters the font lacks are written as glyph 0, so they are measured
    /// as glyph 0 too.
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|c| {
                let glyph = self.parsed.lookup_glyph_index(c as u32).unwrap_or(0);
                u32::from(self.parsed.get_horizontal_advance(glyph))
            })
            .sum();
        let units_per_em = f64::from(self.parsed.font_metrics.units_per_em.max(1));
        units as f64 / units_per_em * font_size
    }
}

/// Writes pages into a PDF file using `printpdf`.
pub struct PdfSink {
    path: PathBuf,
    document: PdfDocument,
    heading_font: EmbeddedFont,
    caption_font: EmbeddedFont,
    pages: Vec<PdfPage>,
    current: Option<PageDraft>,
}

impl PdfSink {
    /// Prepare a PDF at `path` with `title` as its document title.
    ///
    /// The containing directory must already exist. Nothing is written until
    /// [`finalize`](DocumentSink::finalize); an existing file at `path` is
    /// then overwritten.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn create(path: impl AsRef<Path>, title: &str) -> Result<Self> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        match std::fs::metadata(parent) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(BildbandError::Sink(format!(
                    "{} is not a directory",
                    parent.display()
                )));
            }
            Err(err) => {
                return Err(BildbandError::Sink(format!(
                    "cannot open {}: {}",
                    parent.display(),
                    err
                )));
            }
        }
        if path.is_dir() {
            return Err(BildbandError::Sink(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let mut document = PdfDocument::new(title);
        let heading_font = EmbeddedFont::register(&mut document, BuiltinFont::HelveticaBold)?;
        let caption_font = EmbeddedFont::register(&mut document, BuiltinFont::Helvetica)?;

        info!(title, "Opened PDF sink");
        Ok(Self {
            path: path.to_path_buf(),
            document,
            heading_font,
            caption_font,
            pages: Vec::new(),
            current: None,
        })
    }

    fn font(&self, tier: TextTier) -> &EmbeddedFont {
        match tier {
            TextTier::Heading => &self.heading_font,
            TextTier::Caption => &self.caption_font,
        }
    }

    /// Rendered width of `text` in the font of `tier`, in points.
    pub fn text_width(&self, text: &str, tier: TextTier, font_size: f64) -> f64 {
        self.font(tier).text_width(text, font_size)
    }

    fn draft(&mut self) -> Result<&mut PageDraft> {
        self.current
            .as_mut()
            .ok_or_else(|| BildbandError::Sink("no page has been started".into()))
    }

    fn text_ops(&self, text: &TextPlacement, ops: &mut Vec<Op>) {
        let font = self.font(text.tier);
        let left = text.center_x - font.text_width(&text.text, text.font_size) / 2.0;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(left as f32),
                y: Pt(text.baseline_y as f32),
            },
        });
        ops.push(Op::SetFontSize {
            size: Pt(text.font_size as f32),
            font: font.id.clone(),
        });
        ops.push(Op::WriteText {
            items: vec![TextItem::Text(text.text.clone())],
            font: font.id.clone(),
        });
        ops.push(Op::EndTextSection);
    }

    fn image_op(&mut self, raster: Raster, rect: Rect) -> Op {
        let (px_w, px_h) = (raster.width, raster.height);
        let data_format = if raster.channels == 1 {
            RawImageFormat::R8
        } else {
            RawImageFormat::RGB8
        };
        let raw = RawImage {
            pixels: RawImageData::U8(raster.pixels),
            width: px_w as usize,
            height: px_h as usize,
            data_format,
            tag: Vec::new(),
        };
        let id = self.document.add_image(&raw);

        // At 72 dpi one pixel is one point, so the scale is points per pixel.
        Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(rect.x as f32)),
                translate_y: Some(Pt(rect.y as f32)),
                scale_x: Some((rect.width / px_w as f64) as f32),
                scale_y: Some((rect.height / px_h as f64) as f32),
                dpi: Some(72.0),
                rotate: None,
            },
        }
    }
}

impl DocumentSink for PdfSink {
    fn begin_page(&mut self, size: PageSize) -> Result<()> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(BildbandError::Sink(format!(
                "invalid page size {} x {}",
                size.width, size.height
            )));
        }
        if self.current.is_some() {
            warn!("Unfinished page discarded");
        }
        self.current = Some(PageDraft {
            size,
            items: Vec::new(),
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPlacement) -> Result<()> {
        let draft = self.draft()?;
        draft.items.push(DraftItem::Text(text.clone()));
        Ok(())
    }

    fn draw_image(&mut self, image: DecodedImage, rect: Rect) -> Result<()> {
        let draft = self.draft()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(BildbandError::Sink("image has no pixels".into()));
        }
        if !rect.fits_within(draft.size) || rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(BildbandError::Sink(format!(
                "image rectangle {rect:?} does not fit the page"
            )));
        }
        draft.items.push(DraftItem::Image(image.into_raster(), rect));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let draft = self
            .current
            .take()
            .ok_or_else(|| BildbandError::Sink("no page has been started".into()))?;

        let mut ops = Vec::new();
        for item in draft.items {
            match item {
                DraftItem::Text(text) => self.text_ops(&text, &mut ops),
                DraftItem::Image(raster, rect) => {
                    let op = self.image_op(raster, rect);
                    ops.push(op);
                }
            }
        }

        self.pages.push(PdfPage::new(
            pt_to_mm(draft.size.width),
            pt_to_mm(draft.size.height),
            ops,
        ));
        debug!(page = self.pages.len(), "Page committed");
        Ok(())
    }

    fn discard_page(&mut self) {
        if self.current.take().is_some() {
            debug!("Page discarded");
        }
    }

    fn pages_written(&self) -> usize {
        self.pages.len()
    }

    fn target(&self) -> &Path {
        &self.path
    }

    #[instrument(skip_all, fields(path = %self.path.display(), pages = self.pages.len()))]
    fn finalize(mut self) -> Result<()> {
        self.discard_page();
        if self.pages.is_empty() {
            return Err(BildbandError::Sink("refusing to save a PDF without pages".into()));
        }

        let page_count = self.pages.len();
        self.document.with_pages(std::mem::take(&mut self.pages));

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = self.document.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        std::fs::write(&self.path, &bytes).map_err(|err| {
            BildbandError::Sink(format!("failed to write {}: {}", self.path.display(), err))
        })?;
        info!(pages = page_count, bytes = bytes.len(), "Wrote PDF to {}", self.path.display());
        Ok(())
    }

    fn abandon(self) {
        debug!(path = %self.path.display(), "PDF sink abandoned");
    }
}

fn pt_to_mm(points: f64) -> Mm {
    Mm((points * 25.4 / 72.0) as f32)
}
