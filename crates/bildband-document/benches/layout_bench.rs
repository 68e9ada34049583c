// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the bildband-document crate: page layout for a
// spread of image shapes, and page preparation through the pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, RgbImage};

use bildband_core::{AppConfig, ImageEntry, OrientationPolicy};
use bildband_document::{
    ConversionPipeline, ConversionRequest, DecodedImage, ImageLoader, LayoutEngine,
    OrientationResolver,
};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Resolve and lay out a page for a mix of portrait, landscape, square, and
/// extreme aspect ratios.
fn bench_layout(c: &mut Criterion) {
    let shapes: [(u32, u32); 6] = [
        (3024, 4032),
        (4032, 3024),
        (2000, 2000),
        (1920, 1080),
        (1, 5000),
        (5000, 1),
    ];
    let resolver = OrientationResolver::default();
    let engine = LayoutEngine::default();

    c.bench_function("layout (6 shapes, automatic)", |b| {
        b.iter(|| {
            for (i, &(w, h)) in shapes.iter().enumerate() {
                let page = resolver.resolve(OrientationPolicy::Automatic, w, h);
                let layout = engine.layout(page, w, h, i == 0, "Album", "photo");
                black_box(layout);
            }
        });
    });
}

/// Loader that hands out one in-memory image, so the benchmark measures
/// preparation rather than disk or codec time.
struct InMemory(DecodedImage);

impl ImageLoader for InMemory {
    fn open(&self, _path: &std::path::Path) -> bildband_core::error::Result<DecodedImage> {
        Ok(self.0.clone())
    }
}

/// Prepare a page from a 64x48 image, including the clone a real decode
/// would replace.
fn bench_prepare(c: &mut Criterion) {
    let image = DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(64, 48)));
    let pipeline = ConversionPipeline::new(&AppConfig::default())
        .expect("default settings are valid")
        .with_loader(InMemory(image));
    let request = ConversionRequest::new("/in", "/out", "Album", OrientationPolicy::Automatic);
    let entry = ImageEntry::from_path("/in/photo.png").expect("path has a file name");

    c.bench_function("prepare (64x48)", |b| {
        b.iter(|| {
            let page = pipeline
                .prepare(black_box(&entry), true, &request)
                .expect("in-memory image is valid");
            black_box(page);
        });
    });
}

criterion_group!(benches, bench_layout, bench_prepare);
criterion_main!(benches);
