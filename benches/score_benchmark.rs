//! Benchmarks for outline extraction performance.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfoutline::analyzer::{CandidateScorer, ProfileRegistry};
use pdfoutline::model::{BBox, LayoutDocument, Line, Page, StyledSpan};
use pdfoutline::StructureExtractor;

fn make_line(text: &str, y: f32, size: f32, bold: bool) -> Line {
    let width = text.len() as f32 * size * 0.5;
    let mut span = StyledSpan::new(text, BBox::new(72.0, y, 72.0 + width, y + size), size);
    span.bold = bold;
    Line::from_spans(vec![span])
}

/// A synthetic document with a title, sections and body text.
fn synthetic_doc(page_count: u32) -> LayoutDocument {
    let mut doc = LayoutDocument::new("benchmark-report.pdf");
    for n in 1..=page_count {
        let mut page = Page::new(n, 612.0, 792.0);
        if n == 1 {
            page.lines
                .push(make_line("Benchmark Performance Report", 60.0, 24.0, true));
        }
        page.lines
            .push(make_line(&format!("{}. Section Heading", n), 120.0, 16.0, true));
        page.lines.push(make_line(
            &format!("{}.1 Subsection With Details", n),
            180.0,
            14.0,
            true,
        ));
        for i in 0..20 {
            page.lines.push(make_line(
                "A plain body paragraph line that should never be mistaken for any heading.",
                240.0 + i as f32 * 16.0,
                10.5,
                false,
            ));
        }
        doc.pages.push(page);
    }
    doc
}

fn bench_candidate_scoring(c: &mut Criterion) {
    let scorer = CandidateScorer::new();
    let registry = ProfileRegistry::builtin();
    let doc = LayoutDocument::new("doc.pdf");
    let rules = &registry.select(&doc).rules;

    let heading = make_line("2.1 Intended Audience", 80.0, 14.0, true);
    let body = make_line(
        "A plain body paragraph line that should never be mistaken for any heading.",
        200.0,
        10.5,
        false,
    );

    c.bench_function("score_heading_line", |b| {
        b.iter(|| scorer.score(black_box(&heading), rules));
    });
    c.bench_function("score_body_line", |b| {
        b.iter(|| scorer.score(black_box(&body), rules));
    });
}

fn bench_profile_loading(c: &mut Criterion) {
    c.bench_function("builtin_profiles_load", |b| {
        b.iter(ProfileRegistry::builtin);
    });
}

fn bench_full_extraction(c: &mut Criterion) {
    let extractor = StructureExtractor::new().unwrap();
    let mut group = c.benchmark_group("extract");
    for page_count in [1, 10, 50] {
        let doc = synthetic_doc(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract(black_box(&doc)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_candidate_scoring,
    bench_profile_loading,
    bench_full_extraction,
);
criterion_main!(benches);
