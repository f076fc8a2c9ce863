//! Anchoring Benchmarks
//!
//! Quote search and cached anchoring over transcript-sized documents.
//!
//! Run with: `cargo bench --bench anchoring`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use cluster_anchor::anchoring::{
    anchor_selectors, create_selectors_from_range, AnchorCache, AnchorOptions,
};
use cluster_anchor::document::{AnchorRoot, TranscriptCue, TranscriptDocument};

/// Build a transcript whose lines repeat, so quotes have many candidates
fn create_transcript(cue_count: usize) -> TranscriptDocument {
    let cues = (0..cue_count)
        .map(|i| TranscriptCue {
            id: Some(format!("cue-{}", i)),
            start_time: i as f64 * 3.0,
            end_time: i as f64 * 3.0 + 2.5,
            text: format!(
                "Participant {} said the onboarding was confusing and the export was slow.",
                i % 7
            ),
            speaker: Some(format!("P{}", i % 3)),
        })
        .collect();
    TranscriptDocument::new(cues)
}

fn bench_quote_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("quote_search");
    group.measurement_time(Duration::from_secs(10));

    for cue_count in [100, 1_000] {
        let doc = create_transcript(cue_count);
        let len = doc.text_index().len();
        // a late, repeated phrase so every occurrence is scored
        let anchors = create_selectors_from_range(&doc, len - 40, len - 30, 50)
            .expect("range inside transcript");

        group.bench_with_input(
            BenchmarkId::new("anchor_repeated_quote", cue_count),
            &doc,
            |b, doc| {
                b.iter(|| {
                    anchor_selectors(
                        black_box(doc),
                        Some(&anchors.quote),
                        None,
                        AnchorOptions::default(),
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_cached_anchor(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_cache");

    let doc = create_transcript(1_000);
    let anchors = create_selectors_from_range(&doc, 500, 520, 50).expect("range inside transcript");
    let cache = AnchorCache::default();

    group.bench_function("cached_hit", |b| {
        b.iter(|| {
            cache.anchor(
                black_box(&doc),
                Some(&anchors.quote),
                Some(&anchors.position),
                AnchorOptions::default(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_quote_search, bench_cached_anchor);
criterion_main!(benches);
