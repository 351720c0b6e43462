use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use publication_catalog::common::{Publication, SourceKind, SOURCE_PRIORITY};
use publication_catalog::merge::{merge_all, SourceBatch};
use publication_catalog::normalize::{normalize_doi, normalize_text};

fn bench_normalize_text(c: &mut Criterion) {
    let affiliations = vec![
        "Ukrainian Institute for Systems Biology and Medicine, Kyiv, Ukraine",
        "Institute For Systems Biology – Seattle, WA 98109",
        "Département de Médecine, Université de Genève",
        "Київський національний університет імені Тараса Шевченка",
    ];

    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(affiliations.len() as u64));

    group.bench_function("normalize_text", |b| {
        b.iter(|| {
            for text in &affiliations {
                black_box(normalize_text(text));
            }
        })
    });

    group.bench_function("normalize_doi", |b| {
        b.iter(|| {
            black_box(normalize_doi("https://doi.org/10.1101/2021.01.01.425000v2"));
            black_box(normalize_doi("doi:10.1234%2FEncoded."));
        })
    });

    group.finish();
}

fn batch(kind: SourceKind, n: u64, overlap: u64) -> SourceBatch {
    let records = (0..n)
        .map(|i| {
            let id = i % overlap;
            Publication {
                title: Some(format!("{} paper {}", kind, i)),
                authors: vec![format!("Author {}", i % 7), format!("author {}", i % 5)],
                doi: (i % 3 != 0).then(|| format!("10.1000/{}", id)),
                pmid: (i % 2 == 0).then(|| format!("{}", 30_000_000 + id)),
                year: Some(2000 + (i % 25) as i32),
                ..Default::default()
            }
        })
        .collect();
    SourceBatch::new(kind, records)
}

fn bench_merge_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(30_000));

    group.bench_function("merge_all_three_sources", |b| {
        b.iter_with_setup(
            || {
                vec![
                    batch(SourceKind::OpenAlex, 10_000, 8_000),
                    batch(SourceKind::Crossref, 10_000, 6_000),
                    batch(SourceKind::EuropePmc, 10_000, 9_000),
                ]
            },
            |batches| black_box(merge_all(batches, &SOURCE_PRIORITY).len()),
        )
    });

    group.finish();
}

criterion_group!(benches, bench_normalize_text, bench_merge_all);
criterion_main!(benches);
