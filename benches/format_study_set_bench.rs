use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use studyset::study::format_study_set;

fn bench_format_study_set(c: &mut Criterion) {
    let reply = std::fs::read_to_string("test_data/study_set_reply.txt")
        .expect("failed to read fixture reply");
    let large_reply = (0..20).map(|_| reply.as_str()).collect::<Vec<_>>().join("\n");

    c.bench_function("format_study_set", |b| {
        b.iter(|| black_box(format_study_set(black_box(&reply))));
    });
    c.bench_function("format_study_set_20x", |b| {
        b.iter(|| black_box(format_study_set(black_box(&large_reply))));
    });
}

criterion_group!(benches, bench_format_study_set);
criterion_main!(benches);
