use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cvpress::content::{resume_region, Profile};
use cvpress::Exporter;

fn bench_capture(c: &mut Criterion) {
    let region = resume_region(&Profile::builtin());
    let exporter = Exporter::default();
    c.bench_function("capture_resume_png", |b| {
        b.iter(|| exporter.capture(black_box(&region)).unwrap())
    });
}

fn bench_export(c: &mut Criterion) {
    let region = resume_region(&Profile::builtin());
    let exporter = Exporter::default();
    c.bench_function("export_resume_pdf", |b| {
        b.iter(|| exporter.export(black_box(&region)).unwrap())
    });
}

criterion_group!(benches, bench_capture, bench_export);
criterion_main!(benches);
