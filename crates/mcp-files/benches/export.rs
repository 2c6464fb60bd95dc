use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mcp_toolgen_files::{ExportOptions, FilesBuilder, OutputSet};
use std::hint::black_box;
use tempfile::TempDir;

fn output_set(tools: usize) -> OutputSet {
    FilesBuilder::new()
        .add_file("bench/mod.rs", "pub mod client;\npub mod tools;\n")
        .add_files((0..tools).map(|i| {
            (
                format!("bench/tool_{i}.rs"),
                format!("pub async fn tool_{i}() {{}}\n").repeat(20),
            )
        }))
        .build()
        .unwrap()
}

/// Fresh export into an empty directory
fn bench_export_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_fresh");

    for size in [10, 30, 100] {
        let set = output_set(size);
        group.bench_with_input(BenchmarkId::new("atomic", size), &set, |b, set| {
            b.iter_with_setup(
                || TempDir::new().unwrap(),
                |dir| set.export_to(dir.path(), black_box(&ExportOptions::default())).unwrap(),
            );
        });
    }

    group.finish();
}

/// Re-export of identical content (preflight only)
fn bench_export_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_unchanged");

    for size in [10, 30, 100] {
        let set = output_set(size);
        let dir = TempDir::new().unwrap();
        set.export_to(dir.path(), &ExportOptions::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("preflight", size), &set, |b, set| {
            b.iter(|| set.export_to(dir.path(), black_box(&ExportOptions::default())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_export_fresh, bench_export_unchanged);
criterion_main!(benches);
