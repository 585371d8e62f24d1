//! Benchmarks for graph assembly hot paths
//!
//! Covers deduplicating inserts, module resolution against large
//! manifests, and imports-only parsing of long source files.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use goraph::graph::{GraphBuilder, NodeKind};
use goraph::resolver::longest_prefix_match;
use goraph::scanner::{header_len, ImportParser};
use std::path::Path;

/// Module paths shaped like a real go.mod: shared hosts, nested modules.
fn module_paths(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("github.com/org{}/lib{}", i % 17, i),
            1 => format!("golang.org/x/mod{}", i),
            _ => format!("github.com/org{}/lib{}/v2", i % 17, i - 2),
        })
        .collect()
}

/// A file with a grouped import block followed by a long body.
fn large_source(imports: usize, functions: usize) -> String {
    let mut src = String::from("// Package big is generated.\npackage big\n\nimport (\n");
    for i in 0..imports {
        src.push_str(&format!("\tm{} \"github.com/org{}/lib{}\"\n", i, i % 17, i));
    }
    src.push_str(")\n\n");
    for i in 0..functions {
        src.push_str(&format!(
            "func f{}(s string) string {{\n\tif s == \"import (\" {{\n\t\treturn `)`\n\t}}\n\treturn s\n}}\n\n",
            i
        ));
    }
    src
}

/// Benchmark repeated inserts of the same ids and edges
fn bench_builder_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder_dedup");

    for size in [100, 1000, 5000].iter() {
        let ids: Vec<String> = (0..*size).map(|i| format!("import:a.io/p{}", i % 200)).collect();

        group.bench_with_input(BenchmarkId::new("inserts", size), &ids, |b, ids| {
            b.iter(|| {
                let mut builder = GraphBuilder::with_capacity(200, 200);
                builder.add_node("pkg:root", "main", NodeKind::Package, 0);
                for id in ids {
                    builder.add_node(id, id, NodeKind::External, 1);
                    builder.add_edge("pkg:root", id);
                }
                black_box(builder.finish())
            });
        });
    }

    group.finish();
}

/// Benchmark longest-prefix resolution over growing manifests
fn bench_prefix_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_prefix_match");

    for size in [10, 100, 1000].iter() {
        let modules = module_paths(*size);
        let import = format!("{}/internal/codec", modules[*size - 1]);

        group.bench_with_input(BenchmarkId::new("modules", size), &modules, |b, modules| {
            b.iter(|| {
                black_box(longest_prefix_match(
                    black_box(&import),
                    modules.iter().map(String::as_str),
                ))
            });
        });
    }

    group.finish();
}

/// Benchmark header detection and import parsing on long files
fn bench_parse_imports(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_imports");

    for functions in [10, 1000, 10000].iter() {
        let src = large_source(50, *functions);

        group.bench_with_input(BenchmarkId::new("header_len", functions), &src, |b, src| {
            b.iter(|| black_box(header_len(src)));
        });

        let mut parser = ImportParser::new().unwrap();
        group.bench_with_input(BenchmarkId::new("parse_source", functions), &src, |b, src| {
            b.iter(|| black_box(parser.parse_source(src, Path::new("big.go")).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_builder_dedup,
    bench_prefix_match,
    bench_parse_imports
);
criterion_main!(benches);
