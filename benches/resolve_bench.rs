//! Reference resolution benchmarks.
//!
//! Measures, over a synthetic project of N pages:
//! - Composable call search
//! - Component tag search
//! - Directory index walks
//!
//! Run with: cargo bench --bench resolve_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nuxt_lens::{
    find_dirs, resolve, DocumentKind, IgnoreSet, LensConfig, NoSeed, ResolveContext, SymbolQuery,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// A project with `pages` pages, each using one composable and one component.
fn synthetic_project(pages: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "nuxt.config.ts", "export default defineNuxtConfig({})\n");
    write(root, "package.json", "{}\n");
    write(root, "composables/useFoo.ts", "export function useFoo() { return 1 }\n");
    write(root, "components/Foo/Bar.vue", "<template><p/></template>\n");
    for i in 0..pages {
        write(
            root,
            &format!("pages/section{}/page{}.vue", i % 10, i),
            &format!(
                "<script setup lang=\"ts\">\nconst foo = useFoo()\nconst label = 'page {}'\n</script>\n\n<template>\n  <div>\n    <FooBar :n=\"{}\" />\n    <p>{{{{ label }}}}</p>\n  </div>\n</template>\n",
                i, i
            ),
        );
    }
    for i in 0..pages / 2 {
        write(root, &format!("node_modules/pkg{}/index.js", i), "module.exports = useFoo()\n");
    }
    temp_dir
}

fn benchmark_resolution(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let config = LensConfig::default();
    let ignore = IgnoreSet::default();
    let mut group = c.benchmark_group("resolve");

    for pages in [50usize, 500] {
        let project = synthetic_project(pages);
        let root = project.path();
        let ctx = ResolveContext::new(root, &config, &ignore, &NoSeed);

        let composable = SymbolQuery::new("useFoo", DocumentKind::Composable)
            .defined_in(&root.join("composables/useFoo.ts"));
        group.bench_with_input(BenchmarkId::new("composable", pages), &pages, |b, _| {
            b.to_async(&runtime)
                .iter(|| async { black_box(resolve(&composable, &ctx).await) })
        });

        let component = SymbolQuery::new("FooBar", DocumentKind::Component)
            .defined_in(&root.join("components/Foo/Bar.vue"));
        group.bench_with_input(BenchmarkId::new("component", pages), &pages, |b, _| {
            b.to_async(&runtime)
                .iter(|| async { black_box(resolve(&component, &ctx).await) })
        });

        group.bench_with_input(BenchmarkId::new("find_dirs", pages), &pages, |b, _| {
            b.iter(|| black_box(find_dirs(root, "components", &ignore)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resolution);
criterion_main!(benches);
