//! Benchmarks for the analytics queries and the exporters that consume
//! their results.
//!
//! The store is generated once into a temp directory. Exporters write into
//! a black-hole writer to isolate formatting cost from I/O.

use std::io::Write;

use criterion::{criterion_group, criterion_main, Criterion};

use cinestat_core::analytics::{AnalysisBundle, MovieAnalytics};
use cinestat_core::generate::{generate_dataset, GenerateOptions};
use cinestat_core::output::csv::write_csv_section;
use cinestat_core::output::direct::insert_dataset;
use cinestat_core::output::json::{write_json, JsonSections};
use cinestat_core::report::render_html;
use cinestat_testutil::{date, temp_store};

/// A writer that discards all output.
struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn bench_queries(c: &mut Criterion) {
    let rt = runtime();
    let (_dir, url) = temp_store();
    let dataset = generate_dataset(&GenerateOptions::with_seed(42)).unwrap();
    rt.block_on(insert_dataset(&dataset, &url, None)).unwrap();
    let analytics = MovieAnalytics::new(url);

    let mut group = c.benchmark_group("analytics");
    group.bench_function("genre_trends", |b| {
        b.iter(|| rt.block_on(analytics.genre_trends()).unwrap())
    });
    group.bench_function("collaboration_network", |b| {
        b.iter(|| rt.block_on(analytics.collaboration_network()).unwrap())
    });
    group.bench_function("run_all", |b| {
        b.iter(|| rt.block_on(analytics.run_all()).unwrap())
    });
    group.finish();
}

fn bench_exporters(c: &mut Criterion) {
    let rt = runtime();
    let (_dir, url) = temp_store();
    let dataset = generate_dataset(&GenerateOptions::with_seed(7)).unwrap();
    rt.block_on(insert_dataset(&dataset, &url, None)).unwrap();
    let bundle: AnalysisBundle = rt.block_on(MovieAnalytics::new(url).run_all()).unwrap();

    let mut group = c.benchmark_group("export");
    group.bench_function("html_report", |b| {
        let at = date(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        b.iter(|| render_html(&bundle, at))
    });
    group.bench_function("csv", |b| {
        b.iter(|| {
            let mut out = NullWriter;
            write_csv_section(&mut out, &bundle.rating_distribution).unwrap();
            write_csv_section(&mut out, &bundle.budget_correlation).unwrap();
        })
    });
    group.bench_function("json", |b| {
        b.iter(|| {
            let mut sections = JsonSections::new();
            sections.push(&bundle.rating_distribution).unwrap();
            sections.push(&bundle.budget_correlation).unwrap();
            write_json(&mut NullWriter, &sections).unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, bench_queries, bench_exporters);
criterion_main!(benches);
