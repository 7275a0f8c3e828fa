//! Benchmarks for the table detection pipeline against synthetic ruled grids.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tabulex_core::objects::Line;
use tabulex_core::table::detect::detect_tables;
use tabulex_core::{Page, TableSettings};

/// Build a page containing an `n x n` ruled grid of ~20pt cells, the shape
/// real invoices and financial statements tend to produce.
fn grid_page(n: usize) -> Page {
    let cell = 20.0;
    let size = n as f64 * cell;
    let mut page = Page::new(1, size + 40.0, size + 40.0, 0.0);

    for i in 0..=n {
        let x = 20.0 + i as f64 * cell;
        page.lines.push(Line {
            x0: x,
            y0: 20.0,
            x1: x,
            y1: 20.0 + size,
            top: 20.0,
            bottom: 20.0 + size,
            width: 1.0,
            stroking_color: Default::default(),
            non_stroking_color: Default::default(),
        });
        let y = 20.0 + i as f64 * cell;
        page.lines.push(Line {
            x0: 20.0,
            y0: y,
            x1: 20.0 + size,
            y1: y,
            top: y,
            bottom: y,
            width: 1.0,
            stroking_color: Default::default(),
            non_stroking_color: Default::default(),
        });
    }

    page
}

fn bench_detect_tables(c: &mut Criterion) {
    let settings = TableSettings::default();
    let mut group = c.benchmark_group("detect_tables_grid");

    for n in [4usize, 8, 16] {
        let page = grid_page(n);
        group.bench_with_input(BenchmarkId::new("n", n), &page, |b, page| {
            b.iter(|| {
                let tables = detect_tables(black_box(page), black_box(&settings)).unwrap();
                black_box(tables.len())
            })
        });
    }

    group.finish();
}

criterion_group!(table_detect_benches, bench_detect_tables);
criterion_main!(table_detect_benches);
