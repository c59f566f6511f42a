//! Benchmarks for the fake host's paint/flush/commit cycle.
//!
//! Run with: cargo bench -p fcanvas-surface --bench paint_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fcanvas_core::{Point, Size};
use fcanvas_surface::pixels::{PixelFormat, PixelGrid};
use fcanvas_surface::{FakeHost, SurfaceHost};
use std::hint::black_box;

fn bench_fill_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixels/fill_rect");

    for (w, h) in [(64, 64), (256, 256), (1024, 1024)] {
        let pixels = w as u64 * h as u64;
        group.throughput(Throughput::Elements(pixels));

        let mut grid = PixelGrid::new(Size::new(w, h));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &(),
            |b, _| {
                b.iter(|| {
                    grid.fill_rect(grid.bounds(), 0xFFFF_FFFF);
                    black_box(&grid);
                })
            },
        );
    }

    group.finish();
}

fn bench_paint_flush_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("fake/paint_flush");

    for (w, h) in [(64, 64), (256, 256)] {
        let pixels = w as u64 * h as u64;
        group.throughput(Throughput::Elements(pixels));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &(),
            |b, _| {
                let mut host = FakeHost::new();
                let surface = host.create_surface(w, h, false);
                let image = host.create_image(PixelFormat::BgraPremul, w, h, true);
                b.iter(|| {
                    host.paint_image(surface, image, Point::ZERO, None);
                    host.flush(surface, Some(Box::new(|| {})));
                    for callback in host.take_ready_completions() {
                        callback();
                    }
                    black_box(&host);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fill_rect, bench_paint_flush_cycle);
criterion_main!(benches);
