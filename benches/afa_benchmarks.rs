// Copyright 2025 Cowboy AI, LLC.

use cep_core::afa::patterns::{updown_descriptor, StockTick};
use cep_core::{AfaOperator, PointEvent, Ticks, Window, WindowSpec};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn random_ticks(len: usize) -> Vec<PointEvent<StockTick>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..len)
        .map(|i| {
            let change = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
            PointEvent::at(Ticks(i as i64), StockTick::new(change))
        })
        .collect()
}

fn bench_single_window(c: &mut Criterion) {
    let operator = AfaOperator::new(Arc::new(updown_descriptor()));
    let mut group = c.benchmark_group("updown_window");

    for size in [16usize, 64, 256] {
        let events = random_ticks(size);
        let window = Window::new(Ticks(0), Ticks(size as i64)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| operator.evaluate(black_box(&window), black_box(events.clone())))
        });
    }
    group.finish();
}

fn bench_hopping_stream(c: &mut Criterion) {
    let operator = AfaOperator::new(Arc::new(updown_descriptor()));
    let events = random_ticks(1_024);
    let spec = WindowSpec::Hopping {
        size: Ticks(32),
        hop: Ticks(8),
    };

    c.bench_function("updown_hopping_stream_1024", |b| {
        b.iter(|| operator.evaluate_stream(black_box(&spec), black_box(&events)))
    });
}

criterion_group!(benches, bench_single_window, bench_hopping_stream);
criterion_main!(benches);
