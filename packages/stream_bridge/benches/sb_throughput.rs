//! Throughput benchmarks for the `stream_bridge` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use stream_bridge::{Adapter, Capacity, adapt, drain, send_all, to_stream, to_stream_filled};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const ELEMENTS: usize = 1000;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("sb_throughput");

    let sequence = (0..ELEMENTS).collect::<Vec<_>>();

    group.bench_function("to_stream_filled", |b| {
        b.iter(|| {
            let produced = to_stream_filled(black_box(sequence.clone()));
            black_box(drain(&produced, ELEMENTS).unwrap());
        });
    });

    for capacity in [0, 16] {
        group.bench_function(format!("to_stream_capacity_{capacity}"), |b| {
            b.iter(|| {
                let produced = to_stream(black_box(sequence.clone()), capacity);
                black_box(drain(&produced, ELEMENTS).unwrap());
            });
        });
    }

    group.bench_function("adapt_rendezvous", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let (source_tx, source_rx) = Capacity::Unbounded.channel();
                send_all(&source_tx, sequence.iter().copied()).unwrap();
                drop(source_tx);

                let start = Instant::now();
                let adapted = adapt(source_rx, |n: usize| n.wrapping_mul(3));
                black_box(drain(&adapted, ELEMENTS).unwrap());
                total += start.elapsed();
            }

            total
        });
    });

    group.bench_function("adapt_buffered", |b| {
        let adapter = Adapter::builder()
            .output_capacity(Capacity::Bounded(64))
            .build();

        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let (source_tx, source_rx) = Capacity::Unbounded.channel();
                send_all(&source_tx, sequence.iter().copied()).unwrap();
                drop(source_tx);

                let start = Instant::now();
                let adapted = adapter.adapt(source_rx, |n: usize| n.wrapping_mul(3));
                black_box(drain(&adapted, ELEMENTS).unwrap());
                total += start.elapsed();
            }

            total
        });
    });

    group.finish();
}
