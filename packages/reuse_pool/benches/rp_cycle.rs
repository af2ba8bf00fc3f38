//! Benchmarks for acquire/release cycles of the `reuse_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::num::NonZero;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use reuse_pool::Pool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const BUFFER_SIZE: usize = 1024;
const THREADS: usize = 4;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("rp_cycle");

    group.bench_function("construct_without_pool", |b| {
        b.iter(|| drop(black_box(Vec::<u8>::with_capacity(BUFFER_SIZE))));
    });

    group.bench_function("acquire_release_warm", |b| {
        let pool = Pool::new(|| Vec::<u8>::with_capacity(BUFFER_SIZE));
        pool.release(pool.acquire());

        b.iter(|| {
            let buffer = black_box(pool.acquire());
            pool.release(buffer);
        });
    });

    group.bench_function("acquire_release_bounded", |b| {
        let pool = Pool::builder(|| Vec::<u8>::with_capacity(BUFFER_SIZE))
            .resettable()
            .max_idle(NonZero::new(16).unwrap())
            .build();
        pool.release(pool.acquire());

        b.iter(|| {
            let buffer = black_box(pool.acquire());
            pool.release(buffer);
        });
    });

    group.bench_function("rent_warm", |b| {
        let pool = Pool::new(|| Vec::<u8>::with_capacity(BUFFER_SIZE));
        drop(pool.rent());

        b.iter(|| drop(black_box(pool.rent())));
    });

    group.bench_function("acquire_release_multithreaded", |b| {
        b.iter_custom(|iters| {
            let pool = Arc::new(Pool::new(|| Vec::<u8>::with_capacity(BUFFER_SIZE)));

            let start = Instant::now();

            let workers = iter::repeat_with(|| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..iters {
                        let buffer = black_box(pool.acquire());
                        pool.release(buffer);
                    }
                })
            })
            .take(THREADS)
            .collect::<Vec<_>>();

            for worker in workers {
                worker.join().unwrap();
            }

            start.elapsed()
        });
    });

    group.finish();
}
