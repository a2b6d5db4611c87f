//! # Blocking Queue Benchmark
//!
//! Measures:
//! 1. Uncontended send + receive on one thread
//! 2. Cross-thread handoff throughput (one producer, one consumer)

#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use semaphore_core::BlockingQueue;
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn bench_uncontended(c: &mut Criterion) {
    let queue = BlockingQueue::new();

    c.bench_function("queue_send_receive_uncontended", |b| {
        b.iter(|| {
            queue.send(black_box(1_u64));
            black_box(queue.receive())
        });
    });
}

fn bench_cross_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_cross_thread_handoff");

    for batch in [100_u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.iter(|| {
                let queue = Arc::new(BlockingQueue::new());
                let producer = Arc::clone(&queue);

                let handle = thread::spawn(move || {
                    for i in 0..batch {
                        producer.send(i);
                    }
                });

                let mut sum = 0_u64;
                for _ in 0..batch {
                    sum += queue.receive();
                }
                handle.join().unwrap();
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_cross_thread);
criterion_main!(benches);
