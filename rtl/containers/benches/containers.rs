//! Hot-path costs of the containers on the host.
//!
//! `remove_empty` is the main-loop poll that finds nothing to do; it must
//! stay far cheaper than a full critical-section round trip.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rtl_containers::{BoundedList, BoundedQueue};

fn bench_queue(c: &mut Criterion) {
    let queue: BoundedQueue<u32, 64> = BoundedQueue::new();

    c.bench_function("queue_remove_empty", |b| {
        b.iter(|| black_box(queue.remove()))
    });

    c.bench_function("queue_add_remove", |b| {
        b.iter(|| {
            let _ = queue.add(black_box(7));
            black_box(queue.remove())
        })
    });
}

fn bench_list(c: &mut Criterion) {
    let list: BoundedList<u32, 64> = BoundedList::new();
    for value in 0..64 {
        let _ = list.add(value);
    }

    c.bench_function("list_get", |b| b.iter(|| black_box(list.get(black_box(32)))));

    c.bench_function("list_position_last", |b| {
        b.iter(|| black_box(list.position(black_box(&63))))
    });
}

criterion_group!(benches, bench_queue, bench_list);
criterion_main!(benches);
