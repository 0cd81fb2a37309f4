use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tradecore::concurrency::spsc::SpscQueue;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");

    group.bench_function("push_pop_u64", |bencher| {
        let queue: SpscQueue<u64, 1024> = SpscQueue::new();
        bencher.iter(|| {
            queue.push(black_box(42));
            black_box(queue.pop())
        });
    });

    group.bench_function("fill_then_drain", |bencher| {
        let queue: SpscQueue<u64, 1024> = SpscQueue::new();
        bencher.iter(|| {
            for i in 0..1023u64 {
                queue.push(black_box(i));
            }
            while queue.pop().is_some() {}
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc);
criterion_main!(benches);
