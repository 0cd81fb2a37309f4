use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tradecore::bus::{AsyncPolicy, DispatchTarget, EventBus, SubscriberMode, SyncPolicy, TickStamped};

#[derive(Debug, Clone, Copy, Default)]
struct Tick {
    value: i64,
    tick_sequence: u64,
}

impl TickStamped for Tick {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}

struct Sink {
    sum: Arc<AtomicI64>,
}

impl DispatchTarget<Tick> for Sink {
    fn dispatch(&self, event: &Tick) {
        self.sum.fetch_add(event.value, Ordering::Relaxed);
    }
}

fn bench_event_bus(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_bus");

    group.bench_function("sync_publish_one_push_subscriber", |bencher| {
        let bus: Arc<EventBus<Tick, SyncPolicy, 1024>> = EventBus::new();
        let sum = Arc::new(AtomicI64::new(0));
        bus.subscribe(1, SubscriberMode::Push, Arc::new(Sink { sum: sum.clone() })).unwrap();
        EventBus::start(&bus).unwrap();

        bencher.iter(|| bus.publish(black_box(Tick { value: 1, tick_sequence: 0 })));
        bus.stop();
    });

    group.bench_function("async_publish_one_push_subscriber", |bencher| {
        let bus: Arc<EventBus<Tick, AsyncPolicy, 1024>> = EventBus::new();
        let sum = Arc::new(AtomicI64::new(0));
        bus.subscribe(1, SubscriberMode::Push, Arc::new(Sink { sum: sum.clone() })).unwrap();
        EventBus::start(&bus).unwrap();

        bencher.iter(|| bus.publish(black_box(Tick { value: 1, tick_sequence: 0 })));
        bus.stop();
    });

    group.bench_function("sync_publish_three_push_subscribers", |bencher| {
        let bus: Arc<EventBus<Tick, SyncPolicy, 1024>> = EventBus::new();
        for id in 0..3 {
            let sum = Arc::new(AtomicI64::new(0));
            bus.subscribe(id, SubscriberMode::Push, Arc::new(Sink { sum })).unwrap();
        }
        EventBus::start(&bus).unwrap();

        bencher.iter(|| bus.publish(black_box(Tick { value: 1, tick_sequence: 0 })));
        bus.stop();
    });

    group.finish();
}

criterion_group!(benches, bench_event_bus);
criterion_main!(benches);
