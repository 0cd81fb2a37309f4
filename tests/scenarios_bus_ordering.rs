//! S4 from the end-to-end scenarios: three push subscribers with staggered
//! per-event sleep times must still observe strict tick ordering under
//! `SyncPolicy` — every subscriber finishes tick N before any subscriber
//! starts tick N+1.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tradecore::bus::{DispatchTarget, EventBus, SubscriberMode, SyncPolicy, TickStamped};

#[derive(Debug, Clone, Copy, Default)]
struct Tick {
    tick_sequence: u64,
}

impl TickStamped for Tick {
    fn set_tick_sequence(&mut self, seq: u64) {
        self.tick_sequence = seq;
    }
}

struct SlowSubscriber {
    delay: Duration,
    observed: Mutex<Vec<(u64, Instant)>>,
}

impl DispatchTarget<Tick> for SlowSubscriber {
    fn dispatch(&self, event: &Tick) {
        std::thread::sleep(self.delay);
        self.observed.lock().push((event.tick_sequence, Instant::now()));
    }
}

#[test]
fn s4_sync_bus_ordering_with_staggered_subscribers() {
    let bus: Arc<EventBus<Tick, SyncPolicy, 1024>> = EventBus::new();

    let subs: Vec<Arc<SlowSubscriber>> = [10u64, 30, 60]
        .into_iter()
        .map(|ms| Arc::new(SlowSubscriber { delay: Duration::from_millis(ms), observed: Mutex::new(Vec::new()) }))
        .collect();

    for (id, sub) in subs.iter().enumerate() {
        bus.subscribe(id as u64, SubscriberMode::Push, sub.clone()).unwrap();
    }
    EventBus::start(&bus).unwrap();

    for _ in 0..5 {
        bus.publish(Tick::default());
    }
    bus.stop();

    let mut per_tick_max = vec![Instant::now(); 5];
    let mut per_tick_min = vec![Instant::now(); 5];
    for tick in 0..5 {
        let timestamps: Vec<Instant> = subs
            .iter()
            .map(|s| s.observed.lock().iter().find(|(seq, _)| *seq == tick as u64).unwrap().1)
            .collect();
        per_tick_max[tick] = *timestamps.iter().max().unwrap();
        per_tick_min[tick] = *timestamps.iter().min().unwrap();
    }

    for tick in 0..4 {
        assert!(
            per_tick_max[tick] <= per_tick_min[tick + 1],
            "tick {tick}'s last subscriber observation must precede tick {}'s first",
            tick + 1
        );
    }
}
