//! A fixed-capacity, atomics-only order tracker.
//!
//! Every slot is a linearly-probed open-addressing entry keyed by
//! [`OrderId`]; lookups and inserts never block and never allocate once the
//! tracker is constructed.

use crate::decimal::Quantity;
use crate::error::EngineError;
use crate::events::{Order, OrderId};
use crate::time::{self, TimePoint};
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicU8, Ordering};

/// Default slot count, matching the original implementation's
/// `config::ORDER_TRACKER_CAPACITY`.
pub const DEFAULT_CAPACITY: usize = 65_536;

/// The observable lifecycle status of a tracked order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderStatus {
    /// Slot is unused.
    Empty = 0,
    /// Submitted to the exchange, no acknowledgment yet.
    Submitted = 1,
    /// Partially filled.
    PartiallyFilled = 2,
    /// Fully filled.
    Filled = 3,
    /// Canceled.
    Canceled = 4,
    /// Rejected by the exchange.
    Rejected = 5,
    /// Replaced by a newer order.
    Replaced = 6,
}

impl OrderStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Submitted,
            2 => Self::PartiallyFilled,
            3 => Self::Filled,
            4 => Self::Canceled,
            5 => Self::Rejected,
            6 => Self::Replaced,
            _ => Self::Empty,
        }
    }
}

/// A snapshot of one tracked order's mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderState {
    /// The order as it was last submitted or replaced.
    pub local_order: Order,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Cumulative filled quantity.
    pub filled: Quantity,
    /// Time this slot was created (submitted or replaced-in).
    pub created_at: TimePoint,
    /// Time of the most recent update to this slot.
    pub last_update: TimePoint,
}

struct Slot {
    id: AtomicU64,
    status: AtomicU8,
    filled_raw: AtomicI64,
    created_at_raw: AtomicI64,
    last_update_raw: AtomicI64,
    order: parking_lot::Mutex<Order>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            id: AtomicU64::new(0),
            status: AtomicU8::new(OrderStatus::Empty as u8),
            filled_raw: AtomicI64::new(0),
            created_at_raw: AtomicI64::new(0),
            last_update_raw: AtomicI64::new(0),
            order: parking_lot::Mutex::new(Order::new(
                0,
                crate::events::Side::Buy,
                crate::decimal::Price::from_raw(0),
                Quantity::from_raw(0),
                crate::events::OrderType::Limit,
                0,
                TimePoint::from_raw_nanos(0),
            )),
        }
    }
}

/// A fixed-capacity order tracker of `SIZE` slots, indexed by [`OrderId`]
/// with linear-probed open addressing (id `0` is reserved as the empty
/// sentinel — order ids must be nonzero).
pub struct OrderTracker<const SIZE: usize = DEFAULT_CAPACITY> {
    slots: Box<[Slot]>,
}

impl<const SIZE: usize> OrderTracker<SIZE> {
    /// Creates an empty tracker with `SIZE` slots.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SIZE);
        for _ in 0..SIZE {
            slots.push(Slot::empty());
        }
        Self { slots: slots.into_boxed_slice() }
    }

    fn find(&self, id: OrderId) -> Option<&Slot> {
        let base = (id as usize) % SIZE;
        for i in 0..SIZE {
            let idx = (base + i) % SIZE;
            if self.slots[idx].id.load(Ordering::Acquire) == id {
                return Some(&self.slots[idx]);
            }
        }
        None
    }

    fn insert(&self, id: OrderId) -> Result<&Slot, EngineError> {
        let base = (id as usize) % SIZE;
        for i in 0..SIZE {
            let idx = (base + i) % SIZE;
            if self.slots[idx]
                .id
                .compare_exchange(0, id, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Ok(&self.slots[idx]);
            }
        }
        Err(EngineError::Overflow { size: SIZE })
    }

    /// Records a newly submitted order, occupying a fresh slot.
    pub fn on_submitted(&self, order: &Order) -> Result<(), EngineError> {
        let slot = self.insert(order.id)?;
        *slot.order.lock() = *order;
        slot.filled_raw.store(0, Ordering::Relaxed);
        let now = time::now();
        slot.created_at_raw.store(now.raw_nanos(), Ordering::Relaxed);
        slot.last_update_raw.store(now.raw_nanos(), Ordering::Release);
        slot.status.store(OrderStatus::Submitted as u8, Ordering::Release);
        Ok(())
    }

    /// Applies a fill, transitioning to `Filled` once cumulative fill meets
    /// the order's total quantity, `PartiallyFilled` otherwise. No-op if
    /// `id` is not tracked.
    pub fn on_filled(&self, id: OrderId, fill: Quantity) {
        let Some(slot) = self.find(id) else { return };

        let prev = Quantity::from_raw(slot.filled_raw.load(Ordering::Relaxed));
        let next = prev + fill;
        slot.filled_raw.store(next.raw(), Ordering::Relaxed);
        slot.last_update_raw.store(time::now().raw_nanos(), Ordering::Release);

        let target = slot.order.lock().quantity;
        let status = if next.raw() >= target.raw() { OrderStatus::Filled } else { OrderStatus::PartiallyFilled };
        slot.status.store(status as u8, Ordering::Release);
    }

    /// Marks a tracked order canceled. No-op if `id` is not tracked.
    pub fn on_canceled(&self, id: OrderId) {
        let Some(slot) = self.find(id) else { return };
        slot.status.store(OrderStatus::Canceled as u8, Ordering::Release);
        slot.last_update_raw.store(time::now().raw_nanos(), Ordering::Release);
    }

    /// Marks a tracked order rejected. No-op if `id` is not tracked.
    pub fn on_rejected(&self, id: OrderId) {
        let Some(slot) = self.find(id) else { return };
        slot.status.store(OrderStatus::Rejected as u8, Ordering::Release);
        slot.last_update_raw.store(time::now().raw_nanos(), Ordering::Release);
    }

    /// Marks `old_id` replaced and inserts `new_order` as a fresh slot.
    pub fn on_replaced(&self, old_id: OrderId, new_order: &Order) -> Result<(), EngineError> {
        if let Some(old) = self.find(old_id) {
            old.status.store(OrderStatus::Replaced as u8, Ordering::Release);
            old.last_update_raw.store(time::now().raw_nanos(), Ordering::Release);
        }
        self.on_submitted(new_order)
    }

    /// Returns a snapshot of the tracked state for `id`, if present.
    pub fn get(&self, id: OrderId) -> Option<OrderState> {
        let slot = self.find(id)?;
        Some(OrderState {
            local_order: *slot.order.lock(),
            status: OrderStatus::from_u8(slot.status.load(Ordering::Acquire)),
            filled: Quantity::from_raw(slot.filled_raw.load(Ordering::Relaxed)),
            created_at: TimePoint::from_raw_nanos(slot.created_at_raw.load(Ordering::Relaxed)),
            last_update: TimePoint::from_raw_nanos(slot.last_update_raw.load(Ordering::Relaxed)),
        })
    }
}

impl<const SIZE: usize> Default for OrderTracker<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{OrderType, Side};

    fn order(id: OrderId, qty: f64) -> Order {
        Order::new(
            id,
            Side::Buy,
            crate::decimal::Price::from_double(100.0),
            Quantity::from_double(qty),
            OrderType::Limit,
            0,
            TimePoint::from_raw_nanos(0),
        )
    }

    #[test]
    fn submitted_order_is_retrievable_and_starts_submitted() {
        let tracker: OrderTracker<16> = OrderTracker::new();
        tracker.on_submitted(&order(1, 10.0)).unwrap();
        let state = tracker.get(1).unwrap();
        assert_eq!(state.status, OrderStatus::Submitted);
        assert_eq!(state.filled, Quantity::from_raw(0));
    }

    #[test]
    fn partial_then_full_fill_transitions_status_correctly() {
        let tracker: OrderTracker<16> = OrderTracker::new();
        tracker.on_submitted(&order(1, 10.0)).unwrap();

        tracker.on_filled(1, Quantity::from_double(4.0));
        assert_eq!(tracker.get(1).unwrap().status, OrderStatus::PartiallyFilled);

        tracker.on_filled(1, Quantity::from_double(6.0));
        assert_eq!(tracker.get(1).unwrap().status, OrderStatus::Filled);
    }

    #[test]
    fn cancel_and_reject_update_status_in_place() {
        let tracker: OrderTracker<16> = OrderTracker::new();
        tracker.on_submitted(&order(1, 10.0)).unwrap();
        tracker.on_canceled(1);
        assert_eq!(tracker.get(1).unwrap().status, OrderStatus::Canceled);

        tracker.on_submitted(&order(2, 10.0)).unwrap();
        tracker.on_rejected(2);
        assert_eq!(tracker.get(2).unwrap().status, OrderStatus::Rejected);
    }

    #[test]
    fn replace_marks_old_replaced_and_tracks_new() {
        let tracker: OrderTracker<16> = OrderTracker::new();
        tracker.on_submitted(&order(1, 10.0)).unwrap();
        tracker.on_replaced(1, &order(2, 20.0)).unwrap();

        assert_eq!(tracker.get(1).unwrap().status, OrderStatus::Replaced);
        assert_eq!(tracker.get(2).unwrap().status, OrderStatus::Submitted);
    }

    #[test]
    fn insert_beyond_capacity_returns_overflow_error() {
        let tracker: OrderTracker<2> = OrderTracker::new();
        tracker.on_submitted(&order(1, 1.0)).unwrap();
        tracker.on_submitted(&order(3, 1.0)).unwrap();
        assert!(tracker.on_submitted(&order(5, 1.0)).is_err());
    }

    #[test]
    fn lookup_of_untracked_id_returns_none() {
        let tracker: OrderTracker<16> = OrderTracker::new();
        assert!(tracker.get(999).is_none());
    }
}
