//! The order-execution listener contract: the eight lifecycle callbacks an
//! order-execution bus subscriber implements.
//!
//! `Submitted` and `Accepted` are dispatched independently — see the note on
//! [`crate::events::OrderEventType`] — each routing to exactly one callback
//! below, not the fallthrough the source's `dispatchTo` switch exhibits.

use crate::bus::DispatchTarget;
use crate::decimal::Quantity;
use crate::events::{Order, OrderEvent, OrderEventType};

/// A subscriber to order lifecycle events.
///
/// Every callback has a no-op default so an implementor only overrides the
/// transitions it cares about.
pub trait OrderExecutionListener: Send + Sync {
    /// The order was submitted to the exchange.
    fn on_order_submitted(&self, _order: &Order) {}
    /// The exchange acknowledged the order.
    fn on_order_accepted(&self, _order: &Order) {}
    /// The order received a partial fill of `fill_qty`.
    fn on_order_partially_filled(&self, _order: &Order, _fill_qty: Quantity) {}
    /// The order is fully filled.
    fn on_order_filled(&self, _order: &Order) {}
    /// The order was canceled.
    fn on_order_canceled(&self, _order: &Order) {}
    /// The order expired (time-in-force elapsed).
    fn on_order_expired(&self, _order: &Order) {}
    /// The exchange rejected the order, with its stated `reason`.
    fn on_order_rejected(&self, _order: &Order, _reason: &str) {}
    /// The order was replaced by `new_order`.
    fn on_order_replaced(&self, _order: &Order, _new_order: &Order) {}
}

impl<T: OrderExecutionListener + ?Sized> DispatchTarget<OrderEvent> for T {
    fn dispatch(&self, event: &OrderEvent) {
        match event.event_type {
            OrderEventType::Submitted => self.on_order_submitted(&event.order),
            OrderEventType::Accepted => self.on_order_accepted(&event.order),
            OrderEventType::PartiallyFilled => self.on_order_partially_filled(&event.order, event.fill_qty),
            OrderEventType::Filled => self.on_order_filled(&event.order),
            OrderEventType::Canceled => self.on_order_canceled(&event.order),
            OrderEventType::Expired => self.on_order_expired(&event.order),
            OrderEventType::Rejected => {
                self.on_order_rejected(&event.order, event.reason.as_deref().unwrap_or(""))
            }
            OrderEventType::Replaced => self.on_order_replaced(&event.order, &event.new_order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Price;
    use crate::events::Side;
    use crate::time::TimePoint;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder {
        submitted: Mutex<u32>,
        accepted: Mutex<u32>,
    }

    impl OrderExecutionListener for Recorder {
        fn on_order_submitted(&self, _order: &Order) {
            *self.submitted.lock() += 1;
        }
        fn on_order_accepted(&self, _order: &Order) {
            *self.accepted.lock() += 1;
        }
    }

    fn sample_order() -> Order {
        Order::new(1, Side::Buy, Price::from_double(100.0), Quantity::from_double(1.0), crate::events::OrderType::Limit, 1, TimePoint::from_raw_nanos(0))
    }

    #[test]
    fn submitted_and_accepted_dispatch_independently_not_both() {
        let recorder = Arc::new(Recorder { submitted: Mutex::new(0), accepted: Mutex::new(0) });
        let listener: Arc<dyn DispatchTarget<OrderEvent> + Send + Sync> = recorder.clone();

        listener.dispatch(&OrderEvent {
            event_type: OrderEventType::Submitted,
            order: sample_order(),
            new_order: sample_order(),
            fill_qty: Quantity::from_raw(0),
            reason: None,
            tick_sequence: 0,
        });

        assert_eq!(*recorder.submitted.lock(), 1);
        assert_eq!(*recorder.accepted.lock(), 0);
    }

    #[test]
    fn rejected_carries_reason_through() {
        struct ReasonCapture {
            reason: Mutex<String>,
        }
        impl OrderExecutionListener for ReasonCapture {
            fn on_order_rejected(&self, _order: &Order, reason: &str) {
                *self.reason.lock() = reason.to_string();
            }
        }

        let capture = Arc::new(ReasonCapture { reason: Mutex::new(String::new()) });
        let listener: Arc<dyn DispatchTarget<OrderEvent> + Send + Sync> = capture.clone();

        listener.dispatch(&OrderEvent {
            event_type: OrderEventType::Rejected,
            order: sample_order(),
            new_order: sample_order(),
            fill_qty: Quantity::from_raw(0),
            reason: Some("insufficient margin".to_string()),
            tick_sequence: 0,
        });

        assert_eq!(*capture.reason.lock(), "insufficient margin");
    }
}
