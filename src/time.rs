//! Monotonic time representation and the mapping between it and wall-clock
//! (Unix) timestamps.
//!
//! The engine timestamps everything against a monotonic clock — so that
//! latency measurements are never disturbed by an NTP step — but exchange
//! feeds and operators speak in Unix time. [`init_timebase_mapping`]
//! captures the current offset between the two once, near process start,
//! and every conversion after that is a single addition.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Nanoseconds per millisecond.
pub const NS_PER_MS: i64 = 1_000_000;

/// A monotonic instant, stored as nanoseconds since an unspecified process-
/// local origin. Comparable and orderable; never compares equal across
/// process restarts or machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Wraps a raw monotonic-nanosecond value, e.g. one converted from a
    /// Unix timestamp via [`from_unix_ms`]/[`from_unix_nanos`].
    pub const fn from_raw_nanos(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw monotonic-nanosecond value.
    pub const fn raw_nanos(self) -> i64 {
        self.0
    }

    /// Nanoseconds elapsed from `self` to `later`. Negative if `later`
    /// precedes `self`.
    pub const fn elapsed_ns(self, later: TimePoint) -> i64 {
        later.0 - self.0
    }
}

static PROCESS_ORIGIN: OnceLock<Instant> = OnceLock::new();
static UNIX_OFFSET_NS: AtomicI64 = AtomicI64::new(0);

fn monotonic_now_ns() -> i64 {
    // `Instant::now` is not `const fn`, so the origin can't be a plain
    // static; it's captured lazily on first use instead, via a `OnceLock`.
    PROCESS_ORIGIN.get_or_init(Instant::now).elapsed().as_nanos() as i64
}

/// The current monotonic time.
pub fn now() -> TimePoint {
    TimePoint(monotonic_now_ns())
}

/// Records the current offset between the monotonic clock and Unix wall
/// time. Call once near process start; every [`from_unix_ms`]/
/// [`from_unix_nanos`] call afterward uses this snapshot, so a later NTP
/// step does not retroactively move already-computed timestamps.
pub fn init_timebase_mapping() {
    let mono_ns = monotonic_now_ns();
    let unix_ns = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0);
    UNIX_OFFSET_NS.store(mono_ns - unix_ns, Ordering::Relaxed);
}

/// Converts a Unix millisecond timestamp to monotonic nanoseconds, using
/// the offset captured by the last [`init_timebase_mapping`] call.
pub fn unix_ms_to_mono_ns(ms_epoch: i64) -> i64 {
    ms_epoch * NS_PER_MS + UNIX_OFFSET_NS.load(Ordering::Relaxed)
}

/// Converts a Unix nanosecond timestamp to monotonic nanoseconds.
pub fn unix_ns_to_mono_ns(ns_epoch: i64) -> i64 {
    ns_epoch + UNIX_OFFSET_NS.load(Ordering::Relaxed)
}

/// Builds a [`TimePoint`] from a Unix millisecond timestamp.
pub fn from_unix_ms(ms_epoch: i64) -> TimePoint {
    TimePoint(unix_ms_to_mono_ns(ms_epoch))
}

/// Builds a [`TimePoint`] from a Unix nanosecond timestamp.
pub fn from_unix_nanos(ns_epoch: i64) -> TimePoint {
    TimePoint(unix_ns_to_mono_ns(ns_epoch))
}

/// Truncates nanoseconds down to whole milliseconds.
pub const fn ns_to_ms_floor(ns: i64) -> i64 {
    ns.div_euclid(NS_PER_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_point_ordering_matches_raw_nanos() {
        let a = TimePoint::from_raw_nanos(100);
        let b = TimePoint::from_raw_nanos(200);
        assert!(a < b);
        assert_eq!(a.elapsed_ns(b), 100);
    }

    #[test]
    fn unix_ms_round_trips_through_offset() {
        init_timebase_mapping();
        let unix_ms = 1_700_000_000_000i64;
        let tp = from_unix_ms(unix_ms);
        assert!(tp.raw_nanos() > 0);
    }

    #[test]
    fn ns_to_ms_floor_truncates_toward_negative_infinity() {
        assert_eq!(ns_to_ms_floor(2_500_000), 2);
        assert_eq!(ns_to_ms_floor(-2_500_000), -3);
    }
}
