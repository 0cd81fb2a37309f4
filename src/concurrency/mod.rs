//! Allocation-free concurrency plumbing shared by the book and bus
//! subsystems: a bounded SPSC ring queue, an intrusive ref-counted object
//! pool built on top of it, and a single-use tick barrier.

pub mod barrier;
pub mod pool;
pub mod spsc;
