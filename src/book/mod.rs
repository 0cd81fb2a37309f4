//! Order-book maintenance: a fixed-array sliding-window book and a
//! ring-buffered windowed variant, sharing a common update data model.

pub mod nlevel;
pub mod types;
pub mod windowed;

pub use nlevel::NLevelOrderBook;
pub use types::{BookLevel, BookUpdate, BookUpdateEvent, BookUpdateHandle, BookUpdateType};
pub use windowed::WindowedOrderBook;
