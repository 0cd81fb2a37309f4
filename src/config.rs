//! Engine configuration value objects.
//!
//! Deliberately format-agnostic: spec.md §6 leaves the persisted
//! representation non-normative, so this module only derives
//! `serde::{Serialize, Deserialize}` and lets the host application pick
//! TOML, JSON, or whatever else `serde` has a backend for.

use crate::decimal::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One tradable symbol's book-construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    /// Exchange-local symbol, e.g. `"BTCUSDT"`.
    pub symbol: String,
    /// Minimum price increment for this symbol's book.
    pub tick_size: Price,
    /// Expected price deviation, used to size a [`crate::book::WindowedOrderBook`]'s window.
    pub expected_deviation: Price,
}

/// One exchange's descriptor: its name and the symbols to track on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange name, e.g. `"binance"`.
    pub name: String,
    /// Symbols to subscribe to on this exchange.
    pub symbols: Vec<SymbolConfig>,
}

/// Kill-switch thresholds. Enforcement is an external collaborator's
/// concern (spec.md §1); this struct only carries the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillSwitchConfig {
    /// Largest single order quantity permitted.
    pub max_order_qty: Quantity,
    /// Largest cumulative loss permitted before trading halts.
    pub max_loss: Quantity,
    /// Largest order submission rate permitted, in orders per second.
    pub max_orders_per_sec: u32,
}

/// Log verbosity, mapped onto `tracing`'s level filter by the host
/// application (this crate never installs a global subscriber itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Normal operational messages.
    Info,
    /// Verbose diagnostics.
    Debug,
    /// Per-event tracing.
    Trace,
}

/// Top-level engine configuration: every exchange to connect to, the
/// kill-switch thresholds, and the log verbosity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Exchanges to connect to and the symbols to track on each.
    pub exchanges: Vec<ExchangeConfig>,
    /// Kill-switch thresholds.
    pub kill_switch: KillSwitchConfig,
    /// Log verbosity.
    pub log_level: LogLevel,
}
