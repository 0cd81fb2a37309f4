//! Process-wide mapping from (exchange, symbol) pairs to the compact
//! numeric [`SymbolId`] used everywhere else in the engine.

use crate::decimal::Price;
use crate::events::{InstrumentType, OptionType, SymbolId};
use crate::time::TimePoint;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Static metadata for one registered symbol. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    /// The id assigned at registration time.
    pub id: SymbolId,
    /// Exchange name, e.g. `"binance"`.
    pub exchange: String,
    /// Exchange-local symbol, e.g. `"BTCUSDT"`.
    pub symbol: String,
    /// Instrument classification.
    pub instrument_type: InstrumentType,
    /// Strike price, for options.
    pub strike: Option<Price>,
    /// Expiry, for futures and options.
    pub expiry: Option<TimePoint>,
    /// Call/put, for options.
    pub option_type: Option<OptionType>,
}

impl SymbolInfo {
    /// A plain spot symbol with no derivative metadata.
    pub fn spot(exchange: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: 0,
            exchange: exchange.into(),
            symbol: symbol.into(),
            instrument_type: InstrumentType::Spot,
            strike: None,
            expiry: None,
            option_type: None,
        }
    }
}

struct Inner {
    symbols: Vec<SymbolInfo>,
    by_name: HashMap<(String, String), SymbolId>,
}

/// Registers `(exchange, symbol)` pairs to numeric ids the first time they
/// are seen, and resolves ids back to names and metadata afterward.
///
/// Registration is idempotent: registering the same pair twice returns the
/// id assigned the first time. Writes (registration) take the exclusive
/// side of the lock; the far more frequent lookups (`symbol_id`,
/// `symbol_info`, `symbol_name`) take only a read guard, so concurrent
/// readers never block each other once the symbol universe has settled.
pub struct SymbolRegistry {
    inner: RwLock<Inner>,
}

impl SymbolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner { symbols: Vec::new(), by_name: HashMap::new() }),
        }
    }

    /// Registers a bare exchange/symbol pair with [`InstrumentType::Spot`]
    /// and no derivative metadata, returning its id.
    pub fn register_symbol(&self, exchange: &str, symbol: &str) -> SymbolId {
        self.register(SymbolInfo::spot(exchange, symbol))
    }

    /// Registers full symbol metadata, returning the assigned id. If this
    /// `(exchange, symbol)` pair was already registered, returns the
    /// existing id unchanged — `info.id` and any derivative fields on a
    /// repeat call are ignored.
    pub fn register(&self, info: SymbolInfo) -> SymbolId {
        let mut inner = self.inner.write();
        let key = (info.exchange.clone(), info.symbol.clone());
        if let Some(&id) = inner.by_name.get(&key) {
            return id;
        }

        let id = inner.symbols.len() as SymbolId;
        inner.by_name.insert(key, id);
        inner.symbols.push(SymbolInfo { id, ..info });
        id
    }

    /// Looks up the id for a previously registered pair.
    pub fn symbol_id(&self, exchange: &str, symbol: &str) -> Option<SymbolId> {
        let inner = self.inner.read();
        inner.by_name.get(&(exchange.to_string(), symbol.to_string())).copied()
    }

    /// Looks up the full metadata for a registered id.
    pub fn symbol_info(&self, id: SymbolId) -> Option<SymbolInfo> {
        let inner = self.inner.read();
        inner.symbols.get(id as usize).cloned()
    }

    /// Looks up the `(exchange, symbol)` name pair for a registered id.
    pub fn symbol_name(&self, id: SymbolId) -> Option<(String, String)> {
        let inner = self.inner.read();
        inner.symbols.get(id as usize).map(|s| (s.exchange.clone(), s.symbol.clone()))
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
