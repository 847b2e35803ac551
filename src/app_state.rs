// =============================================================================
// Central Application State — Pulso analysis engine
// =============================================================================
//
// Shared across all async tasks via `Arc<AppState>`. The candle store is the
// only shared mutable resource; everything else is read-only after startup.
// =============================================================================

use std::sync::Arc;

use crate::binance::BinanceClient;
use crate::config::Config;
use crate::market_data::CandleStore;
use crate::narrative::Narrator;

pub struct AppState {
    pub config: Config,
    pub store: Arc<CandleStore>,
    pub binance: BinanceClient,
    pub narrator: Narrator,
    /// Instant the engine was started; used for the health endpoint uptime.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct the full state from resolved configuration. Typically
    /// wrapped in `Arc` immediately.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(CandleStore::new(config.window_capacity));
        let binance = BinanceClient::new(config.binance_base_url.clone(), config.fetch_timeout);
        let narrator = Narrator::from_config(&config);

        Self {
            config,
            store,
            binance,
            narrator,
            start_time: std::time::Instant::now(),
        }
    }
}
