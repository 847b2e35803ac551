// =============================================================================
// Acquisition Loop — periodic full-refresh of the candle window
// =============================================================================
//
// One dedicated tokio task. Every tick fetches the most recent klines for the
// configured symbol/interval and atomically replaces the store contents.
// Fetch failures (network, malformed payload, rate limit) are logged and the
// loop simply waits for the next tick — readers keep serving the last good
// window. Stale data is preferred over no data.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app_state::AppState;

/// Run the acquisition loop until the process shuts down.
///
/// Spawned from `main`; the task is dropped when the runtime exits, which is
/// the entire shutdown story — in-flight reads complete against snapshots
/// they have already taken.
pub async fn run_acquisition_loop(state: Arc<AppState>) {
    let symbol = state.config.symbol.clone();
    let interval = state.config.interval.clone();
    let limit = state.config.fetch_limit;

    info!(
        symbol = %symbol,
        interval = %interval,
        limit,
        every_secs = state.config.poll_interval_secs,
        "acquisition loop starting"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(state.config.poll_interval_secs));
    loop {
        ticker.tick().await;

        match state.binance.get_klines(&symbol, &interval, limit).await {
            Ok(candles) => {
                if candles.is_empty() {
                    warn!(symbol = %symbol, interval = %interval, "fetch returned no candles — keeping current window");
                    continue;
                }
                let count = candles.len();
                state.store.replace(candles);
                debug!(symbol = %symbol, interval = %interval, count, "window refreshed");
            }
            Err(e) => {
                // Never crash the loop; retry at the next scheduled tick.
                warn!(
                    symbol = %symbol,
                    interval = %interval,
                    error = %e,
                    "candle fetch failed — serving stale window until next tick"
                );
            }
        }
    }
}
