// =============================================================================
// Configuration — environment-driven settings with safe defaults
// =============================================================================
//
// Every knob is read once at startup from `PULSO_*` environment variables
// (`.env` files are honored via dotenv in main). Malformed numeric values log
// a warning and fall back to the default — startup never panics on config.
//
// The OpenAI block is optional: without `OPENAI_API_KEY` the narrative layer
// runs in deterministic local-fallback mode.
// =============================================================================

use std::time::Duration;

use tracing::warn;

/// Credentials and tuning for the optional text-generation collaborator.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Top-level runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Trading pair to watch, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Kline interval, e.g. `1m`.
    pub interval: String,
    /// Maximum candles retained in the rolling window.
    pub window_capacity: usize,
    /// Seconds between acquisition ticks.
    pub poll_interval_secs: u64,
    /// Maximum candles requested per fetch.
    pub fetch_limit: u32,
    /// Number of trailing points returned by the snapshot endpoint.
    pub tail_len: usize,
    /// Number of trailing points included in the narrative summary.
    pub summary_points: usize,
    /// HTTP bind address for the API server.
    pub bind_addr: String,
    /// Binance REST base URL (overridable for testing).
    pub binance_base_url: String,
    /// Bound on each klines request.
    pub fetch_timeout: Duration,
    /// Present only when a text-generation key is configured.
    pub openai: Option<OpenAiConfig>,
}

impl Config {
    /// Resolve the full configuration from the process environment.
    pub fn from_env() -> Self {
        let openai = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(OpenAiConfig {
                api_key: key,
                model: env_or("PULSO_OPENAI_MODEL", "gpt-4o-mini"),
                base_url: env_or("PULSO_OPENAI_BASE_URL", "https://api.openai.com"),
                timeout: Duration::from_secs(env_parse_or("PULSO_OPENAI_TIMEOUT_SECS", 20u64)),
            }),
            _ => None,
        };

        Self {
            symbol: env_or("PULSO_SYMBOL", "BTCUSDT").to_uppercase(),
            interval: env_or("PULSO_INTERVAL", "1m"),
            window_capacity: env_parse_or("PULSO_WINDOW_CAPACITY", 300usize),
            poll_interval_secs: env_parse_or("PULSO_POLL_INTERVAL_SECS", 5u64),
            fetch_limit: env_parse_or("PULSO_FETCH_LIMIT", 200u32),
            tail_len: env_parse_or("PULSO_TAIL_LEN", 120usize),
            summary_points: env_parse_or("PULSO_SUMMARY_POINTS", 30usize),
            bind_addr: env_or("PULSO_BIND_ADDR", "0.0.0.0:3001"),
            binance_base_url: env_or("PULSO_BINANCE_BASE_URL", "https://api.binance.com"),
            fetch_timeout: Duration::from_secs(env_parse_or("PULSO_FETCH_TIMEOUT_SECS", 15u64)),
            openai,
        }
    }
}

/// Read a string variable or fall back to `default`.
fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Read and parse a variable or fall back to `default`, warning on garbage.
fn env_parse_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(var = name, value = %raw, %default, "malformed value — using default");
                default
            }
        },
        Err(_) => default,
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("PULSO_TEST_UNSET_STR", "fallback"), "fallback");
    }

    #[test]
    fn env_or_reads_set_value() {
        std::env::set_var("PULSO_TEST_SET_STR", "ETHUSDT");
        assert_eq!(env_or("PULSO_TEST_SET_STR", "BTCUSDT"), "ETHUSDT");
        std::env::remove_var("PULSO_TEST_SET_STR");
    }

    #[test]
    fn env_parse_or_falls_back_on_garbage() {
        std::env::set_var("PULSO_TEST_GARBAGE_NUM", "not-a-number");
        assert_eq!(env_parse_or("PULSO_TEST_GARBAGE_NUM", 300usize), 300);
        std::env::remove_var("PULSO_TEST_GARBAGE_NUM");
    }

    #[test]
    fn env_parse_or_reads_valid_value() {
        std::env::set_var("PULSO_TEST_VALID_NUM", "42");
        assert_eq!(env_parse_or("PULSO_TEST_VALID_NUM", 300usize), 42);
        std::env::remove_var("PULSO_TEST_VALID_NUM");
    }
}
