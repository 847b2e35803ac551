// =============================================================================
// Narrative layer — turns a scored signal into prose
// =============================================================================
//
// Two implementations behind one dispatch type, selected once at startup:
//
//   Remote — OpenAI-compatible chat completions, fed a compact numeric
//            summary (never the full window).
//   Local  — deterministic template built from the same numeric fields.
//
// A remote failure is a `Generation` event: logged and recovered by falling
// back to the local template. It never fails an analyze request.
// =============================================================================

pub mod openai;

use tracing::{info, warn};

use crate::config::Config;
use crate::types::Signal;

pub use openai::OpenAiClient;

const SYSTEM_PROMPT: &str = "You are a trading analyst. Given a numeric summary of recent price \
     action and technical indicators, write a short plain-language reading of \
     the market. Mention the signal label and the main drivers. Do not invent \
     numbers that are not in the summary.";

/// Narrative generator chosen from configuration at startup.
pub enum Narrator {
    Remote(OpenAiClient),
    Local,
}

impl Narrator {
    /// Capability check: a configured API key selects the remote client,
    /// otherwise the deterministic local formatter.
    pub fn from_config(config: &Config) -> Self {
        match &config.openai {
            Some(openai_cfg) => {
                info!(model = %openai_cfg.model, "narrative generation: remote model");
                Self::Remote(OpenAiClient::new(openai_cfg))
            }
            None => {
                info!("narrative generation: no API key configured, using local fallback");
                Self::Local
            }
        }
    }

    /// Produce the narrative for a scored signal.
    ///
    /// `summary` is the compact numeric summary built by the analysis
    /// service; `note` is the caller's free-text question (may be empty).
    /// This never fails: remote errors degrade to the local template.
    pub async fn narrate(&self, signal: &Signal, summary: &str, note: &str) -> String {
        match self {
            Self::Local => fallback_narrative(signal, note),
            Self::Remote(client) => {
                let user_prompt = if note.trim().is_empty() {
                    summary.to_string()
                } else {
                    format!("{summary}\n\nUser question: {note}")
                };

                match client.generate(SYSTEM_PROMPT, &user_prompt).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "narrative generation failed — using local fallback");
                        fallback_narrative(signal, note)
                    }
                }
            }
        }
    }
}

/// Deterministic narrative built from the signal's own numeric fields.
///
/// Same precision as the remote path's summary; only the prose is templated.
pub fn fallback_narrative(signal: &Signal, note: &str) -> String {
    let mut text = format!(
        "Signal: {} (score {}). Close {:.2}, RSI {:.1}, EMA9 {:.2} vs EMA21 {:.2}, \
         MACD {:.4} vs signal {:.4}. Drivers: {}.",
        signal.label,
        signal.score,
        signal.close,
        signal.rsi,
        signal.ema9,
        signal.ema21,
        signal.macd,
        signal.macd_signal,
        signal.reasons.join("; "),
    );
    if !note.trim().is_empty() {
        text.push_str(&format!(
            " (Automatic summary — no model is configured to address: \"{}\".)",
            note.trim()
        ));
    }
    text
}
