//! Generation orchestrator
//!
//! Drives the model fallback chain. Each model gets one initial call and a
//! bounded number of repair calls; the first payload that parses as JSON and
//! passes the structural validator wins. Transport failures skip straight to
//! the next model. Repair is only for content that produced text but failed
//! JSON validity.

use super::{extract::extract_json, prompt, validate, GenerationResult};
use crate::ingest::PaperRef;
use crate::llm::{ChatProvider, Message};
use std::time::Duration;

/// Repair calls allowed per model (so up to 3 parse/validate attempts each).
pub const MAX_REPAIR_ATTEMPTS: usize = 2;

/// Errors terminal to an orchestration run
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("all models exhausted without an accepted payload")]
    Exhausted,
}

/// Orchestrates the model fallback chain with per-model repair loops.
///
/// State per attempt is explicit: the current model, the remaining repair
/// budget, and the current candidate text. Nothing carries over between
/// models, so each model's repair loop only ever sees output it produced.
pub struct BlueprintGenerator<'a> {
    chat: &'a dyn ChatProvider,
    models: Vec<String>,
    max_repairs: usize,
    model_cooldown: Duration,
}

impl<'a> BlueprintGenerator<'a> {
    pub fn new(chat: &'a dyn ChatProvider, models: Vec<String>) -> Self {
        Self {
            chat,
            models,
            max_repairs: MAX_REPAIR_ATTEMPTS,
            model_cooldown: Duration::from_secs(1),
        }
    }

    /// Delay inserted between attempts on distinct models. Scheduling
    /// policy for upstream rate limits, not a correctness requirement.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.model_cooldown = cooldown;
        self
    }

    /// Run the fallback chain over the paper list.
    ///
    /// Returns the first accepted payload, or `Exhausted` once every model
    /// in the chain has failed.
    pub async fn generate(&self, papers: &[PaperRef]) -> Result<GenerationResult, GenerateError> {
        let messages = prompt::generation_messages(papers);

        for (idx, model) in self.models.iter().enumerate() {
            if idx > 0 && !self.model_cooldown.is_zero() {
                tokio::time::sleep(self.model_cooldown).await;
            }

            tracing::info!(model = %model, "attempting model");
            match self.try_model(model, &messages).await {
                Some(result) => {
                    tracing::info!(
                        model = %model,
                        ideas = result.ideas.len(),
                        "accepted payload"
                    );
                    return Ok(result);
                }
                None => {
                    tracing::warn!(model = %model, "model failed, advancing chain");
                }
            }
        }

        tracing::error!("all models exhausted");
        Err(GenerateError::Exhausted)
    }

    /// One model's turn: initial call, then the bounded repair loop.
    async fn try_model(&self, model: &str, messages: &[Message]) -> Option<GenerationResult> {
        let raw = match self.chat.complete(model, messages).await {
            Ok(raw) => raw,
            Err(e) => {
                // Transport failure: no text to repair, move on
                tracing::warn!(model = %model, error = %e, "request failed");
                return None;
            }
        };

        let mut candidate = extract_json(&raw);
        let mut repairs_left = self.max_repairs;

        loop {
            match accept(&candidate) {
                Ok(result) => return Some(result),
                Err(reason) => {
                    tracing::debug!(model = %model, %reason, repairs_left, "candidate rejected");
                }
            }

            if repairs_left == 0 {
                return None;
            }
            repairs_left -= 1;

            tracing::info!(model = %model, "sending repair request");
            let repair = prompt::repair_messages(&candidate);
            match self.chat.complete(model, &repair).await {
                Ok(repaired) => candidate = extract_json(&repaired),
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "repair request failed");
                    return None;
                }
            }
        }
    }
}

/// Parse, validate, and deserialize a candidate. Any defect is a rejection
/// with a reason; the caller decides whether a repair attempt remains.
fn accept(candidate: &str) -> Result<GenerationResult, String> {
    let value: serde_json::Value =
        serde_json::from_str(candidate).map_err(|e| format!("JSON parse error: {}", e))?;

    if !validate::is_valid(&value) {
        return Err("schema validation failed".to_string());
    }

    serde_json::from_value(value).map_err(|e| format!("deserialization failed: {}", e))
}
